use serde::Serialize;

use crate::constants::{GENESIS_PAYLOAD, GENESIS_PREVIOUS_DIGEST};
use crate::digest::block_digest;

/// A sealed block. Fields are read-only once the block leaves the miner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Block {
    index: u64,
    timestamp: u64,
    payload: String,
    previous_digest: String,
    nonce: u64,
    digest: String,
}

impl Block {
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn previous_digest(&self) -> &str {
        &self.previous_digest
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    /// Re-derive the digest from the stored fields.
    pub fn compute_digest(&self) -> String {
        block_digest(
            self.index,
            self.timestamp,
            &self.payload,
            &self.previous_digest,
            self.nonce,
        )
    }

    #[cfg(any(test, feature = "tamper"))]
    pub(crate) fn overwrite_payload(&mut self, payload: String) {
        self.payload = payload;
    }

    #[cfg(any(test, feature = "tamper"))]
    pub(crate) fn overwrite_digest(&mut self, digest: String) {
        self.digest = digest;
    }
}

/// A block under construction. The miner mutates `nonce` and `digest`
/// until the digest qualifies, then seals it into a [`Block`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub index: u64,
    pub timestamp: u64,
    pub payload: String,
    pub previous_digest: String,
    pub nonce: u64,
    /// Empty until the first digest is computed.
    pub digest: String,
}

impl Candidate {
    pub fn new(
        index: u64,
        timestamp: u64,
        payload: impl Into<String>,
        previous_digest: impl Into<String>,
    ) -> Self {
        Self {
            index,
            timestamp,
            payload: payload.into(),
            previous_digest: previous_digest.into(),
            nonce: 0,
            digest: String::new(),
        }
    }

    pub fn genesis(timestamp: u64) -> Self {
        Self::new(0, timestamp, GENESIS_PAYLOAD, GENESIS_PREVIOUS_DIGEST)
    }

    /// A candidate that extends `tip`.
    pub fn extending(tip: &Block, timestamp: u64, payload: impl Into<String>) -> Self {
        Self::new(tip.index + 1, timestamp, payload, tip.digest.clone())
    }

    pub fn compute_digest(&self) -> String {
        block_digest(
            self.index,
            self.timestamp,
            &self.payload,
            &self.previous_digest,
            self.nonce,
        )
    }

    pub(crate) fn refresh_digest(&mut self) {
        self.digest = self.compute_digest();
    }

    pub(crate) fn seal(self) -> Block {
        Block {
            index: self.index,
            timestamp: self.timestamp,
            payload: self.payload,
            previous_digest: self.previous_digest,
            nonce: self.nonce,
            digest: self.digest,
        }
    }
}
