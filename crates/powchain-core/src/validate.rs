//! End-to-end chain validation.

use std::fmt;

use serde::Serialize;

use crate::block::Block;
use crate::config::ValidationMode;
use crate::constants::GENESIS_PREVIOUS_DIGEST;
use crate::digest::meets_difficulty;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Stored digest differs from the digest of the stored fields.
    BadDigest,
    /// Stored previous digest differs from the predecessor's digest.
    BadLinkage,
    /// Stored digest lacks the required leading zeros.
    BadProofOfWork,
    /// Stored index differs from the block's position. Strict mode only.
    BadIndex,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureReason::BadDigest => "digest does not match block contents",
            FailureReason::BadLinkage => "previous digest does not match predecessor",
            FailureReason::BadProofOfWork => "digest does not meet proof-of-work difficulty",
            FailureReason::BadIndex => "index does not match position",
        };
        f.write_str(s)
    }
}

/// Outcome of a validation pass. A failure is a value, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub ok: bool,
    pub failing_index: Option<u64>,
    pub reason: Option<FailureReason>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            ok: true,
            failing_index: None,
            reason: None,
        }
    }

    pub fn invalid(index: u64, reason: FailureReason) -> Self {
        Self {
            ok: false,
            failing_index: Some(index),
            reason: Some(reason),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }
}

/// Validate `blocks` against `difficulty`, stopping at the first failure.
///
/// Each non-genesis block is checked for self-consistency, then linkage to
/// its predecessor, then proof of work. Genesis is only checked in
/// [`ValidationMode::Strict`].
pub fn validate_blocks(
    blocks: &[Block],
    difficulty: u32,
    mode: ValidationMode,
) -> ValidationResult {
    let strict = mode == ValidationMode::Strict;

    if let (true, Some(genesis)) = (strict, blocks.first()) {
        if let Some(reason) =
            check_block(genesis, 0, GENESIS_PREVIOUS_DIGEST, difficulty, true)
        {
            return ValidationResult::invalid(0, reason);
        }
    }

    for (pos, pair) in blocks.windows(2).enumerate() {
        let (prev, current) = (&pair[0], &pair[1]);
        let pos = pos as u64 + 1;
        if let Some(reason) = check_block(current, pos, prev.digest(), difficulty, strict) {
            return ValidationResult::invalid(pos, reason);
        }
    }

    ValidationResult::valid()
}

fn check_block(
    block: &Block,
    pos: u64,
    expected_previous: &str,
    difficulty: u32,
    strict: bool,
) -> Option<FailureReason> {
    if strict && block.index() != pos {
        return Some(FailureReason::BadIndex);
    }
    if block.compute_digest() != block.digest() {
        return Some(FailureReason::BadDigest);
    }
    if block.previous_digest() != expected_previous {
        return Some(FailureReason::BadLinkage);
    }
    if !meets_difficulty(block.digest(), difficulty) {
        return Some(FailureReason::BadProofOfWork);
    }
    None
}
