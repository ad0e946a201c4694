use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::block::{Block, Candidate};
use crate::config::{ChainConfig, NonceStart};
use crate::digest::meets_difficulty;
use crate::error::{ChainError, Result};

/// Shared flag that stops a running search at its next iteration.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Clear the flag so the token can gate another search.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// A sealed block plus what it cost to find.
#[derive(Clone, Debug)]
pub struct Mined {
    pub block: Block,
    /// Digests computed, including the winning one.
    pub trials: u64,
    pub elapsed: Duration,
}

#[derive(Clone, Debug)]
pub struct Miner {
    difficulty: u32,
    nonce_start: NonceStart,
    max_trials: Option<u64>,
    cancel: Option<CancelToken>,
}

impl Miner {
    pub fn new(difficulty: u32) -> Self {
        Self {
            difficulty,
            nonce_start: NonceStart::default(),
            max_trials: None,
            cancel: None,
        }
    }

    pub fn from_config(config: &ChainConfig) -> Self {
        Self {
            difficulty: config.difficulty,
            nonce_start: config.nonce_start,
            max_trials: config.max_trials,
            cancel: None,
        }
    }

    pub fn with_nonce_start(mut self, nonce_start: NonceStart) -> Self {
        self.nonce_start = nonce_start;
        self
    }

    pub fn with_max_trials(mut self, max_trials: Option<u64>) -> Self {
        self.max_trials = max_trials;
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Linear scan over nonces until the candidate's digest meets the
    /// difficulty. At least one digest is always computed, so a sealed
    /// block never carries an empty digest.
    pub fn mine(&self, mut candidate: Candidate) -> Result<Mined> {
        let started = Instant::now();
        let index = candidate.index;
        let bump_first = self.nonce_start == NonceStart::AfterIncrement;
        let mut trials = 0u64;

        debug!(index, difficulty = self.difficulty, "mining candidate");

        loop {
            if let Some(token) = &self.cancel {
                if token.is_cancelled() {
                    warn!(index, trials, "mining cancelled");
                    return Err(ChainError::MiningCancelled { index, trials });
                }
            }
            if let Some(max) = self.max_trials {
                if trials >= max {
                    warn!(index, trials, "mining hit the trial cap");
                    return Err(ChainError::MiningExhausted { index, trials });
                }
            }

            if bump_first || trials > 0 {
                candidate.nonce = match candidate.nonce.checked_add(1) {
                    Some(n) => n,
                    None => return Err(ChainError::MiningExhausted { index, trials }),
                };
            }
            candidate.refresh_digest();
            trials += 1;

            if meets_difficulty(&candidate.digest, self.difficulty) {
                break;
            }
        }

        debug!(
            index,
            nonce = candidate.nonce,
            trials,
            digest = %candidate.digest,
            "candidate sealed"
        );

        Ok(Mined {
            block: candidate.seal(),
            trials,
            elapsed: started.elapsed(),
        })
    }
}
