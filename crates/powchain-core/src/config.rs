use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DIFFICULTY, MAX_DIFFICULTY};
use crate::error::{ChainError, Result};

/// Which nonce the mining search tests first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NonceStart {
    /// Bump the nonce before every digest, so the first nonce tried is 1.
    /// The classic increment-first loop.
    #[default]
    AfterIncrement,
    /// Try nonce 0 first.
    Zero,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
    /// Check blocks 1.. only; genesis is trusted.
    #[default]
    Standard,
    /// Also check genesis and that every index matches its position.
    Strict,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Leading zero hex digits required of every digest.
    pub difficulty: u32,
    pub nonce_start: NonceStart,
    /// Give up on a block after this many digests. `None` searches forever.
    pub max_trials: Option<u64>,
    pub validation: ValidationMode,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            nonce_start: NonceStart::default(),
            max_trials: None,
            validation: ValidationMode::default(),
        }
    }
}

impl ChainConfig {
    pub fn with_difficulty(difficulty: u32) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    pub fn nonce_start(mut self, nonce_start: NonceStart) -> Self {
        self.nonce_start = nonce_start;
        self
    }

    pub fn max_trials(mut self, max_trials: Option<u64>) -> Self {
        self.max_trials = max_trials;
        self
    }

    pub fn validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.difficulty > MAX_DIFFICULTY {
            return Err(ChainError::Configuration {
                difficulty: self.difficulty,
                max: MAX_DIFFICULTY,
            });
        }
        Ok(())
    }
}
