use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("difficulty {difficulty} exceeds the maximum of {max}")]
    Configuration { difficulty: u32, max: u32 },

    #[error("mining block {index} gave up after {trials} trials")]
    MiningExhausted { index: u64, trials: u64 },

    #[error("mining block {index} was cancelled after {trials} trials")]
    MiningCancelled { index: u64, trials: u64 },

    #[error("no block at index {index} (chain length {len})")]
    BlockOutOfRange { index: u64, len: usize },
}

pub type Result<T> = std::result::Result<T, ChainError>;
