//! Hash-chained, in-memory ledger gated by a leading-zero proof of work.
//!
//! [`Chain`] owns the blocks. It mines a genesis block on construction,
//! mines every appended block with [`Miner`], and re-checks the whole
//! sequence with [`Chain::validate`].

pub mod block;
pub mod chain;
pub mod clock;
pub mod config;
pub mod constants;
pub mod digest;
pub mod error;
pub mod events;
pub mod mine;
pub mod shared;
pub mod survey;
pub mod validate;

pub use block::{Block, Candidate};
pub use chain::{Chain, ChainBuilder};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ChainConfig, NonceStart, ValidationMode};
pub use digest::{block_digest, leading_zero_hex, meets_difficulty};
pub use error::{ChainError, Result};
pub use events::{ChainEvent, EventSink, MemorySink, TracingSink};
pub use mine::{CancelToken, Mined, Miner};
pub use shared::SharedChain;
pub use validate::{validate_blocks, FailureReason, ValidationResult};
