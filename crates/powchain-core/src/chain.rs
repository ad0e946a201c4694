use std::fmt;

#[cfg(any(test, feature = "tamper"))]
use tracing::warn;

use crate::block::{Block, Candidate};
use crate::clock::{Clock, SystemClock};
use crate::config::{ChainConfig, ValidationMode};
use crate::error::Result;
#[cfg(any(test, feature = "tamper"))]
use crate::error::ChainError;
use crate::events::{ChainEvent, EventSink, TracingSink};
use crate::mine::{CancelToken, Mined, Miner};
use crate::validate::{validate_blocks, ValidationResult};

/// An append-only, in-memory chain of mined blocks.
///
/// The chain always holds at least the genesis block. Blocks are handed out
/// as shared borrows; the only way to change one after sealing is the
/// feature-gated tamper hatch.
pub struct Chain {
    blocks: Vec<Block>,
    config: ChainConfig,
    miner: Miner,
    clock: Box<dyn Clock>,
    sink: Box<dyn EventSink>,
}

pub struct ChainBuilder {
    config: ChainConfig,
    clock: Box<dyn Clock>,
    sink: Box<dyn EventSink>,
    cancel: Option<CancelToken>,
}

impl ChainBuilder {
    pub fn new(config: ChainConfig) -> Self {
        Self {
            config,
            clock: Box::new(SystemClock),
            sink: Box::new(TracingSink),
            cancel: None,
        }
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Token checked on every mining iteration, genesis included.
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Validate the configuration and mine the genesis block.
    pub fn build(self) -> Result<Chain> {
        self.config.validate()?;

        let mut miner = Miner::from_config(&self.config);
        if let Some(token) = self.cancel {
            miner = miner.with_cancel_token(token);
        }

        let mut chain = Chain {
            blocks: Vec::new(),
            config: self.config,
            miner,
            clock: self.clock,
            sink: self.sink,
        };
        let genesis = Candidate::genesis(chain.clock.now_millis());
        let mined = chain.miner.mine(genesis)?;
        chain.seal(mined);
        Ok(chain)
    }
}

impl Chain {
    /// A chain with default settings at the given difficulty.
    pub fn new(difficulty: u32) -> Result<Self> {
        Self::with_config(ChainConfig::with_difficulty(difficulty))
    }

    pub fn with_config(config: ChainConfig) -> Result<Self> {
        ChainBuilder::new(config).build()
    }

    pub fn builder(config: ChainConfig) -> ChainBuilder {
        ChainBuilder::new(config)
    }

    /// Mine a block carrying `payload` on top of the current tip.
    ///
    /// On error the chain is left untouched.
    pub fn append(&mut self, payload: impl Into<String>) -> Result<&Block> {
        let candidate = Candidate::extending(self.latest(), self.clock.now_millis(), payload);
        let mined = self.miner.mine(candidate)?;
        Ok(self.seal(mined))
    }

    /// Validate using the configured [`ValidationMode`].
    pub fn validate(&self) -> ValidationResult {
        self.validate_with(self.config.validation)
    }

    pub fn validate_with(&self, mode: ValidationMode) -> ValidationResult {
        let result = validate_blocks(&self.blocks, self.config.difficulty, mode);
        if let (Some(index), Some(reason)) = (result.failing_index, result.reason) {
            self.sink.emit(&ChainEvent::ValidationFailed { index, reason });
        }
        result
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn latest(&self) -> &Block {
        // never empty: genesis is pushed before the chain is returned
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn get(&self, index: u64) -> Option<&Block> {
        usize::try_from(index).ok().and_then(|i| self.blocks.get(i))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.config.difficulty
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    fn seal(&mut self, mined: Mined) -> &Block {
        let Mined {
            block,
            trials,
            elapsed,
        } = mined;
        self.sink.emit(&ChainEvent::BlockMined {
            index: block.index(),
            duration: elapsed,
            digest: block.digest().to_owned(),
            trials,
        });
        self.blocks.push(block);
        self.latest()
    }
}

#[cfg(any(test, feature = "tamper"))]
impl Chain {
    /// Overwrite a sealed block's payload and leave its digest stale.
    ///
    /// Out-of-protocol: exists only to show that [`Chain::validate`] catches it.
    pub fn for_test_only_corrupt(
        &mut self,
        index: u64,
        payload: impl Into<String>,
    ) -> Result<()> {
        let block = self.block_mut(index)?;
        block.overwrite_payload(payload.into());
        warn!(index, "sealed block payload overwritten");
        Ok(())
    }

    /// Overwrite a sealed block's payload and recompute its digest without
    /// re-mining it.
    pub fn for_test_only_corrupt_and_rehash(
        &mut self,
        index: u64,
        payload: impl Into<String>,
    ) -> Result<()> {
        let block = self.block_mut(index)?;
        block.overwrite_payload(payload.into());
        let digest = block.compute_digest();
        block.overwrite_digest(digest);
        warn!(index, "sealed block payload overwritten and rehashed");
        Ok(())
    }

    fn block_mut(&mut self, index: u64) -> Result<&mut Block> {
        let len = self.blocks.len();
        usize::try_from(index)
            .ok()
            .and_then(|i| self.blocks.get_mut(i))
            .ok_or(ChainError::BlockOutOfRange { index, len })
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("config", &self.config)
            .field("blocks", &self.blocks)
            .finish_non_exhaustive()
    }
}
