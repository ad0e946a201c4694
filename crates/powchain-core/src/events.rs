//! Structured notifications emitted by [`Chain`](crate::chain::Chain).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{info, warn};

use crate::validate::FailureReason;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainEvent {
    BlockMined {
        index: u64,
        duration: Duration,
        digest: String,
        trials: u64,
    },
    ValidationFailed {
        index: u64,
        reason: FailureReason,
    },
}

pub trait EventSink: Send {
    fn emit(&self, event: &ChainEvent);
}

/// Default sink: forwards events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &ChainEvent) {
        match event {
            ChainEvent::BlockMined {
                index,
                duration,
                digest,
                trials,
            } => info!(
                index,
                trials,
                elapsed_ms = duration.as_millis() as u64,
                %digest,
                "block mined"
            ),
            ChainEvent::ValidationFailed { index, reason } => {
                warn!(index, %reason, "chain validation failed")
            }
        }
    }
}

/// Records events in memory. Clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<ChainEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ChainEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &ChainEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}
