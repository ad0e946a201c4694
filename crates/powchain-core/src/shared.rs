use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::block::Block;
use crate::chain::Chain;
use crate::error::Result;
use crate::validate::ValidationResult;

/// A [`Chain`] behind one exclusive lock.
///
/// Appends and validations are serialised, so a validation pass never
/// observes a half-extended chain.
#[derive(Clone, Debug)]
pub struct SharedChain {
    inner: Arc<Mutex<Chain>>,
}

impl SharedChain {
    pub fn new(chain: Chain) -> Self {
        Self {
            inner: Arc::new(Mutex::new(chain)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Chain> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mine and append; returns a copy of the sealed block.
    pub fn append(&self, payload: impl Into<String>) -> Result<Block> {
        self.lock().append(payload).cloned()
    }

    pub fn validate(&self) -> ValidationResult {
        self.lock().validate()
    }

    /// Snapshot of every block.
    pub fn blocks(&self) -> Vec<Block> {
        self.lock().blocks().to_vec()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Run `f` with the lock held.
    pub fn with<R>(&self, f: impl FnOnce(&mut Chain) -> R) -> R {
        f(&mut self.lock())
    }
}
