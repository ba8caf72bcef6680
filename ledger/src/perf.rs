//! # Latency Instrumentation
//!
//! A transparent decorator over a [`Blockchain`]: same methods, same
//! return values, plus a wall-clock measurement around `validate`. The
//! wrapper derefs to the chain, so everything it doesn't shadow passes
//! straight through — callers cannot observe a behavioral difference,
//! only a timing record and a `tracing` event.

use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::chain::blockchain::Blockchain;
use crate::chain::validation::Validation;

/// Wraps a value and times selected calls.
///
/// Only `Instrumented<Blockchain>` has timed methods today; the wrapper
/// itself is generic so other components can opt in later without a new
/// type.
#[derive(Debug)]
pub struct Instrumented<C> {
    inner: C,
    samples: Mutex<Vec<Duration>>,
}

impl<C> Instrumented<C> {
    /// Wrap `inner`. No measurement happens until a timed method runs.
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            samples: Mutex::new(Vec::new()),
        }
    }

    /// Every duration recorded so far, oldest first.
    pub fn samples(&self) -> Vec<Duration> {
        self.samples.lock().clone()
    }

    /// Unwrap, discarding the recordings.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl Instrumented<Blockchain> {
    /// [`Blockchain::validate`], timed. The outcome is returned exactly
    /// as the chain produced it.
    pub fn validate(&self) -> Validation<&Blockchain> {
        let started = Instant::now();
        let outcome = self.inner.validate();
        let elapsed = started.elapsed();
        self.samples.lock().push(elapsed);
        tracing::debug!(
            elapsed_us = elapsed.as_micros() as u64,
            success = outcome.is_success(),
            "validate measured"
        );
        outcome
    }
}

impl<C> Deref for Instrumented<C> {
    type Target = C;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<C> DerefMut for Instrumented<C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::block::Block;

    fn linked_block(chain: &Blockchain) -> Block {
        Block::new(chain.top().index + 1, chain.top().hash(), vec![]).unwrap()
    }

    #[test]
    fn validate_outcome_is_unchanged() {
        let ledger = Instrumented::new(Blockchain::new());
        assert!(ledger.validate().is_success());

        let mut ledger = ledger;
        let block = linked_block(&ledger);
        ledger.push(block);
        ledger.top_mut().set_hash("XXXXXXX");
        let outcome = ledger.validate();
        assert!(outcome.is_failure());
        assert!(outcome
            .reason()
            .unwrap()
            .contains("Hash length must equal 64"));
    }

    #[test]
    fn each_validate_records_a_sample() {
        let ledger = Instrumented::new(Blockchain::new());
        assert!(ledger.samples().is_empty());
        let _ = ledger.validate();
        let _ = ledger.validate();
        assert_eq!(ledger.samples().len(), 2);
    }

    #[test]
    fn untimed_calls_pass_through_the_deref() {
        let mut ledger = Instrumented::new(Blockchain::new());
        let block = linked_block(&ledger);
        ledger.push(block);
        assert_eq!(ledger.height(), 2);
        assert_eq!(ledger.top().index, 2);
        // Pass-through calls record nothing.
        assert!(ledger.samples().is_empty());
    }
}
