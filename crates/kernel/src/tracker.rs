//! Watermark-based visibility tracking.
//!
//! The kernel advances a monotonically increasing applied-transaction
//! watermark as it closes transactions. A visibility wait blocks the calling
//! thread until the watermark reaches a target version or a timeout elapses,
//! so a session can guarantee "the caller has seen at least transaction N"
//! before executing against a causally-dependent database.

use crate::clock::Clock;
use arbor_core::{Error, Result};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Store of the kernel's applied-transaction watermark.
pub trait TransactionIdStore: Send + Sync {
    /// The most recently closed transaction id.
    fn last_closed_transaction_id(&self) -> u64;

    /// Block until the watermark reaches `target` or `timeout` elapses.
    ///
    /// Returns the watermark observed when the wait ended; callers decide
    /// success by comparing it against `target`. Spurious wakeups are
    /// absorbed internally.
    fn wait_for_closed(&self, target: u64, timeout: Duration) -> u64;
}

/// In-memory watermark store backed by a mutex/condvar pair.
pub struct InMemoryTransactionIdStore {
    watermark: Mutex<u64>,
    advanced: Condvar,
}

impl InMemoryTransactionIdStore {
    /// Store starting at the given watermark.
    pub fn new(initial: u64) -> Self {
        Self {
            watermark: Mutex::new(initial),
            advanced: Condvar::new(),
        }
    }

    /// Record that `transaction_id` has been applied.
    ///
    /// The watermark only moves forward; closing an id at or below the
    /// current watermark is a no-op.
    pub fn transaction_closed(&self, transaction_id: u64) {
        let mut watermark = self.watermark.lock();
        if transaction_id > *watermark {
            *watermark = transaction_id;
            self.advanced.notify_all();
        }
    }
}

impl Default for InMemoryTransactionIdStore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl TransactionIdStore for InMemoryTransactionIdStore {
    fn last_closed_transaction_id(&self) -> u64 {
        *self.watermark.lock()
    }

    fn wait_for_closed(&self, target: u64, timeout: Duration) -> u64 {
        let mut watermark = self.watermark.lock();
        self.advanced
            .wait_while_for(&mut watermark, |w| *w < target, timeout);
        *watermark
    }
}

/// Visibility tracker: bounded waits against the applied-transaction
/// watermark.
///
/// The only blocking operation in the boundary layer. The wait is bounded
/// solely by its timeout argument; there is no external cancellation
/// channel — session teardown waits out the bound.
pub struct TransactionIdTracker {
    store: Arc<dyn TransactionIdStore>,
    clock: Arc<dyn Clock>,
}

impl TransactionIdTracker {
    /// Tracker over the given watermark store.
    pub fn new(store: Arc<dyn TransactionIdStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Block until the watermark reaches `target`, or fail once `timeout`
    /// has elapsed.
    ///
    /// A target already at or below the watermark succeeds immediately,
    /// including with a zero timeout. The wait is condvar-based; no lock on
    /// the caller is held while blocked.
    pub fn await_up_to_date(&self, target: u64, timeout: Duration) -> Result<()> {
        if self.store.last_closed_transaction_id() >= target {
            return Ok(());
        }

        trace!(target_tx = target, timeout_ms = timeout.as_millis() as u64, "visibility wait");
        let started = self.clock.now();
        let deadline = started.checked_add(timeout);

        loop {
            let now = self.clock.now();
            let remaining = match deadline {
                Some(deadline) if now >= deadline => Duration::ZERO,
                Some(deadline) => deadline - now,
                // Timeout too large to represent; wait in long slices.
                None => Duration::from_secs(3600),
            };
            if remaining.is_zero() {
                debug!(target_tx = target, "visibility wait timed out");
                return Err(Error::visibility_timeout(target, timeout.as_millis()));
            }
            if self.store.wait_for_closed(target, remaining) >= target {
                return Ok(());
            }
        }
    }

    /// The most recent transaction version observed by the kernel.
    ///
    /// Pure read; no blocking, no mutation.
    pub fn newest_encountered_tx_id(&self) -> u64 {
        self.store.last_closed_transaction_id()
    }
}
