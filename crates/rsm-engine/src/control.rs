//! Cooperative cancellation and progress accounting for a matching run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Cooperative cancellation signal, checked between per-record matching
/// steps. Cancelling never rolls back work already done; it stops the run
/// before the final association is produced.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Count of MSD records whose matching step has completed. Grows
/// monotonically to the number of valid MSD records, independent of how
/// the work is scheduled across threads.
#[derive(Debug, Clone, Default)]
pub struct ProgressCounter {
    done: Arc<AtomicUsize>,
}

impl ProgressCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }

    pub(crate) fn record_done(&self) {
        self.done.fetch_add(1, Ordering::Relaxed);
    }
}

/// Handles the caller keeps while a run is in flight.
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    pub cancel: CancelToken,
    pub progress: ProgressCounter,
}

impl RunControl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
