//! Progress reporting and cooperative cancellation.
//!
//! Grounded on the teacher's `ProcessingResult::Status(String)` pattern in
//! `src/dsp/processing.rs`, collapsed from that channel-based async design
//! into a plain synchronous callback since this crate's entry points are
//! synchronous per spec.md §5.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

/// Receives progress updates from [`crate::analyze`]. `percent` is
/// monotonically non-decreasing across one call.
pub trait ProgressSink {
    fn update(&mut self, step: &str, percent: u8);
}

/// A [`ProgressSink`] that discards every update — the default when the
/// embedder doesn't care about progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn update(&mut self, _step: &str, _percent: u8) {}
}

impl<F: FnMut(&str, u8)> ProgressSink for F {
    fn update(&mut self, step: &str, percent: u8) {
        self(step, percent)
    }
}

/// Cooperative cancellation flag, checked between major analysis phases.
/// Cheap to clone; all clones observe the same underlying flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Tracks the last percent reported so callers of [`ProgressSink::update`]
/// can assert monotonicity in tests without threading extra state through
/// the analyzer. Not used by the core itself.
#[derive(Debug, Default)]
pub struct MonotonicGuard {
    last: AtomicU8,
}

impl MonotonicGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` iff `percent >= ` every percent previously observed.
    pub fn observe(&self, percent: u8) -> bool {
        let prev = self.last.fetch_max(percent, Ordering::SeqCst);
        percent >= prev
    }
}
