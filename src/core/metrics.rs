//! Pipeline counters for observability
//!
//! Tracks where records go once handed to the writer: accepted onto the main
//! queue, rejected at the producer, fanned out, dropped at a full adapter
//! queue, discarded by overflow policy, or lost to a failing sink.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct PipelineMetrics {
    /// Records accepted onto the main queue
    accepted: AtomicU64,

    /// Producer calls rejected with `MainQueueFull`
    rejected: AtomicU64,

    /// Per-adapter enqueues that succeeded during fan-out
    dispatched: AtomicU64,

    /// Per-adapter enqueues rejected by a full queue
    adapter_rejections: AtomicU64,

    /// Queued records discarded by the `DiscardOlder` overflow action
    discarded: AtomicU64,

    /// Appender write failures observed by workers
    write_failures: AtomicU64,

    /// Successful appender restarts after a failure cooldown
    restarts: AtomicU64,
}

impl PipelineMetrics {
    pub const fn new() -> Self {
        Self {
            accepted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            dispatched: AtomicU64::new(0),
            adapter_rejections: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            restarts: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn adapter_rejections(&self) -> u64 {
        self.adapter_rejections.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn discarded(&self) -> u64 {
        self.discarded.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn restarts(&self) -> u64 {
        self.restarts.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_adapter_rejection(&self) {
        self.adapter_rejections.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_discarded(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_write_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_restart(&self) {
        self.restarts.fetch_add(1, Ordering::Relaxed);
    }
}

impl Clone for PipelineMetrics {
    /// Snapshots the counters at their current values
    fn clone(&self) -> Self {
        Self {
            accepted: AtomicU64::new(self.accepted()),
            rejected: AtomicU64::new(self.rejected()),
            dispatched: AtomicU64::new(self.dispatched()),
            adapter_rejections: AtomicU64::new(self.adapter_rejections()),
            discarded: AtomicU64::new(self.discarded()),
            write_failures: AtomicU64::new(self.write_failures()),
            restarts: AtomicU64::new(self.restarts()),
        }
    }
}
