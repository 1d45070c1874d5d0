//! Filter counters
//!
//! Lock-free counters updated on the delivery hot path. Reads are
//! approximate while events are in flight.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for filter decisions.
#[derive(Debug, Default)]
pub struct FilterMetrics {
    /// Messages passed to the next stage
    pub messages_forwarded: AtomicU64,
    /// Messages dropped for domain mismatch
    pub messages_refused: AtomicU64,
    /// Refusal warnings actually logged
    pub warnings_emitted: AtomicU64,
    /// Member-added notifications forwarded
    pub members_accepted: AtomicU64,
    /// Member-added notifications dropped for domain mismatch
    pub members_refused: AtomicU64,
    /// Member-added notifications dropped as already alive
    pub members_already_alive: AtomicU64,
    /// Member-disappeared notifications forwarded
    pub members_disappeared: AtomicU64,
}

impl FilterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> FilterMetricsSnapshot {
        FilterMetricsSnapshot {
            messages_forwarded: self.messages_forwarded.load(Ordering::Relaxed),
            messages_refused: self.messages_refused.load(Ordering::Relaxed),
            warnings_emitted: self.warnings_emitted.load(Ordering::Relaxed),
            members_accepted: self.members_accepted.load(Ordering::Relaxed),
            members_refused: self.members_refused.load(Ordering::Relaxed),
            members_already_alive: self.members_already_alive.load(Ordering::Relaxed),
            members_disappeared: self.members_disappeared.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`FilterMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterMetricsSnapshot {
    pub messages_forwarded: u64,
    pub messages_refused: u64,
    pub warnings_emitted: u64,
    pub members_accepted: u64,
    pub members_refused: u64,
    pub members_already_alive: u64,
    pub members_disappeared: u64,
}

impl FilterMetricsSnapshot {
    /// Fraction of refused messages that produced a warning line.
    pub fn warning_ratio(&self) -> f64 {
        if self.messages_refused == 0 {
            return 0.0;
        }
        self.warnings_emitted as f64 / self.messages_refused as f64
    }
}
