//! Sampled Warning Limiter
//!
//! Bounds log volume under sustained rejection: one warning per
//! `interval + 1` suppressed events, with the very first event always
//! emitting so a misconfiguration is visible immediately.
//!
//! ## Usage
//!
//! ```
//! use domain_filter::SampledWarner;
//!
//! let warner = SampledWarner::new(3);
//! let emitted: Vec<bool> = (0..7).map(|_| warner.should_emit()).collect();
//! assert_eq!(emitted, [true, false, false, false, true, false, false]);
//! ```

use std::sync::atomic::{AtomicU32, Ordering};

/// Counter-based rate limiter for repeated warnings.
///
/// # Thread Safety
///
/// The check-and-reset is one atomic read-modify-write, so concurrent callers
/// cannot both observe a full window and both reset it. The counter is
/// unsigned and saturates at the interval, so it can never go negative.
#[derive(Debug)]
pub struct SampledWarner {
    interval: AtomicU32,
    counter: AtomicU32,
}

impl SampledWarner {
    /// Create a warner.
    ///
    /// The counter starts full, so the first suppressed event emits. An
    /// interval of zero behaves as one.
    pub fn new(interval: u32) -> Self {
        let interval = interval.max(1);
        Self {
            interval: AtomicU32::new(interval),
            counter: AtomicU32::new(interval),
        }
    }

    /// Record one suppressed event; returns whether a log line should be emitted.
    pub fn should_emit(&self) -> bool {
        let interval = self.interval.load(Ordering::Relaxed);
        let previous = match self
            .counter
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                if count >= interval {
                    Some(0)
                } else {
                    Some(count + 1)
                }
            }) {
            Ok(count) | Err(count) => count,
        };
        previous >= interval
    }

    pub fn interval(&self) -> u32 {
        self.interval.load(Ordering::Relaxed)
    }

    /// Change the interval. The running count is kept.
    pub fn set_interval(&self, interval: u32) {
        self.interval.store(interval.max(1), Ordering::Relaxed);
    }

    /// Events suppressed since the last emission.
    pub fn pending(&self) -> u32 {
        self.counter.load(Ordering::Relaxed)
    }
}
