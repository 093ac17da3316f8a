//! Process-wide request counter.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic tally of counted requests since startup.
///
/// Increments are linearizable: K concurrent calls to [`increment`] observe
/// K distinct consecutive values.
///
/// [`increment`]: RequestCounter::increment
#[derive(Debug, Default)]
pub struct RequestCounter {
    count: AtomicU64,
}

impl RequestCounter {
    /// Create a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one request and return the post-increment value.
    pub fn increment(&self) -> u64 {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Current value without counting a request.
    pub fn current(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }
}
