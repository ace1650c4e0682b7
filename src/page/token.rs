//! Cache-busting tokens for the image URL.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Last token handed out, so a coarse clock never yields a repeat.
static LAST_TOKEN: AtomicU64 = AtomicU64::new(0);

/// Wall-clock nanoseconds embedded in the page's image URL.
///
/// Tokens are strictly increasing within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheBuster(u64);

impl CacheBuster {
    /// Generate a fresh token from the current time.
    pub fn now() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or_default();

        let mut previous = LAST_TOKEN.load(Ordering::Relaxed);
        loop {
            let next = nanos.max(previous.saturating_add(1));
            match LAST_TOKEN.compare_exchange_weak(previous, next, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => return Self(next),
                Err(actual) => previous = actual,
            }
        }
    }

    pub fn as_nanos(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CacheBuster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
