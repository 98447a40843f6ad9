//! Ambient time source.
//!
//! The engine never reads wall-clock time directly. Hosts that run on a
//! chain supply block height; everything else can use [`SystemClock`].

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use modgate_types::Timestamp;

/// Source of the current time in the engine's time unit.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall-clock seconds since the UNIX epoch.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        // Pre-epoch clocks read as zero.
        u64::try_from(Utc::now().timestamp()).unwrap_or(0)
    }
}

/// Manually driven clock (block height in simulations and tests).
///
/// Advances through `&self` so it can be moved forward while the engine
/// that owns it is borrowed.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    /// Move forward by `delta`. Saturates at `u64::MAX`.
    pub fn advance(&self, delta: Timestamp) {
        // The closure always returns `Some`, so the update cannot fail.
        self.now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
                Some(t.saturating_add(delta))
            })
            .ok();
    }

    /// Jump to an absolute time. Refuses to move backwards.
    pub fn set(&self, to: Timestamp) {
        self.now.fetch_max(to, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}
