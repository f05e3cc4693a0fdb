//! # Clock Abstraction
//!
//! The engine never reads the wall clock itself: every time-sensitive
//! operation takes `now` as an argument, and components that need a time
//! source (the deadline sweeper) consume a [`Clock`]. `SystemClock` is the
//! production source; `ManualClock` lets tests and embedders pin or step
//! time deterministically.

use std::sync::Arc;

use parking_lot::RwLock;

use qnet_core::Timestamp;

/// A source of the current time. Shared and read-only from the engine's
/// point of view; any component may read it without further coordination.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time source backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A settable clock for deterministic tests and replay.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Arc<RwLock<Timestamp>>,
}

impl ManualClock {
    /// Create a manual clock pinned at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: Arc::new(RwLock::new(start)),
        }
    }

    /// Pin the clock to `now`.
    pub fn set(&self, now: Timestamp) {
        *self.current.write() = now;
    }

    /// Advance the clock by whole hours.
    pub fn advance_hours(&self, hours: i64) {
        let mut current = self.current.write();
        *current = current.plus_hours(hours);
    }

    /// Advance the clock by whole seconds.
    pub fn advance_secs(&self, secs: i64) {
        let mut current = self.current.write();
        *current = current.plus_secs(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current.read()
    }
}
