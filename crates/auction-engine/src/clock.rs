//! Time sources for elapsed-time pricing.
//!
//! The engine reads the clock at the moment of each operation and never
//! caches an instant across operations.

use chrono::{DateTime, Duration, Utc};
use std::sync::RwLock;

/// Monotonic wall-clock source.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests and simulation runs.
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.write().unwrap() = instant;
    }

    /// Move the clock forward; a negative value is rejected by the type.
    pub fn advance_secs(&self, secs: u64) {
        let mut now = self.now.write().unwrap();
        *now += Duration::seconds(secs as i64);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap()
    }
}
