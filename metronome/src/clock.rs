// Injected time source for deterministic scheduling.

use chrono::{DateTime, Duration, Local};
use parking_lot::Mutex;

/// Time-source capability consulted for every scheduling decision.
///
/// The scheduler and the next-run calculator never read the wall clock
/// directly; they ask the injected `Clock`. Production schedulers use
/// [`SystemClock`]; tests pin a [`FixedClock`] to make every computation
/// deterministic.
pub trait Clock: Send + Sync {
    /// The current local time.
    fn now(&self) -> DateTime<Local>;
}

/// The real wall clock. Default for production schedulers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock pinned to a caller-controlled instant.
///
/// Time only moves when the caller calls [`FixedClock::advance`] or
/// [`FixedClock::set`].
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Local>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock();
        *now += delta;
    }

    /// Pin the clock to a new instant.
    pub fn set(&self, instant: DateTime<Local>) {
        *self.now.lock() = instant;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock()
    }
}
