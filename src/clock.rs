use std::cell::Cell;

use chrono::Utc;

/// A source of timestamps, in fractional seconds since the Unix epoch.
pub trait Clock {
    fn now(&self) -> f64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

/// Wall clock backed by [`chrono::Utc::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        let now = Utc::now();
        now.timestamp() as f64 + f64::from(now.timestamp_subsec_nanos()) / 1e9
    }
}

/// A clock that only moves when told to.
///
/// Hand a `&ManualClock` to [`crate::Timer::with_clock`] to keep control of
/// the time while the timer is in use.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(now: f64) -> ManualClock {
        let now = Cell::new(now);
        Self { now }
    }

    pub fn set(&self, now: f64) {
        self.now.set(now);
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}
