// ⏰ Clock - Injectable time source
//
// Payments capture their creation time when they are built. Production
// code reads the wall clock; tests pin the time with FixedClock.

use chrono::{Local, NaiveDateTime};

/// Source of "now" for anything that stamps a timestamp
pub trait Clock {
    /// Current local wall-clock time
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system clock in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: NaiveDateTime,
}

impl FixedClock {
    pub fn new(instant: NaiveDateTime) -> Self {
        FixedClock { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.instant
    }
}
