//! Injectable wall clock.
//!
//! All scheduling decisions are made in the calendar's local wall-clock
//! time, so the clock hands out `NaiveDateTime` values. Tests pin the
//! clock with [`FixedClock`]; production code uses [`SystemClock`].

use chrono::{Local, NaiveDateTime};

/// Source of "now" for the scheduler and the scan pipeline.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
