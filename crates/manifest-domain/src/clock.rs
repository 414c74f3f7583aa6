//! Wall-clock seam for rollover dates and save timestamps

use chrono::{Local, NaiveDate, NaiveTime};

/// Source of "today" and "now" for the engine
pub trait Clock {
    /// Current local calendar day
    fn today(&self) -> NaiveDate;

    /// Current local time of day
    fn now(&self) -> NaiveTime;

    /// Save stamp formatted as hours:minutes
    fn stamp(&self) -> String {
        self.now().format("%H:%M").to_string()
    }
}

/// The system local clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// A clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl FixedClock {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date
    }

    fn now(&self) -> NaiveTime {
        self.time
    }
}
