//! Strict booking inputs: services and existing appointments.
//!
//! These are the shapes the calculator trusts. Loosely-typed records coming
//! from storage are converted into them by [`crate::records`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::interval::Interval;
use crate::time::TimeOfDay;

/// The treatment being booked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    /// Treatment length. `None` means "use the policy default".
    pub duration_minutes: Option<u32>,
}

impl ServiceSpec {
    pub fn with_duration(minutes: u32) -> Self {
        Self {
            duration_minutes: Some(minutes),
        }
    }
}

/// An existing booking occupying `[start, start + duration)` on `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub date: NaiveDate,
    pub start: TimeOfDay,
    /// `None` means "use the policy default". Zero is a zero-length booking.
    pub duration_minutes: Option<u32>,
}

impl Appointment {
    pub fn new(date: NaiveDate, start: TimeOfDay, duration_minutes: Option<u32>) -> Self {
        Self {
            date,
            start,
            duration_minutes,
        }
    }

    /// The occupied interval, resolving a missing duration to `default_minutes`.
    pub fn interval(&self, default_minutes: u32) -> Interval {
        let duration = self.duration_minutes.unwrap_or(default_minutes);
        Interval::starting_at(self.start.minutes(), duration)
    }
}
