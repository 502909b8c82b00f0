//! Loosely-typed records as they arrive from storage and the service catalog.
//!
//! The database hands back rows like `{date, time, duration_minutes}` where any
//! field may be missing, null, padded with seconds, or simply wrong. This module
//! is the boundary: it turns those rows into strict [`Appointment`] and
//! [`ServiceSpec`] values, dropping what cannot be trusted.
//!
//! A row whose date or start time does not parse is dropped, which makes it
//! non-blocking. That is the conservative direction for an obstacle: a
//! corrupted record must not hide an entire day from customers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SlotError};
use crate::model::{Appointment, ServiceSpec};
use crate::time::TimeOfDay;

/// An appointment row exactly as storage returned it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAppointment {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default, alias = "durationMinutes")]
    pub duration_minutes: Option<i64>,
}

impl RawAppointment {
    /// Convert into a strict appointment, or `None` if the row cannot block anything.
    ///
    /// A missing duration stays `None` so the policy default applies. Zero is
    /// kept as a zero-length booking. A negative or out-of-range duration drops
    /// the row like a malformed time does.
    pub fn coerce(&self) -> Option<Appointment> {
        let Some(date) = self.date.as_deref().and_then(parse_date) else {
            debug!(date = ?self.date, "ignoring appointment with malformed date");
            return None;
        };
        let Some(start) = self.time.as_deref().and_then(TimeOfDay::parse_lenient) else {
            debug!(%date, time = ?self.time, "ignoring appointment with malformed time");
            return None;
        };
        let duration_minutes = match self.duration_minutes {
            None => None,
            Some(minutes) => match u32::try_from(minutes) {
                Ok(minutes) => Some(minutes),
                Err(_) => {
                    debug!(%date, %start, minutes, "ignoring appointment with negative duration");
                    return None;
                }
            },
        };
        Some(Appointment::new(date, start, duration_minutes))
    }
}

/// A service row from the catalog. Only the duration matters here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawService {
    #[serde(default, alias = "durationMinutes", alias = "duration")]
    pub duration_minutes: Option<i64>,
}

impl RawService {
    pub fn coerce(&self) -> ServiceSpec {
        ServiceSpec {
            duration_minutes: positive_minutes(self.duration_minutes),
        }
    }
}

fn positive_minutes(value: Option<i64>) -> Option<u32> {
    value
        .filter(|&m| m > 0)
        .and_then(|m| u32::try_from(m).ok())
}

/// Parse an ISO `YYYY-MM-DD` date. A trailing time part (`2026-03-16T00:00:00`)
/// is tolerated since some drivers return dates as timestamps.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let day = s.split_once('T').map_or(s, |(day, _)| day);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Strict form of [`parse_date`] for caller-supplied dates.
///
/// # Errors
/// Returns `SlotError::InvalidDate` if `s` is not an ISO date.
pub fn parse_date_strict(s: &str) -> Result<NaiveDate> {
    parse_date(s).ok_or_else(|| SlotError::InvalidDate(s.to_string()))
}

/// Coerce every row and keep those that fall on `date`.
pub fn appointments_on(date: NaiveDate, raws: &[RawAppointment]) -> Vec<Appointment> {
    let all = coerce_all(raws);
    let on_date: Vec<Appointment> = all.into_iter().filter(|a| a.date == date).collect();
    debug!(%date, rows = raws.len(), kept = on_date.len(), "filtered appointments to date");
    on_date
}

/// Coerce every row, dropping the malformed ones.
pub fn coerce_all(raws: &[RawAppointment]) -> Vec<Appointment> {
    raws.iter().filter_map(RawAppointment::coerce).collect()
}

/// Parse a JSON array of appointment rows.
///
/// # Errors
/// Returns `SlotError::Json` if the document is not an array of objects.
pub fn parse_appointments_json(json: &str) -> Result<Vec<RawAppointment>> {
    Ok(serde_json::from_str(json)?)
}
