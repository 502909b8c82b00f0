//! A salon's weekly schedule: per-weekday opening hours, closed days and a
//! booking lead time.
//!
//! [`SalonSchedule`] sits on top of [`AvailabilityCalculator`]. It picks the
//! business hours for the requested date's weekday, filters an unscoped
//! appointment list down to that date, and removes slots that start before
//! `now + lead_time`. The current time is always passed in, so results stay
//! deterministic for a given input.
//!
//! Opening hours use the storage keys `ma di wo do vr za zo` (Monday first);
//! English three-letter and full weekday names are accepted as aliases.

use chrono::{Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::calculator::AvailabilityCalculator;
use crate::error::{Result, SlotError};
use crate::model::{Appointment, ServiceSpec};
use crate::policy::{
    BusinessHours, SlotPolicy, DEFAULT_DURATION_MINUTES, DEFAULT_GRANULARITY_MINUTES,
};
use crate::time::TimeOfDay;

/// Opening time for a day that lists none.
const DEFAULT_DAY_START: TimeOfDay = TimeOfDay::from_minutes_unchecked(9 * 60);
/// Closing time for a day that lists none.
const DEFAULT_DAY_END: TimeOfDay = TimeOfDay::from_minutes_unchecked(18 * 60);

/// Hours for a single weekday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub start: Option<TimeOfDay>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub end: Option<TimeOfDay>,
    #[serde(default)]
    pub closed: bool,
}

/// The settings form saves cleared time inputs as `""`.
fn blank_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<TimeOfDay>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl DayHours {
    pub fn open(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            closed: false,
        }
    }

    pub fn closed() -> Self {
        Self {
            closed: true,
            ..Self::default()
        }
    }

    /// Business hours for this day, or `None` when closed.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidConfig` if the day closes before it opens.
    pub fn business_hours(&self) -> Result<Option<BusinessHours>> {
        if self.closed {
            return Ok(None);
        }
        BusinessHours::new(
            self.start.unwrap_or(DEFAULT_DAY_START),
            self.end.unwrap_or(DEFAULT_DAY_END),
        )
        .map(Some)
    }
}

/// Opening hours keyed by weekday. A weekday without an entry is closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    #[serde(default, rename = "ma", alias = "mon", alias = "monday")]
    pub monday: Option<DayHours>,
    #[serde(default, rename = "di", alias = "tue", alias = "tuesday")]
    pub tuesday: Option<DayHours>,
    #[serde(default, rename = "wo", alias = "wed", alias = "wednesday")]
    pub wednesday: Option<DayHours>,
    #[serde(default, rename = "do", alias = "thu", alias = "thursday")]
    pub thursday: Option<DayHours>,
    #[serde(default, rename = "vr", alias = "fri", alias = "friday")]
    pub friday: Option<DayHours>,
    #[serde(default, rename = "za", alias = "sat", alias = "saturday")]
    pub saturday: Option<DayHours>,
    #[serde(default, rename = "zo", alias = "sun", alias = "sunday")]
    pub sunday: Option<DayHours>,
}

impl OpeningHours {
    pub fn for_weekday(&self, weekday: Weekday) -> Option<&DayHours> {
        match weekday {
            Weekday::Mon => self.monday.as_ref(),
            Weekday::Tue => self.tuesday.as_ref(),
            Weekday::Wed => self.wednesday.as_ref(),
            Weekday::Thu => self.thursday.as_ref(),
            Weekday::Fri => self.friday.as_ref(),
            Weekday::Sat => self.saturday.as_ref(),
            Weekday::Sun => self.sunday.as_ref(),
        }
    }

    /// Same hours Monday to Friday, weekend closed.
    pub fn weekdays(start: TimeOfDay, end: TimeOfDay) -> Self {
        let day = Some(DayHours::open(start, end));
        Self {
            monday: day,
            tuesday: day,
            wednesday: day,
            thursday: day,
            friday: day,
            saturday: None,
            sunday: None,
        }
    }
}

/// Salon-level booking configuration as stored alongside the salon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalonConfig {
    /// `None` means the salon never published hours: every day is open with
    /// the default 09:00–17:00 policy.
    #[serde(default, alias = "openingHours")]
    pub opening_hours: Option<OpeningHours>,
    #[serde(default = "default_granularity", alias = "granularityMinutes")]
    pub granularity_minutes: u32,
    #[serde(default = "default_duration", alias = "defaultDurationMinutes")]
    pub default_duration_minutes: u32,
    /// Minimum hours between now and the start of a bookable slot.
    #[serde(default, alias = "leadTimeHours")]
    pub lead_time_hours: u32,
}

fn default_granularity() -> u32 {
    DEFAULT_GRANULARITY_MINUTES
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

impl Default for SalonConfig {
    fn default() -> Self {
        Self {
            opening_hours: None,
            granularity_minutes: DEFAULT_GRANULARITY_MINUTES,
            default_duration_minutes: DEFAULT_DURATION_MINUTES,
            lead_time_hours: 0,
        }
    }
}

/// Per-date availability for one salon.
#[derive(Debug, Clone)]
pub struct SalonSchedule {
    /// Indexed by `Weekday::num_days_from_monday`; `None` means closed.
    days: [Option<AvailabilityCalculator>; 7],
    lead_time: Duration,
}

impl SalonSchedule {
    /// Build a schedule, validating the hours of every open day up front.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidConfig` if any open day closes before it
    /// opens, or if granularity or default duration is zero.
    pub fn new(config: &SalonConfig) -> Result<Self> {
        // Granularity and duration must be valid even if every day is closed.
        SlotPolicy {
            hours: BusinessHours::default(),
            granularity_minutes: config.granularity_minutes,
            default_duration_minutes: config.default_duration_minutes,
        }
        .validate()?;

        let mut days: [Option<AvailabilityCalculator>; 7] = Default::default();

        for (index, weekday) in WEEK.iter().enumerate() {
            let hours = match &config.opening_hours {
                None => Some(BusinessHours::default()),
                Some(opening) => match opening.for_weekday(*weekday) {
                    None => None,
                    Some(day) => day.business_hours().map_err(|e| match e {
                        SlotError::InvalidConfig(msg) => {
                            SlotError::InvalidConfig(format!("{weekday}: {msg}"))
                        }
                        other => other,
                    })?,
                },
            };
            days[index] = hours
                .map(|hours| {
                    let policy = SlotPolicy {
                        hours,
                        granularity_minutes: config.granularity_minutes,
                        default_duration_minutes: config.default_duration_minutes,
                    };
                    AvailabilityCalculator::new(policy)
                })
                .transpose()?;
        }

        Ok(Self {
            days,
            lead_time: Duration::hours(i64::from(config.lead_time_hours)),
        })
    }

    /// Parse a JSON salon document and build its schedule.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SalonConfig = serde_json::from_str(json)?;
        Self::new(&config)
    }

    pub fn calculator_for(&self, date: NaiveDate) -> Option<&AvailabilityCalculator> {
        use chrono::Datelike;
        self.days[date.weekday().num_days_from_monday() as usize].as_ref()
    }

    pub fn is_open_on(&self, date: NaiveDate) -> bool {
        self.calculator_for(date).is_some()
    }

    pub fn is_past(date: NaiveDate, today: NaiveDate) -> bool {
        date < today
    }

    /// Whether a customer may pick `date` in the calendar at all.
    pub fn is_date_available(&self, date: NaiveDate, today: NaiveDate) -> bool {
        !Self::is_past(date, today) && self.is_open_on(date)
    }

    /// Earliest instant a slot may start at.
    pub fn lead_time_cutoff(&self, now: NaiveDateTime) -> NaiveDateTime {
        now + self.lead_time
    }

    /// Bookable start times on `date`, given every appointment the salon has.
    ///
    /// Appointments on other dates are ignored. Past and closed dates yield an
    /// empty list.
    pub fn available_times(
        &self,
        date: NaiveDate,
        service: ServiceSpec,
        appointments: &[Appointment],
        now: NaiveDateTime,
    ) -> Vec<TimeOfDay> {
        if Self::is_past(date, now.date()) {
            debug!(%date, "date is in the past");
            return Vec::new();
        }
        let Some(calculator) = self.calculator_for(date) else {
            debug!(%date, "salon closed");
            return Vec::new();
        };

        let on_date: Vec<Appointment> = appointments
            .iter()
            .filter(|a| a.date == date)
            .cloned()
            .collect();

        let cutoff = self.lead_time_cutoff(now);
        let mut slots = calculator.available_slots(service.duration_minutes, &on_date);
        slots.retain(|t| t.on(date) >= cutoff);
        slots
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];
