//! Booking policy: business hours, slot granularity and default duration.
//!
//! A [`SlotPolicy`] is plain configuration; [`SlotPolicy::validate`] is the
//! single place that decides whether it can drive a calculator. Every
//! constructor that accepts a policy calls it, so a bad policy surfaces once at
//! startup instead of silently producing an empty grid on every request.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::interval::Interval;
use crate::time::TimeOfDay;

/// Spacing between candidate start times when none is configured.
pub const DEFAULT_GRANULARITY_MINUTES: u32 = 30;

/// Duration assumed for services and appointments that carry none.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

/// The open/close window any booked interval must fit inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    pub open: TimeOfDay,
    pub close: TimeOfDay,
}

impl BusinessHours {
    /// Build and validate business hours (`close` must be after `open`).
    pub fn new(open: TimeOfDay, close: TimeOfDay) -> Result<Self> {
        let hours = Self { open, close };
        hours.validate()?;
        Ok(hours)
    }

    pub fn validate(&self) -> Result<()> {
        if self.close <= self.open {
            return Err(SlotError::InvalidConfig(format!(
                "business close {} must be after open {}",
                self.close, self.open
            )));
        }
        Ok(())
    }

    pub fn as_interval(&self) -> Interval {
        Interval {
            start: self.open.minutes(),
            end: self.close.minutes(),
        }
    }
}

impl Default for BusinessHours {
    /// 09:00–17:00.
    fn default() -> Self {
        Self {
            open: TimeOfDay::from_minutes_unchecked(9 * 60),
            close: TimeOfDay::from_minutes_unchecked(17 * 60),
        }
    }
}

/// Everything the calculator needs besides the per-request inputs.
///
/// In a JSON policy document `open`, `close` and `granularity_minutes` are
/// required; `default_duration_minutes` falls back to 30.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPolicy {
    #[serde(flatten)]
    pub hours: BusinessHours,
    pub granularity_minutes: u32,
    #[serde(default = "default_duration")]
    pub default_duration_minutes: u32,
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

impl SlotPolicy {
    pub fn new(hours: BusinessHours, granularity_minutes: u32) -> Result<Self> {
        let policy = Self {
            hours,
            granularity_minutes,
            default_duration_minutes: DEFAULT_DURATION_MINUTES,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Replace the default duration used for records without one.
    pub fn with_default_duration(mut self, minutes: u32) -> Result<Self> {
        self.default_duration_minutes = minutes;
        self.validate()?;
        Ok(self)
    }

    /// Parse a JSON policy document and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: Self = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Check that this policy yields a finite, non-empty candidate grid.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidConfig` if `close <= open`, the granularity is
    /// zero, or the default duration is zero.
    pub fn validate(&self) -> Result<()> {
        self.hours.validate()?;
        if self.granularity_minutes == 0 {
            return Err(SlotError::InvalidConfig(
                "slot granularity must be a positive number of minutes".to_string(),
            ));
        }
        if self.default_duration_minutes == 0 {
            return Err(SlotError::InvalidConfig(
                "default duration must be a positive number of minutes".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve an optional duration, treating absent or zero as the default.
    pub fn effective_duration(&self, duration_minutes: Option<u32>) -> u32 {
        duration_minutes
            .filter(|&d| d > 0)
            .unwrap_or(self.default_duration_minutes)
    }
}

impl Default for SlotPolicy {
    /// 09:00–17:00 in 30-minute steps, 30-minute default duration.
    fn default() -> Self {
        Self {
            hours: BusinessHours::default(),
            granularity_minutes: DEFAULT_GRANULARITY_MINUTES,
            default_duration_minutes: DEFAULT_DURATION_MINUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn default_policy_is_valid() {
        let policy = SlotPolicy::default();
        assert!(policy.validate().is_ok());
        assert_eq!(policy.hours.open, t("09:00"));
        assert_eq!(policy.hours.close, t("17:00"));
        assert_eq!(policy.granularity_minutes, 30);
    }

    #[test]
    fn close_before_open_rejected() {
        let err = BusinessHours::new(t("17:00"), t("09:00")).unwrap_err();
        assert!(matches!(err, SlotError::InvalidConfig(_)));
        assert!(BusinessHours::new(t("09:00"), t("09:00")).is_err());
    }

    #[test]
    fn zero_granularity_rejected() {
        let err = SlotPolicy::new(BusinessHours::default(), 0).unwrap_err();
        assert!(err.to_string().contains("granularity"));
    }

    #[test]
    fn zero_default_duration_rejected() {
        assert!(SlotPolicy::default().with_default_duration(0).is_err());
        assert_eq!(
            SlotPolicy::default().with_default_duration(45).unwrap().default_duration_minutes,
            45
        );
    }

    #[test]
    fn json_policy_requires_hours_and_granularity() {
        let policy =
            SlotPolicy::from_json(r#"{"open":"10:00","close":"18:00","granularity_minutes":15}"#)
                .unwrap();
        assert_eq!(policy.hours.open, t("10:00"));
        assert_eq!(policy.granularity_minutes, 15);
        assert_eq!(policy.default_duration_minutes, 30);

        assert!(SlotPolicy::from_json(r#"{"open":"10:00","close":"18:00"}"#).is_err());
        assert!(SlotPolicy::from_json(r#"{"open":"10:00","granularity_minutes":15}"#).is_err());
        assert!(matches!(
            SlotPolicy::from_json(r#"{"open":"18:00","close":"10:00","granularity_minutes":15}"#),
            Err(SlotError::InvalidConfig(_))
        ));
    }

    #[test]
    fn effective_duration_defaults_missing_and_zero() {
        let policy = SlotPolicy::default();
        assert_eq!(policy.effective_duration(None), 30);
        assert_eq!(policy.effective_duration(Some(0)), 30);
        assert_eq!(policy.effective_duration(Some(90)), 90);
    }
}
