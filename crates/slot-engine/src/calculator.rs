//! Bookable start times for one service on one day.
//!
//! The calculator walks a fixed grid of candidate start times and keeps those
//! whose occupied interval fits inside business hours and does not overlap any
//! existing appointment:
//!
//! 1. Candidates are `open + k * granularity` for `k >= 0`, strictly before
//!    `close`. The closing instant itself is never a candidate.
//! 2. A candidate `t` occupies `[t, t + duration)`.
//! 3. It is rejected if `t + duration > close`.
//! 4. It is rejected if that interval overlaps an appointment interval
//!    (half-open; touching endpoints are fine).
//! 5. Survivors are returned in grid order, which is already ascending.
//!
//! Appointments are expected to be pre-filtered to the target date. The
//! calculator never looks at `Appointment::date`.

use tracing::{debug, trace};

use crate::error::Result;
use crate::interval::Interval;
use crate::model::Appointment;
use crate::policy::SlotPolicy;
use crate::time::TimeOfDay;

/// Computes bookable slots under a validated [`SlotPolicy`].
///
/// Immutable after construction; share it freely across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityCalculator {
    policy: SlotPolicy,
}

impl AvailabilityCalculator {
    /// # Errors
    /// Returns `SlotError::InvalidConfig` if the policy cannot produce a grid.
    pub fn new(policy: SlotPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &SlotPolicy {
        &self.policy
    }

    /// Every candidate start time, before any filtering.
    ///
    /// With 09:00–17:00 and a 30-minute step this is `09:00, 09:30, …, 16:30`.
    pub fn candidate_grid(&self) -> Vec<TimeOfDay> {
        self.candidates().collect()
    }

    fn candidates(&self) -> impl Iterator<Item = TimeOfDay> + '_ {
        let open = self.policy.hours.open.minutes();
        let close = self.policy.hours.close.minutes();
        let step = self.policy.granularity_minutes as usize;
        // A grid minute that does not form a valid time of day is never offered.
        (open..close).step_by(step).filter_map(TimeOfDay::from_minutes)
    }

    /// Bookable start times for a service of `service_duration` minutes.
    ///
    /// A `None` or zero duration uses the policy default. An empty result means
    /// nothing fits on this day; it is not an error.
    pub fn available_slots(
        &self,
        service_duration: Option<u32>,
        appointments: &[Appointment],
    ) -> Vec<TimeOfDay> {
        let duration = self.policy.effective_duration(service_duration);
        let busy = self.busy_intervals(appointments);

        let slots: Vec<TimeOfDay> = self
            .candidates()
            .filter(|&start| self.fits(start, duration, &busy))
            .collect();

        debug!(
            duration,
            appointments = appointments.len(),
            available = slots.len(),
            "computed available slots"
        );
        slots
    }

    /// Whether a booking of `duration_minutes` starting at `start` would be accepted.
    ///
    /// Unlike [`available_slots`](Self::available_slots) this does not require
    /// `start` to be on the grid; it only checks business hours and overlap.
    pub fn is_bookable(
        &self,
        start: TimeOfDay,
        duration_minutes: Option<u32>,
        appointments: &[Appointment],
    ) -> bool {
        let duration = self.policy.effective_duration(duration_minutes);
        let busy = self.busy_intervals(appointments);
        self.fits(start, duration, &busy)
    }

    /// Appointments that overlap a booking of `duration_minutes` at `start`.
    pub fn blocking_appointments<'a>(
        &self,
        start: TimeOfDay,
        duration_minutes: Option<u32>,
        appointments: &'a [Appointment],
    ) -> Vec<&'a Appointment> {
        let duration = self.policy.effective_duration(duration_minutes);
        let candidate = Interval::starting_at(start.minutes(), duration);
        appointments
            .iter()
            .filter(|a| {
                a.interval(self.policy.default_duration_minutes)
                    .overlaps(&candidate)
            })
            .collect()
    }

    fn busy_intervals(&self, appointments: &[Appointment]) -> Vec<Interval> {
        appointments
            .iter()
            .map(|a| a.interval(self.policy.default_duration_minutes))
            .collect()
    }

    fn fits(&self, start: TimeOfDay, duration: u32, busy: &[Interval]) -> bool {
        let candidate = Interval::starting_at(start.minutes(), duration);
        if !candidate.within(&self.policy.hours.as_interval()) {
            trace!(%start, duration, "rejected: outside business hours");
            return false;
        }
        if let Some(hit) = busy.iter().find(|b| b.overlaps(&candidate)) {
            trace!(
                %start,
                busy_start = hit.start,
                busy_end = hit.end,
                "rejected: overlaps booking"
            );
            return false;
        }
        true
    }
}

/// One-shot form of [`AvailabilityCalculator::available_slots`].
///
/// # Errors
/// Returns `SlotError::InvalidConfig` if `policy` is invalid.
pub fn available_slots(
    policy: SlotPolicy,
    service_duration: Option<u32>,
    appointments: &[Appointment],
) -> Result<Vec<TimeOfDay>> {
    Ok(AvailabilityCalculator::new(policy)?.available_slots(service_duration, appointments))
}
