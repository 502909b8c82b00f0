//! Half-open minute intervals within a day.
//!
//! An interval `[start, end)` covers every minute from `start` up to, but not
//! including, `end`. Adjacent intervals (where one ends exactly when the other
//! starts) do NOT overlap, so back-to-back bookings are allowed.

/// An occupied span of the day, in minutes since midnight.
///
/// `end` may run past midnight (a 23:30 start with a 60-minute duration ends at
/// 1470); the arithmetic stays in plain minutes so such spans still compare
/// correctly against business hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    /// Interval starting at `start` and lasting `duration_minutes`.
    pub fn starting_at(start: u32, duration_minutes: u32) -> Self {
        Self {
            start,
            end: start.saturating_add(duration_minutes),
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Two intervals overlap iff `a.start < b.end && b.start < a.end`.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Minutes shared by both intervals; 0 when they do not overlap.
    pub fn overlap_minutes(&self, other: &Interval) -> u32 {
        if !self.overlaps(other) {
            return 0;
        }
        self.end.min(other.end) - self.start.max(other.start)
    }

    /// Whether this interval lies entirely inside `outer`.
    pub fn within(&self, outer: &Interval) -> bool {
        self.start >= outer.start && self.end <= outer.end
    }
}
