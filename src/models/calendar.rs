//! Day and time-of-day model.
//!
//! # Time Model
//! Times are integer minutes from midnight. Days are integer indices into
//! the planning horizon (`0` = first day). The consumer defines what day 0
//! means (e.g., the Monday of the planned week).
//!
//! All intervals are half-open: `[start, end)`. Two intervals that only
//! touch at an endpoint do not overlap.

use serde::{Deserialize, Serialize};

/// Day index within the planning horizon.
pub type Day = u32;

/// Minutes per hour, for duration conversions.
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// A caregiver availability window on a single day.
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    /// Day of the window.
    pub day: Day,
    /// Window start (minutes from midnight, inclusive).
    pub start_min: i64,
    /// Window end (minutes from midnight, exclusive).
    pub end_min: i64,
}

impl AvailabilityWindow {
    /// Creates a new availability window.
    pub fn new(day: Day, start_min: i64, end_min: i64) -> Self {
        Self {
            day,
            start_min,
            end_min,
        }
    }

    /// Duration of this window (minutes).
    #[inline]
    pub fn duration_min(&self) -> i64 {
        self.end_min - self.start_min
    }

    /// Whether `[start_min, end_min)` on `day` lies entirely inside this window.
    #[inline]
    pub fn covers(&self, day: Day, start_min: i64, end_min: i64) -> bool {
        self.day == day && self.start_min <= start_min && end_min <= self.end_min
    }

    /// Whether the window is well-formed (start < end).
    pub fn is_valid(&self) -> bool {
        self.start_min < self.end_min
    }
}

/// Whether two half-open intervals `[a_start, a_end)` and `[b_start, b_end)` intersect.
#[inline]
pub fn intervals_overlap(a_start: i64, a_end: i64, b_start: i64, b_end: i64) -> bool {
    a_start < b_end && b_start < a_end
}

/// Formats minutes from midnight as `HH:MM`.
pub fn format_time(minutes: i64) -> String {
    format!("{:02}:{:02}", minutes.div_euclid(60), minutes.rem_euclid(60))
}
