//! Visit model.
//!
//! A visit is a fixed-time appointment at a client's home. Visits are
//! supplied by the caller and never mutated or rescheduled by the solver.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::calendar::{intervals_overlap, Day, MINUTES_PER_HOUR};

/// A home-care visit to be assigned to a caregiver.
///
/// # Time Representation
/// `start_min`/`end_min` are minutes from midnight on `day`.
/// Invariant: `start_min < end_min` (checked by input validation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    /// Unique visit identifier.
    pub id: String,
    /// Client receiving the visit.
    pub client_id: String,
    /// Day of the visit.
    pub day: Day,
    /// Start time (minutes from midnight, inclusive).
    pub start_min: i64,
    /// End time (minutes from midnight, exclusive).
    pub end_min: i64,
    /// Neighborhood the client lives in.
    #[serde(default)]
    pub neighborhood: String,
    /// Skill tags a caregiver must hold to perform the visit.
    #[serde(default)]
    pub required_skills: BTreeSet<String>,
}

impl Visit {
    /// Creates a new visit with no neighborhood and no required skills.
    pub fn new(
        id: impl Into<String>,
        client_id: impl Into<String>,
        day: Day,
        start_min: i64,
        end_min: i64,
    ) -> Self {
        Self {
            id: id.into(),
            client_id: client_id.into(),
            day,
            start_min,
            end_min,
            neighborhood: String::new(),
            required_skills: BTreeSet::new(),
        }
    }

    /// Sets the neighborhood.
    pub fn in_neighborhood(mut self, neighborhood: impl Into<String>) -> Self {
        self.neighborhood = neighborhood.into();
        self
    }

    /// Adds a required skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.required_skills.insert(skill.into());
        self
    }

    /// Duration in minutes.
    #[inline]
    pub fn duration_min(&self) -> i64 {
        self.end_min - self.start_min
    }

    /// Duration in hours.
    #[inline]
    pub fn duration_hours(&self) -> f64 {
        self.duration_min() as f64 / MINUTES_PER_HOUR
    }

    /// Whether two visits intersect in time. Visits on different days never do.
    pub fn overlaps(&self, other: &Visit) -> bool {
        self.day == other.day
            && intervals_overlap(self.start_min, self.end_min, other.start_min, other.end_min)
    }

    /// Chronological sort key.
    #[inline]
    pub fn time_key(&self) -> (Day, i64) {
        (self.day, self.start_min)
    }
}

/// Counts neighborhood switches between consecutive visits.
///
/// `visits` must already be in chronological order. A switch is counted
/// whenever two consecutive visits are in different neighborhoods.
pub fn neighborhood_switches(visits: &[&Visit]) -> usize {
    visits
        .windows(2)
        .filter(|pair| pair[0].neighborhood != pair[1].neighborhood)
        .count()
}
