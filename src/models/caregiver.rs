//! Caregiver model.
//!
//! Caregivers are the people who perform visits. Each caregiver has a set
//! of skill tags, weekly availability windows, and a cap on total assigned
//! hours over the planning horizon.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::calendar::{AvailabilityWindow, Day, MINUTES_PER_HOUR};

/// A caregiver that can be assigned to visits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caregiver {
    /// Unique caregiver identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Skill tags held.
    #[serde(default)]
    pub skills: BTreeSet<String>,
    /// Periods when the caregiver can work.
    #[serde(default)]
    pub availability: Vec<AvailabilityWindow>,
    /// Maximum total assigned hours.
    pub max_hours: f64,
}

impl Caregiver {
    /// Creates a caregiver with no skills and no availability.
    pub fn new(id: impl Into<String>, max_hours: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            skills: BTreeSet::new(),
            availability: Vec::new(),
            max_hours,
        }
    }

    /// Sets the caregiver name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.insert(skill.into());
        self
    }

    /// Adds an availability window.
    pub fn with_window(mut self, day: Day, start_min: i64, end_min: i64) -> Self {
        self.availability
            .push(AvailabilityWindow::new(day, start_min, end_min));
        self
    }

    /// Whether this caregiver holds a given skill.
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.contains(skill)
    }

    /// Whether this caregiver holds every skill in `required`.
    pub fn has_all_skills(&self, required: &BTreeSet<String>) -> bool {
        required.is_subset(&self.skills)
    }

    /// Whether some availability window fully contains `[start_min, end_min)` on `day`.
    pub fn is_available_for(&self, day: Day, start_min: i64, end_min: i64) -> bool {
        self.availability
            .iter()
            .any(|w| w.covers(day, start_min, end_min))
    }

    /// Hours cap expressed in minutes.
    #[inline]
    pub fn max_minutes(&self) -> f64 {
        self.max_hours * MINUTES_PER_HOUR
    }
}
