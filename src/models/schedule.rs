//! Schedule (solution) model.
//!
//! Per-caregiver schedules and the constraint violations a solve reports.
//! A violation never aborts a solve: unassignable visits are a normal,
//! reported outcome.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::calendar::{format_time, Day, MINUTES_PER_HOUR};
use super::Visit;

/// A constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub kind: ViolationKind,
    /// Offending visit ID.
    pub visit_id: String,
    /// Caregiver considered, for per-caregiver diagnostics.
    pub caregiver_id: Option<String>,
}

/// Classification of constraint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    /// No caregiver could take the visit.
    Unassigned,
    /// Caregiver lacks a required skill.
    SkillMismatch,
    /// No availability window of the caregiver covers the visit.
    Availability,
    /// Visit intersects one already assigned to the caregiver.
    Overlap,
    /// Visit would push the caregiver past the hours cap.
    HoursExceeded,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unassigned => "UNASSIGNED",
            Self::SkillMismatch => "SKILL_MISMATCH",
            Self::Availability => "AVAILABILITY",
            Self::Overlap => "OVERLAP",
            Self::HoursExceeded => "HOURS_EXCEEDED",
        };
        f.write_str(s)
    }
}

impl Violation {
    /// Creates an unassigned-visit violation.
    pub fn unassigned(visit_id: impl Into<String>) -> Self {
        Self {
            kind: ViolationKind::Unassigned,
            visit_id: visit_id.into(),
            caregiver_id: None,
        }
    }

    /// Creates a per-caregiver diagnostic.
    pub fn diagnostic(
        kind: ViolationKind,
        visit_id: impl Into<String>,
        caregiver_id: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            visit_id: visit_id.into(),
            caregiver_id: Some(caregiver_id.into()),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.caregiver_id {
            Some(cg) => write!(f, "{} visit={} caregiver={}", self.kind, self.visit_id, cg),
            None => write!(f, "{} visit={}", self.kind, self.visit_id),
        }
    }
}

/// A visit as it appears in a caregiver's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledVisit {
    /// Visit ID.
    pub visit_id: String,
    /// Client ID (denormalized for presentation).
    pub client_id: String,
    /// Start time (minutes from midnight).
    pub start_min: i64,
    /// End time (minutes from midnight).
    pub end_min: i64,
    /// Neighborhood.
    pub neighborhood: String,
}

impl From<&Visit> for ScheduledVisit {
    fn from(v: &Visit) -> Self {
        Self {
            visit_id: v.id.clone(),
            client_id: v.client_id.clone(),
            start_min: v.start_min,
            end_min: v.end_min,
            neighborhood: v.neighborhood.clone(),
        }
    }
}

impl fmt::Display for ScheduledVisit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} {} client={}",
            format_time(self.start_min),
            format_time(self.end_min),
            self.visit_id,
            self.client_id
        )?;
        if !self.neighborhood.is_empty() {
            write!(f, " ({})", self.neighborhood)?;
        }
        Ok(())
    }
}

/// One caregiver's assigned visits, grouped by day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaregiverSchedule {
    /// Caregiver ID.
    pub caregiver_id: String,
    /// Visits per day, each list sorted by start time.
    pub days: BTreeMap<Day, Vec<ScheduledVisit>>,
    /// Total assigned hours.
    pub total_hours: f64,
    /// Hours cap.
    pub max_hours: f64,
    /// `total_hours / max_hours` (0.0 when the cap is zero).
    pub utilization: f64,
}

impl CaregiverSchedule {
    /// Builds a schedule from a caregiver's assigned visits (any order).
    pub fn from_visits<'a>(
        caregiver_id: impl Into<String>,
        max_hours: f64,
        visits: impl IntoIterator<Item = &'a Visit>,
    ) -> Self {
        let mut days: BTreeMap<Day, Vec<ScheduledVisit>> = BTreeMap::new();
        let mut total_min: i64 = 0;
        for v in visits {
            total_min += v.duration_min();
            days.entry(v.day).or_default().push(ScheduledVisit::from(v));
        }
        for list in days.values_mut() {
            list.sort_by_key(|s| s.start_min);
        }

        let total_hours = total_min as f64 / MINUTES_PER_HOUR;
        let utilization = if max_hours > 0.0 {
            total_hours / max_hours
        } else {
            0.0
        };

        Self {
            caregiver_id: caregiver_id.into(),
            days,
            total_hours,
            max_hours,
            utilization,
        }
    }

    /// Number of assigned visits.
    pub fn visit_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    /// Whether nothing was assigned.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Visits on a given day (empty slice if none).
    pub fn visits_on(&self, day: Day) -> &[ScheduledVisit] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_factories() {
        let v1 = Violation::unassigned("V1");
        assert_eq!(v1.kind, ViolationKind::Unassigned);
        assert_eq!(v1.visit_id, "V1");
        assert!(v1.caregiver_id.is_none());

        let v2 = Violation::diagnostic(ViolationKind::SkillMismatch, "V1", "CG1");
        assert_eq!(v2.kind, ViolationKind::SkillMismatch);
        assert_eq!(v2.caregiver_id.as_deref(), Some("CG1"));
    }

    #[test]
    fn test_violation_display() {
        assert_eq!(Violation::unassigned("V1").to_string(), "UNASSIGNED visit=V1");
        assert_eq!(
            Violation::diagnostic(ViolationKind::HoursExceeded, "V2", "CG3").to_string(),
            "HOURS_EXCEEDED visit=V2 caregiver=CG3"
        );
    }

    #[test]
    fn test_scheduled_visit_display() {
        let v = Visit::new("V1", "alice", 0, 545, 630).in_neighborhood("north");
        assert_eq!(
            ScheduledVisit::from(&v).to_string(),
            "09:05-10:30 V1 client=alice (north)"
        );
        let plain = Visit::new("V2", "bob", 0, 480, 540);
        assert_eq!(ScheduledVisit::from(&plain).to_string(), "08:00-09:00 V2 client=bob");
    }

    #[test]
    fn test_violation_kind_serde() {
        let json = serde_json::to_string(&ViolationKind::HoursExceeded).unwrap();
        assert_eq!(json, "\"HOURS_EXCEEDED\"");
    }

    #[test]
    fn test_schedule_from_visits() {
        let visits = [
            Visit::new("V2", "c1", 0, 720, 780).in_neighborhood("north"),
            Visit::new("V1", "c1", 0, 540, 600).in_neighborhood("north"),
            Visit::new("V3", "c2", 1, 600, 690).in_neighborhood("south"),
        ];
        let s = CaregiverSchedule::from_visits("CG1", 10.0, &visits);

        assert_eq!(s.visit_count(), 3);
        assert_eq!(s.visits_on(0)[0].visit_id, "V1"); // sorted by start
        assert_eq!(s.visits_on(0)[1].visit_id, "V2");
        assert_eq!(s.visits_on(1).len(), 1);
        assert!(s.visits_on(5).is_empty());
        assert!((s.total_hours - 3.5).abs() < 1e-10);
        assert!((s.utilization - 0.35).abs() < 1e-10);
    }

    #[test]
    fn test_schedule_zero_cap() {
        let s = CaregiverSchedule::from_visits("CG1", 0.0, std::iter::empty());
        assert!(s.is_empty());
        assert!((s.utilization - 0.0).abs() < 1e-10);
    }
}
