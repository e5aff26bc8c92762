//! Hard constraint checks.
//!
//! Four pure predicates decide whether a caregiver may take a visit:
//!
//! | Predicate | Holds iff |
//! |-----------|-----------|
//! | `has_skills` | caregiver skills ⊇ visit required skills |
//! | `is_available` | an availability window on the visit's day covers `[start, end)` |
//! | `no_overlap` | no visit already on the caregiver's day intersects `[start, end)` |
//! | `within_hours` | assigned hours + visit hours ≤ hours cap |
//!
//! The state-dependent predicates take the caregiver's [`CaregiverLoad`],
//! which may be a speculative copy during whole-client simulation.

use super::CaregiverLoad;
use crate::models::{Caregiver, Visit, ViolationKind};

/// Whether the caregiver holds every skill the visit requires.
pub fn has_skills(visit: &Visit, caregiver: &Caregiver) -> bool {
    caregiver.has_all_skills(&visit.required_skills)
}

/// Whether some availability window fully contains the visit.
pub fn is_available(visit: &Visit, caregiver: &Caregiver) -> bool {
    caregiver.is_available_for(visit.day, visit.start_min, visit.end_min)
}

/// Whether the visit fits between the caregiver's committed visits that day.
pub fn no_overlap(visit: &Visit, load: &CaregiverLoad<'_>) -> bool {
    !load.visits_on(visit.day).iter().any(|v| v.overlaps(visit))
}

/// Slack on the minute cap; `max_hours * 60.0` can land a hair below a whole
/// minute (4.1h gives 245.99999999999997).
const CAP_TOLERANCE_MIN: f64 = 1e-6;

/// Whether the visit keeps the caregiver within the hours cap.
///
/// Compared in minutes so that a cap exactly equal to the summed
/// durations is accepted.
pub fn within_hours(visit: &Visit, caregiver: &Caregiver, load: &CaregiverLoad<'_>) -> bool {
    let total = (load.assigned_minutes() + visit.duration_min()) as f64;
    total <= caregiver.max_minutes() + CAP_TOLERANCE_MIN
}

/// Runs all predicates and returns the first one that fails.
///
/// Order: skills, availability, overlap, hours.
pub fn check(
    visit: &Visit,
    caregiver: &Caregiver,
    load: &CaregiverLoad<'_>,
) -> Result<(), ViolationKind> {
    if !has_skills(visit, caregiver) {
        return Err(ViolationKind::SkillMismatch);
    }
    if !is_available(visit, caregiver) {
        return Err(ViolationKind::Availability);
    }
    if !no_overlap(visit, load) {
        return Err(ViolationKind::Overlap);
    }
    if !within_hours(visit, caregiver, load) {
        return Err(ViolationKind::HoursExceeded);
    }
    Ok(())
}

/// Whether all four predicates hold.
#[inline]
pub fn is_eligible(visit: &Visit, caregiver: &Caregiver, load: &CaregiverLoad<'_>) -> bool {
    check(visit, caregiver, load).is_ok()
}

/// Whether the caregiver could ever take the visit, ignoring other
/// assignments and the hours cap.
#[inline]
pub fn is_qualified(visit: &Visit, caregiver: &Caregiver) -> bool {
    has_skills(visit, caregiver) && is_available(visit, caregiver)
}
