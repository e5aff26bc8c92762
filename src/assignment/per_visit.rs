//! Per-visit fallback assignment.
//!
//! Assigns one visit at a time to the best eligible caregiver. Eligible
//! caregivers are ranked sequentially, the next criterion only breaking
//! ties of the previous one:
//!
//! 1. Continuity: caregiver already serves this client.
//! 2. Travel: caregiver already has a visit in this neighborhood that day.
//! 3. Load: fewer assigned hours.
//! 4. Caregiver ID.
//!
//! When nobody is eligible the visit stays unassigned and an `Unassigned`
//! violation is recorded, optionally followed by one diagnostic per
//! caregiver naming the first constraint it failed.

use super::{checker, AssignmentState, CaregiverLoad};
use crate::models::{Violation, Visit};

/// Ranking key of an eligible caregiver. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VisitRank {
    /// 0 if the caregiver already serves the client, else 1.
    pub continuity: u8,
    /// 0 if the caregiver is already in the neighborhood that day, else 1.
    pub travel: u8,
    /// Currently assigned minutes.
    pub assigned_min: i64,
    /// Caregiver index (ID order).
    pub caregiver: usize,
}

impl VisitRank {
    fn evaluate(visit: &Visit, load: &CaregiverLoad<'_>, caregiver: usize) -> Self {
        Self {
            continuity: u8::from(!load.serves_client(&visit.client_id)),
            travel: u8::from(!load.serves_neighborhood(visit.day, &visit.neighborhood)),
            assigned_min: load.assigned_minutes(),
            caregiver,
        }
    }
}

/// Best eligible caregiver for `visit`, if any.
pub fn best_caregiver(visit: &Visit, state: &AssignmentState<'_>) -> Option<VisitRank> {
    state
        .iter()
        .enumerate()
        .filter(|(_, (caregiver, load))| checker::is_eligible(visit, caregiver, load))
        .map(|(idx, (_, load))| VisitRank::evaluate(visit, load, idx))
        .min()
}

/// Assigns a single visit, or records why it could not be assigned.
///
/// Returns the chosen caregiver index.
pub fn assign_visit<'a>(
    visit: &'a Visit,
    state: &mut AssignmentState<'a>,
    violations: &mut Vec<Violation>,
    record_diagnostics: bool,
) -> Option<usize> {
    match best_caregiver(visit, state) {
        Some(rank) => {
            state.commit(visit, rank.caregiver);
            tracing::trace!(
                visit = %visit.id,
                caregiver = %state.caregiver(rank.caregiver).id,
                continuity = rank.continuity == 0,
                same_neighborhood = rank.travel == 0,
                "visit assigned"
            );
            Some(rank.caregiver)
        }
        None => {
            tracing::warn!(visit = %visit.id, client = %visit.client_id, "no eligible caregiver");
            violations.push(Violation::unassigned(&visit.id));
            if record_diagnostics {
                violations.extend(diagnose(visit, state));
            }
            None
        }
    }
}

/// One diagnostic per caregiver, naming the first constraint it fails.
pub fn diagnose(visit: &Visit, state: &AssignmentState<'_>) -> Vec<Violation> {
    state
        .iter()
        .filter_map(|(caregiver, load)| {
            checker::check(visit, caregiver, load)
                .err()
                .map(|kind| Violation::diagnostic(kind, &visit.id, &caregiver.id))
        })
        .collect()
}
