//! Whole-client assignment.
//!
//! Tries to give every visit of one client to a single caregiver.
//!
//! # Algorithm
//!
//! 1. For each caregiver, copy its load and commit the client's visits to the
//!    copy one by one in chronological order. The caregiver is whole-eligible
//!    if every visit passes the constraint checks against the growing copy.
//! 2. Rank whole-eligible caregivers by ascending
//!    `(neighborhood switches after assignment, hours after assignment, id)`.
//! 3. Commit all visits to the best one.
//!
//! No violations are produced here; a client without a whole-client solution
//! falls back to per-visit assignment.

use super::{checker, AssignmentState, CaregiverLoad};
use crate::models::{Caregiver, Visit};

/// Ranking key of a whole-eligible caregiver. Lower is better.
///
/// Caregiver IDs break the final tie; since the state holds caregivers in
/// ID order, the index stands in for the ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WholeClientRank {
    /// Neighborhood switches across the caregiver's whole resulting schedule.
    pub switches: usize,
    /// Assigned minutes after taking the client.
    pub assigned_min: i64,
    /// Caregiver index (ID order).
    pub caregiver: usize,
}

/// Simulates taking all `visits` on a copy of `load`.
///
/// Returns the resulting load, or `None` as soon as one visit is ineligible.
fn simulate<'a>(
    visits: &[&'a Visit],
    caregiver: &Caregiver,
    load: &CaregiverLoad<'a>,
) -> Option<CaregiverLoad<'a>> {
    let mut trial = load.clone();
    for &visit in visits {
        if !checker::is_eligible(visit, caregiver, &trial) {
            return None;
        }
        trial.push(visit);
    }
    Some(trial)
}

/// Ranks all whole-eligible caregivers for a client, best first.
///
/// `visits` must be the client's visits in chronological order.
pub fn rank_caregivers(visits: &[&Visit], state: &AssignmentState<'_>) -> Vec<WholeClientRank> {
    let mut ranks: Vec<WholeClientRank> = state
        .iter()
        .enumerate()
        .filter_map(|(idx, (caregiver, load))| {
            simulate(visits, caregiver, load).map(|trial| WholeClientRank {
                switches: trial.neighborhood_switches(),
                assigned_min: trial.assigned_minutes(),
                caregiver: idx,
            })
        })
        .collect();
    ranks.sort();
    ranks
}

/// Assigns all of a client's visits to one caregiver if possible.
///
/// Returns the chosen caregiver index, or `None` (with nothing committed)
/// when no single caregiver can take every visit.
pub fn assign_whole_client<'a>(
    visits: &[&'a Visit],
    state: &mut AssignmentState<'a>,
) -> Option<usize> {
    // A visit whose ID is already taken can never be committed.
    if visits.is_empty() || visits.iter().any(|v| state.is_assigned(&v.id)) {
        return None;
    }
    let best = rank_caregivers(visits, state).into_iter().next()?;
    for &visit in visits {
        state.commit(visit, best.caregiver);
    }
    Some(best.caregiver)
}
