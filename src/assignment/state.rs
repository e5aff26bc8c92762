//! Assignment state for a single solve.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{neighborhood_switches, Caregiver, Day, Visit, MINUTES_PER_HOUR};

/// Per-caregiver aggregates derived from committed assignments.
///
/// Borrowed visits keep the state cheap to clone, which is how the
/// whole-client assigner simulates commitments before making them.
#[derive(Debug, Clone, Default)]
pub struct CaregiverLoad<'a> {
    assigned_min: i64,
    days: BTreeMap<Day, Vec<&'a Visit>>,
    served: BTreeSet<(Day, &'a str)>,
    clients: BTreeSet<&'a str>,
}

impl<'a> CaregiverLoad<'a> {
    /// Total assigned time (minutes).
    #[inline]
    pub fn assigned_minutes(&self) -> i64 {
        self.assigned_min
    }

    /// Total assigned time (hours).
    pub fn assigned_hours(&self) -> f64 {
        self.assigned_min as f64 / MINUTES_PER_HOUR
    }

    /// Visits on `day`, sorted by start time.
    pub fn visits_on(&self, day: Day) -> &[&'a Visit] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All assigned visits, day by day in chronological order.
    pub fn visits(&self) -> impl Iterator<Item = &'a Visit> + '_ {
        self.days.values().flat_map(|vs| vs.iter().copied())
    }

    /// Number of assigned visits.
    pub fn visit_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    /// Whether a visit of `client_id` is already assigned here.
    pub fn serves_client(&self, client_id: &str) -> bool {
        self.clients.contains(client_id)
    }

    /// Whether a visit in `neighborhood` on `day` is already assigned here.
    pub fn serves_neighborhood(&self, day: Day, neighborhood: &str) -> bool {
        self.served.contains(&(day, neighborhood))
    }

    /// Neighborhood switches summed over every day of this load.
    pub fn neighborhood_switches(&self) -> usize {
        self.days.values().map(|vs| neighborhood_switches(vs)).sum()
    }

    /// Records a visit, keeping the day list ordered by start time.
    pub(crate) fn push(&mut self, visit: &'a Visit) {
        self.assigned_min += visit.duration_min();
        let list = self.days.entry(visit.day).or_default();
        let pos = list.partition_point(|v| v.start_min <= visit.start_min);
        list.insert(pos, visit);
        self.served.insert((visit.day, visit.neighborhood.as_str()));
        self.clients.insert(visit.client_id.as_str());
    }
}

/// Mutable assignment state, exclusively owned by one solve.
///
/// Caregivers are held in ascending ID order; their position in that order
/// is the index every other method takes. Commitments are add-only: a visit
/// that already has a caregiver is never reassigned.
#[derive(Debug, Clone)]
pub struct AssignmentState<'a> {
    caregivers: Vec<&'a Caregiver>,
    loads: Vec<CaregiverLoad<'a>>,
    assignments: BTreeMap<&'a str, usize>,
}

impl<'a> AssignmentState<'a> {
    /// Creates an empty state over the given caregivers.
    pub fn new(caregivers: &'a [Caregiver]) -> Self {
        let mut sorted: Vec<&'a Caregiver> = caregivers.iter().collect();
        sorted.sort_by(|a, b| a.id.cmp(&b.id));
        let loads = vec![CaregiverLoad::default(); sorted.len()];
        Self {
            caregivers: sorted,
            loads,
            assignments: BTreeMap::new(),
        }
    }

    /// Caregivers in ascending ID order.
    pub fn caregivers(&self) -> &[&'a Caregiver] {
        &self.caregivers
    }

    /// Number of caregivers.
    pub fn caregiver_count(&self) -> usize {
        self.caregivers.len()
    }

    /// Caregiver at `index`.
    pub fn caregiver(&self, index: usize) -> &'a Caregiver {
        self.caregivers[index]
    }

    /// Aggregates of the caregiver at `index`.
    pub fn load(&self, index: usize) -> &CaregiverLoad<'a> {
        &self.loads[index]
    }

    /// Caregivers paired with their loads, in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a Caregiver, &CaregiverLoad<'a>)> + '_ {
        self.caregivers.iter().copied().zip(self.loads.iter())
    }

    /// Whether a visit already has a caregiver.
    pub fn is_assigned(&self, visit_id: &str) -> bool {
        self.assignments.contains_key(visit_id)
    }

    /// Whether this exact visit (not merely its ID) has been committed.
    pub fn is_committed(&self, visit: &Visit) -> bool {
        self.assignments
            .get(visit.id.as_str())
            .is_some_and(|&idx| {
                self.loads[idx]
                    .visits_on(visit.day)
                    .iter()
                    .any(|&v| std::ptr::eq(v, visit))
            })
    }

    /// Caregiver a visit is committed to.
    pub fn caregiver_of(&self, visit_id: &str) -> Option<&'a Caregiver> {
        self.assignments
            .get(visit_id)
            .map(|&idx| self.caregivers[idx])
    }

    /// Number of committed visits.
    pub fn assigned_count(&self) -> usize {
        self.assignments.len()
    }

    /// Commits `visit` to the caregiver at `index`.
    ///
    /// Returns `false` (and changes nothing) if the visit is already assigned.
    pub fn commit(&mut self, visit: &'a Visit, index: usize) -> bool {
        if self.assignments.contains_key(visit.id.as_str()) {
            tracing::warn!(visit = %visit.id, "visit already assigned, commit ignored");
            return false;
        }
        self.assignments.insert(visit.id.as_str(), index);
        self.loads[index].push(visit);
        true
    }

    /// Committed visits paired with their caregiver's ID, caregiver by caregiver.
    pub fn assigned_visits(&self) -> Vec<(&'a Visit, &'a str)> {
        self.iter()
            .flat_map(|(caregiver, load)| load.visits().map(move |v| (v, caregiver.id.as_str())))
            .collect()
    }

    /// Visit ID → caregiver ID mapping.
    pub fn assignment_map(&self) -> BTreeMap<String, String> {
        self.assignments
            .iter()
            .map(|(&visit_id, &idx)| (visit_id.to_string(), self.caregivers[idx].id.clone()))
            .collect()
    }
}
