//! Schedule quality metrics.
//!
//! Computes continuity and travel indicators from a completed (possibly
//! partial) assignment, plus the continuity ceiling of the input.
//!
//! Assignment-based metrics take the committed `(visit, caregiver ID)` pairs
//! rather than joining input visits against an ID map, so they describe
//! exactly the visits the caregivers' schedules hold.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Continuity | Mean over clients with ≥1 assigned visit of `1 / distinct caregivers` |
//! | Travel efficiency | `1 - switches / max switches` over caregiver-days with ≥2 visits |
//! | Max possible continuity | Mean over clients of `1 / min chains` (see [`min_chains`]) |
//! | Avg utilization | Mean of `assigned hours / max hours` over caregivers |
//!
//! All scores lie in `[0.0, 1.0]`. A score with nothing to measure is 1.0.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::assignment::checker;
use crate::models::{neighborhood_switches, Caregiver, Day, Visit, MINUTES_PER_HOUR};

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetrics {
    /// Continuity of care (0.0..1.0).
    pub continuity: f64,
    /// Per-client continuity (`1 / distinct caregivers`), assigned clients only.
    pub continuity_by_client: BTreeMap<String, f64>,
    /// Travel efficiency (0.0..1.0).
    pub travel_efficiency: f64,
    /// Neighborhood switches across all caregiver-days.
    pub total_switches: usize,
    /// Worst-case switches (`visits - 1` summed over caregiver-days).
    pub max_switches: usize,
    /// Best continuity the input allows, never below `continuity`.
    ///
    /// `max(continuity_ceiling, continuity)`: the ceiling skips clients
    /// with no coverable visit while `continuity` skips clients with no
    /// assigned visit, so the raw ceiling can fall below the achieved
    /// score. This value therefore depends on the solve; the input-only
    /// figure is `continuity_ceiling`.
    pub max_possible_continuity: f64,
    /// Input-only continuity ceiling, before clamping to `continuity`.
    pub continuity_ceiling: f64,
    /// Average caregiver utilization (0.0..1.0).
    pub avg_utilization: f64,
}

impl ScheduleMetrics {
    /// Computes metrics for an assignment.
    ///
    /// # Arguments
    /// * `visits` - All input visits, assigned or not (ceiling only).
    /// * `caregivers` - All input caregivers.
    /// * `assigned` - Committed visits paired with their caregiver ID.
    /// * `exact_chain_cover_limit` - See [`max_possible_continuity`].
    pub fn calculate(
        visits: &[Visit],
        caregivers: &[Caregiver],
        assigned: &[(&Visit, &str)],
        exact_chain_cover_limit: usize,
    ) -> Self {
        let (continuity, continuity_by_client) = continuity_score(assigned);
        let travel = TravelStats::calculate(assigned);
        let ceiling = max_possible_continuity(visits, caregivers, exact_chain_cover_limit);

        Self {
            continuity,
            continuity_by_client,
            travel_efficiency: travel.efficiency(),
            total_switches: travel.switches,
            max_switches: travel.max_switches,
            max_possible_continuity: ceiling.max(continuity),
            continuity_ceiling: ceiling,
            avg_utilization: average_utilization(caregivers, assigned),
        }
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_continuity: f64, min_travel_efficiency: f64) -> bool {
        self.continuity >= min_continuity && self.travel_efficiency >= min_travel_efficiency
    }

    /// Continuity left on the table relative to the ceiling.
    pub fn continuity_gap(&self) -> f64 {
        self.max_possible_continuity - self.continuity
    }
}

/// Continuity score and its per-client breakdown.
///
/// Clients with no assigned visit are left out of the mean (no data is not
/// the same as no continuity). Returns 1.0 when no client has assignments.
pub fn continuity_score(assigned: &[(&Visit, &str)]) -> (f64, BTreeMap<String, f64>) {
    let mut caregivers_by_client: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for &(v, cg) in assigned {
        caregivers_by_client
            .entry(v.client_id.as_str())
            .or_default()
            .insert(cg);
    }

    let by_client: BTreeMap<String, f64> = caregivers_by_client
        .into_iter()
        .map(|(client, cgs)| (client.to_string(), 1.0 / cgs.len() as f64))
        .collect();

    let score = if by_client.is_empty() {
        1.0
    } else {
        by_client.values().sum::<f64>() / by_client.len() as f64
    };
    (score, by_client)
}

/// Neighborhood switch counts over caregiver-days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TravelStats {
    /// Observed switches.
    pub switches: usize,
    /// Worst-case switches.
    pub max_switches: usize,
}

impl TravelStats {
    /// Counts switches per caregiver-day, visits ordered by start time.
    pub fn calculate(assigned: &[(&Visit, &str)]) -> Self {
        let mut days: BTreeMap<(&str, Day), Vec<&Visit>> = BTreeMap::new();
        for &(v, cg) in assigned {
            days.entry((cg, v.day)).or_default().push(v);
        }

        let mut stats = Self::default();
        for day_visits in days.values_mut() {
            if day_visits.len() < 2 {
                continue;
            }
            day_visits.sort_by(|a, b| a.start_min.cmp(&b.start_min).then_with(|| a.id.cmp(&b.id)));
            stats.switches += neighborhood_switches(day_visits);
            stats.max_switches += day_visits.len() - 1;
        }
        stats
    }

    /// `1 - switches / max_switches`, or 1.0 when no caregiver-day has two visits.
    pub fn efficiency(&self) -> f64 {
        if self.max_switches == 0 {
            1.0
        } else {
            1.0 - self.switches as f64 / self.max_switches as f64
        }
    }
}

/// Travel efficiency score of an assignment.
pub fn travel_efficiency(assigned: &[(&Visit, &str)]) -> f64 {
    TravelStats::calculate(assigned).efficiency()
}

/// Mean utilization over all caregivers (0.0 if there are none).
fn average_utilization(caregivers: &[Caregiver], assigned: &[(&Visit, &str)]) -> f64 {
    if caregivers.is_empty() {
        return 0.0;
    }
    let mut minutes: HashMap<&str, i64> = HashMap::new();
    for &(v, cg) in assigned {
        *minutes.entry(cg).or_insert(0) += v.duration_min();
    }
    let sum: f64 = caregivers
        .iter()
        .map(|c| {
            let hours = minutes.get(c.id.as_str()).copied().unwrap_or(0) as f64 / MINUTES_PER_HOUR;
            if c.max_hours > 0.0 {
                hours / c.max_hours
            } else {
                0.0
            }
        })
        .sum();
    sum / caregivers.len() as f64
}

/// Continuity ceiling of the input, independent of any solve.
///
/// For each client, the visits some caregiver is qualified for (skills and
/// availability) are split into the fewest chains; the client contributes
/// `1 / chains`. Clients with no coverable visit are skipped. Returns 1.0
/// when no client qualifies.
///
/// Clients with more than `exact_limit` coverable visits use the first-fit
/// chain count, which may exceed the true minimum.
pub fn max_possible_continuity(
    visits: &[Visit],
    caregivers: &[Caregiver],
    exact_limit: usize,
) -> f64 {
    let mut by_client: BTreeMap<&str, Vec<&Visit>> = BTreeMap::new();
    for v in visits {
        by_client.entry(v.client_id.as_str()).or_default().push(v);
    }

    let scores: Vec<f64> = by_client
        .values()
        .filter_map(|client_visits| {
            let chains = min_chains(client_visits, caregivers, exact_limit);
            (chains > 0).then(|| 1.0 / chains as f64)
        })
        .collect();

    if scores.is_empty() {
        1.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

/// A group of one client's visits that a single caregiver could serve.
struct Chain<'v> {
    /// Caregiver indices qualified for every visit in the chain.
    qualified: Vec<usize>,
    visits: Vec<&'v Visit>,
}

impl<'v> Chain<'v> {
    fn new(visit: &'v Visit, qualified: &[usize]) -> Self {
        Self {
            qualified: qualified.to_vec(),
            visits: vec![visit],
        }
    }

    /// Qualified caregivers left if `visit` joined, or `None` if it cannot.
    fn admit(&self, visit: &Visit, qualified: &[usize]) -> Option<Vec<usize>> {
        if self.visits.iter().any(|v| v.overlaps(visit)) {
            return None;
        }
        let common: Vec<usize> = self
            .qualified
            .iter()
            .copied()
            .filter(|c| qualified.binary_search(c).is_ok())
            .collect();
        (!common.is_empty()).then_some(common)
    }
}

/// Fewest chains covering a client's coverable visits.
///
/// A chain is a set of pairwise non-overlapping visits sharing at least one
/// caregiver qualified for all of them. Visits nobody is qualified for are
/// ignored; returns 0 if no visit is coverable.
///
/// # Algorithm
/// First-fit over chronologically sorted visits gives an upper bound;
/// when the client has at most `exact_limit` coverable visits, a
/// branch-and-bound search then looks for a smaller cover.
pub fn min_chains(visits: &[&Visit], caregivers: &[Caregiver], exact_limit: usize) -> usize {
    let mut coverable: Vec<(&Visit, Vec<usize>)> = visits
        .iter()
        .map(|&v| {
            let qualified: Vec<usize> = caregivers
                .iter()
                .enumerate()
                .filter(|(_, c)| checker::is_qualified(v, c))
                .map(|(i, _)| i)
                .collect();
            (v, qualified)
        })
        .filter(|(_, q)| !q.is_empty())
        .collect();
    coverable.sort_by(|a, b| a.0.time_key().cmp(&b.0.time_key()).then_with(|| a.0.id.cmp(&b.0.id)));

    let upper = first_fit(&coverable);
    if upper <= 1 || coverable.len() > exact_limit {
        return upper;
    }

    let mut best = upper;
    let mut chains = Vec::new();
    search(&coverable, 0, &mut chains, &mut best);
    best
}

fn first_fit(coverable: &[(&Visit, Vec<usize>)]) -> usize {
    let mut chains: Vec<Chain<'_>> = Vec::new();
    for (visit, qualified) in coverable {
        let visit = *visit;
        let slot = chains
            .iter()
            .enumerate()
            .find_map(|(i, ch)| ch.admit(visit, qualified).map(|common| (i, common)));
        match slot {
            Some((i, common)) => {
                chains[i].qualified = common;
                chains[i].visits.push(visit);
            }
            None => chains.push(Chain::new(visit, qualified)),
        }
    }
    chains.len()
}

fn search<'v>(
    coverable: &[(&'v Visit, Vec<usize>)],
    next: usize,
    chains: &mut Vec<Chain<'v>>,
    best: &mut usize,
) {
    if chains.len() >= *best {
        return;
    }
    let Some((visit, qualified)) = coverable.get(next) else {
        *best = chains.len();
        return;
    };
    let visit = *visit;

    for i in 0..chains.len() {
        if let Some(common) = chains[i].admit(visit, qualified) {
            let saved = std::mem::replace(&mut chains[i].qualified, common);
            chains[i].visits.push(visit);
            search(coverable, next + 1, chains, best);
            chains[i].visits.pop();
            chains[i].qualified = saved;
            if *best == 1 {
                return;
            }
        }
    }

    if chains.len() + 1 < *best {
        chains.push(Chain::new(visit, qualified));
        search(coverable, next + 1, chains, best);
        chains.pop();
    }
}
