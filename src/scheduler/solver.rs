//! Two-phase greedy visit scheduler.
//!
//! # Algorithm
//!
//! 1. Group visits by client; order clients by ID and each client's visits
//!    by (day, start).
//! 2. Whole pass: for each client in order, try to give all of its visits
//!    to one caregiver.
//! 3. Per-visit pass: every visit still unassigned, in (day, start) order
//!    (input order on ties), goes to the best eligible caregiver or is
//!    reported as unassigned.
//! 4. Score the final assignment and build per-caregiver schedules.
//!
//! Processing order changes the result, so it is fixed: the same input
//! always yields the same assignment.
//!
//! # Complexity
//! O(v * c) eligibility checks per pass, v = visits, c = caregivers. The
//! continuity ceiling adds a bounded search per client.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{ScheduleMetrics, SolverConfig};
use crate::assignment::{assign_visit, assign_whole_client, AssignmentState};
use crate::error::{Result, SolveError};
use crate::models::{Caregiver, CaregiverSchedule, Violation, ViolationKind, Visit};
use crate::validation::validate_input;

/// Input container for a solve.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolveRequest {
    /// Visits to assign.
    pub visits: Vec<Visit>,
    /// Available caregivers.
    pub caregivers: Vec<Caregiver>,
    /// Solver options.
    #[serde(default)]
    pub config: SolverConfig,
}

impl SolveRequest {
    /// Creates a request with the default configuration.
    pub fn new(visits: Vec<Visit>, caregivers: Vec<Caregiver>) -> Self {
        Self {
            visits,
            caregivers,
            config: SolverConfig::default(),
        }
    }

    /// Sets the solver configuration.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }
}

/// Phases of a solve, entered strictly in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SolvePhase {
    /// Nothing done yet.
    Init,
    /// Visits grouped by client.
    Grouping,
    /// Whole-client assignment.
    WholePass,
    /// Per-visit fallback assignment.
    PerVisitPass,
    /// Metrics computation.
    Scoring,
    /// Result assembled.
    Done,
}

/// Outcome of a solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    /// Visit ID → caregiver ID.
    pub assignments: BTreeMap<String, String>,
    /// Unassigned visits and their diagnostics, in the order found.
    pub violations: Vec<Violation>,
    /// Quality scores.
    pub metrics: ScheduleMetrics,
    /// One schedule per caregiver, in caregiver ID order.
    pub schedules: Vec<CaregiverSchedule>,
    /// Clients fully served by a single caregiver in the whole pass.
    pub whole_client_assignments: BTreeMap<String, String>,
}

impl SolveResult {
    /// Caregiver assigned to a visit.
    pub fn caregiver_for(&self, visit_id: &str) -> Option<&str> {
        self.assignments.get(visit_id).map(String::as_str)
    }

    /// Number of assigned visits.
    pub fn assigned_count(&self) -> usize {
        self.assignments.len()
    }

    /// IDs of visits nobody could take.
    pub fn unassigned_visits(&self) -> Vec<&str> {
        self.violations
            .iter()
            .filter(|v| v.kind == ViolationKind::Unassigned)
            .map(|v| v.visit_id.as_str())
            .collect()
    }

    /// Whether every visit was assigned.
    pub fn is_complete(&self) -> bool {
        !self
            .violations
            .iter()
            .any(|v| v.kind == ViolationKind::Unassigned)
    }

    /// Violations concerning one visit.
    pub fn violations_for_visit(&self, visit_id: &str) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.visit_id == visit_id)
            .collect()
    }

    /// Schedule of one caregiver.
    pub fn schedule_for(&self, caregiver_id: &str) -> Option<&CaregiverSchedule> {
        self.schedules
            .iter()
            .find(|s| s.caregiver_id == caregiver_id)
    }
}

/// Greedy home-care scheduler.
///
/// Stateless between solves: every call owns a fresh assignment state, so
/// one scheduler can serve any number of independent solves.
///
/// # Example
///
/// ```
/// use care_schedule::models::{Caregiver, Visit};
/// use care_schedule::scheduler::CareScheduler;
///
/// let visits = vec![
///     Visit::new("V1", "alice", 0, 540, 600).in_neighborhood("north"),
///     Visit::new("V2", "alice", 2, 540, 600).in_neighborhood("north"),
/// ];
/// let caregivers = vec![
///     Caregiver::new("CG1", 20.0)
///         .with_window(0, 480, 1020)
///         .with_window(2, 480, 1020),
/// ];
///
/// let result = CareScheduler::new().solve(&visits, &caregivers).unwrap();
/// assert_eq!(result.caregiver_for("V1"), Some("CG1"));
/// assert_eq!(result.caregiver_for("V2"), Some("CG1"));
/// assert!((result.metrics.continuity - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CareScheduler {
    config: SolverConfig,
}

impl CareScheduler {
    /// Creates a scheduler with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Assigns visits to caregivers.
    ///
    /// # Errors
    /// [`SolveError::InvalidInput`] if validation is enabled and the input
    /// is malformed. Unassignable visits are not errors; they are reported
    /// in [`SolveResult::violations`].
    pub fn solve(&self, visits: &[Visit], caregivers: &[Caregiver]) -> Result<SolveResult> {
        if self.config.validate_input {
            validate_input(visits, caregivers).map_err(SolveError::InvalidInput)?;
        }

        info!(
            visits = visits.len(),
            caregivers = caregivers.len(),
            "starting solve"
        );

        let mut run = Solve::new(visits, caregivers, &self.config);
        let groups = run.group_by_client();
        run.whole_pass(&groups);
        run.per_visit_pass();
        let metrics = run.score();
        let result = run.finish(metrics);

        info!(
            assigned = result.assigned_count(),
            unassigned = result.unassigned_visits().len(),
            continuity = result.metrics.continuity,
            travel_efficiency = result.metrics.travel_efficiency,
            max_possible_continuity = result.metrics.max_possible_continuity,
            "solve complete"
        );
        Ok(result)
    }

    /// Solves a request, using the request's configuration.
    pub fn solve_request(&self, request: &SolveRequest) -> Result<SolveResult> {
        let scheduler = Self {
            config: request.config.clone(),
        };
        scheduler.solve(&request.visits, &request.caregivers)
    }
}

/// One solve in progress. Owns the assignment state exclusively.
struct Solve<'a> {
    phase: SolvePhase,
    visits: &'a [Visit],
    caregivers: &'a [Caregiver],
    config: &'a SolverConfig,
    state: AssignmentState<'a>,
    violations: Vec<Violation>,
    whole_client: BTreeMap<String, String>,
}

impl<'a> Solve<'a> {
    fn new(visits: &'a [Visit], caregivers: &'a [Caregiver], config: &'a SolverConfig) -> Self {
        Self {
            phase: SolvePhase::Init,
            visits,
            caregivers,
            config,
            state: AssignmentState::new(caregivers),
            violations: Vec::new(),
            whole_client: BTreeMap::new(),
        }
    }

    fn enter(&mut self, phase: SolvePhase) {
        debug_assert!(phase > self.phase, "phases only move forward");
        debug!(from = ?self.phase, to = ?phase, "phase transition");
        self.phase = phase;
    }

    /// Client ID → visits in (day, start) order, input order on ties.
    fn group_by_client(&mut self) -> BTreeMap<&'a str, Vec<&'a Visit>> {
        self.enter(SolvePhase::Grouping);
        let visits: &'a [Visit] = self.visits;
        let mut groups: BTreeMap<&'a str, Vec<&'a Visit>> = BTreeMap::new();
        for v in visits {
            groups.entry(v.client_id.as_str()).or_default().push(v);
        }
        for list in groups.values_mut() {
            list.sort_by_key(|v| v.time_key());
        }
        groups
    }

    fn whole_pass(&mut self, groups: &BTreeMap<&'a str, Vec<&'a Visit>>) {
        self.enter(SolvePhase::WholePass);
        if !self.config.whole_client_pass {
            debug!("whole-client pass disabled");
            return;
        }
        for (&client, visits) in groups {
            match assign_whole_client(visits, &mut self.state) {
                Some(idx) => {
                    let caregiver = &self.state.caregiver(idx).id;
                    debug!(client, caregiver = %caregiver, visits = visits.len(), "whole-client assignment");
                    self.whole_client
                        .insert(client.to_string(), caregiver.clone());
                }
                None => {
                    debug!(client, visits = visits.len(), "no whole-client solution, falling back");
                }
            }
        }
    }

    fn per_visit_pass(&mut self) {
        self.enter(SolvePhase::PerVisitPass);
        let visits: &'a [Visit] = self.visits;
        let mut pending: Vec<&'a Visit> = visits
            .iter()
            .filter(|v| !self.state.is_committed(v))
            .collect();
        pending.sort_by_key(|v| v.time_key());
        debug!(pending = pending.len(), "per-visit pass");

        for visit in pending {
            // Duplicate IDs (unvalidated input): the ID is already taken, so
            // this visit can never be committed.
            if self.state.is_assigned(&visit.id) {
                warn!(visit = %visit.id, client = %visit.client_id, "duplicate visit ID left unassigned");
                self.violations.push(Violation::unassigned(&visit.id));
                continue;
            }
            assign_visit(
                visit,
                &mut self.state,
                &mut self.violations,
                self.config.record_diagnostics,
            );
        }
    }

    fn score(&mut self) -> ScheduleMetrics {
        self.enter(SolvePhase::Scoring);
        ScheduleMetrics::calculate(
            self.visits,
            self.caregivers,
            &self.state.assigned_visits(),
            self.config.exact_chain_cover_limit,
        )
    }

    fn finish(mut self, metrics: ScheduleMetrics) -> SolveResult {
        self.enter(SolvePhase::Done);
        let schedules = self
            .state
            .iter()
            .map(|(caregiver, load)| {
                CaregiverSchedule::from_visits(&caregiver.id, caregiver.max_hours, load.visits())
            })
            .collect();

        SolveResult {
            assignments: self.state.assignment_map(),
            violations: self.violations,
            metrics,
            schedules,
            whole_client_assignments: self.whole_client,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    fn weekdays(id: &str, max_hours: f64) -> Caregiver {
        (0..5).fold(Caregiver::new(id, max_hours), |c, d| c.with_window(d, 480, 1080))
    }

    #[test]
    fn test_single_client_single_caregiver() {
        let visits = vec![
            Visit::new("V1", "alice", 0, 540, 600).with_skill("bathing"),
            Visit::new("V2", "alice", 1, 540, 600).with_skill("bathing"),
        ];
        let caregivers = vec![weekdays("CG1", 10.0).with_skill("bathing")];

        let result = CareScheduler::new().solve(&visits, &caregivers).unwrap();
        assert_eq!(result.caregiver_for("V1"), Some("CG1"));
        assert_eq!(result.caregiver_for("V2"), Some("CG1"));
        assert!(result.violations.is_empty());
        assert!(result.is_complete());
        assert!((result.metrics.continuity - 1.0).abs() < 1e-10);
        assert_eq!(result.whole_client_assignments["alice"], "CG1");
    }

    #[test]
    fn test_missing_skill_unassigned() {
        let visits = vec![Visit::new("V1", "alice", 0, 540, 600).with_skill("wound_care")];
        let caregivers = vec![weekdays("CG1", 10.0)];

        let result = CareScheduler::new().solve(&visits, &caregivers).unwrap();
        assert!(result.caregiver_for("V1").is_none());
        assert_eq!(result.unassigned_visits(), vec!["V1"]);
        assert_eq!(
            result.violations,
            vec![
                Violation::unassigned("V1"),
                Violation::diagnostic(ViolationKind::SkillMismatch, "V1", "CG1"),
            ]
        );
    }

    #[test]
    fn test_overlapping_visits_one_qualified() {
        let visits = vec![
            Visit::new("V1", "alice", 0, 540, 600).with_skill("lift"),
            Visit::new("V2", "alice", 0, 570, 630).with_skill("lift"),
        ];
        let caregivers = vec![weekdays("CG1", 10.0).with_skill("lift"), weekdays("CG2", 10.0)];

        let result = CareScheduler::new().solve(&visits, &caregivers).unwrap();
        assert!(result.whole_client_assignments.is_empty());
        // V1 starts first and goes to CG1; V2 overlaps and nobody else lifts.
        assert_eq!(result.caregiver_for("V1"), Some("CG1"));
        assert!(result.caregiver_for("V2").is_none());
        let kinds: Vec<ViolationKind> = result
            .violations_for_visit("V2")
            .iter()
            .map(|v| v.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::Unassigned,
                ViolationKind::Overlap,
                ViolationKind::SkillMismatch
            ]
        );
    }

    #[test]
    fn test_overlapping_visits_second_caregiver() {
        let visits = vec![
            Visit::new("V1", "alice", 0, 540, 600),
            Visit::new("V2", "alice", 0, 570, 630),
        ];
        let caregivers = vec![weekdays("CG1", 10.0), weekdays("CG2", 10.0)];

        let result = CareScheduler::new().solve(&visits, &caregivers).unwrap();
        assert_eq!(result.caregiver_for("V1"), Some("CG1"));
        assert_eq!(result.caregiver_for("V2"), Some("CG2"));
        assert!((result.metrics.continuity - 0.5).abs() < 1e-10);
        assert!((result.metrics.max_possible_continuity - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_hours_cap_exactly_two_visits() {
        // CG1 holds 2h: alice's two 1h visits fit, bob's third hour does not.
        let visits = vec![
            Visit::new("A1", "alice", 0, 540, 600),
            Visit::new("A2", "alice", 1, 540, 600),
            Visit::new("B1", "bob", 2, 540, 600),
        ];
        let caregivers = vec![weekdays("CG1", 2.0)];

        let result = CareScheduler::new().solve(&visits, &caregivers).unwrap();
        assert_eq!(result.caregiver_for("A1"), Some("CG1"));
        assert_eq!(result.caregiver_for("A2"), Some("CG1"));
        assert!(result.caregiver_for("B1").is_none());
        assert_eq!(
            result.violations,
            vec![
                Violation::unassigned("B1"),
                Violation::diagnostic(ViolationKind::HoursExceeded, "B1", "CG1"),
            ]
        );

        let schedule = result.schedule_for("CG1").unwrap();
        assert!((schedule.total_hours - 2.0).abs() < 1e-10);
        assert!((schedule.utilization - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_fractional_hours_cap_filled_exactly() {
        let visits = vec![
            Visit::new("V1", "alice", 0, 540, 663),
            Visit::new("V2", "alice", 1, 540, 663),
        ];
        let caregivers = vec![weekdays("CG1", 4.1)];

        let result = CareScheduler::new().solve(&visits, &caregivers).unwrap();
        assert_eq!(result.assigned_count(), 2);
        assert!(result.violations.is_empty());
        assert_eq!(result.whole_client_assignments["alice"], "CG1");
    }

    #[test]
    fn test_hours_cap_third_visit_falls_to_other() {
        let visits = vec![
            Visit::new("A1", "alice", 0, 540, 600),
            Visit::new("A2", "alice", 1, 540, 600),
            Visit::new("B1", "bob", 2, 540, 600),
        ];
        let caregivers = vec![weekdays("CG1", 2.0), weekdays("CG2", 10.0)];

        let result = CareScheduler::new().solve(&visits, &caregivers).unwrap();
        // Whole pass: alice to CG1 (CG1 and CG2 tie on switches and hours; ID decides).
        assert_eq!(result.caregiver_for("A1"), Some("CG1"));
        assert_eq!(result.caregiver_for("B1"), Some("CG2"));
        assert!(result.violations.is_empty());
    }

    #[test]
    fn test_clients_processed_in_id_order() {
        // Both clients want the only caregiver at the same time; "amy" sorts first.
        let visits = vec![
            Visit::new("Z1", "zoe", 0, 540, 600),
            Visit::new("A1", "amy", 0, 540, 600),
        ];
        let caregivers = vec![weekdays("CG1", 10.0)];

        let result = CareScheduler::new().solve(&visits, &caregivers).unwrap();
        assert_eq!(result.caregiver_for("A1"), Some("CG1"));
        assert_eq!(result.unassigned_visits(), vec!["Z1"]);
    }

    #[test]
    fn test_per_visit_only() {
        let visits = vec![
            Visit::new("V1", "alice", 0, 540, 600),
            Visit::new("V2", "alice", 1, 540, 600),
        ];
        let caregivers = vec![weekdays("CG1", 10.0), weekdays("CG2", 10.0)];
        let config = SolverConfig::new().with_whole_client_pass(false);

        let result = CareScheduler::new()
            .with_config(config)
            .solve(&visits, &caregivers)
            .unwrap();
        assert!(result.whole_client_assignments.is_empty());
        // Continuity preference keeps V2 with V1's caregiver.
        assert_eq!(result.caregiver_for("V1"), Some("CG1"));
        assert_eq!(result.caregiver_for("V2"), Some("CG1"));
    }

    #[test]
    fn test_invalid_input_rejected() {
        let visits = vec![Visit::new("V1", "alice", 0, 600, 540)];
        let caregivers = vec![weekdays("CG1", 10.0)];

        let err = CareScheduler::new().solve(&visits, &caregivers).unwrap_err();
        assert_eq!(
            err.validation_errors()[0].kind,
            ValidationErrorKind::InvalidTimeRange
        );
    }

    #[test]
    fn test_validation_disabled() {
        let visits = vec![
            Visit::new("V1", "alice", 0, 540, 600),
            Visit::new("V1", "bob", 1, 540, 600),
        ];
        let caregivers = vec![weekdays("CG1", 10.0)];
        let config = SolverConfig::new().with_validation(false);

        let result = CareScheduler::new()
            .with_config(config)
            .solve(&visits, &caregivers)
            .unwrap();
        assert_eq!(result.assigned_count(), 1);
    }

    #[test]
    fn test_duplicate_id_reported_and_not_scored() {
        let visits = vec![
            Visit::new("V1", "alice", 0, 540, 600).in_neighborhood("n"),
            Visit::new("V1", "bob", 0, 545, 605).in_neighborhood("s"),
        ];
        let caregivers = vec![weekdays("CG1", 10.0)];
        let config = SolverConfig::new().with_validation(false);

        let result = CareScheduler::new()
            .with_config(config)
            .solve(&visits, &caregivers)
            .unwrap();
        assert_eq!(result.caregiver_for("V1"), Some("CG1"));
        assert_eq!(result.violations, vec![Violation::unassigned("V1")]);
        assert!(!result.is_complete());

        // Only alice's visit was committed; bob's must not be scored.
        let m = &result.metrics;
        assert_eq!(m.continuity_by_client.keys().collect::<Vec<_>>(), vec!["alice"]);
        assert_eq!(m.total_switches, 0);
        assert_eq!(m.max_switches, 0);
        assert!((m.travel_efficiency - 1.0).abs() < 1e-10);
        assert_eq!(result.schedule_for("CG1").unwrap().visit_count(), 1);
    }

    #[test]
    fn test_duplicate_id_blocks_second_client_whole_pass() {
        let visits = vec![
            Visit::new("V1", "alice", 0, 540, 600),
            Visit::new("V1", "bob", 1, 540, 600),
            Visit::new("V2", "bob", 2, 540, 600),
        ];
        let caregivers = vec![weekdays("CG1", 10.0)];
        let config = SolverConfig::new().with_validation(false);

        let result = CareScheduler::new()
            .with_config(config)
            .solve(&visits, &caregivers)
            .unwrap();
        assert_eq!(result.whole_client_assignments.len(), 1);
        assert_eq!(result.whole_client_assignments["alice"], "CG1");
        assert_eq!(result.caregiver_for("V2"), Some("CG1"));
        assert_eq!(result.violations, vec![Violation::unassigned("V1")]);
        assert_eq!(result.schedule_for("CG1").unwrap().visit_count(), 2);
        assert_eq!(
            result.metrics.continuity_by_client.keys().collect::<Vec<_>>(),
            vec!["alice", "bob"]
        );
    }

    #[test]
    fn test_schedules_grouped_by_day() {
        let visits = vec![
            Visit::new("V3", "alice", 1, 540, 600).in_neighborhood("north"),
            Visit::new("V2", "alice", 0, 720, 780).in_neighborhood("north"),
            Visit::new("V1", "alice", 0, 540, 600).in_neighborhood("north"),
        ];
        let caregivers = vec![weekdays("CG1", 10.0), weekdays("CG2", 10.0)];

        let result = CareScheduler::new().solve(&visits, &caregivers).unwrap();
        assert_eq!(result.schedules.len(), 2);
        let cg1 = result.schedule_for("CG1").unwrap();
        let day0: Vec<&str> = cg1.visits_on(0).iter().map(|s| s.visit_id.as_str()).collect();
        assert_eq!(day0, vec!["V1", "V2"]);
        assert_eq!(cg1.visits_on(1).len(), 1);
        assert!(result.schedule_for("CG2").unwrap().is_empty());
        assert!((result.metrics.travel_efficiency - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_solve_request() {
        let request = SolveRequest::new(
            vec![Visit::new("V1", "alice", 0, 540, 600).with_skill("x")],
            vec![weekdays("CG1", 10.0)],
        )
        .with_config(SolverConfig::new().with_diagnostics(false));

        let result = CareScheduler::new().solve_request(&request).unwrap();
        assert_eq!(result.violations, vec![Violation::unassigned("V1")]);
    }

    #[test]
    fn test_empty_input() {
        let result = CareScheduler::new().solve(&[], &[]).unwrap();
        assert_eq!(result.assigned_count(), 0);
        assert!(result.schedules.is_empty());
        assert!((result.metrics.continuity - 1.0).abs() < 1e-10);
        assert!((result.metrics.travel_efficiency - 1.0).abs() < 1e-10);
        assert!((result.metrics.max_possible_continuity - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_deterministic() {
        let visits: Vec<Visit> = (0..12)
            .map(|i| {
                let start = 480 + 45 * (i as i64 % 5);
                Visit::new(format!("V{i}"), format!("c{}", i % 4), i % 3, start, start + 60)
                    .in_neighborhood(if i % 2 == 0 { "north" } else { "south" })
            })
            .collect();
        let caregivers = vec![weekdays("CG1", 4.0), weekdays("CG2", 4.0), weekdays("CG3", 4.0)];

        let scheduler = CareScheduler::new();
        let a = scheduler.solve(&visits, &caregivers).unwrap();
        let b = scheduler.solve(&visits, &caregivers).unwrap();
        assert_eq!(a, b);
    }
}
