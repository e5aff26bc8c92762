//! Greedy visit scheduler and schedule metrics.
//!
//! # Algorithm
//!
//! `CareScheduler` runs two greedy passes: whole-client assignment (one
//! caregiver per client where possible) followed by per-visit fallback
//! assignment with continuity, travel and load tie-breaks. It is not an
//! optimizer, but it is deterministic: the processing order is fixed.
//!
//! # Metrics
//!
//! `ScheduleMetrics` reports continuity of care, travel efficiency, and the
//! continuity ceiling the input allows.

mod config;
pub mod metrics;
mod solver;

pub use config::SolverConfig;
pub use metrics::ScheduleMetrics;
pub use solver::{CareScheduler, SolvePhase, SolveRequest, SolveResult};
