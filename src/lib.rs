//! Home-care visit assignment.
//!
//! Assigns fixed-time visits to caregivers under hard constraints (skills,
//! availability, no double-booking, hours cap) while favoring continuity of
//! care and short travel between neighborhoods.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Visit`, `Caregiver`, `AvailabilityWindow`,
//!   `Violation`, `CaregiverSchedule`
//! - **`assignment`**: Constraint checks, assignment state, whole-client and
//!   per-visit assigners
//! - **`scheduler`**: The two-phase `CareScheduler`, its configuration, and
//!   `ScheduleMetrics`
//! - **`validation`**: Input integrity checks (duplicate IDs, time ranges, hours caps)
//!
//! # Architecture
//!
//! Loading input and rendering results are left to the caller; this crate
//! takes typed records and returns a `SolveResult`. All model and result
//! types are serde-serializable.

pub mod assignment;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{Result, SolveError};
