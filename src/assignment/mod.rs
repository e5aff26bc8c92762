//! Constraint checks and greedy assigners.
//!
//! Provides the building blocks the scheduler drives during a solve:
//!
//! - [`checker`]: pure eligibility predicates (skills, availability,
//!   no-overlap, hours cap).
//! - [`AssignmentState`]: the add-only visit → caregiver mapping and
//!   per-caregiver aggregates, owned by one solve.
//! - [`whole_client`]: give all of one client's visits to one caregiver.
//! - [`per_visit`]: fallback assignment of a single visit.
//!
//! Every ranking is a lexicographic key ending in the caregiver ID, so
//! results depend only on the input and the processing order.

pub mod checker;
pub mod per_visit;
mod state;
pub mod whole_client;

pub use per_visit::{assign_visit, VisitRank};
pub use state::{AssignmentState, CaregiverLoad};
pub use whole_client::{assign_whole_client, WholeClientRank};
