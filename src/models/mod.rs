//! Home-care domain models.
//!
//! Provides the input records (visits, caregivers, availability) and the
//! output records (per-caregiver schedules, violations) of a solve.
//!
//! # Domain Mappings
//!
//! | care-schedule | Generic scheduling |
//! |---------------|--------------------|
//! | Visit | Activity with fixed time |
//! | Client | Task (identifier only) |
//! | Caregiver | Human resource |
//! | AvailabilityWindow | Calendar time window |

mod calendar;
mod caregiver;
mod schedule;
mod visit;

pub use calendar::{format_time, intervals_overlap, AvailabilityWindow, Day, MINUTES_PER_HOUR};
pub use caregiver::Caregiver;
pub use schedule::{CaregiverSchedule, ScheduledVisit, Violation, ViolationKind};
pub use visit::{neighborhood_switches, Visit};
