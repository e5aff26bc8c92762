//! Error types.
//!
//! The solve itself never fails: constraint failures are reported as
//! [`Violation`](crate::models::Violation)s. Errors only arise at the input
//! boundary, before solving starts.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors returned by [`CareScheduler::solve`](crate::scheduler::CareScheduler::solve).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// The input failed validation.
    #[error("invalid input: {} error(s), first: {}", .0.len(), first_message(.0))]
    InvalidInput(Vec<ValidationError>),
}

/// Result type alias using [`SolveError`].
pub type Result<T> = std::result::Result<T, SolveError>;

impl SolveError {
    /// Validation errors carried by this error.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::InvalidInput(errors) => errors,
        }
    }
}

fn first_message(errors: &[ValidationError]) -> String {
    errors
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| "none".to_string())
}
