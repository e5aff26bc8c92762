//! Input validation for visit assignment.
//!
//! Checks structural integrity of visits and caregivers before solving.
//! Detects:
//! - Duplicate or empty IDs
//! - Visits that do not start before they end
//! - Caregivers with a negative or non-finite hours cap
//! - Availability windows that do not start before they end
//!
//! Every check runs; all detected issues are returned together.

use crate::models::{Caregiver, Visit};
use std::collections::HashSet;
use thiserror::Error;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind:?}: {message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// An entity has an empty ID.
    EmptyId,
    /// A visit or availability window has start ≥ end.
    InvalidTimeRange,
    /// A caregiver's hours cap is negative, NaN, or infinite.
    InvalidMaxHours,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input of a solve.
///
/// Checks:
/// 1. No duplicate or empty visit IDs
/// 2. No duplicate or empty caregiver IDs
/// 3. Every visit has `start_min < end_min`
/// 4. Every caregiver has a finite, non-negative `max_hours`
/// 5. Every availability window has `start_min < end_min`
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(visits: &[Visit], caregivers: &[Caregiver]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut visit_ids = HashSet::new();
    for v in visits {
        if v.id.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                format!("Visit for client '{}' has an empty ID", v.client_id),
            ));
        } else if !visit_ids.insert(v.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate visit ID: {}", v.id),
            ));
        }

        if v.start_min >= v.end_min {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeRange,
                format!(
                    "Visit '{}' does not start before it ends ({} >= {})",
                    v.id, v.start_min, v.end_min
                ),
            ));
        }
    }

    let mut caregiver_ids = HashSet::new();
    for c in caregivers {
        if c.id.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                "Caregiver has an empty ID",
            ));
        } else if !caregiver_ids.insert(c.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate caregiver ID: {}", c.id),
            ));
        }

        if !c.max_hours.is_finite() || c.max_hours < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidMaxHours,
                format!("Caregiver '{}' has invalid max hours: {}", c.id, c.max_hours),
            ));
        }

        for w in c.availability.iter().filter(|w| !w.is_valid()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeRange,
                format!(
                    "Caregiver '{}' has an empty availability window on day {} ({} >= {})",
                    c.id, w.day, w.start_min, w.end_min
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
