//! Solver configuration.

use serde::{Deserialize, Serialize};

/// Options controlling a solve.
///
/// Deserializes from partial documents; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Reject malformed input before solving (default: true).
    pub validate_input: bool,
    /// Try whole-client assignment before per-visit fallback (default: true).
    pub whole_client_pass: bool,
    /// Record a per-caregiver diagnostic next to each unassigned visit (default: true).
    pub record_diagnostics: bool,
    /// Largest number of coverable visits per client for which the
    /// continuity ceiling uses an exact chain cover (default: 12).
    /// Larger clients use first-fit.
    pub exact_chain_cover_limit: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            validate_input: true,
            whole_client_pass: true,
            record_diagnostics: true,
            exact_chain_cover_limit: 12,
        }
    }
}

impl SolverConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables input validation.
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_input = enabled;
        self
    }

    /// Enables or disables the whole-client pass.
    pub fn with_whole_client_pass(mut self, enabled: bool) -> Self {
        self.whole_client_pass = enabled;
        self
    }

    /// Enables or disables per-caregiver diagnostics.
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.record_diagnostics = enabled;
        self
    }

    /// Sets the exact chain-cover limit.
    pub fn with_exact_chain_cover_limit(mut self, limit: usize) -> Self {
        self.exact_chain_cover_limit = limit;
        self
    }
}
