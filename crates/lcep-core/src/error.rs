//! Unified error type for the planner.
//!
//! [`LcepError`] covers the narrow failure surface of the planning core
//! (invalid settlement records, invalid configuration, the selector's
//! consistency check) plus the I/O and parse failures of the crates around it.
//!
//! # Example
//!
//! ```ignore
//! use lcep_core::{LcepError, LcepResult};
//!
//! fn run(config: &PlanningConfig) -> LcepResult<()> {
//!     config.validate()?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all planning operations.
#[derive(Error, Debug)]
pub enum LcepError {
    /// A settlement record violates the input invariants (negative counts,
    /// negative or non-finite distances). Scoped to that settlement.
    #[error("Invalid input for settlement '{settlement_id}': {reason}")]
    InvalidInput {
        settlement_id: String,
        reason: String,
    },

    /// Missing or inconsistent configuration tables. Fatal to a run.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No technology passed its eligibility gate. Grid and mini-grid have no
    /// gate, so this signals an internal inconsistency.
    #[error("No eligible technology for settlement '{settlement_id}'")]
    NoEligibleTechnology { settlement_id: String },

    /// I/O errors (file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

impl LcepError {
    /// Build an [`LcepError::InvalidInput`] for one settlement.
    pub fn invalid_input(settlement_id: impl Into<String>, reason: impl Into<String>) -> Self {
        LcepError::InvalidInput {
            settlement_id: settlement_id.into(),
            reason: reason.into(),
        }
    }

    /// True for errors that invalidate the whole run rather than one settlement.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, LcepError::InvalidInput { .. })
    }
}

/// Convenience type alias for Results using LcepError.
pub type LcepResult<T> = Result<T, LcepError>;

impl From<anyhow::Error> for LcepError {
    fn from(err: anyhow::Error) -> Self {
        LcepError::Other(err.to_string())
    }
}

impl From<String> for LcepError {
    fn from(s: String) -> Self {
        LcepError::Other(s)
    }
}

impl From<&str> for LcepError {
    fn from(s: &str) -> Self {
        LcepError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for LcepError {
    fn from(err: serde_json::Error) -> Self {
        LcepError::Parse(err.to_string())
    }
}
