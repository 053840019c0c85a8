//! Domain error model.

use thiserror::Error;

/// Domain-level error.
///
/// Policy *decisions* never produce errors (they collapse to allow/deny).
/// These errors cover construction of policy inputs from raw identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
