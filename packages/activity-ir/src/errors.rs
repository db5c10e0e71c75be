//! Error types for activity-ir
//!
//! Provides unified error handling across the crate.
//!
//! Unresolvable input (unknown callee, pointer-indirect reference) is never an
//! error: the builder drops it. Errors are reserved for broken invariants and
//! configured limits, and they abort the whole analysis.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for activity-ir operations
#[derive(Debug, Error)]
pub enum ActivityError {
    /// Internal invariant violated (builder bug, not bad input)
    #[error("Invariant violated: {0}")]
    Invariant(String),

    /// Configured resource limit exceeded
    #[error("Resource limit exceeded: {what} ({value} > {limit})")]
    ResourceLimit {
        what: &'static str,
        value: usize,
        limit: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ActivityError {
    /// Create an invariant violation
    pub fn invariant(msg: impl Into<String>) -> Self {
        ActivityError::Invariant(msg.into())
    }
}

/// Result type alias for activity operations
pub type Result<T> = std::result::Result<T, ActivityError>;
