//! Error types for fixture analysis.
//!
//! The analysis core itself has no fatal path: a run always completes and
//! the worst outcome is a partial graph with diagnostics. Errors surface
//! only from configuration validation, before a run starts.

use thiserror::Error;

/// Errors that can occur while validating analysis configuration.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The scope rank table has no entries.
    #[error("scope rank table is empty")]
    EmptyScopeTable,

    /// The scope rank table lists the same scope name twice.
    #[error("duplicate scope name '{name}' in scope rank table")]
    DuplicateScope { name: String },

    /// A violation kind name did not match any known kind.
    #[error("unknown violation kind: '{name}'")]
    UnknownViolationKind { name: String },
}

/// Result type for analysis configuration operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
