//! Error types for netmon.
//!
//! Uses `thiserror` for ergonomic error definitions.
//!
//! Per-probe and per-port failures (timeouts, refusals) are deliberately
//! absent here: the utility that observed them folds them into its
//! aggregate report. Only failures that prevent an operation from starting
//! at all are represented as errors.

use crate::types::PortError;
use thiserror::Error;

/// Top-level error type for diagnostic operations.
#[derive(Error, Debug)]
pub enum DiagError {
    #[error("Failed to resolve '{host}': {reason}")]
    Resolution { host: String, reason: String },

    #[error("Host '{0}' is unreachable")]
    HostUnreachable(String),

    #[error("Invalid port range: {0}")]
    InvalidRange(#[from] PortError),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Operation cancelled by user")]
    Interrupted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DiagError {
    /// Build a resolution error from a host string and an underlying cause.
    pub fn resolution(host: impl Into<String>, reason: impl ToString) -> Self {
        Self::Resolution {
            host: host.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for diagnostic operations.
pub type DiagResult<T> = Result<T, DiagError>;
