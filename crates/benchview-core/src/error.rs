//! Error types and exit codes for benchview
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args, invalid ensemble definition)
//! - 3: Data error (missing data directory, unknown model/test set)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes reported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - missing directory, unknown model (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during benchview operations
#[derive(Error, Debug)]
pub enum BenchError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human, json, or records)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid ensemble: {reason}")]
    InvalidEnsemble { reason: String },

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data errors (exit code 3)
    #[error("data directory not found: {path:?}")]
    DataDirNotFound { path: PathBuf },

    #[error("no benchmark data found under {path:?}")]
    EmptyDataDir { path: PathBuf },

    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    #[error("invalid config in {path:?}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl BenchError {
    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        BenchError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        BenchError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a failed operation with a reason
    pub fn failed(operation: &str, reason: impl std::fmt::Display) -> Self {
        BenchError::FailedOperation {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            BenchError::UnknownFormat(_)
            | BenchError::UsageError(_)
            | BenchError::InvalidEnsemble { .. }
            | BenchError::InvalidValue { .. } => ExitCode::Usage,

            BenchError::DataDirNotFound { .. }
            | BenchError::EmptyDataDir { .. }
            | BenchError::NotFound { .. }
            | BenchError::InvalidConfig { .. } => ExitCode::Data,

            BenchError::Io(_)
            | BenchError::Csv(_)
            | BenchError::Json(_)
            | BenchError::FailedOperation { .. }
            | BenchError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier used in JSON output
    fn error_type(&self) -> &'static str {
        match self {
            BenchError::UnknownFormat(_) => "unknown_format",
            BenchError::UsageError(_) => "usage_error",
            BenchError::InvalidEnsemble { .. } => "invalid_ensemble",
            BenchError::InvalidValue { .. } => "invalid_value",
            BenchError::DataDirNotFound { .. } => "data_dir_not_found",
            BenchError::EmptyDataDir { .. } => "empty_data_dir",
            BenchError::NotFound { .. } => "not_found",
            BenchError::InvalidConfig { .. } => "invalid_config",
            BenchError::Io(_) => "io_error",
            BenchError::Csv(_) => "csv_error",
            BenchError::Json(_) => "json_error",
            BenchError::FailedOperation { .. } => "failed_operation",
            BenchError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for benchview operations
pub type Result<T> = std::result::Result<T, BenchError>;
