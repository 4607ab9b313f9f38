//! Custom error types for exportbench.
//!
//! Errors are explicit enums. Only configuration problems and an unreadable
//! documents directory are fatal; everything that can go wrong during a
//! single tool invocation is recorded on the measurement instead.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code for configuration errors.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code when the documents directory cannot be resolved or read.
pub const EXIT_DOCUMENTS: u8 = 3;
/// Exit code for every other fatal error.
pub const EXIT_INTERNAL: u8 = 1;

/// Top-level error type for exportbench.
#[derive(Debug, Error)]
pub enum BenchError {
    // =========================================================================
    // Configuration Errors - Fail-Fast on Invalid Config
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    ConfigValidation(#[from] ConfigValidationError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    // =========================================================================
    // Document Discovery Errors
    // =========================================================================
    #[error("Cannot read documents directory {path}: {source}")]
    DocumentsDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Command Construction Errors
    // =========================================================================
    #[error("Cannot build command line: {0}")]
    CommandLine(#[from] CommandLineError),

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl BenchError {
    /// Process exit code for this error class.
    pub fn exit_code(&self) -> u8 {
        match self {
            BenchError::ConfigValidation(_)
            | BenchError::ConfigNotFound { .. }
            | BenchError::ConfigParse { .. } => EXIT_CONFIG,
            BenchError::DocumentsDir { .. } => EXIT_DOCUMENTS,
            BenchError::CommandLine(_) | BenchError::Io { .. } => EXIT_INTERNAL,
        }
    }
}

/// Configuration values rejected at load time.
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("Missing required field: {field} in {context}")]
    MissingRequiredField {
        field: &'static str,
        context: String,
    },

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Baseline and candidate modes share the label '{label}'")]
    DuplicateModeLabel { label: String },
}

/// Failures while assembling a shell command line.
#[derive(Debug, Error)]
pub enum CommandLineError {
    #[error("{field} cannot be quoted for the shell: {value:?}")]
    Unquotable { field: &'static str, value: String },
}

/// Result type alias using BenchError.
pub type BenchResult<T> = Result<T, BenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ConfigValidationError::MissingRequiredField {
            field: "label",
            context: "baseline mode".to_string(),
        };
        assert!(err.to_string().contains("label"));
        assert!(err.to_string().contains("baseline mode"));
    }

    #[test]
    fn test_error_chain() {
        let validation_err = ConfigValidationError::DuplicateModeLabel {
            label: "list".to_string(),
        };
        let bench_err: BenchError = validation_err.into();
        assert!(matches!(bench_err, BenchError::ConfigValidation(_)));
        assert_eq!(bench_err.exit_code(), EXIT_CONFIG);
    }

    #[test]
    fn test_exit_codes_are_distinct_per_class() {
        let docs = BenchError::DocumentsDir {
            path: PathBuf::from("docs"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let parse = BenchError::ConfigParse {
            message: "bad yaml".to_string(),
        };
        let io = BenchError::Io {
            context: "writing",
            source: std::io::Error::from(std::io::ErrorKind::Other),
        };

        assert_eq!(docs.exit_code(), EXIT_DOCUMENTS);
        assert_eq!(parse.exit_code(), EXIT_CONFIG);
        assert_eq!(io.exit_code(), EXIT_INTERNAL);
        assert!(docs.to_string().contains("docs"));
    }
}
