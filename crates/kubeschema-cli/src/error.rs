//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use kubeschema_core::CoreError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Input was rejected (no schema documents, missing metadata)
    #[error("Validation failed: {message}")]
    #[diagnostic(code(kubeschema::cli::validation))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Manifests were checked and issues were found
    #[error("Found {issues} issue(s) in {source_name}")]
    #[diagnostic(code(kubeschema::cli::issues))]
    IssuesFound { issues: usize, source_name: String },

    /// Input text could not be parsed
    #[error("Parse error: {message}")]
    #[diagnostic(code(kubeschema::cli::parse))]
    Parse { message: String },

    /// Stored registry could not be read or written
    #[error("Registry error: {message}")]
    #[diagnostic(code(kubeschema::cli::registry))]
    Registry {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Invalid arguments (bad index, blank option)
    #[error("{message}")]
    #[diagnostic(code(kubeschema::cli::usage))]
    Usage { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(kubeschema::cli::io))]
    Io { message: String },

    /// Wrapped error for passthrough (stores the formatted message)
    #[error("{message}")]
    #[diagnostic(code(kubeschema::cli::error))]
    Other { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation { .. } => exit_codes::VALIDATION_ERROR,
            CliError::IssuesFound { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Parse { .. } => exit_codes::ERROR,
            CliError::Registry { .. } => exit_codes::ERROR,
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    /// Create a validation error with help text
    pub fn validation_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create an issues-found error
    pub fn issues_found(issues: usize, source_name: impl Into<String>) -> Self {
        Self::IssuesFound {
            issues,
            source_name: source_name.into(),
        }
    }

    /// Create a registry error with help text
    pub fn registry(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Registry {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create an IO error that names the path involved
    pub fn io_at(path: &std::path::Path, err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{}: {}", path.display(), err),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyInput => CliError::Parse {
                message: "input is empty".to_string(),
            },
            other => CliError::Parse {
                message: other.messages().join("; "),
            },
        }
    }
}

impl From<miette::Report> for CliError {
    fn from(err: miette::Report) -> Self {
        CliError::Other {
            message: format!("{:?}", err),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
