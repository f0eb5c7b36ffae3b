//! Error handling for bc-hierarchy
//!
//! Two kinds of failure exist in this crate and they are handled very
//! differently:
//!
//! - **Node-level failures** (an index lookup failed, a checkout failed, a
//!   descriptor could not be parsed) never surface as errors. They are absorbed
//!   by the expansion engine and recorded on the affected node as
//!   [`BcError`](crate::models::BcError) tags plus a `FAILED` status.
//! - **Synchronous failures** of the crate's own operations (no source location
//!   to pick, a malformed coordinate, an unreadable configuration or catalog)
//!   are reported through [`HierarchyError`].
//!
//! Application code (the CLI, configuration and catalog loading) works with
//! [`anyhow::Error`] and converts it for display with [`user_friendly_error`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use bc_hierarchy::core::{HierarchyError, user_friendly_error};
//!
//! let error = anyhow::Error::from(HierarchyError::NoSourceLocation);
//! let ctx = user_friendly_error(error);
//! ctx.display(); // colored error with a suggestion on stderr
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for bc-hierarchy operations.
#[derive(Error, Debug, Clone)]
pub enum HierarchyError {
    /// Neither the internal nor the external source location is known
    ///
    /// Raised by the coordinate resolver when both candidates are absent.
    #[error("Neither internal nor external source location is available")]
    NoSourceLocation,

    /// A coordinate string is not in `group:artifact:version` form
    #[error("Invalid GAV '{input}': expected 'group:artifact:version'")]
    InvalidGav {
        /// The rejected input
        input: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Catalog file could not be parsed
    #[error("Invalid catalog file {file}")]
    CatalogParseError {
        /// Path to the catalog file
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// Saved hierarchy state could not be parsed
    #[error("Invalid hierarchy state file {file}")]
    TreeParseError {
        /// Path to the state file
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// File system error
    #[error("File system error during {operation}: {path}")]
    FileSystemError {
        /// The operation that failed (e.g. "read", "write")
        operation: String,
        /// The path involved
        path: String,
    },

    /// Any other error
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Error wrapper carrying user-facing details and a suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: HierarchyError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: HierarchyError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: error in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] suitable for CLI display.
///
/// Known [`HierarchyError`]s anywhere in the chain get a tailored suggestion;
/// other errors are wrapped with the full `anyhow` chain as details.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(err) = cause.downcast_ref::<HierarchyError>() {
            let ctx = create_error_context(err.clone());
            if ctx.details.is_none() && cause.to_string() != error.to_string() {
                return ctx.with_details(error.to_string());
            }
            return ctx;
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>()
        && io_error.kind() == std::io::ErrorKind::NotFound
    {
        return ErrorContext::new(HierarchyError::FileSystemError {
            operation: "file access".to_string(),
            path: "unknown".to_string(),
        })
        .with_details(format!("{error:#}"))
        .with_suggestion("Check that the file exists and the path is correct");
    }

    ErrorContext::new(HierarchyError::Other {
        message: error.to_string(),
    })
    .with_details(format!("{error:#}"))
}

fn create_error_context(error: HierarchyError) -> ErrorContext {
    let (suggestion, details) = match &error {
        HierarchyError::NoSourceLocation => (
            Some(
                "Pass --scm-url/--scm-revision or --external-url/--external-revision for the top-level project",
            ),
            None,
        ),
        HierarchyError::InvalidGav { .. } => (
            Some("Write coordinates as group:artifact:version, e.g. org.acme:app:1.0"),
            None,
        ),
        HierarchyError::CatalogParseError { reason, .. }
        | HierarchyError::TreeParseError { reason, .. } => (
            Some("Check the file syntax against the documented format"),
            Some(reason.clone()),
        ),
        HierarchyError::ConfigError { .. } => (
            Some(
                "Check ~/.bc-hierarchy/config.toml or the file given with --config / BCH_CONFIG_PATH",
            ),
            None,
        ),
        HierarchyError::FileSystemError { .. } => {
            (Some("Check that the path exists and is readable"), None)
        }
        HierarchyError::Other { .. } => (None, None),
    };

    let mut ctx = ErrorContext::new(error);
    if let Some(suggestion) = suggestion {
        ctx = ctx.with_suggestion(suggestion);
    }
    if let Some(details) = details {
        ctx = ctx.with_details(details);
    }
    ctx
}
