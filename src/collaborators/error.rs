//! Fault kinds reported by collaborators.
//!
//! Each collaborator operation returns one of these closed sets, which lets the
//! expansion engine pick its fallback with a plain `match`.

use thiserror::Error;

use crate::models::{Gav, SourceLocation};

/// Faults of a dependency-index lookup by coordinate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// The index has no record of the coordinate
    ///
    /// This is an expected negative answer and triggers the source-control fallback.
    #[error("{gav} was not found in the dependency index")]
    NotFound {
        /// The coordinate that was looked up
        gav: Gav,
    },

    /// The index could not be reached or answered with an error
    #[error("Dependency index communication failed: {message}")]
    Communication {
        /// Description of the failure
        message: String,
    },
}

/// Faults of operations that check out a source location.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScmError {
    /// Checkout of, or access to, the repository failed
    #[error("Source-control operation on {location} failed: {message}")]
    Scm {
        /// The location that was accessed
        location: SourceLocation,
        /// Description of the failure
        message: String,
    },

    /// The project descriptor at the checked-out revision could not be analysed
    #[error("Failed to analyse project descriptor for {gav}: {message}")]
    Analysis {
        /// The coordinate whose descriptor was analysed
        gav: Gav,
        /// Description of the failure
        message: String,
    },
}

/// Faults of request/response services (metadata, build registry, version history).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The service could not be reached
    #[error("{service} communication failed: {message}")]
    Communication {
        /// Name of the service
        service: String,
        /// Description of the failure
        message: String,
    },
}

impl ServiceError {
    /// Shorthand for a [`ServiceError::Communication`].
    pub fn communication(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Communication {
            service: service.into(),
            message: message.into(),
        }
    }
}
