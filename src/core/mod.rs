//! Core error types for bc-hierarchy.
//!
//! See [`error`] for how node-level failures differ from the crate's own
//! synchronous errors.

pub mod error;

pub use error::{ErrorContext, HierarchyError, user_friendly_error};
