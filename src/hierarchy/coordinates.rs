//! Source-location selection.
//!
//! A project may know up to two checkout points: one in the product's own
//! (internal) repository and one upstream (external). Wherever a single
//! location is needed, the internal one wins.

use crate::core::HierarchyError;
use crate::models::{ProjectDetail, SourceLocation};

/// Return `first` if present, otherwise `second`.
///
/// # Errors
///
/// [`HierarchyError::NoSourceLocation`] when neither is present.
///
/// # Examples
///
/// ```rust
/// use bc_hierarchy::hierarchy::pick;
///
/// assert_eq!(pick(Some(1), Some(2)).unwrap(), 1);
/// assert_eq!(pick(None, Some(2)).unwrap(), 2);
/// assert!(pick::<u8>(None, None).is_err());
/// ```
pub fn pick<T>(first: Option<T>, second: Option<T>) -> Result<T, HierarchyError> {
    first.or(second).ok_or(HierarchyError::NoSourceLocation)
}

/// Source locations of the top-level project of one expansion pass.
///
/// Captured once when a pass starts and passed by reference to everything the
/// pass does. It is read-only for the pass and never shared between passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScmContext {
    /// Location in the product's own repository
    pub internal: Option<SourceLocation>,
    /// Location in the upstream repository
    pub external: Option<SourceLocation>,
}

impl ScmContext {
    /// Create a context from explicit locations.
    pub fn new(internal: Option<SourceLocation>, external: Option<SourceLocation>) -> Self {
        Self { internal, external }
    }

    /// Capture the locations of a top-level project.
    pub fn of(project: &ProjectDetail) -> Self {
        Self::new(project.internal_scm.clone(), project.external_scm.clone())
    }

    /// The location to use, internal preferred.
    pub fn preferred(&self) -> Result<&SourceLocation, HierarchyError> {
        pick(self.internal.as_ref(), self.external.as_ref())
    }
}
