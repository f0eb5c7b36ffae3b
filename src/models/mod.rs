//! Shared data models for hierarchy expansion
//!
//! This module provides the value types every other part of the crate speaks in:
//! artifact coordinates ([`Gav`]), source-control checkout points
//! ([`SourceLocation`]), metadata read from a project descriptor ([`PomInfo`]),
//! and the mutable tree itself ([`ProjectHierarchy`] / [`ProjectDetail`]).
//!
//! All types serialize with serde using camelCase field names so a partially
//! expanded tree can be persisted between expansion passes.

mod hierarchy;

pub use hierarchy::{AnalysisStatus, BcError, ProjectDetail, ProjectHierarchy};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::HierarchyError;

/// Group/artifact/version coordinate identifying a single build artifact.
///
/// Equality and hashing use all three fields, so two versions of the same
/// artifact are distinct nodes.
///
/// # Examples
///
/// ```rust
/// use bc_hierarchy::models::Gav;
///
/// let gav: Gav = "org.acme:widget:1.2.0".parse().unwrap();
/// assert_eq!(gav.artifact_id, "widget");
/// assert_eq!(gav.to_string(), "org.acme:widget:1.2.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gav {
    /// Maven group id
    pub group_id: String,
    /// Maven artifact id
    pub artifact_id: String,
    /// Artifact version
    pub version: String,
}

impl Gav {
    /// Create a new coordinate.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Gav {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

impl FromStr for Gav {
    type Err = HierarchyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        match parts.as_slice() {
            [group, artifact, version]
                if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(*group, *artifact, *version))
            }
            _ => Err(HierarchyError::InvalidGav {
                input: s.to_string(),
            }),
        }
    }
}

/// A (repository URL, revision) pair pinning a source-control checkout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    /// Repository URL
    pub url: String,
    /// Tag, branch or commit within the repository
    pub revision: String,
}

impl SourceLocation {
    /// Create a new source location.
    pub fn new(url: impl Into<String>, revision: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            revision: revision.into(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.url, self.revision)
    }
}

/// Project-level information read from a project descriptor (POM).
///
/// Every field is optional: descriptors frequently omit the project name or
/// the `<scm>` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomInfo {
    /// Human-readable project name
    pub name: Option<String>,
    /// Source-control URL declared by the descriptor
    pub scm_url: Option<String>,
    /// Source-control revision (tag) declared by the descriptor
    pub scm_revision: Option<String>,
}

impl PomInfo {
    /// The declared source location, only when both URL and revision are present.
    pub fn source_location(&self) -> Option<SourceLocation> {
        match (&self.scm_url, &self.scm_revision) {
            (Some(url), Some(revision)) => Some(SourceLocation::new(url, revision)),
            _ => None,
        }
    }
}

/// Result of a built-version lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionLookup {
    /// All versions of the artifact known to have been built internally
    pub available_versions: Vec<String>,
    /// Best already-built match for the requested version
    pub best_match: Option<String>,
}
