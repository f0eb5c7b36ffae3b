//! Contracts of the external systems the expansion engine talks to.
//!
//! The engine never knows how a collaborator reaches its backing service; it
//! only sees these traits. Every method returns a boxed future so the traits
//! stay object-safe and can be shared as `Arc<dyn Trait>` across the
//! concurrent sibling enrichments of one expansion pass.
//!
//! | Trait | Backing system |
//! |---|---|
//! | [`DependencyIndex`] | dependency graph service, plus descriptor analysis at a revision |
//! | [`MetadataProvider`] | POM metadata (name, declared SCM coordinates) |
//! | [`SourceControl`] | repository probes |
//! | [`BuildConfigRegistry`] | build-orchestrator configuration lookup |
//! | [`VersionHistory`] | internally built versions |
//!
//! [`Collaborators`] bundles one implementation of each.

pub mod error;

pub use error::{IndexError, ScmError, ServiceError};

use futures::future::BoxFuture;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::models::{Gav, PomInfo, SourceLocation, VersionLookup};

/// Direct-dependency lookup.
pub trait DependencyIndex: Send + Sync {
    /// Direct dependencies of `gav` as recorded by the dependency index.
    fn top_level_dependencies<'a>(
        &'a self,
        gav: &'a Gav,
    ) -> BoxFuture<'a, Result<BTreeSet<Gav>, IndexError>>;

    /// Direct dependencies of `gav` derived from its descriptor at `location`.
    fn top_level_dependencies_at<'a>(
        &'a self,
        location: &'a SourceLocation,
        gav: &'a Gav,
    ) -> BoxFuture<'a, Result<BTreeSet<Gav>, ScmError>>;
}

/// Project descriptor metadata.
pub trait MetadataProvider: Send + Sync {
    /// Metadata of `gav` from the artifact repository, `None` if it has none.
    fn pom_info<'a>(&'a self, gav: &'a Gav)
    -> BoxFuture<'a, Result<Option<PomInfo>, ServiceError>>;

    /// Metadata of `gav` resolved from a checkout of `location`.
    fn pom_info_at<'a>(
        &'a self,
        location: &'a SourceLocation,
        gav: &'a Gav,
    ) -> BoxFuture<'a, Result<Option<PomInfo>, ScmError>>;
}

/// Source-control probes.
pub trait SourceControl: Send + Sync {
    /// Whether the repository at `location` contains the project `gav`.
    fn is_gav_in_repository<'a>(
        &'a self,
        location: &'a SourceLocation,
        gav: &'a Gav,
    ) -> BoxFuture<'a, Result<bool, ScmError>>;
}

/// Build-orchestrator configuration registry.
pub trait BuildConfigRegistry: Send + Sync {
    /// Ids of build configurations registered against `location`.
    fn find_build_configurations<'a>(
        &'a self,
        location: &'a SourceLocation,
    ) -> BoxFuture<'a, Result<Vec<u32>, ServiceError>>;
}

/// Internally built version history.
pub trait VersionHistory: Send + Sync {
    /// Built versions of `gav` and the best already-built match for it.
    fn lookup_built_versions<'a>(
        &'a self,
        gav: &'a Gav,
    ) -> BoxFuture<'a, Result<VersionLookup, ServiceError>>;
}

/// One implementation of every collaborator, shared by an expansion engine.
#[derive(Clone)]
pub struct Collaborators {
    /// Dependency index
    pub index: Arc<dyn DependencyIndex>,
    /// Descriptor metadata
    pub metadata: Arc<dyn MetadataProvider>,
    /// Source control
    pub scm: Arc<dyn SourceControl>,
    /// Build configuration registry
    pub registry: Arc<dyn BuildConfigRegistry>,
    /// Version history
    pub versions: Arc<dyn VersionHistory>,
}

impl Collaborators {
    /// Bundle separate implementations.
    pub fn new(
        index: Arc<dyn DependencyIndex>,
        metadata: Arc<dyn MetadataProvider>,
        scm: Arc<dyn SourceControl>,
        registry: Arc<dyn BuildConfigRegistry>,
        versions: Arc<dyn VersionHistory>,
    ) -> Self {
        Self {
            index,
            metadata,
            scm,
            registry,
            versions,
        }
    }

    /// Use a single value that implements every collaborator trait.
    pub fn from_shared<T>(shared: Arc<T>) -> Self
    where
        T: DependencyIndex
            + MetadataProvider
            + SourceControl
            + BuildConfigRegistry
            + VersionHistory
            + 'static,
    {
        Self {
            index: shared.clone(),
            metadata: shared.clone(),
            scm: shared.clone(),
            registry: shared.clone(),
            versions: shared,
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
