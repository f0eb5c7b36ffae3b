//! Direct-dependency lookup for one hierarchy node.
//!
//! The dependency index is asked first. Only when it answers "not found" is the
//! project descriptor analysed from a checkout of the top-level source
//! location. Whatever happens, the outcome is written onto the node: children
//! plus `ANALYSED`, or error tags plus `FAILED`.

use std::collections::BTreeSet;

use crate::collaborators::{Collaborators, IndexError, ScmError};
use crate::models::{BcError, Gav, ProjectHierarchy};

use super::coordinates::ScmContext;
use super::enricher::NodeEnricher;

/// Why the direct dependencies of a node could not be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailure {
    /// The dependency index could not be reached; no fallback was attempted
    IndexUnavailable,
    /// Checkout of the fallback location failed
    Scm,
    /// The descriptor at the fallback location could not be analysed
    Pom,
    /// No fallback location was known
    NoScmUrl,
}

impl FetchFailure {
    /// Error tags recorded on the node for this failure.
    pub fn tags(self) -> Vec<BcError> {
        match self {
            Self::IndexUnavailable => vec![BcError::NoDependency],
            Self::Scm => vec![BcError::ScmException, BcError::NoDependency],
            Self::Pom => vec![BcError::PomException, BcError::NoDependency],
            Self::NoScmUrl => vec![BcError::NoScmUrl, BcError::NoDependency],
        }
    }
}

/// Resolves and enriches the direct dependencies of hierarchy nodes.
#[derive(Debug, Clone)]
pub struct DependencyFetcher {
    collaborators: Collaborators,
    enricher: NodeEnricher,
}

impl DependencyFetcher {
    /// Create a fetcher that enriches children with `enricher`.
    pub fn new(collaborators: Collaborators, enricher: NodeEnricher) -> Self {
        Self {
            collaborators,
            enricher,
        }
    }

    /// Resolve the children of `node` and set its status.
    ///
    /// Never fails: a failure leaves `node` `FAILED` with no children and the
    /// matching error tags. Siblings are unaffected.
    pub async fn fetch(&self, node: &mut ProjectHierarchy, ctx: &ScmContext) {
        let gav = node.gav().clone();
        match self.direct_dependencies(&gav, ctx).await {
            Ok(dependencies) => {
                tracing::debug!("{} has {} direct dependencies", gav, dependencies.len());
                let children = self.enricher.enrich_all(dependencies, ctx).await;
                node.mark_analysed(children);
            }
            Err(failure) => node.mark_failed(failure.tags()),
        }
    }

    /// Direct dependency coordinates of `gav`.
    pub async fn direct_dependencies(
        &self,
        gav: &Gav,
        ctx: &ScmContext,
    ) -> Result<BTreeSet<Gav>, FetchFailure> {
        match self.collaborators.index.top_level_dependencies(gav).await {
            Ok(dependencies) => Ok(dependencies),
            Err(IndexError::NotFound { .. }) => {
                tracing::debug!("{} not in dependency index, analysing SCM instead", gav);
                self.dependencies_from_scm(gav, ctx).await
            }
            Err(err @ IndexError::Communication { .. }) => {
                tracing::warn!("Failed to get dependencies for {}: {}", gav, err);
                Err(FetchFailure::IndexUnavailable)
            }
        }
    }

    async fn dependencies_from_scm(
        &self,
        gav: &Gav,
        ctx: &ScmContext,
    ) -> Result<BTreeSet<Gav>, FetchFailure> {
        let location = ctx.preferred().map_err(|err| {
            tracing::error!("No SCM url available for {}: {}", gav, err);
            FetchFailure::NoScmUrl
        })?;

        match self.collaborators.index.top_level_dependencies_at(location, gav).await {
            Ok(dependencies) => Ok(dependencies),
            Err(err @ ScmError::Scm { .. }) => {
                tracing::error!("Failed while getting SCM repo for {}: {}", gav, err);
                Err(FetchFailure::Scm)
            }
            Err(err @ ScmError::Analysis { .. }) => {
                tracing::error!("Failed to analyse pom of {}: {}", gav, err);
                Err(FetchFailure::Pom)
            }
        }
    }
}
