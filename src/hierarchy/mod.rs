//! Lazy, caller-paced expansion of dependency hierarchies.
//!
//! A hierarchy starts as a single top-level node. The caller marks nodes as
//! selected and calls [`HierarchyCreator::expand_next_level`]; each call
//! resolves the direct dependencies of every selected node that has not been
//! analysed yet, enriches them with build metadata and leaves them for the
//! next call.
//!
//! # Components
//!
//! - [`coordinates`] - choosing between internal and external source locations
//! - [`enricher`] - building one populated node from a coordinate
//! - [`fetcher`] - direct-dependency lookup with the source-control fallback
//! - [`walker`] - the recursive pass deciding which nodes to expand
//!
//! # Failure model
//!
//! Nothing in a pass returns an error. A node whose dependencies cannot be
//! determined ends `FAILED` with error tags; missing metadata simply leaves
//! fields empty. Callers inspect status and tags.
//!
//! # Concurrency
//!
//! Sibling nodes are enriched concurrently, bounded by
//! [`ExpansionConfig::max_parallel`]. The top-level source locations are
//! captured per call in a [`ScmContext`] and threaded through the pass, so one
//! [`HierarchyCreator`] can serve passes over unrelated trees at the same time.
//!
//! Identical coordinates reached through different parents are enriched
//! independently; no cache is shared between occurrences.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bc_hierarchy::collaborators::Collaborators;
//! use bc_hierarchy::config::ExpansionConfig;
//! use bc_hierarchy::hierarchy::{HierarchyCreator, ScmContext};
//! use bc_hierarchy::models::{Gav, SourceLocation};
//!
//! # async fn example(collaborators: Collaborators) {
//! let creator = HierarchyCreator::new(collaborators, ExpansionConfig::default());
//! let ctx = ScmContext::new(
//!     Some(SourceLocation::new("https://git.example.com/product.git", "1.0-prod")),
//!     None,
//! );
//! let mut top = creator.create_top_level("org.acme:product:1.0".parse().unwrap(), &ctx).await;
//!
//! creator.expand_next_level(&mut top).await; // direct dependencies
//! top.select_where(|_| true);
//! creator.expand_next_level(&mut top).await; // one level deeper
//! # }
//! ```

pub mod coordinates;
pub mod enricher;
pub mod fetcher;
pub mod walker;

pub use coordinates::{ScmContext, pick};
pub use enricher::NodeEnricher;
pub use fetcher::{DependencyFetcher, FetchFailure};
pub use walker::HierarchyWalker;

use crate::collaborators::Collaborators;
use crate::config::ExpansionConfig;
use crate::models::{Gav, ProjectHierarchy};

/// Entry points for expanding hierarchies.
#[derive(Debug, Clone)]
pub struct HierarchyCreator {
    enricher: NodeEnricher,
    walker: HierarchyWalker,
}

impl HierarchyCreator {
    /// Wire the expansion components to `collaborators`.
    pub fn new(collaborators: Collaborators, config: ExpansionConfig) -> Self {
        let enricher = NodeEnricher::new(collaborators.clone(), config);
        let fetcher = DependencyFetcher::new(collaborators, enricher.clone());
        Self {
            enricher,
            walker: HierarchyWalker::new(fetcher),
        }
    }

    /// Build the selected root node of a new hierarchy from caller-supplied
    /// source locations.
    pub async fn create_top_level(&self, gav: Gav, ctx: &ScmContext) -> ProjectHierarchy {
        self.enricher.enrich_top_level(gav, ctx).await
    }

    /// Expand one more level of selected, unexpanded nodes below `top`.
    pub async fn expand_next_level(&self, top: &mut ProjectHierarchy) {
        let ctx = ScmContext::of(&top.project);
        tracing::info!("Expanding next level of {}", top.gav());
        self.walker.walk(top, &ctx).await;
    }

    /// Enrich an explicit list of coordinates as children of `top`.
    ///
    /// Used when the dependency list is already known, skipping the lookup.
    /// The returned nodes are not attached to `top`.
    pub async fn process_dependencies<I>(
        &self,
        top: &ProjectHierarchy,
        dependencies: I,
    ) -> Vec<ProjectHierarchy>
    where
        I: IntoIterator<Item = Gav>,
    {
        let ctx = ScmContext::of(&top.project);
        self.enricher.enrich_all(dependencies, &ctx).await
    }
}
