//! Caller-paced traversal of a partially expanded hierarchy.
//!
//! One pass expands exactly one more level: every node that is selected, not
//! yet analysed and has no children gets its direct dependencies fetched. The
//! new children are left for the next pass.
//!
//! Per node:
//!
//! | status | selected | children | action |
//! |---|---|---|---|
//! | `ANALYSED` | any | any | recurse into children |
//! | any | no | any | recurse into children |
//! | `NOT_ANALYSED` | yes | none | fetch dependencies, stop |
//! | `NOT_ANALYSED` | yes | some | stop |
//! | `FAILED` | yes | none | stop |
//!
//! Unselected nodes are still descended into because a selected node may sit
//! below them.

use futures::future::{BoxFuture, FutureExt};

use crate::models::{AnalysisStatus, ProjectHierarchy};

use super::coordinates::ScmContext;
use super::fetcher::DependencyFetcher;

/// Recursive expansion of selected, unexpanded nodes.
#[derive(Debug, Clone)]
pub struct HierarchyWalker {
    fetcher: DependencyFetcher,
}

impl HierarchyWalker {
    /// Create a walker expanding nodes with `fetcher`.
    pub fn new(fetcher: DependencyFetcher) -> Self {
        Self { fetcher }
    }

    /// Run one pass starting at `node`.
    pub fn walk<'a>(
        &'a self,
        node: &'a mut ProjectHierarchy,
        ctx: &'a ScmContext,
    ) -> BoxFuture<'a, ()> {
        async move {
            let status = node.analysis_status();
            if status == AnalysisStatus::Analysed || !node.selected {
                for dependency in node.dependencies_mut() {
                    self.walk(dependency, ctx).await;
                }
            } else if status == AnalysisStatus::NotAnalysed && node.dependencies().is_empty() {
                tracing::debug!("Expanding {}", node.gav());
                self.fetcher.fetch(node, ctx).await;
            }
        }
        .boxed()
    }
}
