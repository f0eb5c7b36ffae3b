//! Create or continue a dependency hierarchy.
//!
//! Without `--state`, or when the state file does not exist yet, a new
//! top-level node is built from `--gav` and the source-location flags. With an
//! existing state file the saved hierarchy is loaded and expanded further.
//!
//! Before each of the `--levels` passes, nodes are selected: every node by
//! default, or only the coordinates given with `--select`. Selection is
//! sticky, so nodes selected by an earlier run stay selected.
//!
//! # Examples
//!
//! ```bash
//! # New hierarchy, two levels deep
//! bc-hierarchy expand --catalog world.toml --gav org.acme:app:1.0 \
//!     --scm-url https://git.internal/app.git --scm-revision 1.0-prod --levels 2
//!
//! # Direct dependencies already known
//! bc-hierarchy expand --catalog world.toml --gav org.acme:app:1.0 \
//!     --scm-url https://git.internal/app.git --scm-revision 1.0-prod \
//!     --deps org.acme:lib:2.0,org.acme:util:3.0 --levels 0
//! ```

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::collaborators::Collaborators;
use crate::config::Config;
use crate::hierarchy::{HierarchyCreator, ScmContext};
use crate::models::{AnalysisStatus, Gav, ProjectHierarchy, SourceLocation};

use super::tree::{load_tree, render_tree, save_tree, validate_format};

/// Command to create or continue a hierarchy.
#[derive(Args, Debug)]
pub struct ExpandCommand {
    /// Offline catalog answering every external lookup
    #[arg(long)]
    catalog: PathBuf,

    /// Top-level coordinate (group:artifact:version)
    ///
    /// Required unless an existing `--state` file is continued.
    #[arg(short, long)]
    gav: Option<Gav>,

    /// Internal repository URL of the top-level project
    #[arg(long, requires = "scm_revision")]
    scm_url: Option<String>,

    /// Internal repository revision of the top-level project
    #[arg(long, requires = "scm_url")]
    scm_revision: Option<String>,

    /// Upstream repository URL of the top-level project
    #[arg(long, requires = "external_revision")]
    external_url: Option<String>,

    /// Upstream repository revision of the top-level project
    #[arg(long, requires = "external_url")]
    external_revision: Option<String>,

    /// Known direct dependencies of the top-level project
    ///
    /// Skips the dependency lookup for the top-level node.
    #[arg(long, value_delimiter = ',')]
    deps: Vec<Gav>,

    /// Number of expansion passes to run
    #[arg(short, long, default_value_t = 1)]
    levels: usize,

    /// Only select these coordinates for expansion (repeatable)
    #[arg(short, long)]
    select: Vec<Gav>,

    /// Hierarchy state file to continue from and save to
    #[arg(long)]
    state: Option<PathBuf>,

    /// Output format (tree, json)
    #[arg(short, long, default_value = "tree")]
    format: String,
}

impl ExpandCommand {
    /// Execute the expand command with a loaded configuration.
    pub async fn execute(self, config: Config) -> Result<()> {
        validate_format(&self.format)?;

        let catalog = Catalog::load(&self.catalog).await?;
        let creator =
            HierarchyCreator::new(Collaborators::from_shared(Arc::new(catalog)), config.expansion);

        let tree = self.run(&creator).await?;

        if let Some(state) = &self.state {
            save_tree(state, &tree).await?;
        }

        match self.format.as_str() {
            "json" => println!("{}", serde_json::to_string_pretty(&tree)?),
            _ => print!("{}", render_tree(&tree, None)),
        }
        Ok(())
    }

    /// Build or load the hierarchy and run the requested passes.
    pub(crate) async fn run(&self, creator: &HierarchyCreator) -> Result<ProjectHierarchy> {
        let mut tree = self.top_level(creator).await?;

        if !self.deps.is_empty() {
            self.seed_dependencies(creator, &mut tree).await;
        }

        for level in 1..=self.levels {
            let newly_selected = if self.select.is_empty() {
                tree.select_where(|_| true)
            } else {
                tree.select_where(|node| self.select.contains(node.gav()))
            };
            tracing::debug!("Pass {level}: {newly_selected} newly selected nodes");

            let before = tree.count_nodes();
            creator.expand_next_level(&mut tree).await;
            tracing::info!("Pass {level}: {} new nodes", tree.count_nodes() - before);
        }

        Ok(tree)
    }

    async fn top_level(&self, creator: &HierarchyCreator) -> Result<ProjectHierarchy> {
        if let Some(state) = &self.state
            && state.exists()
        {
            let tree = load_tree(state).await?;
            if let Some(gav) = &self.gav
                && gav != tree.gav()
            {
                return Err(anyhow::anyhow!(
                    "State file {} holds the hierarchy of {}, not {}",
                    state.display(),
                    tree.gav(),
                    gav
                ));
            }
            tracing::info!("Continuing hierarchy of {} from {}", tree.gav(), state.display());
            return Ok(tree);
        }

        let gav = self
            .gav
            .clone()
            .context("--gav is required when starting a new hierarchy")?;
        let ctx = ScmContext::new(
            location(&self.scm_url, &self.scm_revision),
            location(&self.external_url, &self.external_revision),
        );
        Ok(creator.create_top_level(gav, &ctx).await)
    }

    async fn seed_dependencies(&self, creator: &HierarchyCreator, tree: &mut ProjectHierarchy) {
        if tree.analysis_status() != AnalysisStatus::NotAnalysed {
            tracing::warn!(
                "Ignoring --deps: {} is already {}",
                tree.gav(),
                tree.analysis_status()
            );
            return;
        }

        let children = creator.process_dependencies(tree, self.deps.iter().cloned()).await;
        tree.mark_analysed(children);
    }
}

fn location(url: &Option<String>, revision: &Option<String>) -> Option<SourceLocation> {
    match (url, revision) {
        (Some(url), Some(revision)) => Some(SourceLocation::new(url, revision)),
        _ => None,
    }
}
