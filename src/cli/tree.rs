//! Display a saved dependency hierarchy.
//!
//! # Examples
//!
//! ```bash
//! bc-hierarchy tree --state app.json
//! bc-hierarchy tree --state app.json --depth 1
//! bc-hierarchy tree --state app.json --format json
//! ```
//!
//! # Output Format
//!
//! ```text
//! org.acme:app:1.0 [ANALYSED] bc: 42 internal: https://git.internal/app.git@1.0-prod
//! ├── org.acme:lib:2.0 [ANALYSED] built: 2.0.redhat-3
//! │   └── org.acme:util:3.0 [NOT_ANALYSED]
//! └── org.acme:broken:1.0 [FAILED] errors: NO_DEPENDENCY, SCM_EXCEPTION
//!
//! 4 nodes, 1 failed
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::core::HierarchyError;
use crate::models::{AnalysisStatus, ProjectHierarchy};

/// Command to display a saved hierarchy.
#[derive(Args, Debug)]
pub struct TreeCommand {
    /// Hierarchy state file written by `expand --state`
    #[arg(short, long)]
    state: PathBuf,

    /// Output format (tree, json)
    #[arg(short, long, default_value = "tree")]
    format: String,

    /// Maximum number of dependency levels to display
    #[arg(short, long)]
    depth: Option<usize>,
}

impl TreeCommand {
    /// Execute the tree command.
    pub async fn execute(self) -> Result<()> {
        self.validate_arguments()?;

        let tree = load_tree(&self.state).await?;
        match self.format.as_str() {
            "json" => println!("{}", serde_json::to_string_pretty(&tree)?),
            _ => print!("{}", render_tree(&tree, self.depth)),
        }
        Ok(())
    }

    fn validate_arguments(&self) -> Result<()> {
        validate_format(&self.format)?;

        if let Some(depth) = self.depth
            && depth == 0
        {
            return Err(anyhow::anyhow!("Depth must be at least 1"));
        }

        Ok(())
    }
}

pub(crate) fn validate_format(format: &str) -> Result<()> {
    match format {
        "tree" | "json" => Ok(()),
        _ => Err(anyhow::anyhow!(
            "Invalid format '{format}'. Valid formats are: tree, json"
        )),
    }
}

/// Read a hierarchy saved as JSON.
pub(crate) async fn load_tree(path: &Path) -> Result<ProjectHierarchy> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read hierarchy state from {}", path.display()))?;

    let tree = serde_json::from_str(&content).map_err(|e| HierarchyError::TreeParseError {
        file: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(tree)
}

/// Write a hierarchy as pretty-printed JSON, creating parent directories.
pub(crate) async fn save_tree(path: &Path, tree: &ProjectHierarchy) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(tree)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write hierarchy state to {}", path.display()))?;
    tracing::debug!("Saved {} nodes to {}", tree.count_nodes(), path.display());
    Ok(())
}

/// Render `tree` with box-drawing connectors, followed by a summary line.
///
/// `depth` limits how many dependency levels below the root are shown.
pub(crate) fn render_tree(tree: &ProjectHierarchy, depth: Option<usize>) -> String {
    let mut lines = vec![node_line(tree)];
    render_children(tree, "", depth, 0, &mut lines);

    lines.push(String::new());
    lines.push(
        format!("{} nodes, {} failed", tree.count_nodes(), count_failed(tree))
            .bright_black()
            .to_string(),
    );

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_children(
    node: &ProjectHierarchy,
    prefix: &str,
    max_depth: Option<usize>,
    current_depth: usize,
    lines: &mut Vec<String>,
) {
    if let Some(max_depth) = max_depth
        && current_depth >= max_depth
    {
        return;
    }

    let children = node.dependencies();
    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;
        let connector = if is_last { "└── " } else { "├── " };
        lines.push(format!("{prefix}{connector}{}", node_line(child)));

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };
        render_children(child, &child_prefix, max_depth, current_depth + 1, lines);
    }
}

fn node_line(node: &ProjectHierarchy) -> String {
    let project = &node.project;
    let status = format!("[{}]", node.analysis_status());
    let status = match node.analysis_status() {
        AnalysisStatus::Analysed => status.green(),
        AnalysisStatus::NotAnalysed => status.yellow(),
        AnalysisStatus::Failed => status.red(),
    };

    let mut line = format!("{} {}", project.gav.to_string().cyan(), status);

    if project.bc_exists() {
        let ids: Vec<String> = project.existing_bcs.iter().map(u32::to_string).collect();
        line.push_str(&format!(" bc: {}", ids.join(", ")));
    }
    if let Some(built) = &project.internally_built {
        line.push_str(&format!(" built: {built}"));
    }
    if let Some(internal) = &project.internal_scm {
        line.push_str(&format!(" {}", format!("internal: {internal}").bright_black()));
    }
    if let Some(external) = &project.external_scm {
        line.push_str(&format!(" {}", format!("external: {external}").bright_black()));
    }
    if !project.errors().is_empty() {
        let tags: Vec<String> = project.errors().iter().map(ToString::to_string).collect();
        line.push_str(&format!(" {}", format!("errors: {}", tags.join(", ")).red()));
    }
    line
}

fn count_failed(node: &ProjectHierarchy) -> usize {
    let own = usize::from(node.analysis_status() == AnalysisStatus::Failed);
    own + node.dependencies().iter().map(count_failed).sum::<usize>()
}
