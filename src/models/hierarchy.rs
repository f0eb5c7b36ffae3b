//! The mutable dependency tree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::{Gav, SourceLocation};

/// Error tag recorded on a project when part of its analysis failed.
///
/// Tags accumulate: a project can carry several of them and they are never
/// removed once added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BcError {
    /// Direct dependencies could not be determined
    NoDependency,
    /// Source-control checkout or access failed
    ScmException,
    /// The project descriptor could not be analysed
    PomException,
    /// No source location was available to analyse
    NoScmUrl,
}

impl fmt::Display for BcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::NoDependency => "NO_DEPENDENCY",
            Self::ScmException => "SCM_EXCEPTION",
            Self::PomException => "POM_EXCEPTION",
            Self::NoScmUrl => "NO_SCM_URL",
        };
        f.write_str(tag)
    }
}

/// Dependency analysis state of a hierarchy node.
///
/// `NotAnalysed` is the initial state; `Analysed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStatus {
    /// Direct dependencies have not been looked up yet
    #[default]
    NotAnalysed,
    /// Direct dependencies were resolved and enriched
    Analysed,
    /// Dependency lookup failed; see the project's error tags
    Failed,
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            Self::NotAnalysed => "NOT_ANALYSED",
            Self::Analysed => "ANALYSED",
            Self::Failed => "FAILED",
        };
        f.write_str(status)
    }
}

/// Build-relevant metadata for one artifact occurrence in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    /// Coordinate this project describes
    pub gav: Gav,
    /// Unique display name, also used as the build configuration name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Location in the product's own repository
    pub internal_scm: Option<SourceLocation>,
    /// Location in the upstream repository
    pub external_scm: Option<SourceLocation>,
    /// Ids of build configurations already registered for this location
    #[serde(default)]
    pub existing_bcs: Vec<u32>,
    /// Build configuration currently bound to this project
    pub bc_id: Option<u32>,
    /// Best matching version that was already built internally
    pub internally_built: Option<String>,
    /// All versions of this artifact that were built internally
    pub available_versions: Option<Vec<String>>,
    #[serde(default)]
    errors: BTreeSet<BcError>,
}

impl ProjectDetail {
    /// Create an empty project for `gav`.
    pub fn new(gav: Gav) -> Self {
        Self {
            gav,
            name: String::new(),
            description: String::new(),
            internal_scm: None,
            external_scm: None,
            existing_bcs: Vec::new(),
            bc_id: None,
            internally_built: None,
            available_versions: None,
            errors: BTreeSet::new(),
        }
    }

    /// Record an error tag. Tags are never removed.
    pub fn add_error(&mut self, error: BcError) {
        self.errors.insert(error);
    }

    /// Recorded error tags in a stable order.
    pub fn errors(&self) -> &BTreeSet<BcError> {
        &self.errors
    }

    /// Whether any build configuration is already registered for this project.
    pub fn bc_exists(&self) -> bool {
        !self.existing_bcs.is_empty()
    }

    /// Whether either source location is known.
    pub fn has_source_location(&self) -> bool {
        self.internal_scm.is_some() || self.external_scm.is_some()
    }
}

/// A node of the dependency hierarchy.
///
/// Children and analysis status are only changed together through
/// [`mark_analysed`](Self::mark_analysed) and [`mark_failed`](Self::mark_failed),
/// which keeps children empty unless the node is `Analysed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectHierarchy {
    /// Metadata for this node
    pub project: ProjectDetail,
    /// Set by the caller to request expansion of this node
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    dependencies: Vec<ProjectHierarchy>,
    #[serde(default)]
    analysis_status: AnalysisStatus,
}

impl ProjectHierarchy {
    /// Create an unexpanded node.
    pub fn new(project: ProjectDetail, selected: bool) -> Self {
        Self {
            project,
            selected,
            dependencies: Vec::new(),
            analysis_status: AnalysisStatus::NotAnalysed,
        }
    }

    /// Coordinate of this node.
    pub fn gav(&self) -> &Gav {
        &self.project.gav
    }

    /// Current analysis status.
    pub fn analysis_status(&self) -> AnalysisStatus {
        self.analysis_status
    }

    /// Direct children of this node.
    pub fn dependencies(&self) -> &[ProjectHierarchy] {
        &self.dependencies
    }

    /// Mutable access to the existing children, e.g. to change their selection.
    pub fn dependencies_mut(&mut self) -> impl Iterator<Item = &mut ProjectHierarchy> {
        self.dependencies.iter_mut()
    }

    /// Record the resolved children and mark the node `Analysed`.
    ///
    /// Children sharing a coordinate are collapsed to the first occurrence.
    pub fn mark_analysed(&mut self, dependencies: Vec<ProjectHierarchy>) {
        let mut seen = BTreeSet::new();
        self.dependencies = dependencies
            .into_iter()
            .filter(|dep| seen.insert(dep.gav().clone()))
            .collect();
        self.analysis_status = AnalysisStatus::Analysed;
    }

    /// Mark the node `Failed`, recording `errors` and dropping any children.
    pub fn mark_failed(&mut self, errors: impl IntoIterator<Item = BcError>) {
        for error in errors {
            self.project.add_error(error);
        }
        self.dependencies.clear();
        self.analysis_status = AnalysisStatus::Failed;
    }

    /// Number of nodes in this subtree, including this one.
    pub fn count_nodes(&self) -> usize {
        1 + self.dependencies.iter().map(Self::count_nodes).sum::<usize>()
    }

    /// First node in this subtree (pre-order) with the given coordinate.
    pub fn find(&self, gav: &Gav) -> Option<&ProjectHierarchy> {
        if self.gav() == gav {
            return Some(self);
        }
        self.dependencies.iter().find_map(|dep| dep.find(gav))
    }

    /// Set `selected` on every node of this subtree matching `predicate`.
    ///
    /// Returns the number of nodes that were newly selected.
    pub fn select_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&ProjectHierarchy) -> bool,
    {
        self.select_where_inner(&predicate)
    }

    fn select_where_inner<F>(&mut self, predicate: &F) -> usize
    where
        F: Fn(&ProjectHierarchy) -> bool,
    {
        let mut changed = 0;
        if !self.selected && predicate(self) {
            self.selected = true;
            changed += 1;
        }
        for dep in &mut self.dependencies {
            changed += dep.select_where_inner(predicate);
        }
        changed
    }
}
