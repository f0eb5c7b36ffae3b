//! Offline catalog: a TOML snapshot of the external world.
//!
//! The catalog implements every collaborator trait from a single file, which
//! makes it possible to run expansions without network access, e.g. to try
//! out selection strategies or to reproduce a reported tree.
//!
//! # File Format
//!
//! ```toml
//! # Artifacts known to the dependency index and the artifact repository
//! [[artifacts]]
//! gav = "org.acme:app:1.0"
//! name = "Acme App"
//! scm-url = "https://github.com/acme/app.git"
//! scm-revision = "app-1.0"
//! dependencies = ["org.acme:lib:2.0"]   # omit: not in the dependency index
//! built-versions = ["1.0.redhat-1"]
//! best-match = "1.0.redhat-1"
//!
//! # Repositories that can be checked out, with the projects they contain
//! [[repositories]]
//! url = "https://git.internal.example.com/app.git"
//! revision = "1.0-prod"
//!
//! [[repositories.projects]]
//! gav = "org.acme:lib:2.0"
//! name = "Acme Lib"
//! dependencies = ["org.acme:util:3.0"]  # omit: descriptor cannot be analysed
//!
//! [[build-configurations]]
//! id = 42
//! scm-url = "https://github.com/acme/app.git"
//! scm-revision = "app-1.0"
//! ```
//!
//! A checkout of a (url, revision) pair that is not listed under
//! `repositories` fails with a source-control fault.

use anyhow::{Context, Result};
use futures::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::collaborators::{
    BuildConfigRegistry, DependencyIndex, IndexError, MetadataProvider, ScmError, ServiceError,
    SourceControl, VersionHistory,
};
use crate::core::HierarchyError;
use crate::models::{Gav, PomInfo, SourceLocation, VersionLookup};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    artifacts: Vec<ArtifactEntry>,
    #[serde(default)]
    repositories: Vec<RepositoryEntry>,
    #[serde(default)]
    build_configurations: Vec<BuildConfigurationEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ArtifactEntry {
    gav: String,
    name: Option<String>,
    scm_url: Option<String>,
    scm_revision: Option<String>,
    dependencies: Option<Vec<String>>,
    #[serde(default)]
    built_versions: Vec<String>,
    best_match: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RepositoryEntry {
    url: String,
    revision: String,
    #[serde(default)]
    projects: Vec<ProjectEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ProjectEntry {
    gav: String,
    name: Option<String>,
    dependencies: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct BuildConfigurationEntry {
    id: u32,
    scm_url: String,
    scm_revision: String,
}

#[derive(Debug, Clone)]
struct Artifact {
    pom: PomInfo,
    dependencies: Option<BTreeSet<Gav>>,
    versions: VersionLookup,
}

#[derive(Debug, Clone)]
struct RepositoryProject {
    name: Option<String>,
    dependencies: Option<BTreeSet<Gav>>,
}

/// Collaborators answering from a catalog file.
#[derive(Debug, Default)]
pub struct Catalog {
    artifacts: HashMap<Gav, Artifact>,
    repositories: HashMap<SourceLocation, HashMap<Gav, RepositoryProject>>,
    build_configurations: HashMap<SourceLocation, Vec<u32>>,
}

impl Catalog {
    /// Read a catalog file.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read catalog from {}", path.display()))?;

        let catalog = Self::from_toml(&content, &path.display().to_string())?;
        tracing::debug!(
            "Loaded catalog {} ({} artifacts, {} repositories)",
            path.display(),
            catalog.artifacts.len(),
            catalog.repositories.len()
        );
        Ok(catalog)
    }

    /// Parse catalog content; `file` names the source in errors.
    pub fn from_toml(content: &str, file: &str) -> Result<Self, HierarchyError> {
        let parse_error = |reason: String| HierarchyError::CatalogParseError {
            file: file.to_string(),
            reason,
        };

        let raw: CatalogFile =
            toml::from_str(content).map_err(|e| parse_error(e.to_string().trim().to_string()))?;

        let mut catalog = Self::default();

        for entry in raw.artifacts {
            let gav = parse_gav(&entry.gav).map_err(&parse_error)?;
            let dependencies = entry
                .dependencies
                .as_deref()
                .map(parse_gavs)
                .transpose()
                .map_err(&parse_error)?;
            let artifact = Artifact {
                pom: PomInfo {
                    name: entry.name,
                    scm_url: entry.scm_url,
                    scm_revision: entry.scm_revision,
                },
                dependencies,
                versions: VersionLookup {
                    available_versions: entry.built_versions,
                    best_match: entry.best_match,
                },
            };
            if catalog.artifacts.insert(gav.clone(), artifact).is_some() {
                return Err(parse_error(format!("artifact {gav} is listed twice")));
            }
        }

        for entry in raw.repositories {
            let location = SourceLocation::new(entry.url, entry.revision);
            let mut projects = HashMap::new();
            for project in entry.projects {
                let gav = parse_gav(&project.gav).map_err(&parse_error)?;
                let dependencies = project
                    .dependencies
                    .as_deref()
                    .map(parse_gavs)
                    .transpose()
                    .map_err(&parse_error)?;
                let project = RepositoryProject {
                    name: project.name,
                    dependencies,
                };
                if projects.insert(gav.clone(), project).is_some() {
                    return Err(parse_error(format!("project {gav} is listed twice in {location}")));
                }
            }
            if catalog.repositories.insert(location.clone(), projects).is_some() {
                return Err(parse_error(format!("repository {location} is listed twice")));
            }
        }

        for entry in raw.build_configurations {
            catalog
                .build_configurations
                .entry(SourceLocation::new(entry.scm_url, entry.scm_revision))
                .or_default()
                .push(entry.id);
        }

        Ok(catalog)
    }

    fn repository(
        &self,
        location: &SourceLocation,
    ) -> Result<&HashMap<Gav, RepositoryProject>, ScmError> {
        self.repositories.get(location).ok_or_else(|| ScmError::Scm {
            location: location.clone(),
            message: "repository or revision does not exist".to_string(),
        })
    }

    fn dependencies_at(
        &self,
        location: &SourceLocation,
        gav: &Gav,
    ) -> Result<BTreeSet<Gav>, ScmError> {
        let project = self.repository(location)?.get(gav).ok_or_else(|| ScmError::Analysis {
            gav: gav.clone(),
            message: format!("no project descriptor for {gav} in {location}"),
        })?;
        project.dependencies.clone().ok_or_else(|| ScmError::Analysis {
            gav: gav.clone(),
            message: "project descriptor could not be resolved".to_string(),
        })
    }

    fn pom_info_in(&self, location: &SourceLocation, gav: &Gav) -> Result<Option<PomInfo>, ScmError> {
        Ok(self.repository(location)?.get(gav).map(|project| PomInfo {
            name: project.name.clone(),
            scm_url: None,
            scm_revision: None,
        }))
    }

    fn contains(&self, location: &SourceLocation, gav: &Gav) -> Result<bool, ScmError> {
        Ok(self.repository(location)?.contains_key(gav))
    }
}

fn parse_gav(input: &str) -> Result<Gav, String> {
    input.parse::<Gav>().map_err(|e| e.to_string())
}

fn parse_gavs(inputs: &[String]) -> Result<BTreeSet<Gav>, String> {
    inputs.iter().map(String::as_str).map(parse_gav).collect()
}

impl DependencyIndex for Catalog {
    fn top_level_dependencies<'a>(
        &'a self,
        gav: &'a Gav,
    ) -> BoxFuture<'a, Result<BTreeSet<Gav>, IndexError>> {
        async move {
            self.artifacts
                .get(gav)
                .and_then(|artifact| artifact.dependencies.clone())
                .ok_or_else(|| IndexError::NotFound { gav: gav.clone() })
        }
        .boxed()
    }

    fn top_level_dependencies_at<'a>(
        &'a self,
        location: &'a SourceLocation,
        gav: &'a Gav,
    ) -> BoxFuture<'a, Result<BTreeSet<Gav>, ScmError>> {
        async move { self.dependencies_at(location, gav) }.boxed()
    }
}

impl MetadataProvider for Catalog {
    fn pom_info<'a>(
        &'a self,
        gav: &'a Gav,
    ) -> BoxFuture<'a, Result<Option<PomInfo>, ServiceError>> {
        async move { Ok(self.artifacts.get(gav).map(|artifact| artifact.pom.clone())) }.boxed()
    }

    fn pom_info_at<'a>(
        &'a self,
        location: &'a SourceLocation,
        gav: &'a Gav,
    ) -> BoxFuture<'a, Result<Option<PomInfo>, ScmError>> {
        async move { self.pom_info_in(location, gav) }.boxed()
    }
}

impl SourceControl for Catalog {
    fn is_gav_in_repository<'a>(
        &'a self,
        location: &'a SourceLocation,
        gav: &'a Gav,
    ) -> BoxFuture<'a, Result<bool, ScmError>> {
        async move { self.contains(location, gav) }.boxed()
    }
}

impl BuildConfigRegistry for Catalog {
    fn find_build_configurations<'a>(
        &'a self,
        location: &'a SourceLocation,
    ) -> BoxFuture<'a, Result<Vec<u32>, ServiceError>> {
        async move { Ok(self.build_configurations.get(location).cloned().unwrap_or_default()) }
            .boxed()
    }
}

impl VersionHistory for Catalog {
    fn lookup_built_versions<'a>(
        &'a self,
        gav: &'a Gav,
    ) -> BoxFuture<'a, Result<VersionLookup, ServiceError>> {
        async move {
            Ok(self
                .artifacts
                .get(gav)
                .map(|artifact| artifact.versions.clone())
                .unwrap_or_default())
        }
        .boxed()
    }
}
