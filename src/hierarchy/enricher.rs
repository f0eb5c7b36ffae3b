//! Node enrichment: turn a bare coordinate into a populated hierarchy node.
//!
//! Every step is independently fault tolerant. A failing collaborator leaves
//! its part of the node empty and is logged; [`NodeEnricher::enrich`] itself
//! cannot fail, so a tree stays navigable when metadata for one node is
//! missing.
//!
//! Steps, in order:
//!
//! 1. descriptor metadata (artifact repository, then a checkout of the
//!    top-level source location)
//! 2. unique display name
//! 3. description
//! 4. source locations (inherited from the top level when the project lives
//!    in the top-level repository, otherwise the descriptor's declared SCM as
//!    the external location)
//! 5. existing build configurations, only when a source location is known
//! 6. internally built versions

use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;

use crate::collaborators::Collaborators;
use crate::config::ExpansionConfig;
use crate::models::{Gav, PomInfo, ProjectDetail, ProjectHierarchy};

use super::coordinates::{ScmContext, pick};

/// Populates hierarchy nodes from the collaborators.
#[derive(Debug, Clone)]
pub struct NodeEnricher {
    collaborators: Collaborators,
    config: ExpansionConfig,
}

impl NodeEnricher {
    /// Create an enricher.
    pub fn new(collaborators: Collaborators, config: ExpansionConfig) -> Self {
        Self {
            collaborators,
            config,
        }
    }

    /// Build an unselected, unexpanded node for `gav`.
    pub async fn enrich(&self, gav: Gav, ctx: &ScmContext) -> ProjectHierarchy {
        let mut project = ProjectDetail::new(gav);

        let pom_info = self.pom_info(&project.gav, ctx).await;

        project.name = display_name(&project.gav, self.config.name_suffix_length);
        project.description = description(pom_info.as_ref(), &project.gav);
        self.set_scm_info(&mut project, pom_info.as_ref(), ctx).await;
        self.find_existing_build_configurations(&mut project).await;
        self.set_built_versions(&mut project).await;

        ProjectHierarchy::new(project, false)
    }

    /// Enrich every distinct coordinate of `gavs` concurrently.
    ///
    /// At most `max_parallel` enrichments run at once. The result is ordered
    /// by coordinate.
    pub async fn enrich_all<I>(&self, gavs: I, ctx: &ScmContext) -> Vec<ProjectHierarchy>
    where
        I: IntoIterator<Item = Gav>,
    {
        let unique: BTreeSet<Gav> = gavs.into_iter().collect();
        let concurrency = self.config.max_parallel.max(1);

        let mut nodes: Vec<ProjectHierarchy> = stream::iter(unique)
            .map(|gav| self.enrich(gav, ctx))
            .buffer_unordered(concurrency)
            .collect()
            .await;
        nodes.sort_by(|a, b| a.gav().cmp(b.gav()));
        nodes
    }

    /// Build the top-level node of a new hierarchy.
    ///
    /// The caller supplies the top-level source locations; they are kept as
    /// given instead of being derived. The node starts selected.
    pub async fn enrich_top_level(&self, gav: Gav, ctx: &ScmContext) -> ProjectHierarchy {
        let mut project = ProjectDetail::new(gav);

        let pom_info = self.pom_info(&project.gav, ctx).await;

        project.name = display_name(&project.gav, self.config.name_suffix_length);
        project.description = description(pom_info.as_ref(), &project.gav);
        project.internal_scm = ctx.internal.clone();
        project.external_scm = ctx.external.clone();
        self.find_existing_build_configurations(&mut project).await;
        self.set_built_versions(&mut project).await;

        ProjectHierarchy::new(project, true)
    }

    /// Descriptor metadata from the artifact repository, falling back to a
    /// checkout of the top-level source location.
    async fn pom_info(&self, gav: &Gav, ctx: &ScmContext) -> Option<PomInfo> {
        match self.collaborators.metadata.pom_info(gav).await {
            Ok(Some(info)) => return Some(info),
            Ok(None) => {
                tracing::debug!("No pom metadata for {} in the artifact repository", gav);
            }
            Err(err) => {
                tracing::warn!("Failed to get pom for gav {} from artifact repository: {}", gav, err);
            }
        }

        let Ok(location) = ctx.preferred() else {
            tracing::debug!("No top-level source location to resolve pom for {} from", gav);
            return None;
        };

        match self.collaborators.metadata.pom_info_at(location, gav).await {
            Ok(info) => info,
            Err(err) => {
                tracing::warn!("Failed to get pom for gav {} from product SCM repository: {}", gav, err);
                None
            }
        }
    }

    /// Set internal/external source locations.
    async fn set_scm_info(
        &self,
        project: &mut ProjectDetail,
        pom_info: Option<&PomInfo>,
        ctx: &ScmContext,
    ) {
        let in_repository = match ctx.preferred() {
            Ok(location) => {
                match self.collaborators.scm.is_gav_in_repository(location, &project.gav).await {
                    Ok(found) => found,
                    Err(err) => {
                        tracing::warn!(
                            "Failed to check if GAV {} is in repository: {}",
                            project.gav,
                            err
                        );
                        return;
                    }
                }
            }
            Err(_) => false,
        };

        if in_repository {
            // Same repository as the top level: copy both of its coordinates.
            project.internal_scm = ctx.internal.clone();
            project.external_scm = ctx.external.clone();
        } else if let Some(location) = pom_info.and_then(PomInfo::source_location) {
            // Coordinates from a descriptor are upstream ones, never internal.
            project.external_scm = Some(location);
        }
    }

    /// Record ids of build configurations registered for the project's location.
    async fn find_existing_build_configurations(&self, project: &mut ProjectDetail) {
        let Ok(location) = pick(project.internal_scm.as_ref(), project.external_scm.as_ref())
        else {
            return;
        };

        match self.collaborators.registry.find_build_configurations(location).await {
            Ok(ids) => {
                project.existing_bcs = ids;
                project.bc_id = None;
            }
            Err(err) => {
                tracing::warn!("Failed to lookup existing BC for {}: {}", project.gav, err);
            }
        }
    }

    async fn set_built_versions(&self, project: &mut ProjectDetail) {
        match self.collaborators.versions.lookup_built_versions(&project.gav).await {
            Ok(lookup) => {
                project.available_versions = Some(lookup.available_versions);
                project.internally_built = lookup.best_match;
            }
            Err(err) => {
                tracing::warn!("Could not obtain built versions for {}: {}", project.gav, err);
                project.internally_built = None;
            }
        }
    }
}

/// Display name `{artifactId}-{version}-{suffix}` with a random suffix.
///
/// Build configurations are keyed by name downstream, so two occurrences of the
/// same coordinate must not collide.
pub fn display_name(gav: &Gav, suffix_length: usize) -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    let suffix = &random[..suffix_length.clamp(1, random.len())];
    format!("{}-{}-{}", gav.artifact_id, gav.version, suffix)
}

/// Human-readable description of the build configuration for `gav`.
pub fn description(pom_info: Option<&PomInfo>, gav: &Gav) -> String {
    match pom_info.and_then(|info| info.name.as_deref()) {
        Some(name) => format!("Build Configuration for {gav} - {name}."),
        None => format!("Build Configuration for {gav}."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{ScmError, ServiceError};
    use crate::models::{AnalysisStatus, SourceLocation, VersionLookup};
    use crate::test_utils::{Call, MockCollaborators, init_test_logging};
    use std::sync::Arc;

    fn gav(artifact: &str) -> Gav {
        Gav::new("org.acme", artifact, "1.0")
    }

    fn internal() -> SourceLocation {
        SourceLocation::new("https://internal.example.com/product.git", "prod-1.0")
    }

    fn external() -> SourceLocation {
        SourceLocation::new("https://github.com/acme/product.git", "v1.0")
    }

    fn enricher(mock: &Arc<MockCollaborators>) -> NodeEnricher {
        init_test_logging(None);
        NodeEnricher::new(Collaborators::from_shared(mock.clone()), ExpansionConfig::default())
    }

    #[test]
    fn test_display_name_format() {
        let name = display_name(&gav("lib"), 5);
        assert!(name.starts_with("lib-1.0-"));
        assert_eq!(name.len(), "lib-1.0-".len() + 5);
        assert_ne!(display_name(&gav("lib"), 5), display_name(&gav("lib"), 5));
    }

    #[test]
    fn test_description_with_and_without_name() {
        let info = PomInfo {
            name: Some("Acme Lib".into()),
            ..PomInfo::default()
        };
        assert_eq!(
            description(Some(&info), &gav("lib")),
            "Build Configuration for org.acme:lib:1.0 - Acme Lib."
        );
        assert_eq!(
            description(Some(&PomInfo::default()), &gav("lib")),
            "Build Configuration for org.acme:lib:1.0."
        );
        assert_eq!(description(None, &gav("lib")), "Build Configuration for org.acme:lib:1.0.");
    }

    #[tokio::test]
    async fn test_enrich_inherits_top_level_locations_when_in_repository() {
        let mock = Arc::new(
            MockCollaborators::new()
                .with_gav_in_repository(internal(), gav("lib"))
                .with_build_configurations(internal(), vec![7, 9]),
        );
        let ctx = ScmContext::new(Some(internal()), Some(external()));

        let node = enricher(&mock).enrich(gav("lib"), &ctx).await;

        assert_eq!(node.gav(), &gav("lib"));
        assert!(!node.selected);
        assert_eq!(node.project.internal_scm, Some(internal()));
        assert_eq!(node.project.external_scm, Some(external()));
        assert_eq!(node.project.existing_bcs, vec![7, 9]);
        assert!(node.project.bc_exists());
        assert_eq!(node.project.bc_id, None);
    }

    #[tokio::test]
    async fn test_enrich_uses_pom_scm_as_external_only() {
        let declared = SourceLocation::new("https://github.com/acme/lib.git", "lib-1.0");
        let mock = Arc::new(
            MockCollaborators::new()
                .with_pom_info(
                    gav("lib"),
                    PomInfo {
                        name: Some("Acme Lib".into()),
                        scm_url: Some(declared.url.clone()),
                        scm_revision: Some(declared.revision.clone()),
                    },
                )
                .with_build_configurations(declared.clone(), vec![3]),
        );
        let ctx = ScmContext::new(Some(internal()), None);

        let node = enricher(&mock).enrich(gav("lib"), &ctx).await;

        assert_eq!(node.project.internal_scm, None);
        assert_eq!(node.project.external_scm, Some(declared));
        assert_eq!(node.project.existing_bcs, vec![3]);
        assert_eq!(
            node.project.description,
            "Build Configuration for org.acme:lib:1.0 - Acme Lib."
        );
        assert_eq!(mock.calls(Call::PomInfoAt), 0);
    }

    #[tokio::test]
    async fn test_enrich_falls_back_to_checkout_metadata() {
        let mock = Arc::new(
            MockCollaborators::new()
                .with_pom_info_fault(gav("lib"), ServiceError::communication("aprox", "timeout"))
                .with_pom_info_at(
                    internal(),
                    gav("lib"),
                    PomInfo {
                        name: Some("From SCM".into()),
                        ..PomInfo::default()
                    },
                ),
        );
        let ctx = ScmContext::new(Some(internal()), Some(external()));

        let node = enricher(&mock).enrich(gav("lib"), &ctx).await;

        assert_eq!(mock.calls(Call::PomInfo), 1);
        assert_eq!(mock.calls(Call::PomInfoAt), 1);
        assert!(node.project.description.ends_with("- From SCM."));
    }

    #[tokio::test]
    async fn test_enrich_continues_without_metadata_when_both_lookups_fail() {
        let mock = Arc::new(
            MockCollaborators::new()
                .with_pom_info_fault(gav("lib"), ServiceError::communication("aprox", "timeout"))
                .with_pom_info_at_fault(
                    internal(),
                    gav("lib"),
                    ScmError::Scm {
                        location: internal(),
                        message: "clone failed".into(),
                    },
                ),
        );
        let ctx = ScmContext::new(Some(internal()), None);

        let node = enricher(&mock).enrich(gav("lib"), &ctx).await;

        assert_eq!(mock.calls(Call::PomInfo), 1);
        assert_eq!(mock.calls(Call::PomInfoAt), 1);
        assert_eq!(node.project.description, "Build Configuration for org.acme:lib:1.0.");
        assert!(node.project.name.starts_with("lib-1.0-"));
        assert!(!node.project.has_source_location());
        assert!(node.project.errors().is_empty());
        assert_eq!(node.analysis_status(), AnalysisStatus::NotAnalysed);
    }

    #[tokio::test]
    async fn test_enrich_without_any_location_skips_build_config_lookup() {
        let mock = Arc::new(MockCollaborators::new());
        let ctx = ScmContext::new(Some(internal()), None);

        let node = enricher(&mock).enrich(gav("lib"), &ctx).await;

        assert_eq!(node.project.internal_scm, None);
        assert_eq!(node.project.external_scm, None);
        assert!(node.project.existing_bcs.is_empty());
        assert_eq!(mock.calls(Call::BuildConfigurations), 0);
        assert!(node.project.errors().is_empty());
    }

    #[tokio::test]
    async fn test_enrich_swallows_scm_probe_fault() {
        let declared = SourceLocation::new("https://github.com/acme/lib.git", "lib-1.0");
        let mock = Arc::new(
            MockCollaborators::new()
                .with_pom_info(
                    gav("lib"),
                    PomInfo {
                        name: None,
                        scm_url: Some(declared.url.clone()),
                        scm_revision: Some(declared.revision.clone()),
                    },
                )
                .with_repository_fault(
                    internal(),
                    ScmError::Scm {
                        location: internal(),
                        message: "clone failed".into(),
                    },
                ),
        );
        let ctx = ScmContext::new(Some(internal()), None);

        let node = enricher(&mock).enrich(gav("lib"), &ctx).await;

        // the fault aborts the whole step, the declared SCM is not applied
        assert!(!node.project.has_source_location());
        assert_eq!(mock.calls(Call::BuildConfigurations), 0);
    }

    #[tokio::test]
    async fn test_enrich_records_built_versions() {
        let mock = Arc::new(MockCollaborators::new().with_built_versions(
            gav("lib"),
            VersionLookup {
                available_versions: vec!["1.0.redhat-1".into(), "1.0.redhat-2".into()],
                best_match: Some("1.0.redhat-2".into()),
            },
        ));

        let node = enricher(&mock).enrich(gav("lib"), &ScmContext::default()).await;

        assert_eq!(node.project.internally_built.as_deref(), Some("1.0.redhat-2"));
        assert_eq!(node.project.available_versions.as_ref().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_enrich_version_fault_leaves_versions_unset() {
        let mock = Arc::new(
            MockCollaborators::new()
                .with_version_history_fault(ServiceError::communication("da", "down"))
                .with_registry_fault(ServiceError::communication("pnc", "down"))
                .with_gav_in_repository(internal(), gav("lib")),
        );
        let ctx = ScmContext::new(Some(internal()), None);

        let node = enricher(&mock).enrich(gav("lib"), &ctx).await;

        assert_eq!(node.project.internally_built, None);
        assert_eq!(node.project.available_versions, None);
        assert!(node.project.existing_bcs.is_empty());
        assert_eq!(mock.calls(Call::BuildConfigurations), 1);
        assert!(node.project.errors().is_empty());
    }

    #[tokio::test]
    async fn test_enrich_all_deduplicates_and_bounds_concurrency() {
        let mock = Arc::new(
            MockCollaborators::new().with_latency(std::time::Duration::from_millis(20)),
        );
        let config = ExpansionConfig {
            max_parallel: 2,
            ..ExpansionConfig::default()
        };
        init_test_logging(None);
        let enricher = NodeEnricher::new(Collaborators::from_shared(mock.clone()), config);

        let gavs = vec![gav("d"), gav("b"), gav("c"), gav("a"), gav("a")];
        let nodes = enricher.enrich_all(gavs, &ScmContext::default()).await;

        let order: Vec<&str> = nodes.iter().map(|n| n.gav().artifact_id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
        assert_eq!(mock.max_in_flight(), 2);
    }

    #[tokio::test]
    async fn test_enrich_top_level_keeps_given_locations() {
        let mock = Arc::new(MockCollaborators::new().with_build_configurations(internal(), vec![1]));
        let ctx = ScmContext::new(Some(internal()), Some(external()));

        let top = enricher(&mock).enrich_top_level(gav("product"), &ctx).await;

        assert!(top.selected);
        assert_eq!(top.project.internal_scm, Some(internal()));
        assert_eq!(top.project.external_scm, Some(external()));
        assert_eq!(top.project.existing_bcs, vec![1]);
        assert_eq!(mock.calls(Call::InRepository), 0);
    }
}
