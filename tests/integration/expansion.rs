//! Expansion of the fixture product through the library API.

use bc_hierarchy::catalog::Catalog;
use bc_hierarchy::collaborators::Collaborators;
use bc_hierarchy::config::ExpansionConfig;
use bc_hierarchy::hierarchy::{HierarchyCreator, ScmContext};
use bc_hierarchy::models::{AnalysisStatus, BcError, Gav, ProjectHierarchy, SourceLocation};
use bc_hierarchy::test_utils::init_test_logging;
use std::sync::Arc;

use super::{PRODUCT, PRODUCT_REPO_REVISION, PRODUCT_REPO_URL, fixture_catalog};

fn gav(s: &str) -> Gav {
    s.parse().unwrap()
}

fn product_repo() -> SourceLocation {
    SourceLocation::new(PRODUCT_REPO_URL, PRODUCT_REPO_REVISION)
}

async fn creator() -> HierarchyCreator {
    init_test_logging(None);
    let catalog = Catalog::load(&fixture_catalog()).await.unwrap();
    HierarchyCreator::new(Collaborators::from_shared(Arc::new(catalog)), ExpansionConfig::default())
}

async fn product_tree(creator: &HierarchyCreator) -> ProjectHierarchy {
    let ctx = ScmContext::new(Some(product_repo()), None);
    creator.create_top_level(gav(PRODUCT), &ctx).await
}

#[tokio::test]
async fn test_top_level_node() {
    let creator = creator().await;
    let top = product_tree(&creator).await;

    assert!(top.selected);
    assert_eq!(top.analysis_status(), AnalysisStatus::NotAnalysed);
    assert_eq!(top.project.internal_scm, Some(product_repo()));
    assert_eq!(top.project.existing_bcs, vec![7]);
    assert_eq!(
        top.project.description,
        "Build Configuration for org.acme:product:1.0 - Acme Product."
    );
    assert!(top.project.name.starts_with("product-1.0-"));
}

#[tokio::test]
async fn test_first_level_enrichment() {
    let creator = creator().await;
    let mut top = product_tree(&creator).await;

    creator.expand_next_level(&mut top).await;

    assert_eq!(top.analysis_status(), AnalysisStatus::Analysed);
    assert_eq!(top.dependencies().len(), 3);
    assert!(top.dependencies().iter().all(|d| !d.selected));
    assert!(
        top.dependencies()
            .iter()
            .all(|d| d.analysis_status() == AnalysisStatus::NotAnalysed)
    );

    // upstream sources from the descriptor, already built
    let lib = &top.find(&gav("org.acme:lib:2.0")).unwrap().project;
    assert_eq!(lib.internal_scm, None);
    assert_eq!(
        lib.external_scm,
        Some(SourceLocation::new("https://github.com/acme/lib.git", "lib-2.0"))
    );
    assert_eq!(lib.existing_bcs, vec![42]);
    assert_eq!(lib.internally_built.as_deref(), Some("2.0.redhat-3"));
    assert_eq!(lib.available_versions.as_ref().map(Vec::len), Some(2));

    // shares the product repository
    let util = &top.find(&gav("org.acme:util:3.0")).unwrap().project;
    assert_eq!(util.internal_scm, Some(product_repo()));
    assert_eq!(util.existing_bcs, vec![7]);
    assert_eq!(util.description, "Build Configuration for org.acme:util:3.0.");

    // nothing known about it
    let legacy = &top.find(&gav("org.acme:legacy:0.9")).unwrap().project;
    assert!(!legacy.has_source_location());
    assert!(!legacy.bc_exists());
    assert_eq!(legacy.internally_built, None);
}

#[tokio::test]
async fn test_second_level_with_fallback_and_failure() {
    let creator = creator().await;
    let mut top = product_tree(&creator).await;

    creator.expand_next_level(&mut top).await;
    assert_eq!(top.select_where(|_| true), 3);
    creator.expand_next_level(&mut top).await;

    assert_eq!(top.count_nodes(), 6);

    let lib = top.find(&gav("org.acme:lib:2.0")).unwrap();
    assert_eq!(lib.analysis_status(), AnalysisStatus::Analysed);
    assert_eq!(lib.dependencies()[0].gav(), &gav("org.acme:core:1.1"));

    // not in the index: resolved from the product repository checkout
    let util = top.find(&gav("org.acme:util:3.0")).unwrap();
    assert_eq!(util.analysis_status(), AnalysisStatus::Analysed);
    assert_eq!(util.dependencies()[0].gav(), &gav("org.acme:core:1.1"));

    // identical coordinates under different parents are separate nodes
    assert_ne!(
        lib.dependencies()[0].project.name,
        util.dependencies()[0].project.name
    );

    let legacy = top.find(&gav("org.acme:legacy:0.9")).unwrap();
    assert_eq!(legacy.analysis_status(), AnalysisStatus::Failed);
    assert!(legacy.dependencies().is_empty());
    let errors: Vec<_> = legacy.project.errors().iter().copied().collect();
    assert_eq!(errors, vec![BcError::NoDependency, BcError::PomException]);
}

#[tokio::test]
async fn test_unknown_product_repository_is_an_scm_failure() {
    let creator = creator().await;
    let ctx = ScmContext::new(
        Some(SourceLocation::new("https://git.internal.example.com/gone.git", "1.0")),
        None,
    );
    let mut top = creator.create_top_level(gav(PRODUCT), &ctx).await;

    creator.expand_next_level(&mut top).await;
    top.select_where(|node| node.gav() == &gav("org.acme:util:3.0"));
    creator.expand_next_level(&mut top).await;

    let util = top.find(&gav("org.acme:util:3.0")).unwrap();
    assert_eq!(util.analysis_status(), AnalysisStatus::Failed);
    assert!(util.project.errors().contains(&BcError::ScmException));
    assert!(util.project.errors().contains(&BcError::NoDependency));

    // the rest of the tree is unaffected
    let lib = top.find(&gav("org.acme:lib:2.0")).unwrap();
    assert_eq!(lib.analysis_status(), AnalysisStatus::NotAnalysed);
}

#[tokio::test]
async fn test_explicit_dependencies() {
    let creator = creator().await;
    let mut top = product_tree(&creator).await;

    let children = creator
        .process_dependencies(&top, [gav("org.acme:util:3.0"), gav("org.acme:core:1.1")])
        .await;
    top.mark_analysed(children);

    assert_eq!(top.count_nodes(), 3);
    assert!(top.find(&gav("org.acme:lib:2.0")).is_none());

    top.select_where(|_| true);
    creator.expand_next_level(&mut top).await;
    let core = top
        .dependencies()
        .iter()
        .find(|d| d.gav() == &gav("org.acme:core:1.1"))
        .unwrap();
    assert_eq!(core.analysis_status(), AnalysisStatus::Analysed);
    assert!(core.dependencies().is_empty());
}

#[tokio::test]
async fn test_tree_survives_persistence_between_passes() {
    let creator = creator().await;
    let mut top = product_tree(&creator).await;
    creator.expand_next_level(&mut top).await;

    let json = serde_json::to_string(&top).unwrap();
    let mut restored: ProjectHierarchy = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, top);

    restored.select_where(|_| true);
    creator.expand_next_level(&mut restored).await;
    assert_eq!(restored.count_nodes(), 6);
}
