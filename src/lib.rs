//! bc-hierarchy - lazy dependency hierarchies for build-configuration planning
//!
//! Given one top-level artifact coordinate (`group:artifact:version`), this
//! crate builds a tree of its transitive dependencies one level at a time.
//! Every node is enriched with the metadata needed to decide how to build it:
//! where its sources live, whether a build configuration already exists for
//! that location, and which versions of it were already built internally.
//!
//! # Architecture Overview
//!
//! Expansion is driven by the caller. A tree starts as a single selected
//! node; each call to [`hierarchy::HierarchyCreator::expand_next_level`]
//! resolves the direct dependencies of selected, unexpanded nodes and stops.
//! The caller inspects the new children, selects the interesting ones and
//! calls again.
//!
//! All knowledge about the outside world comes through the collaborator
//! traits in [`collaborators`]: a dependency index, a metadata provider,
//! source control, a build-configuration registry and a version history.
//! [`catalog::Catalog`] implements all of them from an offline TOML file.
//!
//! # Core Modules
//!
//! - [`models`] - coordinates, source locations and the tree itself
//! - [`hierarchy`] - enrichment, dependency fetching and the walker
//! - [`collaborators`] - traits for the external services
//! - [`catalog`] - offline collaborator backed by a TOML file
//! - [`config`] - `~/.bc-hierarchy/config.toml`
//! - [`core`] - error types and user-facing error reporting
//! - [`cli`] - the `bc-hierarchy` command line
//!
//! # Failure Model
//!
//! Expansion never returns an error. Lookups that fail are absorbed into the
//! tree: a node whose dependencies cannot be determined is marked `FAILED`
//! and tagged with [`models::BcError`] values, and missing metadata leaves
//! fields empty.
//!
//! # Example
//!
//! ```rust,no_run
//! use bc_hierarchy::catalog::Catalog;
//! use bc_hierarchy::collaborators::Collaborators;
//! use bc_hierarchy::config::ExpansionConfig;
//! use bc_hierarchy::hierarchy::{HierarchyCreator, ScmContext};
//! use bc_hierarchy::models::SourceLocation;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let catalog = Catalog::load(Path::new("catalog.toml")).await?;
//! let creator =
//!     HierarchyCreator::new(Collaborators::from_shared(Arc::new(catalog)), ExpansionConfig::default());
//!
//! let ctx = ScmContext::new(
//!     Some(SourceLocation::new("https://git.example.com/product.git", "1.0-prod")),
//!     None,
//! );
//! let mut tree = creator.create_top_level("org.acme:product:1.0".parse()?, &ctx).await;
//! creator.expand_next_level(&mut tree).await;
//! println!("{} nodes", tree.count_nodes());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod cli;
pub mod collaborators;
pub mod config;
pub mod constants;
pub mod core;
pub mod hierarchy;
pub mod models;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
