//! Integration test suite for bc-hierarchy
//!
//! End-to-end tests running expansions against the offline catalog in
//! `tests/fixtures/catalog.toml`, both through the library and through the
//! `bc-hierarchy` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **expansion**: `HierarchyCreator` driven by the catalog collaborator
//! - **cli**: the `expand` and `tree` commands

mod cli;
mod expansion;

use std::path::PathBuf;

/// Path of the shared catalog fixture.
pub fn fixture_catalog() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/catalog.toml")
}

pub const PRODUCT: &str = "org.acme:product:1.0";
pub const PRODUCT_REPO_URL: &str = "https://git.internal.example.com/product.git";
pub const PRODUCT_REPO_REVISION: &str = "1.0-prod";
