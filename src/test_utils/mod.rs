//! Test utilities for bc-hierarchy
//!
//! This module provides a programmable stand-in for every collaborator and a
//! logging initializer for tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use bc_hierarchy::collaborators::Collaborators;
//! use bc_hierarchy::models::Gav;
//! use bc_hierarchy::test_utils::{Call, MockCollaborators};
//! use std::sync::Arc;
//!
//! let app = Gav::new("org.acme", "app", "1.0");
//! let lib = Gav::new("org.acme", "lib", "1.0");
//! let mock = Arc::new(MockCollaborators::new().with_dependencies(app, [lib]));
//! let collaborators = Collaborators::from_shared(mock.clone());
//! // ... run an expansion ...
//! assert_eq!(mock.calls(Call::IndexAt), 0);
//! ```

mod mock;

pub use mock::{Call, MockCollaborators};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Send expansion logs to the test harness output.
///
/// With `Some(level)` only this crate's events at `level` and above are
/// shown. With `None`, `RUST_LOG` decides and nothing is installed when it is
/// unset. Later calls are no-ops.
///
/// ```bash
/// RUST_LOG=bc_hierarchy::hierarchy=debug cargo test --test integration
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = match level {
            Some(level) => EnvFilter::new(format!("bc_hierarchy={level}")),
            None => match EnvFilter::try_from_default_env() {
                Ok(filter) => filter,
                Err(_) => return,
            },
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init();
    });
}
