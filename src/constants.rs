//! Global constants used throughout bc-hierarchy.
//!
//! Defaults for the expansion engine and the names of files and environment
//! variables the CLI looks at.

/// Default number of sibling dependencies enriched concurrently.
pub const DEFAULT_MAX_PARALLEL: usize = 8;

/// Default length of the random disambiguator appended to display names.
pub const DEFAULT_NAME_SUFFIX_LENGTH: usize = 5;

/// Upper bound for the display-name disambiguator (length of a simple UUID).
pub const MAX_NAME_SUFFIX_LENGTH: usize = 32;

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "BCH_CONFIG_PATH";

/// Directory under the user's home holding the configuration file.
pub const CONFIG_DIR_NAME: &str = ".bc-hierarchy";

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.toml";
