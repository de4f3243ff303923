//! Names shared across the crate.

/// Application name, used for platform directories.
pub const APP_NAME: &str = "pkgenv";

/// Environment variable holding the colon-separated hashes of loaded roots.
pub const LOADED_HASHES_VAR: &str = "PKGENV_LOADED_HASHES";

/// Environment variable exported by the shell integration wrapper.
pub const SHELL_VAR: &str = "PKGENV_SHELL";

/// Prefix of the variables that stash a value overwritten by a load.
pub const PRIOR_VAR_PREFIX: &str = "PKGENV_PRIOR_";

/// Overrides the installation root directory.
pub const ROOT_ENV_VAR: &str = "PKGENV_ROOT";

/// Length of a DAG hash in hex characters.
pub const DAG_HASH_LEN: usize = 32;

/// Number of hash characters shown in listings and stash variable names.
pub const SHORT_HASH_LEN: usize = 7;

/// Default separator for path-like variables.
pub const PATH_SEPARATOR: char = ':';
