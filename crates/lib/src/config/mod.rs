//! User configuration.
//!
//! Read from `{config_dir}/config.json` when present, then overridden by
//! environment variables:
//!
//! - `PKGENV_CHECK_PREFIX_DIRS` (`0`/`1`/`true`/`false`)
//! - `PKGENV_FIRST_POLICY` (`most-recent` or `db-order`)
//!
//! ```json
//! {
//!   "check_prefix_dirs": true,
//!   "first_policy": "most-recent",
//!   "prefix_inspections": [
//!     { "subdir": "bin", "variables": ["PATH"] }
//!   ]
//! }
//! ```

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::env::is_valid_name;
use crate::inspect::{Inspection, PrefixInspector, default_inspections};
use crate::platform::paths::config_file;

const CHECK_PREFIX_DIRS_VAR: &str = "PKGENV_CHECK_PREFIX_DIRS";
const FIRST_POLICY_VAR: &str = "PKGENV_FIRST_POLICY";

/// How `--first` picks among several matching specs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FirstPolicy {
  /// The latest `installed_at`; ties go to database order.
  #[default]
  MostRecent,
  /// The first match in database order.
  DbOrder,
}

impl FromStr for FirstPolicy {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "most-recent" => Ok(FirstPolicy::MostRecent),
      "db-order" => Ok(FirstPolicy::DbOrder),
      other => Err(ConfigError::InvalidValue {
        key: FIRST_POLICY_VAR,
        value: other.to_string(),
      }),
    }
  }
}

impl fmt::Display for FirstPolicy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FirstPolicy::MostRecent => write!(f, "most-recent"),
      FirstPolicy::DbOrder => write!(f, "db-order"),
    }
  }
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {path}: {source}")]
  Read {
    path: String,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse config {path}: {source}")]
  Parse {
    path: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("invalid value for {key}: {value:?}")]
  InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Layout conventions turned into path prepends.
  pub prefix_inspections: Vec<Inspection>,
  /// Only inspect directories that exist under the prefix.
  pub check_prefix_dirs: bool,
  pub first_policy: FirstPolicy,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      prefix_inspections: default_inspections(),
      check_prefix_dirs: true,
      first_policy: FirstPolicy::default(),
    }
  }
}

impl Config {
  /// Load the user configuration with environment overrides applied.
  pub fn load() -> Result<Self, ConfigError> {
    let mut config = Self::from_file(&config_file())?;
    config.apply_env_overrides()?;
    Ok(config)
  }

  /// Read a config file. A missing file yields the defaults.
  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
      Err(source) => {
        return Err(ConfigError::Read {
          path: path.display().to_string(),
          source,
        });
      }
    };

    debug!(path = %path.display(), "loading config");
    let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.display().to_string(),
      source,
    })?;
    config.validate()?;
    Ok(config)
  }

  /// Every inspected variable must be a plain shell identifier.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let bad = self
      .prefix_inspections
      .iter()
      .flat_map(|row| &row.variables)
      .find(|name| !is_valid_name(name));
    match bad {
      Some(name) => Err(ConfigError::InvalidValue {
        key: "prefix_inspections",
        value: name.clone(),
      }),
      None => Ok(()),
    }
  }

  /// Apply `PKGENV_*` overrides from the process environment.
  pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
    if let Ok(value) = std::env::var(CHECK_PREFIX_DIRS_VAR) {
      self.check_prefix_dirs = match value.to_lowercase().as_str() {
        "1" | "true" | "yes" => true,
        "0" | "false" | "no" => false,
        _ => {
          return Err(ConfigError::InvalidValue {
            key: CHECK_PREFIX_DIRS_VAR,
            value,
          });
        }
      };
    }

    if let Ok(value) = std::env::var(FIRST_POLICY_VAR) {
      self.first_policy = value.parse()?;
    }

    Ok(())
  }

  pub fn inspector(&self) -> PrefixInspector {
    PrefixInspector::new(self.prefix_inspections.clone(), self.check_prefix_dirs)
  }
}
