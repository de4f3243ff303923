use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::env::MutationOp;
use crate::spec::Spec;
use crate::util::hash::HashError;

/// Current version of the index file format.
pub const DB_INDEX_VERSION: u32 = 1;

/// One installed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledSpec {
  #[serde(flatten)]
  pub spec: Spec,

  /// Unix timestamp (seconds) of the installation.
  #[serde(default)]
  pub installed_at: u64,

  /// Operations the package declared for its run environment. Values may
  /// use `$${prefix}`-style placeholders.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub run_env: Vec<MutationOp>,
}

impl InstalledSpec {
  pub fn new(spec: Spec, installed_at: u64) -> Self {
    Self {
      spec,
      installed_at,
      run_env: Vec::new(),
    }
  }

  pub fn with_run_env(mut self, run_env: Vec<MutationOp>) -> Self {
    self.run_env = run_env;
    self
  }
}

/// On-disk index of installed specs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbIndex {
  pub version: u32,
  #[serde(default)]
  pub specs: Vec<InstalledSpec>,
}

impl Default for DbIndex {
  fn default() -> Self {
    Self {
      version: DB_INDEX_VERSION,
      specs: Vec::new(),
    }
  }
}

/// Errors that can occur when working with the installation database.
#[derive(Debug, Error)]
pub enum DbError {
  #[error("failed to read installation database {path}: {source}")]
  Read {
    path: String,
    #[source]
    source: io::Error,
  },

  #[error("failed to write installation database: {0}")]
  Write(#[source] io::Error),

  #[error("failed to create database directory: {0}")]
  CreateDir(#[source] io::Error),

  #[error("failed to parse installation database {path}: {source}")]
  Parse {
    path: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to serialize installation database: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("unsupported installation database version: {0}")]
  UnsupportedVersion(u32),

  #[error("failed to hash {name}: {source}")]
  Hash {
    name: String,
    #[source]
    source: HashError,
  },
}
