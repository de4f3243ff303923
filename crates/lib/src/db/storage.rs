//! JSON-backed installation database.
//!
//! # Storage Layout
//!
//! ```text
//! {root}/db/
//! └── index.json      # DbIndex: every installed spec
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::InstalledSpecs;
use super::types::{DB_INDEX_VERSION, DbError, DbIndex, InstalledSpec};
use crate::platform::paths::db_dir;
use crate::util::hash::DagHash;

const INDEX_FILENAME: &str = "index.json";

/// Installed specs loaded from (and saved to) an index file.
#[derive(Debug, Clone)]
pub struct Database {
  path: PathBuf,
  index: DbIndex,
}

impl Database {
  /// An empty database that will be saved to `path`.
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      index: DbIndex::default(),
    }
  }

  /// Open the database at the default location (`{root}/db/index.json`).
  pub fn open_default() -> Result<Self, DbError> {
    Self::open(db_dir().join(INDEX_FILENAME))
  }

  /// Open the database at `path`.
  ///
  /// A missing file is an empty database.
  pub fn open(path: impl Into<PathBuf>) -> Result<Self, DbError> {
    let path = path.into();

    let content = match fs::read_to_string(&path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "no installation database, starting empty");
        return Ok(Self::new(path));
      }
      Err(source) => {
        return Err(DbError::Read {
          path: path.display().to_string(),
          source,
        });
      }
    };

    let mut index: DbIndex = serde_json::from_str(&content).map_err(|source| DbError::Parse {
      path: path.display().to_string(),
      source,
    })?;

    if index.version != DB_INDEX_VERSION {
      return Err(DbError::UnsupportedVersion(index.version));
    }

    for installed in index.specs.iter_mut().filter(|i| i.spec.hash.is_empty()) {
      let spec = &mut installed.spec;
      spec.hash = spec.compute_hash().map_err(|source| DbError::Hash {
        name: spec.name.clone(),
        source,
      })?;
    }

    debug!(path = %path.display(), specs = index.specs.len(), "opened installation database");
    Ok(Self { path, index })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Write the index.
  ///
  /// Uses atomic write (write to temp, then rename) to prevent corruption.
  pub fn save(&self) -> Result<(), DbError> {
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent).map_err(DbError::CreateDir)?;
    }

    let temp_path = self.path.with_extension("json.tmp");
    let content = serde_json::to_string_pretty(&self.index).map_err(DbError::Serialize)?;
    fs::write(&temp_path, &content).map_err(DbError::Write)?;
    fs::rename(&temp_path, &self.path).map_err(DbError::Write)?;

    Ok(())
  }

  /// Record an installed spec, replacing any record with the same hash.
  pub fn add(&mut self, installed: InstalledSpec) {
    match self.index.specs.iter_mut().find(|s| s.spec.hash == installed.spec.hash) {
      Some(existing) => *existing = installed,
      None => self.index.specs.push(installed),
    }
  }

  /// Forget a spec. Returns the removed record.
  pub fn remove(&mut self, hash: &DagHash) -> Option<InstalledSpec> {
    let pos = self.index.specs.iter().position(|s| &s.spec.hash == hash)?;
    Some(self.index.specs.remove(pos))
  }

  pub fn len(&self) -> usize {
    self.index.specs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.index.specs.is_empty()
  }
}

impl InstalledSpecs for Database {
  fn get(&self, hash: &DagHash) -> Option<&InstalledSpec> {
    self.index.specs.iter().find(|s| &s.spec.hash == hash)
  }

  fn all(&self) -> Vec<&InstalledSpec> {
    self.index.specs.iter().collect()
  }
}
