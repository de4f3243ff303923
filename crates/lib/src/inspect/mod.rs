//! Prefix inspections: install-layout conventions mapped to path variables.
//!
//! A package installed with a `bin` directory gets it on `PATH`, one with
//! `share/man` gets it on `MANPATH`, and so on. The table is configurable;
//! [`default_inspections`] is used otherwise.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::env::MutationSet;

/// One row of the inspection table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspection {
  /// Path relative to the install prefix. Empty means the prefix itself.
  pub subdir: String,
  /// Variables the directory is prepended to.
  pub variables: Vec<String>,
}

impl Inspection {
  pub fn new(subdir: &str, variables: &[&str]) -> Self {
    Self {
      subdir: subdir.to_string(),
      variables: variables.iter().map(|v| v.to_string()).collect(),
    }
  }

  fn path_under(&self, prefix: &Path) -> PathBuf {
    if self.subdir.is_empty() {
      prefix.to_path_buf()
    } else {
      prefix.join(&self.subdir)
    }
  }
}

/// The built-in inspection table.
pub fn default_inspections() -> Vec<Inspection> {
  vec![
    Inspection::new("bin", &["PATH"]),
    Inspection::new("man", &["MANPATH"]),
    Inspection::new("share/man", &["MANPATH"]),
    Inspection::new("share/aclocal", &["ACLOCAL_PATH"]),
    Inspection::new("lib/pkgconfig", &["PKG_CONFIG_PATH"]),
    Inspection::new("lib64/pkgconfig", &["PKG_CONFIG_PATH"]),
    Inspection::new("share/pkgconfig", &["PKG_CONFIG_PATH"]),
    Inspection::new("", &["CMAKE_PREFIX_PATH"]),
  ]
}

/// Turns an install prefix into `PrependPath` operations.
#[derive(Debug, Clone)]
pub struct PrefixInspector {
  table: Vec<Inspection>,
  check_exists: bool,
}

impl Default for PrefixInspector {
  fn default() -> Self {
    Self::new(default_inspections(), true)
  }
}

impl PrefixInspector {
  /// With `check_exists` off, every row applies whether or not the
  /// directory is present.
  pub fn new(table: Vec<Inspection>, check_exists: bool) -> Self {
    Self { table, check_exists }
  }

  pub fn table(&self) -> &[Inspection] {
    &self.table
  }

  /// Operations for `prefix`, in table order.
  pub fn inspect(&self, prefix: &Path) -> MutationSet {
    let mut set = MutationSet::new();

    for row in &self.table {
      let path = row.path_under(prefix);
      if self.check_exists && !path.is_dir() {
        continue;
      }

      let value = path.to_string_lossy();
      for variable in &row.variables {
        trace!(variable = %variable, path = %value, "prefix inspection");
        set.prepend_path(variable.as_str(), value.to_string());
      }
    }

    set
  }
}
