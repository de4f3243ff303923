//! Read access to installed specs.
//!
//! Installing packages is outside this crate; the engine only needs to look
//! records up. [`InstalledSpecs`] is that seam and [`Database`] the JSON
//! index shipped with the CLI.

mod storage;
mod types;

pub use storage::Database;
pub use types::{DB_INDEX_VERSION, DbError, DbIndex, InstalledSpec};

use crate::util::hash::DagHash;

/// Lookup of installed specs.
pub trait InstalledSpecs {
  /// The record for `hash`, if installed.
  fn get(&self, hash: &DagHash) -> Option<&InstalledSpec>;

  /// Every record, in database order.
  fn all(&self) -> Vec<&InstalledSpec>;
}
