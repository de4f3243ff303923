//! The record of loaded roots, kept in the shell's own environment.
//!
//! The engine has no storage of its own between invocations. Which roots are
//! active in a shell is encoded as a colon-separated, duplicate-free list of
//! DAG hashes in `PKGENV_LOADED_HASHES`.

use crate::consts::LOADED_HASHES_VAR;
use crate::env::{EnvSnapshot, MutationOp};
use crate::util::hash::DagHash;

/// Ordered set of loaded root hashes, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
  hashes: Vec<DagHash>,
}

impl Ledger {
  pub fn new() -> Self {
    Self::default()
  }

  /// Read the ledger from an environment snapshot.
  pub fn read(env: &EnvSnapshot) -> Self {
    env.get(LOADED_HASHES_VAR).map(Self::parse).unwrap_or_default()
  }

  /// Decode a ledger value. Empty entries and duplicates are dropped.
  pub fn parse(value: &str) -> Self {
    let mut ledger = Self::new();
    for entry in value.split(':').filter(|e| !e.is_empty()) {
      ledger.add(DagHash::from(entry));
    }
    ledger
  }

  /// Append `hash` unless present. Returns whether it was added.
  pub fn add(&mut self, hash: DagHash) -> bool {
    if self.contains(&hash) {
      return false;
    }
    self.hashes.push(hash);
    true
  }

  /// Remove `hash`. Returns whether it was present.
  pub fn remove(&mut self, hash: &DagHash) -> bool {
    let before = self.hashes.len();
    self.hashes.retain(|h| h != hash);
    self.hashes.len() != before
  }

  pub fn contains(&self, hash: &DagHash) -> bool {
    self.hashes.contains(hash)
  }

  pub fn iter(&self) -> impl DoubleEndedIterator<Item = &DagHash> {
    self.hashes.iter()
  }

  pub fn len(&self) -> usize {
    self.hashes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.hashes.is_empty()
  }

  /// The variable's new value, or `None` when it should be unset.
  pub fn encode(&self) -> Option<String> {
    if self.hashes.is_empty() {
      return None;
    }
    Some(self.hashes.iter().map(DagHash::as_str).collect::<Vec<_>>().join(":"))
  }

  /// The operation that stores this ledger in the environment.
  pub fn to_op(&self) -> MutationOp {
    match self.encode() {
      Some(value) => MutationOp::SetVar {
        name: LOADED_HASHES_VAR.to_string(),
        value,
      },
      None => MutationOp::UnsetVar {
        name: LOADED_HASHES_VAR.to_string(),
      },
    }
  }
}
