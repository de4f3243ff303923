//! Content hashing for installed specs.
//!
//! A spec's DAG hash is a truncated SHA-256 of its canonical JSON form. Since
//! dependency edges are recorded by hash, a change anywhere below a spec
//! changes the spec's own hash.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::consts::DAG_HASH_LEN;

pub type HashError = serde_json::Error;

/// A content-addressed hash identifying one installed spec.
///
/// # Format
///
/// A lowercase hexadecimal string, e.g. `"4f1c0d2e9a7b6c5d4e3f2a1b0c9d8e7f"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DagHash(pub String);

impl DagHash {
  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// The abbreviated form shown to users.
  ///
  /// Counts characters, not bytes: ledger entries are read from the shell
  /// and need not be hex.
  pub fn short(&self) -> &str {
    let end = self
      .0
      .char_indices()
      .nth(crate::consts::SHORT_HASH_LEN)
      .map_or(self.0.len(), |(i, _)| i);
    &self.0[..end]
  }
}

impl std::fmt::Display for DagHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<&str> for DagHash {
  fn from(value: &str) -> Self {
    DagHash(value.to_string())
  }
}

pub trait Hashable: Serialize {
  fn compute_hash(&self) -> Result<DagHash, HashError> {
    let serialized = serde_json::to_string(self)?;
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    let full = format!("{:x}", hasher.finalize());
    Ok(DagHash(full[..DAG_HASH_LEN].to_string()))
  }
}
