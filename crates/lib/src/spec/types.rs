//! Types describing a resolved, installed package.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::util::hash::{DagHash, HashError, Hashable};

/// The role a dependency plays for its dependent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepKind {
  /// Needed only while building the dependent.
  Build,
  /// Linked into the dependent; required at runtime.
  Link,
  /// Invoked by the dependent at runtime.
  Run,
  /// Needed only by the dependent's test suite.
  Test,
}

impl DepKind {
  /// Whether this kind makes the dependency part of the runtime closure.
  pub fn is_runtime(self) -> bool {
    matches!(self, DepKind::Link | DepKind::Run)
  }
}

/// An edge from a spec to one of its dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
  /// DAG hash of the dependency.
  pub hash: DagHash,
  /// Every kind under which the dependency is required.
  pub kinds: BTreeSet<DepKind>,
}

impl DependencyEdge {
  pub fn new(hash: DagHash, kinds: impl IntoIterator<Item = DepKind>) -> Self {
    Self {
      hash,
      kinds: kinds.into_iter().collect(),
    }
  }

  /// True if any of the edge's kinds is needed at runtime.
  pub fn is_runtime(&self) -> bool {
    self.kinds.iter().any(|kind| kind.is_runtime())
  }
}

/// A fully resolved package identity as recorded by the installation database.
///
/// Specs are immutable once installed; the engine only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spec {
  /// Derived with [`Spec::compute_hash`] when a record omits it.
  #[serde(default)]
  pub hash: DagHash,
  pub name: String,
  pub version: String,
  /// Installation prefix.
  pub prefix: PathBuf,
  #[serde(default)]
  pub dependencies: Vec<DependencyEdge>,
}

/// The hashed part of a spec. The prefix is excluded so that relocating an
/// installation does not change its identity.
#[derive(Serialize)]
struct SpecIdentity<'a> {
  name: &'a str,
  version: &'a str,
  dependencies: &'a [DependencyEdge],
}

impl Hashable for SpecIdentity<'_> {}

impl Spec {
  /// Create a spec, deriving its DAG hash from name, version and dependencies.
  pub fn new(
    name: impl Into<String>,
    version: impl Into<String>,
    prefix: impl Into<PathBuf>,
    dependencies: Vec<DependencyEdge>,
  ) -> Result<Self, HashError> {
    let mut spec = Self {
      hash: DagHash::default(),
      name: name.into(),
      version: version.into(),
      prefix: prefix.into(),
      dependencies,
    };
    spec.hash = spec.compute_hash()?;
    Ok(spec)
  }

  /// The DAG hash of this spec's identity: name, version and dependencies.
  pub fn compute_hash(&self) -> Result<DagHash, HashError> {
    SpecIdentity {
      name: &self.name,
      version: &self.version,
      dependencies: &self.dependencies,
    }
    .compute_hash()
  }

  /// Hashes of dependencies reachable through link or run edges.
  pub fn runtime_dependencies(&self) -> impl Iterator<Item = &DagHash> {
    self
      .dependencies
      .iter()
      .filter(|edge| edge.is_runtime())
      .map(|edge| &edge.hash)
  }
}

impl fmt::Display for Spec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}@{} /{}", self.name, self.version, self.hash.short())
  }
}
