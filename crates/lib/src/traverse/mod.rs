//! Runtime closure of an installed spec.
//!
//! Loading a package also loads everything it needs at runtime: the specs
//! reachable through link and run edges. Build-only and test-only edges are
//! not followed.

use std::collections::{BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use thiserror::Error;
use tracing::{debug, warn};

use crate::db::{InstalledSpec, InstalledSpecs};
use crate::util::hash::DagHash;

/// Errors that can occur while walking a dependency graph.
#[derive(Debug, Error)]
pub enum TraverseError {
  #[error("{dependent} depends on {hash}, which is not installed")]
  MissingDependency { dependent: String, hash: DagHash },

  #[error("dependency cycle detected below {0}")]
  CycleDetected(String),
}

/// What to do with a dependency that has no installation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
  /// Fail the traversal.
  Error,
  /// Leave the dependency (and anything only it leads to) out.
  Skip,
}

/// The runtime dependency graph below one root.
///
/// Edges point from a dependency to its dependent, so a topological order
/// lists dependencies first.
pub struct RuntimeDag<'a> {
  graph: DiGraph<&'a InstalledSpec, ()>,
  nodes: HashMap<DagHash, NodeIndex>,
  root: NodeIndex,
}

impl<'a> RuntimeDag<'a> {
  /// Collect every spec reachable from `root` through runtime edges.
  pub fn build<D: InstalledSpecs + ?Sized>(
    root: &'a InstalledSpec,
    db: &'a D,
    missing: MissingPolicy,
  ) -> Result<Self, TraverseError> {
    let mut graph = DiGraph::new();
    let mut nodes = HashMap::new();

    let root_idx = graph.add_node(root);
    nodes.insert(root.spec.hash.clone(), root_idx);

    let mut stack = vec![root_idx];
    while let Some(dependent_idx) = stack.pop() {
      let dependent: &'a InstalledSpec = graph[dependent_idx];

      for dep_hash in dependent.spec.runtime_dependencies() {
        let dep_idx = match nodes.get(dep_hash) {
          Some(&idx) => idx,
          None => {
            let Some(dep) = db.get(dep_hash) else {
              match missing {
                MissingPolicy::Error => {
                  return Err(TraverseError::MissingDependency {
                    dependent: dependent.spec.to_string(),
                    hash: dep_hash.clone(),
                  });
                }
                MissingPolicy::Skip => {
                  warn!(dependent = %dependent.spec, hash = %dep_hash, "skipping uninstalled dependency");
                  continue;
                }
              }
            };
            let idx = graph.add_node(dep);
            nodes.insert(dep_hash.clone(), idx);
            stack.push(idx);
            idx
          }
        };

        // Edge from dependency to dependent
        graph.update_edge(dep_idx, dependent_idx, ());
      }
    }

    let dag = Self {
      graph,
      nodes,
      root: root_idx,
    };

    toposort(&dag.graph, None).map_err(|_| TraverseError::CycleDetected(root.spec.to_string()))?;

    Ok(dag)
  }

  pub fn root(&self) -> &'a InstalledSpec {
    self.graph[self.root]
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn contains(&self, hash: &DagHash) -> bool {
    self.nodes.contains_key(hash)
  }

  /// Specs in activation order: every dependency before its dependents,
  /// the root last.
  ///
  /// Among specs that are ready at the same time, the one with the smallest
  /// (name, version, hash) goes first, so the order depends only on the
  /// graph, never on lookup or insertion order.
  pub fn activation_order(&self) -> Vec<&'a InstalledSpec> {
    let key = |idx: NodeIndex| {
      let spec = &self.graph[idx].spec;
      (spec.name.clone(), spec.version.clone(), spec.hash.clone(), idx)
    };

    let mut in_degree: HashMap<NodeIndex, usize> = self
      .graph
      .node_indices()
      .map(|idx| (idx, self.graph.neighbors_directed(idx, Direction::Incoming).count()))
      .collect();

    let mut ready: BTreeSet<_> = in_degree
      .iter()
      .filter(|&(_, &deg)| deg == 0)
      .map(|(&idx, _)| key(idx))
      .collect();

    let mut order = Vec::with_capacity(self.graph.node_count());
    while let Some(next) = ready.pop_first() {
      let idx = next.3;
      order.push(self.graph[idx]);

      for dependent in self.graph.neighbors_directed(idx, Direction::Outgoing) {
        if let Some(deg) = in_degree.get_mut(&dependent) {
          *deg = deg.saturating_sub(1);
          if *deg == 0 {
            ready.insert(key(dependent));
          }
        }
      }
    }

    debug!(
      root = %self.root().spec,
      order = ?order.iter().map(|s| s.spec.name.as_str()).collect::<Vec<_>>(),
      "runtime closure"
    );
    order
  }
}

/// The runtime closure of `root` in activation order.
pub fn runtime_closure<'a, D: InstalledSpecs + ?Sized>(
  root: &'a InstalledSpec,
  db: &'a D,
  missing: MissingPolicy,
) -> Result<Vec<&'a InstalledSpec>, TraverseError> {
  Ok(RuntimeDag::build(root, db, missing)?.activation_order())
}
