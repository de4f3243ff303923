//! Ordered, mergeable environment mutations.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::path::{append_entry, prepend_entry, remove_block};
use super::snapshot::EnvSnapshot;
use crate::consts::PATH_SEPARATOR;

fn default_separator() -> char {
  PATH_SEPARATOR
}

/// One operation on one environment variable.
///
/// Serialized form (as declared in an installed package's run environment):
///
/// ```json
/// { "op": "prepend-path", "name": "PYTHONPATH", "value": "$${prefix}/lib/python3" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum MutationOp {
  /// Assign a value, replacing anything present.
  #[serde(rename = "set")]
  SetVar { name: String, value: String },

  /// Remove the variable.
  #[serde(rename = "unset")]
  UnsetVar { name: String },

  /// Put `value` in front of the variable's current entries.
  PrependPath {
    name: String,
    value: String,
    #[serde(default = "default_separator")]
    separator: char,
  },

  /// Put `value` after the variable's current entries.
  AppendPath {
    name: String,
    value: String,
    #[serde(default = "default_separator")]
    separator: char,
  },
}

impl MutationOp {
  pub fn name(&self) -> &str {
    match self {
      MutationOp::SetVar { name, .. }
      | MutationOp::UnsetVar { name }
      | MutationOp::PrependPath { name, .. }
      | MutationOp::AppendPath { name, .. } => name,
    }
  }

  /// Whether this op replaces the variable outright rather than editing a list.
  pub fn is_absolute(&self) -> bool {
    matches!(self, MutationOp::SetVar { .. } | MutationOp::UnsetVar { .. })
  }

  /// Apply this op to `env`.
  pub fn apply(&self, env: &mut EnvSnapshot) {
    match self {
      MutationOp::SetVar { name, value } => env.set(name.as_str(), value.as_str()),
      MutationOp::UnsetVar { name } => env.unset(name),
      MutationOp::PrependPath { name, value, separator } => {
        let updated = prepend_entry(value, env.get(name), *separator);
        env.set(name.as_str(), updated);
      }
      MutationOp::AppendPath { name, value, separator } => {
        let updated = append_entry(value, env.get(name), *separator);
        env.set(name.as_str(), updated);
      }
    }
  }
}

/// Whether `name` can be emitted as a variable name in every dialect:
/// `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_name(name: &str) -> bool {
  let mut chars = name.chars();
  chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The final state of one variable after a mutation set is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarChange {
  pub name: String,
  /// `None` means the variable ends up unset.
  pub value: Option<String>,
}

/// An ordered sequence of [`MutationOp`]s.
///
/// Operations are replayed strictly in insertion order, so later operations
/// on the same variable compose with earlier ones: prepending `a` and then
/// `b` to `PATH` yields `b:a:<rest>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MutationSet {
  ops: Vec<MutationOp>,
}

impl MutationSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, op: MutationOp) {
    self.ops.push(op);
  }

  pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.push(MutationOp::SetVar {
      name: name.into(),
      value: value.into(),
    });
  }

  pub fn unset(&mut self, name: impl Into<String>) {
    self.push(MutationOp::UnsetVar { name: name.into() });
  }

  pub fn prepend_path(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.push(MutationOp::PrependPath {
      name: name.into(),
      value: value.into(),
      separator: PATH_SEPARATOR,
    });
  }

  pub fn append_path(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.push(MutationOp::AppendPath {
      name: name.into(),
      value: value.into(),
      separator: PATH_SEPARATOR,
    });
  }

  /// Append all of `other`'s operations after this set's own.
  pub fn merge(&mut self, other: MutationSet) {
    self.ops.extend(other.ops);
  }

  pub fn ops(&self) -> &[MutationOp] {
    &self.ops
  }

  pub fn len(&self) -> usize {
    self.ops.len()
  }

  pub fn is_empty(&self) -> bool {
    self.ops.is_empty()
  }

  /// Variable names in the order they are first touched.
  pub fn touched(&self) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for op in &self.ops {
      if !names.contains(&op.name()) {
        names.push(op.name());
      }
    }
    names
  }

  /// Replay every operation onto `env`.
  pub fn apply_to(&self, env: &mut EnvSnapshot) {
    for op in &self.ops {
      op.apply(env);
    }
  }

  /// Replay this set against a copy of `env` and report each touched
  /// variable's final value, in first-touch order.
  ///
  /// Values are fully resolved (existing content included), so the result
  /// does not depend on the environment it is later evaluated in.
  pub fn resolve(&self, env: &EnvSnapshot) -> Vec<VarChange> {
    let mut working = env.clone();
    self.apply_to(&mut working);

    self
      .touched()
      .into_iter()
      .map(|name| VarChange {
        name: name.to_string(),
        value: working.get(name).map(str::to_string),
      })
      .collect()
  }

  /// Compute the set that undoes this one, given the `live` environment it
  /// was applied to.
  ///
  /// Path-list edits are undone by cutting exactly the entries this set
  /// added out of the live value; anything else in the variable, including
  /// an empty trailing slot, survives. A variable left empty goes back to
  /// its `prior` value, or is unset when there is none.
  /// Variables this set assigned or unset outright are restored from
  /// `prior` when it knows a value, and unset otherwise.
  pub fn invert(&self, live: &EnvSnapshot, prior: impl Fn(&str) -> Option<String>) -> MutationSet {
    let mut inverse = MutationSet::new();

    for name in self.touched() {
      let ops: Vec<&MutationOp> = self.ops.iter().filter(|op| op.name() == name).collect();

      if ops.iter().any(|op| op.is_absolute()) {
        match prior(name) {
          Some(value) => inverse.set(name, value),
          None => inverse.unset(name),
        }
        continue;
      }

      let Some(current) = live.get(name) else {
        continue;
      };

      let mut separator = PATH_SEPARATOR;
      let mut front: Vec<String> = Vec::new();
      let mut back: Vec<String> = Vec::new();
      for op in &ops {
        match op {
          MutationOp::PrependPath { value, separator: sep, .. } => {
            separator = *sep;
            let mut entries: Vec<String> = value.split(*sep).map(String::from).collect();
            entries.append(&mut front);
            front = entries;
          }
          MutationOp::AppendPath { value, separator: sep, .. } => {
            separator = *sep;
            back.extend(value.split(*sep).map(String::from));
          }
          MutationOp::SetVar { .. } | MutationOp::UnsetVar { .. } => {}
        }
      }

      let mut entries: Vec<String> = current.split(separator).map(String::from).collect();
      let front_exact = remove_block(&mut entries, &front, false);
      let back_exact = remove_block(&mut entries, &back, true);
      if !front_exact || !back_exact {
        warn!(variable = name, "entries were reordered since load; removed them one by one");
      }

      let remainder = entries.join(&separator.to_string());
      if !remainder.is_empty() {
        inverse.set(name, remainder);
      } else if let Some(value) = prior(name) {
        inverse.set(name, value);
      } else {
        inverse.unset(name);
      }
    }

    inverse
  }
}

impl FromIterator<MutationOp> for MutationSet {
  fn from_iter<I: IntoIterator<Item = MutationOp>>(iter: I) -> Self {
    Self {
      ops: iter.into_iter().collect(),
    }
  }
}

impl IntoIterator for MutationSet {
  type Item = MutationOp;
  type IntoIter = std::vec::IntoIter<MutationOp>;

  fn into_iter(self) -> Self::IntoIter {
    self.ops.into_iter()
  }
}
