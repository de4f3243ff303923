//! Parsing and matching of `name[@version][/hash]` queries.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::types::Spec;
use crate::util::hash::DagHash;

/// Errors produced while parsing a query string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
  #[error("empty query")]
  Empty,

  #[error("empty {component} in query '{query}'")]
  EmptyComponent { component: &'static str, query: String },

  #[error("invalid character {ch:?} in query '{query}'")]
  InvalidChar { ch: char, query: String },
}

/// A selector for installed specs.
///
/// Every present component must match; absent components match anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
  raw: String,
  pub name: Option<String>,
  pub version: Option<String>,
  pub hash_prefix: Option<String>,
}

impl Query {
  /// Whether `spec` satisfies this query.
  pub fn matches(&self, spec: &Spec) -> bool {
    let name_ok = self.name.as_deref().is_none_or(|name| name == spec.name);
    let version_ok = self
      .version
      .as_deref()
      .is_none_or(|version| version_matches(version, &spec.version));
    name_ok && version_ok && self.matches_hash(&spec.hash)
  }

  /// Whether the hash component (if any) matches `hash`.
  pub fn matches_hash(&self, hash: &DagHash) -> bool {
    self
      .hash_prefix
      .as_deref()
      .is_none_or(|prefix| hash.as_str().starts_with(prefix))
  }

  /// True for queries made only of a hash prefix, like `/abc123`.
  pub fn is_hash_only(&self) -> bool {
    self.name.is_none() && self.version.is_none() && self.hash_prefix.is_some()
  }

  pub fn as_str(&self) -> &str {
    &self.raw
  }
}

/// `1.2` matches `1.2` and `1.2.7`, but not `1.20`.
fn version_matches(wanted: &str, actual: &str) -> bool {
  match actual.strip_prefix(wanted) {
    Some(rest) => rest.is_empty() || rest.starts_with('.'),
    None => false,
  }
}

fn non_empty(value: &str, component: &'static str, query: &str) -> Result<String, QueryError> {
  if value.is_empty() {
    return Err(QueryError::EmptyComponent {
      component,
      query: query.to_string(),
    });
  }
  if let Some(ch) = value.chars().find(|c| c.is_whitespace()) {
    return Err(QueryError::InvalidChar {
      ch,
      query: query.to_string(),
    });
  }
  Ok(value.to_string())
}

impl FromStr for Query {
  type Err = QueryError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let raw = s.trim();
    if raw.is_empty() {
      return Err(QueryError::Empty);
    }

    let (head, hash_prefix) = match raw.split_once('/') {
      Some((head, hash)) => (head, Some(non_empty(hash, "hash", raw)?.to_lowercase())),
      None => (raw, None),
    };

    let (name, version) = if head.is_empty() {
      (None, None)
    } else {
      match head.split_once('@') {
        Some((name, version)) => (
          Some(non_empty(name, "name", raw)?),
          Some(non_empty(version, "version", raw)?),
        ),
        None => (Some(non_empty(head, "name", raw)?), None),
      }
    };

    Ok(Self {
      raw: raw.to_string(),
      name,
      version,
      hash_prefix,
    })
  }
}

impl fmt::Display for Query {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.raw)
  }
}
