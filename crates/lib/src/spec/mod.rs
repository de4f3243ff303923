//! Installed package identities and the queries that select them.

mod query;
mod types;

pub use query::{Query, QueryError};
pub use types::{DepKind, DependencyEdge, Spec};
