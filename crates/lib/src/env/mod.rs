//! Environment snapshots and the mutation sets applied to them.
//!
//! The engine never touches the process environment of the caller's shell.
//! It reads an [`EnvSnapshot`], plans a [`MutationSet`], and resolves that set
//! against the snapshot into [`VarChange`]s for a shell to evaluate.

mod mutation;
mod path;
mod snapshot;

pub use mutation::{MutationOp, MutationSet, VarChange, is_valid_name};
pub use path::{append_entry, prepend_entry, remove_block};
pub use snapshot::EnvSnapshot;
