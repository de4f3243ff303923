//! Load and unload planning.
//!
//! An activation moves through `Resolving -> Planning -> Rendering -> Done`,
//! or stops in `Resolving`/`Planning` with an [`ActivateError`]. Nothing is
//! emitted unless every requested root made it through planning.
//!
//! Unload keeps no log of what a load applied. It recomputes the load plan
//! from the installation database and inverts it against the live
//! environment, which is sound only because planning is deterministic: the
//! same root and the same installed state always give the same
//! [`MutationSet`](crate::env::MutationSet).

mod engine;
mod resolve;
mod types;

pub use engine::{Engine, prior_var};
pub use types::{ActivateError, Activation, LoadOptions, LoadedRoot, NO_SHELL_GUIDANCE, Phase, UnloadTarget};
