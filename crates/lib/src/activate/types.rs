use std::fmt;

use thiserror::Error;

use crate::db::InstalledSpec;
use crate::env::VarChange;
use crate::hook::HookError;
use crate::shell::Dialect;
use crate::spec::{Query, QueryError};
use crate::traverse::TraverseError;
use crate::util::hash::DagHash;

/// Shown when no shell dialect is known.
pub const NO_SHELL_GUIDANCE: &str = "\
This command needs to change the environment of your shell, which a program cannot do by itself.
To set up shell support, add one of these to your shell startup file:

  eval \"$(pkgenv shell-init sh)\"              # bash, zsh, sh
  eval `pkgenv shell-init csh`                  # csh, tcsh
  pkgenv shell-init fish | source               # fish

Or pass --sh, --csh or --fish to print the commands for that shell.";

/// Stage of an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Resolving,
  Planning,
  Rendering,
  Done,
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Phase::Resolving => "resolving",
      Phase::Planning => "planning",
      Phase::Rendering => "rendering",
      Phase::Done => "done",
    };
    write!(f, "{name}")
  }
}

fn candidate_list(candidates: &[String]) -> String {
  candidates.iter().map(|c| format!("  {c}")).collect::<Vec<_>>().join("\n")
}

/// Errors that stop a load or unload.
#[derive(Debug, Error)]
pub enum ActivateError {
  #[error("invalid query: {0}")]
  InvalidQuery(#[from] QueryError),

  #[error("'{query}' matches no installed packages")]
  NoMatch { query: String },

  #[error(
    "'{query}' matches multiple packages:\n{}\nUse a more specific spec (e.g. prepend '/' to the hash), or pass --first to pick one.",
    candidate_list(.candidates)
  )]
  AmbiguousMatch { query: String, candidates: Vec<String> },

  #[error("'{query}' is not loaded in this shell")]
  NotLoaded { query: String },

  #[error("run environment setup failed: {0}")]
  HookFailure(#[from] HookError),

  #[error("{}", NO_SHELL_GUIDANCE)]
  NoShellSupport,

  #[error(transparent)]
  Traverse(#[from] TraverseError),
}

impl ActivateError {
  /// The phase the activation stopped in.
  pub fn phase(&self) -> Phase {
    match self {
      ActivateError::HookFailure(_) | ActivateError::Traverse(_) => Phase::Planning,
      _ => Phase::Resolving,
    }
  }
}

/// Options for a load.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
  /// Dialect to render for. When `None`, the shell integration decides.
  pub dialect: Option<Dialect>,
  /// Pick one spec instead of failing when a query is ambiguous.
  pub first: bool,
}

/// What an unload should remove.
#[derive(Debug, Clone)]
pub enum UnloadTarget {
  Queries(Vec<Query>),
  /// Every loaded root, most recently loaded first.
  All,
}

/// A root recorded in the ledger.
#[derive(Debug, Clone)]
pub struct LoadedRoot<'a> {
  pub hash: DagHash,
  /// `None` when the package has been uninstalled since it was loaded.
  pub installed: Option<&'a InstalledSpec>,
}

/// The result of a successful load or unload.
#[derive(Debug, Clone)]
pub struct Activation {
  pub dialect: Dialect,
  /// Roots that were loaded or unloaded, in request order.
  pub roots: Vec<DagHash>,
  /// Final value of every touched variable.
  pub changes: Vec<VarChange>,
  /// `changes` rendered for `dialect`.
  pub text: String,
}
