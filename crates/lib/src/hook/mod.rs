//! The per-package "setup run environment" seam.
//!
//! Besides prefix inspections, a package may need arbitrary variables at
//! runtime (`PYTHONPATH` entries, a `FOO_HOME`, ...). A [`RunEnvHook`]
//! contributes those operations for one installed spec. The shipped
//! [`DeclaredRunEnv`] replays what the package declared at install time.

pub mod placeholder;

use thiserror::Error;

use crate::db::InstalledSpec;
use crate::env::{MutationOp, MutationSet, is_valid_name};

pub use placeholder::PlaceholderError;

/// Errors raised by a run-environment hook.
#[derive(Debug, Error)]
pub enum HookError {
  #[error("{package}: bad placeholder in {variable}: {source}")]
  Placeholder {
    package: String,
    variable: String,
    #[source]
    source: PlaceholderError,
  },

  #[error("{package}: invalid variable name {variable:?}")]
  InvalidName { package: String, variable: String },

  #[error("{package}: {message}")]
  Failed { package: String, message: String },
}

/// Contributes run-environment operations for one package.
pub trait RunEnvHook {
  /// Push the package's operations onto `env`.
  ///
  /// On error the caller discards everything pushed for the current load.
  fn setup_run_environment(&self, installed: &InstalledSpec, env: &mut MutationSet) -> Result<(), HookError>;
}

/// Replays the operations recorded in the installation database.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredRunEnv;

impl RunEnvHook for DeclaredRunEnv {
  fn setup_run_environment(&self, installed: &InstalledSpec, env: &mut MutationSet) -> Result<(), HookError> {
    let spec = &installed.spec;
    let expand = |variable: &str, value: &str| {
      placeholder::substitute(value, spec).map_err(|source| HookError::Placeholder {
        package: spec.name.clone(),
        variable: variable.to_string(),
        source,
      })
    };

    for op in &installed.run_env {
      if !is_valid_name(op.name()) {
        return Err(HookError::InvalidName {
          package: spec.name.clone(),
          variable: op.name().to_string(),
        });
      }
      let resolved = match op {
        MutationOp::SetVar { name, value } => MutationOp::SetVar {
          name: name.clone(),
          value: expand(name, value)?,
        },
        MutationOp::UnsetVar { name } => MutationOp::UnsetVar { name: name.clone() },
        MutationOp::PrependPath { name, value, separator } => MutationOp::PrependPath {
          name: name.clone(),
          value: expand(name, value)?,
          separator: *separator,
        },
        MutationOp::AppendPath { name, value, separator } => MutationOp::AppendPath {
          name: name.clone(),
          value: expand(name, value)?,
          separator: *separator,
        },
      };
      env.push(resolved);
    }

    Ok(())
  }
}
