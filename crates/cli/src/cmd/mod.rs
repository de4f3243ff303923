mod load;
mod shell_init;
mod unload;

pub use load::{cmd_list, cmd_load};
pub use shell_init::cmd_shell_init;
pub use unload::cmd_unload;

use anyhow::{Context, Result};
use clap::Args;
use pkgenv_lib::activate::ActivateError;
use pkgenv_lib::config::Config;
use pkgenv_lib::db::Database;
use pkgenv_lib::env::EnvSnapshot;
use pkgenv_lib::shell::Dialect;
use pkgenv_lib::spec::Query;

/// Dialect selection shared by `load` and `unload`.
#[derive(Args, Debug, Clone, Copy)]
#[group(multiple = false)]
pub struct ShellFlags {
  /// Print sh/bash/zsh commands
  #[arg(long)]
  sh: bool,

  /// Print csh/tcsh commands
  #[arg(long)]
  csh: bool,

  /// Print fish commands
  #[arg(long)]
  fish: bool,
}

impl ShellFlags {
  /// The requested dialect; `None` defers to the shell integration.
  pub fn dialect(self) -> Option<Dialect> {
    if self.sh {
      Some(Dialect::Sh)
    } else if self.csh {
      Some(Dialect::Csh)
    } else if self.fish {
      Some(Dialect::Fish)
    } else {
      None
    }
  }

  /// The flag's dialect, else the one announced by the shell integration.
  ///
  /// Checked before any state is opened, so a shell that cannot evaluate
  /// our output always gets the setup guidance.
  pub fn select(self, env: &EnvSnapshot) -> Result<Dialect> {
    let dialect = self
      .dialect()
      .or_else(|| Dialect::from_integration(env))
      .ok_or(ActivateError::NoShellSupport)?;
    Ok(dialect)
  }
}

fn parse_queries(specs: &[String]) -> Result<Vec<Query>> {
  specs
    .iter()
    .map(|spec| spec.parse::<Query>().with_context(|| format!("Invalid spec '{spec}'")))
    .collect()
}

fn open_state() -> Result<(Config, Database)> {
  let config = Config::load().context("Failed to load configuration")?;
  let db = Database::open_default().context("Failed to open installation database")?;
  Ok((config, db))
}
