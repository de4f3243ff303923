//! `pkgenv unload`: emit shell code that unloads packages.

use anyhow::Result;
use pkgenv_lib::activate::{Engine, UnloadTarget};
use pkgenv_lib::env::EnvSnapshot;
use pkgenv_lib::hook::DeclaredRunEnv;
use tracing::debug;

use super::{ShellFlags, open_state, parse_queries};
use crate::output::print_warning;

pub fn cmd_unload(specs: &[String], shell: ShellFlags, all: bool) -> Result<()> {
  let target = if all {
    UnloadTarget::All
  } else {
    UnloadTarget::Queries(parse_queries(specs)?)
  };

  let env = EnvSnapshot::from_process();
  let dialect = shell.select(&env)?;

  let (config, db) = open_state()?;
  let hook = DeclaredRunEnv;
  let engine = Engine::new(&db, &hook, &config);

  if all && engine.loaded(&env).is_empty() {
    print_warning("No packages are loaded");
  }

  let activation = engine.unload(&target, Some(dialect), &env)?;
  debug!(dialect = %activation.dialect, roots = activation.roots.len(), "unload planned");

  print!("{}", activation.text);
  Ok(())
}
