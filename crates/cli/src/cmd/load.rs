//! `pkgenv load`: emit shell code that loads packages.

use anyhow::Result;
use pkgenv_lib::activate::{Engine, LoadOptions};
use pkgenv_lib::env::EnvSnapshot;
use pkgenv_lib::hook::DeclaredRunEnv;
use serde::Serialize;
use tracing::debug;

use super::{ShellFlags, open_state, parse_queries};
use crate::output::{OutputFormat, print_info, print_json, print_loaded_line};

pub fn cmd_load(specs: &[String], shell: ShellFlags, first: bool) -> Result<()> {
  let queries = parse_queries(specs)?;
  let env = EnvSnapshot::from_process();
  let dialect = shell.select(&env)?;

  let (config, db) = open_state()?;
  let hook = DeclaredRunEnv;
  let engine = Engine::new(&db, &hook, &config);

  let options = LoadOptions {
    dialect: Some(dialect),
    first,
  };
  let activation = engine.load(&queries, &options, &env)?;
  debug!(dialect = %activation.dialect, roots = activation.roots.len(), "load planned");

  print!("{}", activation.text);
  Ok(())
}

#[derive(Serialize)]
struct LoadedEntry<'a> {
  hash: &'a str,
  name: Option<&'a str>,
  version: Option<&'a str>,
  prefix: Option<String>,
}

/// `pkgenv load --list`
pub fn cmd_list(output: OutputFormat) -> Result<()> {
  let (config, db) = open_state()?;
  let hook = DeclaredRunEnv;
  let engine = Engine::new(&db, &hook, &config);
  let loaded = engine.loaded(&EnvSnapshot::from_process());

  if output.is_json() {
    let entries: Vec<_> = loaded
      .iter()
      .map(|root| LoadedEntry {
        hash: root.hash.as_str(),
        name: root.installed.map(|i| i.spec.name.as_str()),
        version: root.installed.map(|i| i.spec.version.as_str()),
        prefix: root.installed.map(|i| i.spec.prefix.display().to_string()),
      })
      .collect();
    return print_json(&entries);
  }

  if loaded.is_empty() {
    print_info("No packages loaded");
    return Ok(());
  }

  print_info(&format!("{} loaded package(s):", loaded.len()));
  for root in &loaded {
    match root.installed {
      Some(installed) => print_loaded_line(&installed.spec.to_string(), &installed.spec.prefix.display().to_string()),
      None => print_loaded_line(&format!("/{}", root.hash.short()), "(no longer installed)"),
    }
  }
  Ok(())
}
