//! Shared helpers for activation tests.

use std::path::PathBuf;

use pkgenv_lib::activate::{Activation, Engine, LoadOptions};
use pkgenv_lib::config::Config;
use pkgenv_lib::db::{Database, InstalledSpec, InstalledSpecs};
use pkgenv_lib::env::{EnvSnapshot, MutationOp};
use pkgenv_lib::hook::DeclaredRunEnv;
use pkgenv_lib::shell::Dialect;
use pkgenv_lib::spec::{DepKind, DependencyEdge, Query, Spec};
use tempfile::TempDir;

/// An installation database whose prefixes exist on disk.
pub struct Fixture {
  pub temp: TempDir,
  pub db: Database,
  pub hook: DeclaredRunEnv,
  pub config: Config,
}

impl Fixture {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let db = Database::new(temp.path().join("db").join("index.json"));
    Self {
      temp,
      db,
      hook: DeclaredRunEnv,
      config: Config::default(),
    }
  }

  /// Install prefix for `name`, canonicalized.
  pub fn prefix(&self, name: &str, version: &str) -> PathBuf {
    let root = dunce::canonicalize(self.temp.path()).unwrap();
    root.join("opt").join(format!("{name}-{version}"))
  }

  /// Record an installation with `bin` and `man` directories.
  pub fn install(&mut self, name: &str, version: &str, deps: &[(&InstalledSpec, DepKind)]) -> InstalledSpec {
    self.install_with(name, version, deps, 0, Vec::new())
  }

  pub fn install_with(
    &mut self,
    name: &str,
    version: &str,
    deps: &[(&InstalledSpec, DepKind)],
    installed_at: u64,
    run_env: Vec<MutationOp>,
  ) -> InstalledSpec {
    let prefix = self.prefix(name, version);
    std::fs::create_dir_all(prefix.join("bin")).unwrap();
    std::fs::create_dir_all(prefix.join("man")).unwrap();

    let edges = deps
      .iter()
      .map(|(dep, kind)| DependencyEdge::new(dep.spec.hash.clone(), [*kind]))
      .collect();
    let spec = Spec::new(name, version, prefix, edges).unwrap();
    let record = InstalledSpec::new(spec, installed_at).with_run_env(run_env);
    self.db.add(record.clone());
    record
  }

  pub fn engine(&self) -> Engine<'_, Database, DeclaredRunEnv> {
    Engine::new(&self.db, &self.hook, &self.config)
  }

  pub fn bin(&self, installed: &InstalledSpec) -> String {
    installed.spec.prefix.join("bin").to_string_lossy().into_owned()
  }

  pub fn man(&self, installed: &InstalledSpec) -> String {
    installed.spec.prefix.join("man").to_string_lossy().into_owned()
  }

  pub fn bin_of(&self, name: &str, version: &str) -> String {
    self.prefix(name, version).join("bin").to_string_lossy().into_owned()
  }

  /// Full hash of the installed `name@version`.
  pub fn db_hash(&self, name: &str, version: &str) -> String {
    self
      .db
      .all()
      .into_iter()
      .find(|i| i.spec.name == name && i.spec.version == version)
      .map(|i| i.spec.hash.to_string())
      .unwrap()
  }
}

/// The mpileaks family: mpileaks -> callpath -> dyninst -> libelf, with
/// mpich linked by both mpileaks and callpath and cmake as a build tool.
pub struct Mpileaks {
  pub fixture: Fixture,
  pub libelf: InstalledSpec,
  pub dyninst: InstalledSpec,
  pub mpich: InstalledSpec,
  pub callpath: InstalledSpec,
  pub cmake: InstalledSpec,
  pub mpileaks: InstalledSpec,
}

impl Mpileaks {
  pub fn new() -> Self {
    let mut fixture = Fixture::new();
    let libelf = fixture.install("libelf", "0.8.13", &[]);
    let dyninst = fixture.install("dyninst", "8.2", &[(&libelf, DepKind::Link)]);
    let mpich = fixture.install("mpich", "3.0.4", &[]);
    let callpath = fixture.install("callpath", "1.0", &[(&dyninst, DepKind::Link), (&mpich, DepKind::Link)]);
    let cmake = fixture.install("cmake", "3.27", &[]);
    let mpileaks = fixture.install_with(
      "mpileaks",
      "2.3",
      &[
        (&callpath, DepKind::Link),
        (&mpich, DepKind::Link),
        (&cmake, DepKind::Build),
      ],
      0,
      vec![MutationOp::SetVar {
        name: "FOOBAR".to_string(),
        value: "$${name}".to_string(),
      }],
    );
    Self {
      fixture,
      libelf,
      dyninst,
      mpich,
      callpath,
      cmake,
      mpileaks,
    }
  }
}

pub fn queries(specs: &[&str]) -> Vec<Query> {
  specs.iter().map(|s| s.parse().unwrap()).collect()
}

pub fn sh() -> LoadOptions {
  LoadOptions {
    dialect: Some(Dialect::Sh),
    first: false,
  }
}

/// The environment after evaluating `activation`.
pub fn apply(env: &EnvSnapshot, activation: &Activation) -> EnvSnapshot {
  let mut next = env.clone();
  for change in &activation.changes {
    match &change.value {
      Some(value) => next.set(&change.name, value),
      None => next.unset(&change.name),
    }
  }
  next
}
