//! The loaded-roots ledger across load and unload.

use pkgenv_lib::activate::UnloadTarget;
use pkgenv_lib::consts::LOADED_HASHES_VAR;
use pkgenv_lib::env::EnvSnapshot;
use pkgenv_lib::shell::Dialect;

use super::common::{Mpileaks, apply, queries, sh};

#[test]
fn load_records_root_only() {
  let m = Mpileaks::new();
  let after = apply(
    &EnvSnapshot::new(),
    &m.fixture
      .engine()
      .load(&queries(&["mpileaks"]), &sh(), &EnvSnapshot::new())
      .unwrap(),
  );
  assert_eq!(after.get(LOADED_HASHES_VAR), Some(m.mpileaks.spec.hash.as_str()));
}

#[test]
fn loading_twice_keeps_one_entry() {
  let m = Mpileaks::new();
  let engine = m.fixture.engine();
  let env = EnvSnapshot::new().with("PATH", "/usr/bin");

  let once = apply(&env, &engine.load(&queries(&["mpileaks"]), &sh(), &env).unwrap());
  let twice = apply(&once, &engine.load(&queries(&["mpileaks"]), &sh(), &once).unwrap());
  assert_eq!(once, twice);
  assert_eq!(engine.loaded(&twice).len(), 1);
}

#[test]
fn roots_are_listed_in_load_order() {
  let m = Mpileaks::new();
  let engine = m.fixture.engine();
  let env = EnvSnapshot::new();

  let env = apply(&env, &engine.load(&queries(&["cmake"]), &sh(), &env).unwrap());
  let env = apply(&env, &engine.load(&queries(&["libelf"]), &sh(), &env).unwrap());
  let names: Vec<_> = engine
    .loaded(&env)
    .iter()
    .map(|root| root.installed.unwrap().spec.name.clone())
    .collect();
  assert_eq!(names, vec!["cmake", "libelf"]);
}

#[test]
fn unload_leaves_unknown_entries_alone() {
  let m = Mpileaks::new();
  let hash = m.mpileaks.spec.hash.as_str();
  let env = EnvSnapshot::new()
    .with("FOOBAR", "mpileaks")
    .with(LOADED_HASHES_VAR, format!("{hash}:garbage"));

  let activation = m
    .fixture
    .engine()
    .unload(&UnloadTarget::Queries(queries(&["mpileaks"])), Some(Dialect::Sh), &env)
    .unwrap();
  assert!(activation.text.contains("unset FOOBAR;"));
  assert!(activation.text.contains(&format!("export {LOADED_HASHES_VAR}=garbage;")));
}

#[test]
fn unloading_last_root_unsets_ledger() {
  let m = Mpileaks::new();
  let engine = m.fixture.engine();
  let env = EnvSnapshot::new();
  let loaded = apply(&env, &engine.load(&queries(&["libelf"]), &sh(), &env).unwrap());

  let activation = engine
    .unload(&UnloadTarget::Queries(queries(&["libelf"])), Some(Dialect::Sh), &loaded)
    .unwrap();
  assert!(activation.text.contains(&format!("unset {LOADED_HASHES_VAR};")));
}
