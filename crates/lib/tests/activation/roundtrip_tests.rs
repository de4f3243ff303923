//! Load followed by unload returns the environment to where it was.

use pkgenv_lib::activate::UnloadTarget;
use pkgenv_lib::env::{EnvSnapshot, MutationOp};
use pkgenv_lib::shell::Dialect;
use pkgenv_lib::spec::DepKind;

use super::common::{Fixture, Mpileaks, apply, queries, sh};

fn user_env() -> EnvSnapshot {
  EnvSnapshot::new()
    .with("PATH", "/usr/local/bin:/usr/bin:/bin")
    .with("MANPATH", "/tmp/man:")
    .with("HOME", "/home/user")
}

#[test]
fn load_then_unload_is_identity() {
  let m = Mpileaks::new();
  let engine = m.fixture.engine();
  let env = user_env();

  let loaded = apply(&env, &engine.load(&queries(&["mpileaks"]), &sh(), &env).unwrap());
  assert_ne!(loaded, env);

  let activation = engine
    .unload(&UnloadTarget::Queries(queries(&["mpileaks"])), Some(Dialect::Sh), &loaded)
    .unwrap();
  assert_eq!(apply(&loaded, &activation), env);
}

#[test]
fn entries_added_after_load_survive_unload() {
  let m = Mpileaks::new();
  let engine = m.fixture.engine();
  let env = user_env();

  let mut loaded = apply(&env, &engine.load(&queries(&["mpileaks"]), &sh(), &env).unwrap());
  let path = format!("/home/user/bin:{}", loaded.get("PATH").unwrap());
  loaded.set("PATH", path);

  let activation = engine
    .unload(&UnloadTarget::Queries(queries(&["mpileaks"])), Some(Dialect::Sh), &loaded)
    .unwrap();
  let after = apply(&loaded, &activation);
  assert_eq!(after.get("PATH"), Some("/home/user/bin:/usr/local/bin:/usr/bin:/bin"));
}

#[test]
fn overwritten_variable_is_restored() {
  let m = Mpileaks::new();
  let engine = m.fixture.engine();
  let env = user_env().with("FOOBAR", "mine");

  let loaded = apply(&env, &engine.load(&queries(&["mpileaks"]), &sh(), &env).unwrap());
  assert_eq!(loaded.get("FOOBAR"), Some("mpileaks"));

  let activation = engine
    .unload(&UnloadTarget::Queries(queries(&["mpileaks"])), Some(Dialect::Sh), &loaded)
    .unwrap();
  assert_eq!(apply(&loaded, &activation), env);
}

#[test]
fn unloading_one_root_keeps_the_other() {
  let mut f = Fixture::new();
  let zlib = f.install("zlib", "1.3", &[]);
  let cmake = f.install("cmake", "3.27", &[(&zlib, DepKind::Link)]);
  let engine = f.engine();
  let env = user_env();

  let only_zlib = apply(&env, &engine.load(&queries(&["zlib"]), &sh(), &env).unwrap());
  let both = apply(&only_zlib, &engine.load(&queries(&["cmake"]), &sh(), &only_zlib).unwrap());

  let activation = engine
    .unload(&UnloadTarget::Queries(queries(&["cmake"])), Some(Dialect::Sh), &both)
    .unwrap();
  let after = apply(&both, &activation);
  let path = after.get("PATH").unwrap();
  assert!(!path.contains(&f.bin(&cmake)));
  assert_eq!(engine.loaded(&after).len(), 1);
  assert_eq!(engine.loaded(&after)[0].hash, zlib.spec.hash);
}

#[test]
fn appended_entries_are_removed() {
  let mut f = Fixture::new();
  f.install_with(
    "py-six",
    "1.16",
    &[],
    0,
    vec![MutationOp::AppendPath {
      name: "PYTHONPATH".to_string(),
      value: "$${prefix}/lib/python".to_string(),
      separator: ':',
    }],
  );
  let engine = f.engine();
  let env = user_env().with("PYTHONPATH", "/srv/py");

  let loaded = apply(&env, &engine.load(&queries(&["py-six"]), &sh(), &env).unwrap());
  assert!(loaded.get("PYTHONPATH").unwrap().starts_with("/srv/py:"));

  let activation = engine
    .unload(&UnloadTarget::Queries(queries(&["py-six"])), Some(Dialect::Sh), &loaded)
    .unwrap();
  assert_eq!(apply(&loaded, &activation), env);
}

#[cfg(unix)]
mod posix_shell {
  use std::process::Command;

  use super::*;

  /// Evaluate `script` in `/bin/sh` starting from `env` and read back `names`.
  fn eval_in_sh(env: &EnvSnapshot, script: &str, names: &[&str]) -> Vec<Option<String>> {
    let mut probe = String::from(script);
    for name in names {
      probe.push_str(&format!("if [ \"${{{name}+set}}\" = set ]; then printf '%s\\n' \"${name}\"; else echo '<unset>'; fi\n"));
    }

    let output = Command::new("/bin/sh")
      .arg("-c")
      .arg(&probe)
      .env_clear()
      .envs(env.iter())
      .output()
      .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    String::from_utf8(output.stdout)
      .unwrap()
      .lines()
      .map(|line| (line != "<unset>").then(|| line.to_string()))
      .collect()
  }

  #[test]
  fn shell_evaluation_round_trips() {
    let m = Mpileaks::new();
    let engine = m.fixture.engine();
    let env = user_env();
    let names = ["PATH", "MANPATH", "CMAKE_PREFIX_PATH", "FOOBAR", "PKGENV_LOADED_HASHES"];

    let load = engine.load(&queries(&["mpileaks"]), &sh(), &env).unwrap();
    let loaded_values = eval_in_sh(&env, &load.text, &names);
    let loaded = apply(&env, &load);
    let expected: Vec<Option<String>> = names.iter().map(|n| loaded.get(n).map(str::to_string)).collect();
    assert_eq!(loaded_values, expected);

    let unload = engine
      .unload(&UnloadTarget::Queries(queries(&["mpileaks"])), Some(Dialect::Sh), &loaded)
      .unwrap();
    let restored = eval_in_sh(&loaded, &unload.text, &names);
    let original: Vec<Option<String>> = names.iter().map(|n| env.get(n).map(str::to_string)).collect();
    assert_eq!(restored, original);
  }
}
