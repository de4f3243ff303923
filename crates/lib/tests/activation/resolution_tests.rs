//! Query resolution failures and `--first`.

use pkgenv_lib::activate::{ActivateError, LoadOptions, Phase, UnloadTarget};
use pkgenv_lib::env::EnvSnapshot;
use pkgenv_lib::shell::Dialect;

use super::common::{Fixture, Mpileaks, queries, sh};

fn two_zlibs() -> Fixture {
  let mut f = Fixture::new();
  f.install_with("zlib", "1.2.13", &[], 100, Vec::new());
  f.install_with("zlib", "1.3", &[], 200, Vec::new());
  f
}

#[test]
fn ambiguous_spec_is_rejected_with_candidates() {
  let f = two_zlibs();
  let err = f.engine().load(&queries(&["zlib"]), &sh(), &EnvSnapshot::new()).unwrap_err();

  assert_eq!(err.phase(), Phase::Resolving);
  let message = err.to_string();
  assert!(message.contains("matches multiple packages"), "{message}");
  assert!(message.contains("Use a more specific spec"), "{message}");
  assert!(message.contains("zlib@1.2.13"));
  assert!(message.contains("zlib@1.3"));
}

#[test]
fn first_picks_most_recent_install() {
  let f = two_zlibs();
  let options = LoadOptions {
    dialect: Some(Dialect::Sh),
    first: true,
  };
  let activation = f.engine().load(&queries(&["zlib"]), &options, &EnvSnapshot::new()).unwrap();
  assert!(activation.text.contains(&f.bin_of("zlib", "1.3")));
  assert!(!activation.text.contains(&f.bin_of("zlib", "1.2.13")));
}

#[test]
fn version_and_hash_disambiguate() {
  let f = two_zlibs();
  let engine = f.engine();
  assert!(engine.load(&queries(&["zlib@1.3"]), &sh(), &EnvSnapshot::new()).is_ok());

  let old = f.db_hash("zlib", "1.2.13");
  let query = format!("/{}", &old[..8]);
  let activation = engine.load(&queries(&[query.as_str()]), &sh(), &EnvSnapshot::new()).unwrap();
  assert!(activation.text.contains(&f.bin_of("zlib", "1.2.13")));
}

#[test]
fn unknown_spec_is_no_match() {
  let m = Mpileaks::new();
  let err = m
    .fixture
    .engine()
    .load(&queries(&["hdf5"]), &sh(), &EnvSnapshot::new())
    .unwrap_err();
  assert!(matches!(err, ActivateError::NoMatch { .. }));
}

#[test]
fn one_bad_query_fails_the_whole_load() {
  let m = Mpileaks::new();
  let result = m
    .fixture
    .engine()
    .load(&queries(&["libelf", "hdf5"]), &sh(), &EnvSnapshot::new());
  assert!(result.is_err());
}

#[test]
fn missing_shell_integration() {
  let m = Mpileaks::new();
  let engine = m.fixture.engine();

  let err = engine
    .load(&queries(&["mpileaks"]), &LoadOptions::default(), &EnvSnapshot::new())
    .unwrap_err();
  assert!(matches!(err, ActivateError::NoShellSupport));
  let message = err.to_string();
  assert!(message.contains("To set up shell support"));
  assert!(message.contains("shell-init"));

  let err = engine
    .unload(&UnloadTarget::All, None, &EnvSnapshot::new())
    .unwrap_err();
  assert!(matches!(err, ActivateError::NoShellSupport));
}

#[test]
fn integration_variable_selects_dialect() {
  let m = Mpileaks::new();
  let env = EnvSnapshot::new().with("PKGENV_SHELL", "csh");
  let activation = m
    .fixture
    .engine()
    .load(&queries(&["mpileaks"]), &LoadOptions::default(), &env)
    .unwrap();
  assert_eq!(activation.dialect, Dialect::Csh);
  assert!(activation.text.contains("setenv FOOBAR mpileaks;"));
}

#[test]
fn unloading_a_package_that_is_not_loaded() {
  let m = Mpileaks::new();
  let err = m
    .fixture
    .engine()
    .unload(
      &UnloadTarget::Queries(queries(&["mpileaks"])),
      Some(Dialect::Sh),
      &EnvSnapshot::new(),
    )
    .unwrap_err();
  assert!(matches!(err, ActivateError::NotLoaded { .. }));
}
