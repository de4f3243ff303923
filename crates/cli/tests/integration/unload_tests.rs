//! Unload command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn unload_unsets_and_keeps_foreign_ledger_entries() {
  let mut env = TestEnv::new();
  let mpileaks = env.install_mpileaks();

  env
    .pkgenv_cmd()
    .env("FOOBAR", "mpileaks")
    .env("PKGENV_LOADED_HASHES", format!("{}:garbage", mpileaks.spec.hash))
    .args(["unload", "--sh", "mpileaks"])
    .assert()
    .success()
    .stdout(predicate::str::contains("unset FOOBAR;"))
    .stdout(predicate::str::contains("export PKGENV_LOADED_HASHES=garbage;"));
}

#[test]
fn unload_csh() {
  let mut env = TestEnv::new();
  let mpileaks = env.install_mpileaks();

  env
    .pkgenv_cmd()
    .env("FOOBAR", "mpileaks")
    .env("PKGENV_LOADED_HASHES", mpileaks.spec.hash.as_str())
    .args(["unload", "--csh", "mpileaks"])
    .assert()
    .success()
    .stdout(predicate::str::contains("unsetenv FOOBAR;"))
    .stdout(predicate::str::contains("unsetenv PKGENV_LOADED_HASHES;"));
}

#[test]
fn unload_not_loaded_fails() {
  let mut env = TestEnv::new();
  env.install_mpileaks();

  env
    .pkgenv_cmd()
    .args(["unload", "--sh", "mpileaks"])
    .assert()
    .failure()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("is not loaded"));
}

#[test]
fn unload_without_shell_support_fails() {
  let mut env = TestEnv::new();
  let mpileaks = env.install_mpileaks();

  env
    .pkgenv_cmd()
    .env("PKGENV_LOADED_HASHES", mpileaks.spec.hash.as_str())
    .args(["unload", "mpileaks"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("To set up shell support"));
}

#[test]
fn unload_all_removes_every_root() {
  let mut env = TestEnv::new();
  let mpileaks = env.install_mpileaks();
  let cmake = env.install("cmake", "3.27", &[], 0, Vec::new());

  env
    .pkgenv_cmd()
    .env("PKGENV_LOADED_HASHES", format!("{}:{}", mpileaks.spec.hash, cmake.spec.hash))
    .env("FOOBAR", "mpileaks")
    .args(["unload", "--sh", "--all"])
    .assert()
    .success()
    .stdout(predicate::str::contains("unset FOOBAR;"))
    .stdout(predicate::str::contains("unset PKGENV_LOADED_HASHES;"));
}

#[test]
fn unload_requires_spec_or_all() {
  let env = TestEnv::new();

  env.pkgenv_cmd().args(["unload", "--sh"]).assert().failure();
}
