//! Where pkgenv keeps its configuration and installation root.
//!
//! Unix follows XDG (`XDG_CONFIG_HOME`, `XDG_DATA_HOME`). Windows keeps both
//! under `%APPDATA%`. `PKGENV_ROOT` relocates the root wholesale.

use std::env;
use std::path::PathBuf;

use crate::consts::{APP_NAME, ROOT_ENV_VAR};

fn non_empty_var(name: &str) -> Option<PathBuf> {
  env::var_os(name).filter(|v| !v.is_empty()).map(PathBuf::from)
}

#[cfg(not(windows))]
fn home() -> PathBuf {
  non_empty_var("HOME").unwrap_or_else(|| PathBuf::from("/"))
}

/// `$XDG_<kind>_HOME/pkgenv`, or `~/<fallback>/pkgenv`.
#[cfg(not(windows))]
fn xdg_app_dir(var: &str, fallback: &[&str]) -> PathBuf {
  let base = non_empty_var(var).unwrap_or_else(|| fallback.iter().fold(home(), |dir, part| dir.join(part)));
  base.join(APP_NAME)
}

#[cfg(windows)]
fn appdata_dir() -> PathBuf {
  non_empty_var("APPDATA")
    .or_else(|| non_empty_var("USERPROFILE"))
    .unwrap_or_default()
    .join(APP_NAME)
}

/// Directory holding `config.json`.
pub fn config_dir() -> PathBuf {
  #[cfg(windows)]
  return appdata_dir();
  #[cfg(not(windows))]
  xdg_app_dir("XDG_CONFIG_HOME", &[".config"])
}

/// Default installation root when `PKGENV_ROOT` is unset.
pub fn data_dir() -> PathBuf {
  #[cfg(windows)]
  return appdata_dir();
  #[cfg(not(windows))]
  xdg_app_dir("XDG_DATA_HOME", &[".local", "share"])
}

/// Returns the installation root, honoring `PKGENV_ROOT`.
pub fn root_dir() -> PathBuf {
  non_empty_var(ROOT_ENV_VAR).unwrap_or_else(data_dir)
}

/// Returns the directory holding the installation database.
pub fn db_dir() -> PathBuf {
  root_dir().join("db")
}

/// Returns the path of the user configuration file.
pub fn config_file() -> PathBuf {
  config_dir().join("config.json")
}
