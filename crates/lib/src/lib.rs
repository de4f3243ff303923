//! pkgenv-lib: environment activation for installed packages
//!
//! This crate turns "load package X into my shell" into shell code:
//! - `Spec` / `Query`: installed package identities and how users name them
//! - `MutationSet`: ordered environment edits that can be resolved and inverted
//! - `RuntimeDag`: the link/run dependency closure of a root, dependencies first
//! - `Engine`: load and unload planning, with the loaded-roots ledger kept in
//!   the shell's own environment
//! - `Dialect`: rendering for sh, csh and fish

pub mod activate;
pub mod config;
pub mod consts;
pub mod db;
pub mod env;
pub mod hook;
pub mod inspect;
pub mod ledger;
pub mod platform;
pub mod shell;
pub mod spec;
pub mod traverse;
pub mod util;
