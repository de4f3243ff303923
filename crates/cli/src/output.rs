//! CLI output formatting utilities.
//!
//! Stdout is reserved for text the calling shell evaluates (or explicitly
//! requested listings). Status and errors go to stderr.

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
}

#[derive(Clone, Copy)]
enum Level {
  Error,
  Warning,
  Info,
}

/// Errors and warnings go to stderr in full colour. Info lines only colour
/// the bullet and go to stdout; they are used by listings, never while
/// emitting shell code.
fn status(level: Level, message: &str) {
  match level {
    Level::Error => eprintln!(
      "{} {}",
      symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
      message.if_supports_color(Stream::Stderr, |s| s.red())
    ),
    Level::Warning => eprintln!(
      "{} {}",
      symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
      message.if_supports_color(Stream::Stderr, |s| s.yellow())
    ),
    Level::Info => println!("{} {message}", symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue())),
  }
}

pub fn print_error(message: &str) {
  status(Level::Error, message);
}

pub fn print_warning(message: &str) {
  status(Level::Warning, message);
}

pub fn print_info(message: &str) {
  status(Level::Info, message);
}

/// A loaded root as one listing line.
pub fn print_loaded_line(spec: &str, prefix: &str) {
  println!(
    "  {} {}",
    spec,
    prefix.if_supports_color(Stream::Stdout, |s| s.dimmed())
  );
}

/// Pretty JSON on stdout, for `--list -o json`.
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize listing")?;
  println!("{json}");
  Ok(())
}
