mod cmd;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pkgenv_lib::shell::Dialect;
use tracing_subscriber::EnvFilter;

use crate::cmd::ShellFlags;
use crate::output::{OutputFormat, print_error};

/// Environment variable holding the log filter, e.g. `PKGENV_LOG=debug`.
const LOG_ENV_VAR: &str = "PKGENV_LOG";

/// pkgenv - load installed packages into the current shell
#[derive(Parser)]
#[command(name = "pkgenv")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Add packages and their runtime dependencies to the environment
  Load {
    #[command(flatten)]
    shell: ShellFlags,

    /// Pick one package when a spec matches several
    #[arg(long)]
    first: bool,

    /// List the packages loaded in this shell
    #[arg(long, conflicts_with = "first")]
    list: bool,

    /// Output format for --list
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Package specs: name[@version][/hash] or /hash
    #[arg(required_unless_present = "list")]
    specs: Vec<String>,
  },

  /// Remove previously loaded packages from the environment
  Unload {
    #[command(flatten)]
    shell: ShellFlags,

    /// Unload every loaded package
    #[arg(short, long, conflicts_with = "specs")]
    all: bool,

    /// Package specs: name[@version][/hash] or /hash
    #[arg(required_unless_present = "all")]
    specs: Vec<String>,
  },

  /// Print the shell integration for your startup file
  ShellInit {
    /// Shell to integrate with (sh, bash, zsh, csh, tcsh, fish)
    shell: Dialect,
  },
}

fn init_tracing(verbose: bool) {
  let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
    .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = match cli.command {
    Commands::Load {
      shell,
      first,
      list,
      output,
      specs,
    } => {
      if list {
        cmd::cmd_list(output)
      } else {
        cmd::cmd_load(&specs, shell, first)
      }
    }
    Commands::Unload { shell, all, specs } => cmd::cmd_unload(&specs, shell, all),
    Commands::ShellInit { shell } => {
      cmd::cmd_shell_init(shell);
      Ok(())
    }
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      report(&err);
      ExitCode::FAILURE
    }
  }
}

/// Print an error and the causes its message does not already include.
fn report(err: &anyhow::Error) {
  let mut shown = err.to_string();
  print_error(&shown);
  for cause in err.chain().skip(1) {
    let message = cause.to_string();
    if !shown.contains(&message) {
      eprintln!("  caused by: {message}");
      shown = message;
    }
  }
}
