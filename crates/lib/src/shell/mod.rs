//! Shell dialects and rendering of environment changes as shell code.

use std::fmt;
use std::str::FromStr;

use crate::consts::SHELL_VAR;
use crate::env::{EnvSnapshot, VarChange};

/// Supported shell dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
  /// POSIX `sh` and compatibles (bash, zsh, dash, ksh).
  Sh,
  /// C shell and tcsh.
  Csh,
  Fish,
}

impl Dialect {
  pub const ALL: [Dialect; 3] = [Dialect::Sh, Dialect::Csh, Dialect::Fish];

  /// The dialect announced by an installed shell integration.
  ///
  /// The wrapper emitted by [`Dialect::integration_script`] exports
  /// `PKGENV_SHELL`; a shell without it cannot evaluate our output.
  pub fn from_integration(env: &EnvSnapshot) -> Option<Self> {
    env.get(SHELL_VAR).and_then(|name| name.parse().ok())
  }

  /// Get the dialect name as a string
  pub fn as_str(&self) -> &'static str {
    match self {
      Dialect::Sh => "sh",
      Dialect::Csh => "csh",
      Dialect::Fish => "fish",
    }
  }

  /// Generate a statement assigning and exporting a variable
  pub fn export_var(&self, name: &str, value: &str) -> String {
    let value = self.quote(value);
    match self {
      Dialect::Sh => format!("export {name}={value};"),
      Dialect::Csh => format!("setenv {name} {value};"),
      Dialect::Fish => format!("set -gx {name} {value};"),
    }
  }

  /// Generate a statement removing a variable
  pub fn unset_var(&self, name: &str) -> String {
    match self {
      Dialect::Sh => format!("unset {name};"),
      Dialect::Csh => format!("unsetenv {name};"),
      Dialect::Fish => format!("set -e {name};"),
    }
  }

  /// Quote `value` so the shell reads it back as exactly one word.
  ///
  /// Values made only of characters no shell treats specially are emitted
  /// bare; everything else is single-quoted.
  pub fn quote(&self, value: &str) -> String {
    if !value.is_empty() && value.chars().all(is_safe_char) {
      return value.to_string();
    }

    match self {
      Dialect::Sh => format!("'{}'", value.replace('\'', r#"'"'"'"#)),
      Dialect::Csh => {
        // csh expands `!` and rejects raw newlines even inside single quotes.
        let escaped = value
          .replace('\'', r#"'"'"'"#)
          .replace('!', r"\!")
          .replace('\n', "\\\n");
        format!("'{escaped}'")
      }
      Dialect::Fish => format!("'{}'", value.replace('\\', r"\\").replace('\'', r"\'")),
    }
  }

  /// Render one statement per change, one per line.
  pub fn render(&self, changes: &[VarChange]) -> String {
    let mut out = String::new();
    for change in changes {
      let line = match &change.value {
        Some(value) => self.export_var(&change.name, value),
        None => self.unset_var(&change.name),
      };
      out.push_str(&line);
      out.push('\n');
    }
    out
  }

  /// Shell code that wires `load`/`unload` into the current shell.
  ///
  /// `exe` is the command used to invoke the binary.
  pub fn integration_script(&self, exe: &str) -> String {
    let exe = if exe.chars().all(is_safe_char) { exe } else { "pkgenv" };
    match self {
      Dialect::Sh => format!(
        r#"export {SHELL_VAR}=sh;
pkgenv() {{
  case "$1" in
    load|unload)
      case " $* " in
        *" --list "*|*" -h "*|*" --help "*)
          command {exe} "$@"
          ;;
        *)
          _pkgenv_cmd="$1"; shift
          _pkgenv_out="$(command {exe} "$_pkgenv_cmd" --sh "$@")" || return $?
          eval "$_pkgenv_out"
          ;;
      esac
      ;;
    *)
      command {exe} "$@"
      ;;
  esac
}}
"#
      ),
      Dialect::Csh => format!(
        r#"setenv {SHELL_VAR} csh;
alias pkgenv-load 'eval `{exe} load --csh \!*`';
alias pkgenv-unload 'eval `{exe} unload --csh \!*`';
"#
      ),
      Dialect::Fish => format!(
        r#"set -gx {SHELL_VAR} fish;
function pkgenv
  switch "$argv[1]"
    case load unload
      if contains -- --list $argv; or contains -- --help $argv; or contains -- -h $argv
        command {exe} $argv
      else
        command {exe} $argv[1] --fish $argv[2..-1] | source
      end
    case '*'
      command {exe} $argv
  end
end
"#
      ),
    }
  }
}

fn is_safe_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || matches!(c, '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '_' | '-')
}

impl FromStr for Dialect {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "sh" | "bash" | "zsh" | "dash" | "ksh" => Ok(Dialect::Sh),
      "csh" | "tcsh" => Ok(Dialect::Csh),
      "fish" => Ok(Dialect::Fish),
      other => Err(format!("unknown shell: {other}. Supported: sh, csh, fish")),
    }
  }
}

impl fmt::Display for Dialect {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
