//! `pkgenv shell-init`: print the wrapper that lets `load`/`unload` change
//! the calling shell.

use pkgenv_lib::consts::APP_NAME;
use pkgenv_lib::shell::Dialect;

pub fn cmd_shell_init(shell: Dialect) {
  let exe = std::env::current_exe()
    .ok()
    .and_then(|path| path.to_str().map(str::to_string))
    .unwrap_or_else(|| APP_NAME.to_string());
  print!("{}", shell.integration_script(&exe));
}
