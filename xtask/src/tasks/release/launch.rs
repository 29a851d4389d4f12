use crate::config::Config;
use crate::util::process::Runner;
use anyhow::{bail, Context, Result};
use std::env;
use std::ffi::OsString;
use std::process::Command;

/// Launch `release/quake2` from inside `release/`, forwarding `args` verbatim.
pub fn run(cfg: &Config, runner: &mut dyn Runner, args: &[String]) -> Result<()> {
    let release = cfg.release_dir();
    let exe = release.join(cfg.platform.exe("quake2"));
    if !exe.is_file() {
        bail!(
            "Game binary not found at {}. Run: cargo xtask copy",
            exe.display()
        );
    }

    let var = cfg.library_path_var();
    let value = library_search_path(cfg, &var)?;
    log::info!("[step] Running {} ({var}={})", exe.display(), cfg.library_path().display());

    runner
        .run(
            Command::new(&exe)
                .args(args)
                .current_dir(&release)
                .env(&var, value),
        )
        .context("Running the game")
}

/// The configured library directory, ahead of whatever `var` already holds.
fn library_search_path(cfg: &Config, var: &str) -> Result<OsString> {
    let existing = env::var_os(var).unwrap_or_default();
    let mut paths = vec![cfg.library_path()];
    paths.extend(env::split_paths(&existing));
    env::join_paths(paths).with_context(|| format!("Building {var}"))
}
