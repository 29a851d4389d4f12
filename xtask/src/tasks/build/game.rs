//! Game-logic shared library, built with `make` (game-c) or `odin` (game-odin).

use crate::config::{Config, GameBuilder};
use crate::util::process::Runner;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::process::Command;

pub fn run(cfg: &Config, runner: &mut dyn Runner) -> Result<()> {
    let baseq2 = cfg.baseq2_dir();
    fs::create_dir_all(&baseq2).with_context(|| format!("Creating {}", baseq2.display()))?;

    match cfg.settings.game.builder {
        GameBuilder::Make => build_c(cfg, runner, &baseq2),
        GameBuilder::Odin => build_odin(cfg, runner, &baseq2),
    }
}

fn build_c(cfg: &Config, runner: &mut dyn Runner, baseq2: &Path) -> Result<()> {
    log::info!("[step] Building game-c");
    let dir = cfg.path(&cfg.settings.game.c_dir);
    let debug = if cfg.is_debug() { "DEBUG=1" } else { "DEBUG=0" };
    runner
        .run(Command::new("make").arg(debug).current_dir(&dir))
        .context("Building game-c")?;

    let lib = cfg.game_library();
    crate::util::fs::copy_file(&dir.join("release").join(&lib), &baseq2.join(&lib))
}

/// Odin writes the library straight into `baseq2/`.
fn build_odin(cfg: &Config, runner: &mut dyn Runner, baseq2: &Path) -> Result<()> {
    log::info!("[step] Building game-odin");
    let mut out = std::ffi::OsString::from("-out:");
    out.push(baseq2.join(cfg.game_library()));

    let mut cmd = Command::new("odin");
    cmd.arg("build")
        .arg(cfg.path(&cfg.settings.game.odin_dir))
        .arg("-build-mode:dll")
        .arg(out)
        .current_dir(&cfg.root);
    if cfg.is_debug() {
        cmd.arg("-debug");
    }
    runner.run(&mut cmd).context("Building game-odin")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::util::process::testing::RecordingRunner;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_c_game_is_built_then_copied_into_baseq2() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config::new(tmp.path(), Settings::default());
        let lib = cfg.game_library();
        let built = tmp.path().join("game-c/release").join(&lib);
        let hook_target = built.clone();
        let mut runner = RecordingRunner::new().with_hook(move |inv| {
            if inv.tool() == "make" {
                fs::create_dir_all(hook_target.parent().unwrap())?;
                fs::write(&hook_target, "elf")?;
            }
            Ok(())
        });

        run(&cfg, &mut runner).unwrap();

        let call = &runner.calls[0];
        assert_eq!(call.args, vec!["DEBUG=0"]);
        assert_eq!(call.cwd.as_deref(), Some(tmp.path().join("game-c").as_path()));
        assert_eq!(
            fs::read_to_string(tmp.path().join("release/baseq2").join(&lib)).unwrap(),
            "elf"
        );
    }

    #[test]
    fn test_failed_make_copies_nothing() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config::new(tmp.path(), Settings::default());
        let mut runner = RecordingRunner::failing_on("make");

        assert!(run(&cfg, &mut runner).is_err());
        assert!(!cfg.baseq2_dir().join(cfg.game_library()).exists());
    }

    #[test]
    fn test_odin_builds_directly_into_baseq2() {
        let tmp = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.game.builder = GameBuilder::Odin;
        let cfg = Config::new(tmp.path(), settings);
        let mut runner = RecordingRunner::new();

        run(&cfg, &mut runner).unwrap();

        let call = &runner.calls[0];
        assert_eq!(call.program, "odin");
        assert_eq!(call.args[0], "build");
        assert_eq!(PathBuf::from(&call.args[1]), tmp.path().join("game-odin"));
        assert_eq!(call.args[2], "-build-mode:dll");
        let out = tmp.path().join("release/baseq2").join(cfg.game_library());
        assert_eq!(call.args[3], format!("-out:{}", out.display()));
        assert!(cfg.baseq2_dir().is_dir());
    }
}
