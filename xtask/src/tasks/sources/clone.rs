use crate::config::Config;
use crate::util::process::Runner;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Clone everything the build needs: engine, renderer and the map toolchain.
pub fn run(cfg: &Config, runner: &mut dyn Runner) -> Result<()> {
    let s = &cfg.settings;
    clone_pinned(
        runner,
        "yquake2",
        &s.engine.url,
        &s.engine.commit,
        &cfg.path(&s.engine.dir),
    )?;
    clone_pinned(
        runner,
        "ref_vk",
        &s.renderer.url,
        &s.renderer.commit,
        &cfg.path(&s.renderer.dir),
    )?;
    super::toolchain::provision(cfg, runner)
}

/// Clone `url` into `dir` and check out `commit`, unless `dir` already exists.
///
/// An existing directory is trusted as-is: no fetch and no revision check (`doctor` reports
/// drift). Returns whether a clone happened.
pub fn clone_pinned(
    runner: &mut dyn Runner,
    name: &str,
    url: &str,
    commit: &str,
    dir: &Path,
) -> Result<bool> {
    if dir.exists() {
        log::info!(
            "[skip] Directory {} already exists. Skipping clone.",
            dir.display()
        );
        return Ok(false);
    }

    log::info!("[step] Clone {name} @ {commit}");
    runner
        .run(Command::new("git").arg("clone").arg(url).arg(dir))
        .with_context(|| format!("Cloning {name} from {url}"))?;
    runner
        .run(Command::new("git").args(["checkout", commit]).current_dir(dir))
        .with_context(|| format!("Checking out {name} at {commit}"))?;
    Ok(true)
}
