use crate::config::{Config, Dependency, ToolchainSource};
use crate::util::process::Runner;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::process::Command;

pub fn build_engine(cfg: &Config, runner: &mut dyn Runner) -> Result<()> {
    make_dependency(cfg, runner, "yquake2", &cfg.settings.engine)
}

pub fn build_renderer(cfg: &Config, runner: &mut dyn Runner) -> Result<()> {
    make_dependency(cfg, runner, "ref_vk", &cfg.settings.renderer)
}

/// Run the toolchain's own build commands. Only a git checkout needs building.
pub fn build_toolchain(cfg: &Config, runner: &mut dyn Runner) -> Result<()> {
    let ToolchainSource::Git { build, .. } = &cfg.settings.toolchain.source else {
        return Ok(());
    };
    let dir = require_checkout("ericw-tools", cfg.toolchain_dir())?;

    log::info!("[step] Building ericw-tools");
    for step in build {
        let Some((program, args)) = step.split_first() else {
            continue;
        };
        runner
            .run(Command::new(program).args(args).current_dir(&dir))
            .with_context(|| format!("Building ericw-tools ({program})"))?;
    }
    Ok(())
}

/// `make [DEBUG=1] <make_args...>` inside the dependency's checkout.
fn make_dependency(
    cfg: &Config,
    runner: &mut dyn Runner,
    name: &str,
    dep: &Dependency,
) -> Result<()> {
    let dir = require_checkout(name, cfg.path(&dep.dir))?;

    log::info!("[step] Building {name}");
    let mut cmd = Command::new("make");
    cmd.current_dir(&dir);
    if cfg.is_debug() {
        cmd.arg("DEBUG=1");
    }
    cmd.args(&dep.make_args);
    runner
        .run(&mut cmd)
        .with_context(|| format!("Building {name}"))
}

fn require_checkout(name: &str, dir: PathBuf) -> Result<PathBuf> {
    if !dir.is_dir() {
        bail!(
            "{name} not found at {}. Run: cargo xtask clone",
            dir.display()
        );
    }
    Ok(dir)
}
