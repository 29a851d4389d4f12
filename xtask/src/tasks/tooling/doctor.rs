use crate::config::{Config, GameBuilder, ToolchainSource};
use crate::util::process::Runner;
use anyhow::{bail, Result};
use std::path::PathBuf;
use std::process::Command;

/// Check that the tools the tasks shell out to are installed and that every existing
/// checkout sits at its pinned commit.
pub fn run(cfg: &Config, runner: &mut dyn Runner) -> Result<()> {
    let mut ok = true;

    for (tool, required) in tools(cfg) {
        match which::which(tool) {
            Ok(path) => log::info!("[ok] {tool} ({})", path.display()),
            Err(_) if required => {
                log::info!("[FAIL] missing `{tool}` in PATH");
                ok = false;
            }
            Err(_) => log::info!("[miss] `{tool}` not in PATH (optional)"),
        }
    }

    ok &= check_revisions(cfg, runner)?;

    if !ok {
        bail!("doctor checks failed");
    }
    Ok(())
}

fn tools(cfg: &Config) -> Vec<(&'static str, bool)> {
    let mut tools = vec![("git", true), ("make", true)];
    match cfg.settings.toolchain.source {
        ToolchainSource::Path => {
            tools.extend([("qbsp", true), ("vis", true), ("light", true)]);
        }
        ToolchainSource::Prebuilt { .. } => tools.push(("curl", true)),
        ToolchainSource::Git { .. } => {}
    }
    if cfg.settings.game.builder == GameBuilder::Odin {
        tools.push(("odin", true));
    }
    tools.push(("tokei", false));
    tools
}

fn pinned(cfg: &Config) -> Vec<(&'static str, PathBuf, &str)> {
    let s = &cfg.settings;
    let mut out = vec![
        ("yquake2", cfg.path(&s.engine.dir), s.engine.commit.as_str()),
        ("ref_vk", cfg.path(&s.renderer.dir), s.renderer.commit.as_str()),
    ];
    if let ToolchainSource::Git { commit, .. } = &s.toolchain.source {
        out.push(("ericw-tools", cfg.toolchain_dir(), commit.as_str()));
    }
    out
}

/// `git rev-parse HEAD` for each cloned dependency; a missing checkout is not an error.
pub fn check_revisions(cfg: &Config, runner: &mut dyn Runner) -> Result<bool> {
    let mut ok = true;
    for (name, dir, commit) in pinned(cfg) {
        if !dir.is_dir() {
            log::info!("[miss] {name} not cloned ({})", dir.display());
            continue;
        }
        let head = runner.capture(
            Command::new("git")
                .args(["rev-parse", "HEAD"])
                .current_dir(&dir),
        )?;
        let head = head.trim();
        if head == commit {
            log::info!("[ok] {name} @ {head}");
        } else {
            log::info!("[bad] {name} is at {head}, pinned {commit}");
            ok = false;
        }
    }
    Ok(ok)
}
