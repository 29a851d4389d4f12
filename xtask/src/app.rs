use crate::cli::{Cli, Cmd};
use crate::config::Config;
use crate::tasks::{build, release, sources, tooling};
use crate::util::process::{Runner, SystemRunner};
use anyhow::Result;
use clap::CommandFactory;

pub fn run(cli: Cli) -> Result<()> {
    let Some(cmd) = cli.cmd else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let root = crate::util::repo::repo_root()?;
    let cfg = Config::load(&root)?;
    log::debug!("repo root: {}", cfg.root.display());
    dispatch(cmd, &cfg, &mut SystemRunner)
}

pub fn dispatch(cmd: Cmd, cfg: &Config, runner: &mut dyn Runner) -> Result<()> {
    match cmd {
        Cmd::Clone => sources::clone::run(cfg, runner),
        Cmd::Build => build::run(cfg, runner),
        Cmd::BuildGame => build::game::run(cfg, runner),
        Cmd::BuildMaps => build::maps::run(cfg, runner),
        Cmd::All => {
            sources::clone::run(cfg, runner)?;
            build::run(cfg, runner)?;
            release::launch::run(cfg, runner, &[])
        }
        Cmd::BuildGameAndRun { args } => {
            build::game::run(cfg, runner)?;
            release::launch::run(cfg, runner, &args)
        }
        Cmd::Run { args } => release::launch::run(cfg, runner, &args),
        Cmd::Copy => release::assemble::run(cfg),
        Cmd::CopyAndRun { args } => {
            release::assemble::run(cfg)?;
            release::launch::run(cfg, runner, &args)
        }
        Cmd::SetupTrenchbroom => tooling::trenchbroom::run(cfg),
        Cmd::LocMetrics => tooling::loc::run(cfg, runner),
        Cmd::Doctor => tooling::doctor::run(cfg, runner),
    }
}
