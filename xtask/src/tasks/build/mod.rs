//! Native builds: engine, renderer, toolchain, game library and maps.

pub mod game;
pub mod maps;
pub mod native;

use crate::config::Config;
use crate::util::process::Runner;
use anyhow::Result;

/// Full build: engine, renderer, toolchain, maps, release assembly, then the game library.
pub fn run(cfg: &Config, runner: &mut dyn Runner) -> Result<()> {
    native::build_engine(cfg, runner)?;
    native::build_renderer(cfg, runner)?;
    native::build_toolchain(cfg, runner)?;
    maps::run(cfg, runner)?;
    crate::tasks::release::assemble::run(cfg)?;
    game::run(cfg, runner)
}
