use crate::config::Config;
use crate::util::process::Runner;
use anyhow::{Context, Result};
use std::fs::File;
use std::process::Command;

/// Write `tokei`'s report for the C game sources to a text file.
pub fn run(cfg: &Config, runner: &mut dyn Runner) -> Result<()> {
    let output = cfg.path(&cfg.settings.loc.output);
    let file = File::create(&output).with_context(|| format!("Creating {}", output.display()))?;

    runner
        .run(
            Command::new("tokei")
                .arg(cfg.path(&cfg.settings.game.c_dir))
                .stdout(file),
        )
        .context("Counting lines of code")?;

    log::info!("Lines of code metrics written to {}", output.display());
    Ok(())
}
