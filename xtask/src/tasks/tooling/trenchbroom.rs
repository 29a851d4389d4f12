//! Install the TrenchBroom game profile so the editor can open `base/maps`.

use crate::config::{Config, Platform};
use crate::util::fs::copy_tree;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn run(cfg: &Config) -> Result<()> {
    let tb = &cfg.settings.trenchbroom;
    let games = match games_dir(cfg) {
        Some(dir) if dir.is_dir() => dir,
        other => {
            let shown = other.map_or_else(|| "<unknown>".into(), |d| d.display().to_string());
            log::info!(
                "[skip] TrenchBroom games directory not found ({shown}), not setting up TrenchBroom"
            );
            return Ok(());
        }
    };

    let target = games.join(&tb.game_name);
    let source = cfg.path(&tb.config_dir);
    log::info!("[step] Installing {} into {}", source.display(), target.display());
    copy_tree(&source, &target, &[])
        .with_context(|| format!("Installing TrenchBroom config into {}", target.display()))?;
    log::info!("[ok] TrenchBroom game '{}' installed", tb.game_name);
    Ok(())
}

fn games_dir(cfg: &Config) -> Option<PathBuf> {
    if let Some(dir) = &cfg.settings.trenchbroom.games_dir {
        return Some(cfg.path(dir));
    }
    match cfg.platform {
        Platform::Linux => dirs::home_dir().map(|h| h.join(".TrenchBroom/games")),
        Platform::MacOs | Platform::Windows => {
            dirs::data_dir().map(|d| d.join("TrenchBroom/games"))
        }
    }
}
