//! Map compilation: `qbsp` → `vis` → `light` for every `.map` source.

use crate::config::Config;
use crate::util::process::Runner;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::process::Command;

pub fn run(cfg: &Config, runner: &mut dyn Runner) -> Result<()> {
    let dir = cfg.path(&cfg.settings.maps.dir);
    let maps = find_maps(&dir)?;
    if maps.is_empty() {
        log::info!("[skip] No .map files in {}", dir.display());
    }
    for name in &maps {
        compile(cfg, runner, &dir, name)?;
    }
    Ok(())
}

/// Stems of the `.map` files directly inside `dir`, sorted.
pub fn find_maps(dir: &Path) -> Result<Vec<String>> {
    let mut maps = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Reading maps dir {}", dir.display()))? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("map") {
            continue;
        }
        if let Some(stem) = path.file_stem() {
            maps.push(stem.to_string_lossy().into_owned());
        }
    }
    maps.sort();
    Ok(maps)
}

/// Each stage rewrites `<name>.bsp` in place, so the order is fixed and the first failure
/// stops the map.
fn compile(cfg: &Config, runner: &mut dyn Runner, dir: &Path, name: &str) -> Result<()> {
    log::info!("[step] Building map: {name}");
    let m = &cfg.settings.maps;
    let source = format!("{name}.map");
    let bsp = format!("{name}.bsp");
    let stages = [
        ("qbsp", &m.qbsp_args, &source),
        ("vis", &m.vis_args, &bsp),
        ("light", &m.light_args, &bsp),
    ];

    for (tool, args, input) in stages {
        runner
            .run(
                Command::new(cfg.map_tool(tool))
                    .args(args)
                    .arg(input)
                    .current_dir(dir),
            )
            .with_context(|| format!("{tool} failed on map {name}"))?;
    }
    Ok(())
}
