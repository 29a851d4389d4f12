//! Release assembly.
//!
//! Only in-repo assets and the explicit allow-list from the extracted pak0 reach
//! `release/baseq2/`; the rest of the third-party data stays out of the release tree.

use crate::config::Config;
use crate::util::fs::{copy_allow_listed, copy_file, copy_tree};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn run(cfg: &Config) -> Result<()> {
    log::info!("[step] Copying files to release directory");

    let release = cfg.release_dir();
    if !release.exists() {
        fs::create_dir_all(&release).with_context(|| format!("Creating {}", release.display()))?;
        log::info!("Created {} directory", release.display());
    }

    for src in engine_binaries(cfg) {
        let name = src
            .file_name()
            .with_context(|| format!("No file name in {}", src.display()))?;
        copy_file(&src, &release.join(name))?;
    }

    let assets = &cfg.settings.assets;
    let baseq2 = cfg.baseq2_dir();
    let base = cfg.path(&assets.base_dir);
    copy_tree(&base, &baseq2, &assets.exclude_extensions)
        .with_context(|| format!("Copying assets from {}", base.display()))?;

    let pak0 = cfg.path(&assets.pak0_dir);
    for rel in &assets.allow_list {
        let n = copy_allow_listed(&pak0, rel, &baseq2)
            .with_context(|| format!("Copying allow-listed '{rel}' from {}", pak0.display()))?;
        if n == 0 {
            log::debug!("no match for '{rel}'");
        }
    }

    log::info!("[ok] Copying files to release directory completed");
    Ok(())
}

/// Engine executables and the renderer plugin, as produced by their `make` builds.
pub fn engine_binaries(cfg: &Config) -> Vec<PathBuf> {
    let p = cfg.platform;
    let engine = cfg.path(&cfg.settings.engine.dir).join("release");
    let renderer = cfg.path(&cfg.settings.renderer.dir).join("release");
    vec![
        engine.join(p.exe("q2ded")),
        engine.join(p.exe("quake2")),
        renderer.join(p.dylib("ref_vk")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use std::path::Path;
    use tempfile::TempDir;
    use walkdir::WalkDir;

    fn touch(root: &Path, rel: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, rel).unwrap();
    }

    fn populated() -> (TempDir, Config) {
        let tmp = TempDir::new().unwrap();
        let cfg = Config::new(tmp.path(), Settings::default());
        for bin in engine_binaries(&cfg) {
            fs::create_dir_all(bin.parent().unwrap()).unwrap();
            fs::write(&bin, "bin").unwrap();
        }
        for rel in [
            "base/maps/start.map",
            "base/maps/start.bsp",
            "base/maps/start.prt",
            "base/maps/start.log",
            "base/pics/hud.aseprite",
            "base/pics/hud.pcx",
            "base/textures/meta.json",
            "base/default.cfg",
            "tmp/pak0/pics/colormap.pcx",
            "tmp/pak0/pics/conchars.pcx",
            "tmp/pak0/pics/conback.pcx",
            "tmp/pak0/pics/ch1.pcx",
            "tmp/pak0/pics/pause.pcx",
            "tmp/pak0/pics/quit.pcx",
            "tmp/pak0/pics/m_main_game.pcx",
            "tmp/pak0/pics/m_main_quit.pcx",
            "tmp/pak0/pics/m_banner_game.pcx",
            "tmp/pak0/maps/base1.bsp",
            "tmp/pak0/sound/world/amb1.wav",
        ] {
            touch(tmp.path(), rel);
        }
        (tmp, cfg)
    }

    fn release_files(cfg: &Config) -> Vec<String> {
        let root = cfg.release_dir();
        let mut out: Vec<String> = WalkDir::new(&root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                e.path()
                    .strip_prefix(&root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_no_excluded_extension_reaches_baseq2() {
        let (_tmp, cfg) = populated();

        run(&cfg).unwrap();

        let excluded = &cfg.settings.assets.exclude_extensions;
        for entry in WalkDir::new(cfg.baseq2_dir()) {
            let entry = entry.unwrap();
            let ext = entry
                .path()
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()));
            if let Some(ext) = ext {
                assert!(
                    !excluded.contains(&ext),
                    "{} should not be released",
                    entry.path().display()
                );
            }
        }
    }

    #[test]
    fn test_release_layout() {
        let (_tmp, cfg) = populated();
        let p = cfg.platform;

        run(&cfg).unwrap();

        let mut expected = vec![
            "baseq2/default.cfg".to_string(),
            "baseq2/maps/start.bsp".to_string(),
            "baseq2/pics/ch1.pcx".to_string(),
            "baseq2/pics/colormap.pcx".to_string(),
            "baseq2/pics/conback.pcx".to_string(),
            "baseq2/pics/conchars.pcx".to_string(),
            "baseq2/pics/hud.pcx".to_string(),
            "baseq2/pics/m_main_game.pcx".to_string(),
            "baseq2/pics/m_main_quit.pcx".to_string(),
            "baseq2/pics/pause.pcx".to_string(),
            "baseq2/pics/quit.pcx".to_string(),
            p.exe("q2ded"),
            p.exe("quake2"),
            p.dylib("ref_vk"),
        ];
        expected.sort();
        assert_eq!(release_files(&cfg), expected);
    }

    #[test]
    fn test_missing_allow_listed_file_fails() {
        let (tmp, cfg) = populated();
        fs::remove_file(tmp.path().join("tmp/pak0/pics/quit.pcx")).unwrap();

        let err = run(&cfg).unwrap_err();
        assert!(format!("{err:#}").contains("pics/quit.pcx"));
    }

    #[test]
    fn test_missing_engine_binary_fails() {
        let (_tmp, cfg) = populated();
        fs::remove_file(&engine_binaries(&cfg)[1]).unwrap();
        assert!(run(&cfg).is_err());
    }
}
