//! Map compiler toolchain (ericw-tools): from PATH, a pinned checkout, or a prebuilt archive.

use crate::config::{Config, ToolchainSource};
use crate::util::process::Runner;
use anyhow::{bail, Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use zip::ZipArchive;

pub fn provision(cfg: &Config, runner: &mut dyn Runner) -> Result<()> {
    let dir = cfg.toolchain_dir();
    let source = &cfg.settings.toolchain.source;
    match source {
        ToolchainSource::Path => {
            log::info!("[skip] Map tools are taken from PATH");
            Ok(())
        }
        ToolchainSource::Git { url, commit, .. } => {
            super::clone::clone_pinned(runner, "ericw-tools", url, commit, &dir).map(|_| ())
        }
        ToolchainSource::Prebuilt { base_url, .. } => {
            if dir.exists() {
                log::info!(
                    "[skip] Directory {} already exists. Skipping download.",
                    dir.display()
                );
                return Ok(());
            }
            let name = source
                .archive_for(cfg.platform)
                .context("No prebuilt archive for this platform")?;
            let archive = download(cfg, runner, base_url, name)?;
            let count = install_from_archive(cfg, &archive, &dir)?;
            log::info!("[ok] {count} tools extracted to {}", dir.display());
            Ok(())
        }
    }
}

fn download(cfg: &Config, runner: &mut dyn Runner, base_url: &str, name: &str) -> Result<PathBuf> {
    let tmp = cfg.tmp_dir();
    fs::create_dir_all(&tmp).with_context(|| format!("Creating {}", tmp.display()))?;
    let dest = tmp.join(name);
    let url = format!("{}/{name}", base_url.trim_end_matches('/'));

    log::info!("[step] Download {url}");
    runner
        .run(Command::new("curl").args(["-fL", "-o"]).arg(&dest).arg(&url))
        .with_context(|| format!("Downloading {url}"))?;
    Ok(dest)
}

/// Extract via a staging dir under `tmp/`; `dir` only appears once it holds the tools.
fn install_from_archive(cfg: &Config, archive: &Path, dir: &Path) -> Result<usize> {
    let staging = tempfile::Builder::new()
        .prefix("ericw-tools-")
        .tempdir_in(cfg.tmp_dir())
        .with_context(|| format!("Creating staging dir in {}", cfg.tmp_dir().display()))?;
    let count = extract_executables(archive, staging.path())?;

    if let Some(parent) = dir.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Creating {}", parent.display()))?;
    }
    fs::rename(staging.path(), dir).with_context(|| {
        format!("Moving {} to {}", staging.path().display(), dir.display())
    })?;
    Ok(count)
}

/// Unpack the executables sitting at the root of a zip archive into `dest`, flat.
///
/// An entry counts as executable if its unix mode has an execute bit or its name ends in
/// `.exe`. Nested entries and everything else are ignored. Returns the number extracted.
pub fn extract_executables(archive: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive).with_context(|| format!("Opening {}", archive.display()))?;
    let mut zip =
        ZipArchive::new(file).with_context(|| format!("Reading zip {}", archive.display()))?;
    fs::create_dir_all(dest).with_context(|| format!("Creating {}", dest.display()))?;

    let mut extracted = 0usize;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        if !entry.is_file() {
            continue;
        }
        let Some(rel) = entry.enclosed_name().map(Path::to_path_buf) else {
            continue;
        };
        if rel.components().count() != 1 || !is_executable(&rel, entry.unix_mode()) {
            continue;
        }

        let out_path = dest.join(&rel);
        log::info!("Extracting {} to {}", rel.display(), out_path.display());
        let mut out =
            File::create(&out_path).with_context(|| format!("Creating {}", out_path.display()))?;
        io::copy(&mut entry, &mut out)
            .with_context(|| format!("Writing {}", out_path.display()))?;
        set_mode(&out_path, entry.unix_mode())?;
        extracted += 1;
    }

    if extracted == 0 {
        bail!("No executables at the root of {}", archive.display());
    }
    Ok(extracted)
}

fn is_executable(name: &Path, mode: Option<u32>) -> bool {
    let exe_name = name
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("exe"));
    exe_name || mode.is_some_and(|m| m & 0o111 != 0)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: Option<u32>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if let Some(mode) = mode {
        fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
            .with_context(|| format!("Setting permissions on {}", path.display()))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: Option<u32>) -> Result<()> {
    Ok(())
}
