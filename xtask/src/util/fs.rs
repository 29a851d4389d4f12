//! File copying for release assembly.

use anyhow::{bail, Context, Result};
use globset::Glob;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Mirror `src` into `dst`, skipping files whose extension is in `excluded`.
///
/// Extensions are compared case-sensitively; a leading dot in `excluded` is optional.
/// Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path, excluded: &[String]) -> Result<usize> {
    if !src.is_dir() {
        bail!("Source directory not found: {}", src.display());
    }
    fs::create_dir_all(dst).with_context(|| format!("Creating {}", dst.display()))?;

    let mut copied = 0usize;
    for entry in WalkDir::new(src)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Walking {}", src.display()))?;
        let rel = entry.path().strip_prefix(src)?;
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Creating {}", target.display()))?;
            continue;
        }
        if is_excluded(entry.path(), excluded) {
            log::debug!("skip {}", entry.path().display());
            continue;
        }
        copy_file(entry.path(), &target)?;
        copied += 1;
    }
    Ok(copied)
}

/// Copy `src_base/rel` to `dst_base/rel`, keeping the relative layout.
///
/// A `*` or `?` in the final component of `rel` selects every matching file in that
/// directory; no match (or no directory) copies nothing. A plain path must exist.
pub fn copy_allow_listed(src_base: &Path, rel: &str, dst_base: &Path) -> Result<usize> {
    let rel_path = Path::new(rel);
    let sources = if has_wildcard(rel) {
        let pattern = rel_path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Invalid allow-list pattern '{rel}'"))?;
        let parent = rel_path.parent().unwrap_or_else(|| Path::new(""));
        if has_wildcard(&parent.to_string_lossy()) {
            bail!("Wildcards are only supported in the file name: '{rel}'");
        }
        matching_files(&src_base.join(parent), pattern)?
    } else {
        vec![src_base.join(rel_path)]
    };

    for source in &sources {
        let rel_file = source.strip_prefix(src_base)?;
        copy_file(source, &dst_base.join(rel_file))?;
    }
    Ok(sources.len())
}

/// Copy one file, creating the destination's parent directories.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Creating {}", parent.display()))?;
    }
    log::info!("Copying {} to {}", src.display(), dst.display());
    fs::copy(src, dst)
        .with_context(|| format!("Copying {} to {}", src.display(), dst.display()))?;
    Ok(())
}

fn is_excluded(path: &Path, excluded: &[String]) -> bool {
    let Some(ext) = path.extension() else {
        return false;
    };
    let ext = ext.to_string_lossy();
    excluded
        .iter()
        .any(|e| e.strip_prefix('.').unwrap_or(e) == ext)
}

fn has_wildcard(s: &str) -> bool {
    s.contains(['*', '?'])
}

/// Files directly in `dir` whose name matches the shell-style `pattern` (`*`, `?`).
fn matching_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = Glob::new(pattern)
        .with_context(|| format!("Invalid allow-list pattern '{pattern}'"))?
        .compile_matcher();
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Reading {}", dir.display()))? {
        let entry = entry?;
        if entry.path().is_file() && matcher.is_match(entry.file_name()) {
            out.push(entry.path());
        }
    }
    out.sort();
    Ok(out)
}
