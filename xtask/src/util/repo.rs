use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Overrides the repository root; used by integration tests and out-of-tree checkouts.
pub const ROOT_ENV: &str = "XTASK_ROOT";

pub fn repo_root() -> Result<PathBuf> {
    if let Some(root) = env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(root));
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask is expected at <repo>/xtask")
}
