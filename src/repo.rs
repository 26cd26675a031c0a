//! Repository root discovery
//!
//! Relative target paths and template reference keys are anchored to the
//! repository root, found by walking parent directories until a `.git`
//! entry appears.

use std::path::{Path, PathBuf};

use crate::error::{PipewrightError, PipewrightResult};

/// Walk upward from `start` until a directory containing `.git` is found
///
/// Failing to find one is a configuration error that aborts the whole run.
pub fn find_repo_root(start: &Path) -> PipewrightResult<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join(".git").exists() {
            return Ok(dir.to_path_buf());
        }
        dir = dir
            .parent()
            .ok_or_else(|| PipewrightError::RepoRootNotFound {
                path: start.to_path_buf(),
            })?;
    }
}

/// Repository-relative path with forward slashes and a leading `/`
///
/// This exact string is embedded in generated code and doubles as the merge
/// marker, so it must be identical across platforms.
pub fn repo_relative_path(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut result = String::new();
    for component in relative.components() {
        result.push('/');
        result.push_str(&component.as_os_str().to_string_lossy());
    }
    result
}
