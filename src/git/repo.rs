// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Local clones, one per repository.
//!
//! ```text
//! <repos_dir>/<owner>/<name>
//!    exists + opens (gix)  --> reuse
//!    otherwise             --> git clone <url> <name>   (cwd = <repos_dir>/<owner>)
//! ```

use std::path::{Path, PathBuf};
use tracing::info;

use super::runner::{GitRunner, ShellGit};
use crate::error::{FsError, GitError, PortResult};
use crate::github::RepoSlug;

/// Where the clone of `slug` lives under `repos_dir`.
#[must_use]
pub fn clone_path(repos_dir: &Path, slug: &RepoSlug) -> PathBuf {
    repos_dir.join(slug.owner()).join(slug.name())
}

/// Whether `path` is the root of a git repository.
///
/// Uses `gix::open` rather than discovery so a clone directory nested inside
/// another checkout is not mistaken for it.
#[must_use]
pub fn is_git_repo(path: &Path) -> bool {
    gix::open(path).is_ok()
}

/// Returns the clone path for `slug`, cloning from `url` first if needed.
///
/// # Errors
///
/// Returns `FsError::WriteFailed` if the owner directory cannot be created,
/// or `GitError::CloneFailed` if git refuses to clone.
pub async fn open_or_clone(repos_dir: &Path, slug: &RepoSlug, url: &str) -> PortResult<PathBuf> {
    let dest = clone_path(repos_dir, slug);
    if is_git_repo(&dest) {
        return Ok(dest);
    }

    let parent = repos_dir.join(slug.owner());
    tokio::fs::create_dir_all(&parent)
        .await
        .map_err(|source| FsError::WriteFailed {
            path: parent.display().to_string(),
            source,
        })?;

    info!(repo = %slug, url, dest = %dest.display(), "cloning");
    let git = ShellGit::new(&parent)?;
    git.run("clone", &["--quiet", url, slug.name()])
        .await
        .map_err(|e| match e.git_diagnostic() {
            Some(message) => GitError::CloneFailed {
                url: url.to_string(),
                message: message.to_string(),
            }
            .into(),
            None => e,
        })?;

    Ok(dest)
}
