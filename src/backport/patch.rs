// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The working change's diff, fetched once per run.
//!
//! ```text
//! PatchFile::new()        nothing fetched yet
//!   .path()  first call   GET diff --> NamedTempFile (portbot-*.diff)
//!   .path()  later calls  same file
//!   .release() / Drop     file removed
//! ```

use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{FsError, PortResult};
use crate::github::{GitHubApi, RepoSlug};

/// Lazily materialized diff of one pull request.
pub struct PatchFile<'a> {
    github: &'a dyn GitHubApi,
    repo: &'a RepoSlug,
    number: u64,
    file: Option<NamedTempFile>,
    files_touched: usize,
}

impl<'a> PatchFile<'a> {
    #[must_use]
    pub fn new(github: &'a dyn GitHubApi, repo: &'a RepoSlug, number: u64) -> Self {
        Self {
            github,
            repo,
            number,
            file: None,
            files_touched: 0,
        }
    }

    /// Path of the diff on disk, downloading it on first use.
    ///
    /// # Errors
    ///
    /// Returns a `NetworkError` if the diff cannot be fetched, or an
    /// `FsError` if the temporary file cannot be written.
    pub async fn path(&mut self) -> PortResult<&Path> {
        let file = match self.file.take() {
            Some(file) => file,
            None => {
                let diff = self.github.diff(self.repo, self.number).await?;
                self.files_touched = diff
                    .lines()
                    .filter(|l| l.starts_with("diff --git "))
                    .count();
                write_temp(&diff).await?
            }
        };
        Ok(self.file.insert(file).path())
    }

    /// Number of files the diff touches; zero before the first [`path`](Self::path).
    #[must_use]
    pub const fn files_touched(&self) -> usize {
        self.files_touched
    }

    #[must_use]
    pub const fn is_fetched(&self) -> bool {
        self.file.is_some()
    }

    /// Deletes the temporary file now rather than at drop.
    pub fn release(self) {
        if let Some(file) = self.file {
            let path = file.path().display().to_string();
            match file.close() {
                Ok(()) => debug!(path, "released patch file"),
                Err(e) => debug!(path, error = %e, "failed to remove patch file"),
            }
        }
    }
}

async fn write_temp(diff: &str) -> PortResult<NamedTempFile> {
    let file = tempfile::Builder::new()
        .prefix("portbot-")
        .suffix(".diff")
        .tempfile()
        .map_err(|source| FsError::WriteFailed {
            path: std::env::temp_dir().display().to_string(),
            source,
        })?;
    let write_failed = |source: std::io::Error| FsError::WriteFailed {
        path: file.path().display().to_string(),
        source,
    };

    let mut handle = tokio::fs::File::from_std(file.reopen().map_err(write_failed)?);
    handle
        .write_all(diff.as_bytes())
        .await
        .map_err(write_failed)?;
    handle.flush().await.map_err(write_failed)?;
    drop(handle);

    debug!(path = %file.path().display(), bytes = diff.len(), "wrote patch file");
    Ok(file)
}
