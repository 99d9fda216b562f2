// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Conflict resolution files dropped into a conflicted working directory.
//!
//! ```text
//! ConflictContext --> render all --> write in order
//!
//!   backport.rej.md               instructions     0644
//!   begin-backport.rej            helper script    0755
//!   finish-backport.rej           helper script    0755
//!   commit-message-backport.rej   raw message      0644
//! ```
//!
//! File names are a contract with the helper scripts and with anyone
//! scripting around the bot. A rerun overwrites them.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{FsError, PortResult};
use crate::git::outcome::ApplyCounts;
use crate::template::{BEGIN_SCRIPT, FINISH_SCRIPT, INSTRUCTIONS, TemplateContext, TemplateSet};

/// Name of the commit message stub.
pub const COMMIT_MESSAGE: &str = "commit-message-backport.rej";

/// Everything the artifact templates can refer to.
#[derive(Debug, Clone)]
pub struct ConflictContext {
    /// Backport branch name.
    pub branch: String,
    pub target: String,
    pub remote: String,
    pub original_number: u64,
    pub original_url: String,
    pub counts: ApplyCounts,
    /// Commit message of the backport commit, written verbatim.
    pub commit_message: String,
}

impl ConflictContext {
    fn template_context(&self) -> TemplateContext {
        TemplateContext::new()
            .with("branch", &self.branch)
            .with("target", &self.target)
            .with("remote", &self.remote)
            .with("number", self.original_number)
            .with("url", &self.original_url)
            .with("applied", self.counts.applied)
            .with("rejected", self.counts.rejected)
            .with("missing", self.counts.missing)
            .with("starting", format!("{}/{}", self.remote, self.target))
            .with("ending", "HEAD")
    }
}

struct Artifact {
    name: &'static str,
    content: String,
    executable: bool,
}

/// Renders and writes the conflict artifact set.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactGenerator<'a> {
    templates: &'a TemplateSet,
}

impl<'a> ArtifactGenerator<'a> {
    #[must_use]
    pub const fn new(templates: &'a TemplateSet) -> Self {
        Self { templates }
    }

    /// Writes all four artifacts into `dir` and returns their paths in order.
    ///
    /// Every template is rendered before the first file is written, so a
    /// template problem leaves the directory untouched.
    ///
    /// # Errors
    ///
    /// Returns a `TemplateError` if rendering fails, or the first
    /// `FsError` hit while writing or setting permissions.
    pub async fn generate(&self, dir: &Path, context: &ConflictContext) -> PortResult<Vec<PathBuf>> {
        let values = context.template_context();
        let artifacts = [
            Artifact {
                name: INSTRUCTIONS,
                content: self.templates.render(INSTRUCTIONS, &values)?,
                executable: false,
            },
            Artifact {
                name: BEGIN_SCRIPT,
                content: self.templates.render(BEGIN_SCRIPT, &values)?,
                executable: true,
            },
            Artifact {
                name: FINISH_SCRIPT,
                content: self.templates.render(FINISH_SCRIPT, &values)?,
                executable: true,
            },
            Artifact {
                name: COMMIT_MESSAGE,
                content: context.commit_message.clone(),
                executable: false,
            },
        ];

        let mut written = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            let path = dir.join(artifact.name);
            write_artifact(&path, &artifact.content, artifact.executable).await?;
            written.push(path);
        }
        debug!(dir = %dir.display(), target = %context.target, "wrote conflict artifacts");
        Ok(written)
    }
}

async fn write_artifact(path: &Path, content: &str, executable: bool) -> PortResult<()> {
    tokio::fs::write(path, content)
        .await
        .map_err(|source| FsError::WriteFailed {
            path: path.display().to_string(),
            source,
        })?;
    set_mode(path, if executable { 0o755 } else { 0o644 }).await
}

#[cfg(unix)]
async fn set_mode(path: &Path, mode: u32) -> PortResult<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .await
        .map_err(|source| {
            FsError::PermissionsFailed {
                path: path.display().to_string(),
                source,
            }
            .into()
        })
}

#[cfg(not(unix))]
#[allow(clippy::unused_async)]
async fn set_mode(_path: &Path, _mode: u32) -> PortResult<()> {
    Ok(())
}

#[cfg(test)]
mod tests;
