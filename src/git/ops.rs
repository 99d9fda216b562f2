// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Typed git operations used by the backport workflow.
//!
//! ```text
//! fetch                 fetch <remote>
//! reset_hard            reset --hard + clean -fd
//! checkout_reset        checkout -B <branch> <start>
//! checkout_new_branch   checkout -b <branch>
//! delete_branch         branch -D (missing is fine)
//! apply                 apply --reject | --3way
//! add_all / commit      add -A / commit -m
//! push                  push --force <remote> <branch>
//! ```

use std::path::Path;
use tracing::debug;

use super::outcome::{ApplyCounts, GitOutcome, classify};
use super::runner::GitRunner;
use crate::config::types::ApplyStrategy;
use crate::error::{GitError, PortResult};

/// Result of applying a patch that did not fail fatally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Every hunk applied.
    Clean,
    /// Some hunks or files were left for a human.
    Conflicted(ApplyCounts),
}

/// Fetch from `remote`.
///
/// # Errors
///
/// Returns a `GitError` if the fetch fails.
pub async fn fetch(git: &dyn GitRunner, remote: &str) -> PortResult<()> {
    git.run("fetch", &["--quiet", "--prune", remote]).await?;
    Ok(())
}

/// Discard tracked changes and untracked leftovers (e.g. `*.rej` files from
/// an aborted run).
///
/// # Errors
///
/// Returns a `GitError` if either command fails.
pub async fn reset_hard(git: &dyn GitRunner) -> PortResult<()> {
    git.run("reset", &["--quiet", "--hard"]).await?;
    git.run("clean", &["-fdq"]).await?;
    Ok(())
}

/// Point local `branch` at `start` and check it out, creating it if needed.
///
/// # Errors
///
/// Returns a `GitError` if `start` does not resolve or checkout fails.
pub async fn checkout_reset(git: &dyn GitRunner, branch: &str, start: &str) -> PortResult<()> {
    git.run("checkout", &["-q", "-f", "-B", branch, start])
        .await?;
    Ok(())
}

/// Create `branch` at HEAD and switch to it.
///
/// # Errors
///
/// Returns a `GitError` if the branch already exists or checkout fails.
pub async fn checkout_new_branch(git: &dyn GitRunner, branch: &str) -> PortResult<()> {
    git.run("checkout", &["-q", "-b", branch]).await?;
    Ok(())
}

/// Force-delete a local branch.
///
/// Returns `false` if the branch did not exist.
///
/// # Errors
///
/// Returns a `GitError` for any failure other than a missing branch.
pub async fn delete_branch(git: &dyn GitRunner, branch: &str) -> PortResult<bool> {
    match git.run("branch", &["-D", branch]).await {
        Ok(_) => Ok(true),
        Err(e) if e.git_diagnostic().map(classify) == Some(GitOutcome::NotFound) => {
            debug!(branch, "no stale branch to delete");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Apply a patch file to the working tree.
///
/// A partial application is not an error; it comes back as
/// [`ApplyOutcome::Conflicted`] with the per-file counts.
///
/// # Errors
///
/// Returns a `GitError` if git fails for any reason other than conflicting
/// hunks (corrupt patch, unreadable file, ...).
pub async fn apply(
    git: &dyn GitRunner,
    patch: &Path,
    strategy: ApplyStrategy,
) -> PortResult<ApplyOutcome> {
    let patch = patch.to_str().ok_or_else(|| GitError::InvalidPath {
        path: patch.display().to_string(),
    })?;
    let mode = match strategy {
        ApplyStrategy::Reject => "--reject",
        ApplyStrategy::ThreeWay => "--3way",
    };

    match git
        .run("apply", &[mode, "--verbose", "--whitespace=nowarn", patch])
        .await
    {
        Ok(_) => Ok(ApplyOutcome::Clean),
        Err(e) => match e.git_diagnostic() {
            Some(diagnostic) if classify(diagnostic) == GitOutcome::Conflict => Ok(
                ApplyOutcome::Conflicted(ApplyCounts::parse(diagnostic)),
            ),
            _ => Err(e),
        },
    }
}

/// Stage everything, including deletions and new files.
///
/// # Errors
///
/// Returns a `GitError` if staging fails.
pub async fn add_all(git: &dyn GitRunner) -> PortResult<()> {
    git.run("add", &["--all"]).await?;
    Ok(())
}

/// Commit the index with `message`.
///
/// # Errors
///
/// Returns a `GitError` if the commit fails (e.g. nothing staged).
pub async fn commit(git: &dyn GitRunner, message: &str) -> PortResult<()> {
    git.run("commit", &["--quiet", "--no-verify", "-m", message])
        .await?;
    Ok(())
}

/// Force-push `branch` to `remote` under the same name.
///
/// Forced so a rerun replaces what an earlier attempt pushed.
///
/// # Errors
///
/// Returns a `GitError` if the push is rejected or the remote is unreachable.
pub async fn push(git: &dyn GitRunner, remote: &str, branch: &str) -> PortResult<()> {
    let refspec = format!("{branch}:refs/heads/{branch}");
    git.run("push", &["--quiet", "--force", remote, refspec.as_str()])
        .await?;
    Ok(())
}
