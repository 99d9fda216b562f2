// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git command runner.
//!
//! ```text
//! GitRunner (trait, object safe)
//!   workdir()            fixed working directory
//!   run(cmd, args)       one git process, awaited
//!        |
//!        v
//!   ShellGit --> tokio::process --> git <cmd> <args..>
//!     ok:  stdout
//!     err: GitError::CommandFailed { command, message = diagnostic }
//! ```
//!
//! A runner never serializes its own calls. Exclusive use of a working
//! directory is the repository queue's job.

use futures_util::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tracing::{debug, trace};

use crate::error::{GitError, PortResult, ProcessError};

/// Executes git subcommands against one working directory.
pub trait GitRunner: Send + Sync {
    /// The working directory every command runs in.
    fn workdir(&self) -> &Path;

    /// Runs `git <command> <args..>` and returns its stdout.
    ///
    /// # Errors
    ///
    /// Returns `GitError::CommandFailed` carrying git's diagnostic text when
    /// git exits non-zero, or a `ProcessError` if git cannot be spawned.
    fn run<'a>(&'a self, command: &'a str, args: &'a [&'a str])
    -> BoxFuture<'a, PortResult<String>>;
}

/// Git CLI runner.
///
/// Sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0` so a missing
/// credential fails fast instead of blocking on a prompt, and `LC_ALL=C`
/// so diagnostics match [`classify`](super::outcome::classify).
#[derive(Debug, Clone)]
pub struct ShellGit {
    program: PathBuf,
    workdir: PathBuf,
    identity: Option<(String, String)>,
}

impl ShellGit {
    /// Creates a runner for `workdir`, resolving `git` from `PATH`.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` if git is not installed.
    pub fn new(workdir: impl Into<PathBuf>) -> PortResult<Self> {
        let program = which::which("git").map_err(|_| ProcessError::ExecutableNotFound {
            name: "git".to_string(),
        })?;
        Ok(Self {
            program,
            workdir: workdir.into(),
            identity: None,
        })
    }

    /// Author and commit as `name <email>` regardless of the clone's config.
    #[must_use]
    pub fn with_identity(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.identity = Some((name.into(), email.into()));
        self
    }

    async fn exec(&self, command: &str, args: &[&str]) -> PortResult<String> {
        let line = command_line(command, args);
        debug!(cwd = %self.workdir.display(), cmd = %line, "exec");

        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.arg(command)
            .args(args)
            .current_dir(&self.workdir)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("LC_ALL", "C")
            .stdin(Stdio::null());
        if let Some((name, email)) = &self.identity {
            cmd.env("GIT_AUTHOR_NAME", name)
                .env("GIT_AUTHOR_EMAIL", email)
                .env("GIT_COMMITTER_NAME", name)
                .env("GIT_COMMITTER_EMAIL", email);
        }

        let output = cmd
            .output()
            .await
            .map_err(|source| ProcessError::SpawnFailed {
                command: line.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: line,
                message: diagnostic(stdout, stderr),
            }
            .into());
        }

        if !stderr.is_empty() {
            trace!(cmd = %line, stderr = %stderr, "git stderr");
        }
        Ok(stdout)
    }
}

impl GitRunner for ShellGit {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn run<'a>(
        &'a self,
        command: &'a str,
        args: &'a [&'a str],
    ) -> BoxFuture<'a, PortResult<String>> {
        Box::pin(self.exec(command, args))
    }
}

/// Git writes most diagnostics to stderr, but `apply --verbose` and a few
/// porcelain commands split them across both streams.
fn diagnostic(stdout: String, stderr: String) -> String {
    match (stdout.is_empty(), stderr.is_empty()) {
        (_, true) => stdout,
        (true, false) => stderr,
        (false, false) => format!("{stderr}\n{stdout}"),
    }
}

/// Returns the full command line as a string (for logging and errors).
pub(crate) fn command_line(command: &str, args: &[&str]) -> String {
    use std::fmt::Write as _;

    let mut line = format!("git {command}");
    for arg in args {
        if arg.contains(char::is_whitespace) {
            let _ = write!(line, " \"{}\"", first_line(arg));
        } else {
            let _ = write!(line, " {arg}");
        }
    }
    line
}

/// Commit messages are passed as arguments; keep log lines to one line.
fn first_line(arg: &str) -> String {
    match arg.split_once('\n') {
        Some((head, _)) => format!("{head}..."),
        None => arg.to_string(),
    }
}
