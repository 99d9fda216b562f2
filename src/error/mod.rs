// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!              PortError (~24 bytes)
//!                     |
//!   +------+------+------+------+------+------+------+
//!   |      |      |      |      |      |      |      |
//!   v      v      v      v      v      v      v      v
//!  Git    Net   Config Task  Workflow Tmpl  Proc   Fs/Io/Other
//!  Box    Box    Box    Box    Box    Box    Box    Box
//!
//! Sub-errors (unboxed internally):
//!   Git       CommandFailed, CloneFailed, InvalidPath
//!   Network   Reqwest, HttpError, UnexpectedResponse
//!   Config    InvalidValue
//!   Task      Dropped, Panicked
//!   Workflow  TargetIsBase, NotMerged, NoTargets, InvalidChangeRef, UnknownCommand
//!   Template  NotFound, UnknownPlaceholder, ReadFailed
//!   Process   ExecutableNotFound, SpawnFailed
//!   Fs        WriteFailed, PermissionsFailed
//! ```
//!
//! `WorkflowError` is the user-facing class: it is raised before any git or
//! API mutation. Everything else aborts the current run only.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`PortError`].
pub type PortResult<T> = std::result::Result<T, PortError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum PortError {
    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Network operation failed.
    #[error("network error: {0}")]
    Network(#[from] Box<NetworkError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Queued task error.
    #[error("task error: {0}")]
    Task(#[from] Box<TaskError>),

    /// The backport request itself was rejected.
    #[error("{0}")]
    Workflow(#[from] Box<WorkflowError>),

    /// Template loading or rendering error.
    #[error("template error: {0}")]
    Template(#[from] Box<TemplateError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

impl PortError {
    /// Returns the workflow rejection if this error is a user/input error.
    #[must_use]
    pub fn as_workflow(&self) -> Option<&WorkflowError> {
        match self {
            Self::Workflow(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the raw git diagnostic text if this is a failed git command.
    #[must_use]
    pub fn git_diagnostic(&self) -> Option<&str> {
        match self {
            Self::Git(err) => match err.as_ref() {
                GitError::CommandFailed { message, .. } => Some(message),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Create a [`PortError::Other`] from a message.
pub fn other(message: impl Into<String>) -> PortError {
    PortError::Other(message.into().into_boxed_str())
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for PortError {
                fn from(err: $error) -> Self {
                    PortError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    GitError => Git,
    NetworkError => Network,
    ConfigError => Config,
    TaskError => Task,
    WorkflowError => Workflow,
    TemplateError => Template,
    ProcessError => Process,
    FsError => Fs,
    std::io::Error => Io,
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Git command exited non-zero. `message` carries the raw diagnostic.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Clone operation failed.
    #[error("failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },

    /// A path could not be passed to git.
    #[error("invalid path for git: {path}")]
    InvalidPath { path: String },
}

// --- Network Errors ---

/// Network operation errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The API answered with a body we could not interpret.
    #[error("unexpected response from {url}: {message}")]
    UnexpectedResponse { url: String, message: String },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Task Errors ---

/// Repository queue task errors.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The task was dropped before it produced a result.
    #[error("task on '{key}' was dropped before completion")]
    Dropped { key: String },

    /// The task panicked.
    #[error("task on '{key}' panicked")]
    Panicked { key: String },
}

// --- Workflow Errors ---

/// User/input errors that reject a backport before anything is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// A requested target is the branch the change was merged into.
    #[error("cannot backport PR #{number} into its own base branch '{branch}'")]
    TargetIsBase { number: u64, branch: String },

    /// The (original) change has not been merged.
    #[error("cannot backport unmerged PR #{number}")]
    NotMerged { number: u64 },

    /// No target branches were requested.
    #[error("no target branches given for PR #{number}")]
    NoTargets { number: u64 },

    /// The change reference could not be parsed.
    #[error("invalid pull request reference: {0}")]
    InvalidChangeRef(String),

    /// A command line is not `backport <pr> <branch>...`.
    #[error("unrecognized command: {0}")]
    UnknownCommand(String),
}

// --- Template Errors ---

/// Template loading and rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No template with this name exists.
    #[error("template '{0}' not found")]
    NotFound(String),

    /// The template references a value the context does not provide.
    #[error("template '{template}' uses unknown placeholder '{placeholder}'")]
    UnknownPlaceholder {
        template: String,
        placeholder: String,
    },

    /// An override template file could not be read.
    #[error("failed to read template '{path}': {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Writing a file failed.
    #[error("failed to write '{path}': {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Setting file permissions failed.
    #[error("failed to set permissions on '{path}': {source}")]
    PermissionsFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests;
