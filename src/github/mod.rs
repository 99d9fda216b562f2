// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitHub pull request data and the API seam.
//!
//! ```text
//! GitHubApi (trait, object safe)
//!   pull_request(repo, n)        --> ChangeReference
//!   commits(repo, n)             --> Vec<CommitRecord>  (oldest first)
//!   diff(repo, n)                --> unified diff text
//!   open_review_request(repo, r) --> CreatedPullRequest  (issue, then PR)
//!        |
//!        v
//!   GitHubClient (reqwest, REST v3)
//! ```
//!
//! # Key Types
//!
//! | Type               | Purpose                                 |
//! |--------------------|-----------------------------------------|
//! | `RepoSlug`         | `owner/name`, also the queue key        |
//! | `ChangeReference`  | Snapshot of one pull request            |
//! | `CommitRecord`     | One commit of a pull request            |
//! | `NewReviewRequest` | Everything needed to open a backport PR |

pub mod client;

use futures_util::future::BoxFuture;
use std::fmt;
use std::str::FromStr;

use crate::error::{PortResult, WorkflowError};

pub use client::GitHubClient;

/// Repository identity, `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepoSlug {
    owner: String,
    name: String,
}

impl RepoSlug {
    /// Creates a slug from its two parts.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidChangeRef` if either part is empty or
    /// contains a `/` or whitespace.
    pub fn new(owner: &str, name: &str) -> Result<Self, WorkflowError> {
        let valid = |s: &str| !s.is_empty() && !s.contains(['/', ' ', '\t', '\n']);
        if !valid(owner) || !valid(name) {
            return Err(WorkflowError::InvalidChangeRef(format!("{owner}/{name}")));
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoSlug {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, name) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| WorkflowError::InvalidChangeRef(s.to_string()))?;
        Self::new(owner, name.trim_end_matches(".git"))
    }
}

/// Parses a pull request reference.
///
/// Accepts `https://github.com/<owner>/<name>/pull/<n>` (any host, trailing
/// path segments such as `/files` ignored) and the short forms
/// `<owner>/<name>#<n>` and `<owner>/<name>/pull/<n>`.
///
/// # Errors
///
/// Returns `WorkflowError::InvalidChangeRef` if the reference has no
/// repository or no numeric pull request id.
pub fn parse_pull_ref(reference: &str) -> Result<(RepoSlug, u64), WorkflowError> {
    let invalid = || WorkflowError::InvalidChangeRef(reference.to_string());
    let trimmed = reference.trim();

    let path = match trimmed.split_once("://") {
        Some((_, rest)) => {
            let rest = rest.split(['#', '?']).next().unwrap_or_default();
            rest.split_once('/').map_or("", |(_, p)| p)
        }
        None => {
            if let Some((slug, number)) = trimmed.split_once('#') {
                let number = number.parse::<u64>().map_err(|_| invalid())?;
                return Ok((slug.parse().map_err(|_| invalid())?, number));
            }
            trimmed
        }
    };
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [owner, name, "pull" | "pulls", number, ..] => {
            let number = number.parse::<u64>().map_err(|_| invalid())?;
            Ok((RepoSlug::new(owner, name).map_err(|_| invalid())?, number))
        }
        _ => Err(invalid()),
    }
}

/// Who did something to a commit, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
    /// ISO-8601 timestamp as reported by the API.
    pub date: String,
}

/// One commit of a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub sha: String,
    pub author: Signature,
    pub committer: Signature,
    pub message: String,
}

/// Snapshot of a pull request, fetched once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeReference {
    pub repo: RepoSlug,
    pub number: u64,
    pub title: String,
    pub html_url: String,
    /// Branch the change targets (or was merged into).
    pub base: String,
    pub head: String,
    pub merged: bool,
    pub author: String,
    pub merged_by: Option<String>,
    /// Description text; empty when the pull request has none.
    pub body: String,
    /// Clone URL of the base repository.
    pub clone_url: String,
}

/// Parameters for a new backport pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReviewRequest {
    pub title: String,
    pub body: String,
    /// Branch holding the backport commit.
    pub head: String,
    /// Target branch.
    pub base: String,
    pub assignees: Vec<String>,
    pub labels: Vec<String>,
}

/// A pull request the bot opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPullRequest {
    pub number: u64,
    pub html_url: String,
}

/// The subset of the GitHub API the backport workflow needs.
pub trait GitHubApi: Send + Sync {
    /// Fetches pull request metadata.
    ///
    /// # Errors
    ///
    /// Returns a `NetworkError` on transport failure, non-2xx status, or an
    /// unparseable body.
    fn pull_request<'a>(
        &'a self,
        repo: &'a RepoSlug,
        number: u64,
    ) -> BoxFuture<'a, PortResult<ChangeReference>>;

    /// Fetches the pull request's commits, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a `NetworkError` on any API failure.
    fn commits<'a>(
        &'a self,
        repo: &'a RepoSlug,
        number: u64,
    ) -> BoxFuture<'a, PortResult<Vec<CommitRecord>>>;

    /// Fetches the pull request's unified diff.
    ///
    /// # Errors
    ///
    /// Returns a `NetworkError` on any API failure.
    fn diff<'a>(&'a self, repo: &'a RepoSlug, number: u64) -> BoxFuture<'a, PortResult<String>>;

    /// Opens a tracking issue and turns it into a pull request.
    ///
    /// # Errors
    ///
    /// Returns a `NetworkError` if either request fails; an issue created
    /// before a failed pull request call is left open.
    fn open_review_request<'a>(
        &'a self,
        repo: &'a RepoSlug,
        request: &'a NewReviewRequest,
    ) -> BoxFuture<'a, PortResult<CreatedPullRequest>>;
}
