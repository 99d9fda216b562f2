// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-target conflict reports and the run summary.

use std::fmt;

use crate::git::outcome::ApplyCounts;
use crate::github::CreatedPullRequest;

/// How a patch landed on one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Clean,
    /// Files left with rejected hunks.
    Rejected(usize),
    /// Files the patch touches that do not exist on the target.
    MissingFiles(usize),
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => f.write_str("applied cleanly"),
            Self::Rejected(n) => write!(f, "applied with {n} rejects"),
            Self::MissingFiles(n) => write!(f, "{n} missing target files"),
        }
    }
}

/// Outcome of applying the diff to one target branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictReport {
    pub target: String,
    pub applied: usize,
    pub rejected: usize,
    pub missing: usize,
}

impl ConflictReport {
    /// Report for a patch that applied without complaint.
    #[must_use]
    pub fn clean(target: &str, applied: usize) -> Self {
        Self {
            target: target.to_string(),
            applied,
            rejected: 0,
            missing: 0,
        }
    }

    #[must_use]
    pub fn from_counts(target: &str, counts: ApplyCounts) -> Self {
        Self {
            target: target.to_string(),
            applied: counts.applied,
            rejected: counts.rejected,
            missing: counts.missing,
        }
    }

    #[must_use]
    pub const fn counts(&self) -> ApplyCounts {
        ApplyCounts {
            applied: self.applied,
            rejected: self.rejected,
            missing: self.missing,
        }
    }

    /// Rejects take precedence over missing files.
    #[must_use]
    pub const fn classification(&self) -> Classification {
        if self.rejected > 0 {
            Classification::Rejected(self.rejected)
        } else if self.missing > 0 {
            Classification::MissingFiles(self.missing)
        } else {
            Classification::Clean
        }
    }

    #[must_use]
    pub const fn has_conflicts(&self) -> bool {
        self.rejected + self.missing > 0
    }
}

/// What a finished run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackportSummary {
    pub original: u64,
    pub working: u64,
    pub targets: Vec<String>,
    pub reports: Vec<ConflictReport>,
    /// Opened pull requests, in target order.
    pub pull_requests: Vec<CreatedPullRequest>,
}

impl BackportSummary {
    #[must_use]
    pub const fn is_proxy(&self) -> bool {
        self.original != self.working
    }

    /// Targets whose report has conflicts, in target order.
    #[must_use]
    pub fn conflicted(&self) -> Vec<&str> {
        self.reports
            .iter()
            .filter(|r| r.has_conflicts())
            .map(|r| r.target.as_str())
            .collect()
    }

    /// One-paragraph completion message for the requester.
    #[must_use]
    pub fn message(&self) -> String {
        let mut message = format!(
            "Backported PR #{} to {}",
            self.original,
            self.targets.join(", ")
        );
        if self.is_proxy() {
            message.push_str(&format!(" via #{}", self.working));
        }

        let conflicted = self.conflicted();
        if !conflicted.is_empty() {
            if self.targets.len() == 1 {
                message.push_str("\nConflicts detected");
            } else {
                message.push_str(&format!("\nConflicts in {}", conflicted.join(", ")));
            }
        }
        message
    }
}

impl fmt::Display for BackportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())?;
        for pr in &self.pull_requests {
            write!(f, "\n{}", pr.html_url)?;
        }
        Ok(())
    }
}
