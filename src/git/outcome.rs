// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Recognized git diagnostics.
//!
//! Every place that needs to tell an expected git failure from a fatal one
//! goes through [`classify`]. The patterns match git's English, unstructured
//! output; [`ShellGit`](super::runner::ShellGit) runs git in the C locale.
//!
//! ```text
//! diagnostic text
//!      |
//!      v
//!  ApplyCounts::parse   applied / rejected / missing
//!      |
//!      v
//!  classify  -->  Conflict | NotFound | Other
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// What a failed git command's diagnostic means to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitOutcome {
    /// A patch was partially applied; some hunks or files were left over.
    Conflict,
    /// A branch, ref, or path did not exist.
    NotFound,
    /// Anything else. Callers treat this as fatal.
    Other,
}

static APPLIED: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)applied patch .* cleanly"));

static REJECTED: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)applying patch .* with \d+ rejects?"));

static THREE_WAY_CONFLICT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)applied patch to '.*' with conflicts"));

static MISSING: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)error: .*: no such file or directory"));

static NOT_FOUND: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)(branch '.*' not found|did not match any|unknown revision|not a valid object name|couldn't find remote ref)",
    )
});

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("diagnostic patterns are valid")
}

/// Per-file results parsed from `git apply --verbose` output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyCounts {
    /// Files that applied without trouble.
    pub applied: usize,
    /// Files left with rejected hunks or conflict markers.
    pub rejected: usize,
    /// Files the patch touches that do not exist on the target.
    pub missing: usize,
}

impl ApplyCounts {
    /// Counts the file-level markers in an apply diagnostic.
    #[must_use]
    pub fn parse(diagnostic: &str) -> Self {
        Self {
            applied: APPLIED.find_iter(diagnostic).count(),
            rejected: REJECTED.find_iter(diagnostic).count()
                + THREE_WAY_CONFLICT.find_iter(diagnostic).count(),
            missing: MISSING.find_iter(diagnostic).count(),
        }
    }

    /// Whether anything needs a human.
    #[must_use]
    pub const fn has_conflicts(&self) -> bool {
        self.rejected > 0 || self.missing > 0
    }
}

/// Classifies a failed command's diagnostic text.
#[must_use]
pub fn classify(diagnostic: &str) -> GitOutcome {
    if ApplyCounts::parse(diagnostic).has_conflicts() {
        GitOutcome::Conflict
    } else if NOT_FOUND.is_match(diagnostic) {
        GitOutcome::NotFound
    } else {
        GitOutcome::Other
    }
}
