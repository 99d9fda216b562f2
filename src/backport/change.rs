// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Working/original change resolution and target list checks.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::WorkflowError;
use crate::github::ChangeReference;

static PROXY_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\A\s*backports?\s+pr\s+#(\d+)").expect("proxy marker pattern is valid")
});

/// Original pull request referenced at the top of `body`, if any.
///
/// Recognizes `Backports PR #123` (and `Backport PR #123`), ignoring case
/// and leading whitespace. A marker anywhere but the start does not count.
#[must_use]
pub fn proxy_target(body: &str) -> Option<u64> {
    PROXY_MARKER
        .captures(body)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// The change whose diff is applied and the change it originally came from.
///
/// Both are the same pull request unless the working change is itself a
/// backport (a proxy) of an earlier one.
#[derive(Debug, Clone)]
pub struct ResolvedChange {
    pub working: ChangeReference,
    pub original: ChangeReference,
}

impl ResolvedChange {
    /// A change that is its own original.
    #[must_use]
    pub fn direct(change: ChangeReference) -> Self {
        Self {
            original: change.clone(),
            working: change,
        }
    }

    #[must_use]
    pub const fn is_proxy(&self) -> bool {
        self.working.number != self.original.number
    }
}

/// Deduplicates `targets` (first occurrence wins) and checks them against
/// the working change.
///
/// # Errors
///
/// Returns `WorkflowError::NoTargets` for an empty list and
/// `WorkflowError::TargetIsBase` if a target is the change's own base.
pub fn normalize_targets(
    working: &ChangeReference,
    targets: &[String],
) -> Result<Vec<String>, WorkflowError> {
    let mut unique: Vec<String> = Vec::with_capacity(targets.len());
    for target in targets.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if !unique.iter().any(|seen| seen == target) {
            unique.push(target.to_string());
        }
    }

    if unique.is_empty() {
        return Err(WorkflowError::NoTargets {
            number: working.number,
        });
    }
    if let Some(base) = unique.iter().find(|t| **t == working.base) {
        return Err(WorkflowError::TargetIsBase {
            number: working.number,
            branch: base.clone(),
        });
    }
    Ok(unique)
}
