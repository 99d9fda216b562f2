// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Commit message and pull request text.
//!
//! ```text
//! Backports PR #42
//!
//! <original title>
//!
//! **Commit 1:**
//! <message>
//!
//! * Original sha: <sha>
//! * Authored by <name> <<email>> on <date>
//! * Committed by <name> <<email>> on <date>    (only if not the author)
//!
//! **Commit 2:**
//! ...
//! ```

use super::change::ResolvedChange;
use crate::github::{CommitRecord, Signature};

/// Text describing what is being backported, built from the original's
/// `commits`. Used as the commit message body for every target.
#[must_use]
pub fn narrative(change: &ResolvedChange, commits: &[CommitRecord]) -> String {
    let original = &change.original;
    let mut sections = vec![
        format!("Backports PR #{}", original.number),
        original.title.clone(),
    ];
    sections.extend(
        commits
            .iter()
            .enumerate()
            .map(|(i, commit)| commit_block(i + 1, commit)),
    );
    sections.join("\n\n")
}

fn commit_block(index: usize, commit: &CommitRecord) -> String {
    let mut lines = vec![
        format!("**Commit {index}:**"),
        commit.message.trim_end().to_string(),
        String::new(),
        format!("* Original sha: {}", commit.sha),
        format!("* Authored by {}", signature(&commit.author)),
    ];
    if commit.committer != commit.author {
        lines.push(format!("* Committed by {}", signature(&commit.committer)));
    }
    lines.join("\n")
}

fn signature(sig: &Signature) -> String {
    format!("{} <{}> on {}", sig.name, sig.email, sig.date)
}

/// Title of the backport pull request for `target`.
#[must_use]
pub fn review_title(target: &str, original: u64, title: &str) -> String {
    format!("[{target}] Backport PR #{original}: {title}")
}

/// Message of the backport commit.
#[must_use]
pub fn commit_message(title: &str, narrative: &str) -> String {
    if narrative.trim().is_empty() {
        title.to_string()
    } else {
        format!("{title}\n\n{narrative}")
    }
}

/// Body of the backport pull request.
///
/// A proxy keeps its own description, with a note pointing at the diff source.
#[must_use]
pub fn review_body(change: &ResolvedChange, narrative: &str) -> String {
    if change.is_proxy() {
        format!(
            "{}\n\n---\n\nBackported based on diff from #{}",
            change.working.body.trim_end(),
            change.working.number
        )
    } else {
        narrative.to_string()
    }
}
