// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backport branch naming.
//!
//! ```text
//! direct:  <namespace>/backport/<original>/<target>
//! proxy:   <namespace>/backport/<original>/<working>/<target>
//! ```
//!
//! Names depend only on their inputs, so a rerun lands on the same branch.

/// Name of the branch that carries the backport of `original` (via
/// `working`) onto `target`.
#[must_use]
pub fn backport_branch(namespace: &str, original: u64, working: u64, target: &str) -> String {
    if original == working {
        format!("{namespace}/backport/{original}/{target}")
    } else {
        format!("{namespace}/backport/{original}/{working}/{target}")
    }
}
