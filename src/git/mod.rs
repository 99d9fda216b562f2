// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!        workflow
//!           |
//!           v
//!        ops.rs  ----------> outcome.rs
//!   (typed helpers)      (diagnostic matchers)
//!           |
//!           v
//!   runner.rs: GitRunner (trait)
//!           |
//!           v
//!       ShellGit  --> git CLI
//!
//!   repo.rs: clone bootstrap (gix open check + git clone)
//! ```
//!
//! **`GitRunner`** is the seam tests replace with a scripted fake.
//! **`outcome`** is the only place git's diagnostic text is inspected.

pub mod ops;
pub mod outcome;
pub mod repo;
pub mod runner;
