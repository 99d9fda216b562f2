// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backport command arguments.

use clap::Args;

/// Arguments for `portbot backport`.
#[derive(Debug, Clone, Args)]
pub struct BackportArgs {
    /// Pull request to backport: a GitHub URL or `owner/name#number`.
    #[arg(value_name = "PR")]
    pub pr: String,

    /// Target branches, e.g. `6.x 7.x`.
    #[arg(value_name = "BRANCH", required = true, num_args = 1..)]
    pub branches: Vec<String>,

    /// Apply with `git apply --3way` instead of leaving `.rej` files.
    #[arg(long = "three-way")]
    pub three_way: bool,

    /// Directory holding the local clones (overrides `backport.repos_dir`).
    #[arg(long = "repos-dir", value_name = "DIR")]
    pub repos_dir: Option<std::path::PathBuf>,
}
