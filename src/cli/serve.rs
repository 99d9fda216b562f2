// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Serve command arguments.

use clap::Args;
use std::path::PathBuf;

/// Arguments for `portbot serve`.
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Apply with `git apply --3way` instead of leaving `.rej` files.
    #[arg(long = "three-way")]
    pub three_way: bool,

    /// Directory holding the local clones (overrides `backport.repos_dir`).
    #[arg(long = "repos-dir", value_name = "DIR")]
    pub repos_dir: Option<PathBuf>,
}
