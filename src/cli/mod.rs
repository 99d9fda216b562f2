// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for portbot using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! portbot [global options] <command>
//! backport <PR> <BRANCH>...
//! serve                       reads `backport ...` lines from stdin
//! version
//! options
//! inis
//! ```

pub mod backport;
pub mod global;
pub mod serve;

#[cfg(test)]
mod tests;

use crate::cli::backport::BackportArgs;
use crate::cli::global::GlobalOptions;
use crate::cli::serve::ServeArgs;
use clap::{Parser, Subcommand};

/// Pull request backport bot.
///
/// Replays merged GitHub pull requests onto release branches.
#[derive(Debug, Parser)]
#[command(
    name = "portbot",
    author,
    version,
    about = "Pull request backport bot",
    long_about = "portbot Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Replays the diff of a merged pull request onto other branches,\n\
                  records conflicts for a human to finish, and opens one pull\n\
                  request per target branch.\n\n\
                  Invoking `portbot backport <pr-url> 6.x 7.x` backports the PR\n\
                  to 6.x and 7.x; `portbot serve` keeps running and takes the\n\
                  same requests one per line on stdin.\n\
                  See `portbot <command> --help` for more information about a command.",
    after_help = "CONFIG FILES:\n\n\
                  portbot loads `portbot.toml` from the current directory if it\n\
                  exists, then every file given with --ini in order, then\n\
                  PORTBOT_* environment variables (PORTBOT_BACKPORT__REMOTE=...),\n\
                  then --set overrides. Later sources win."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their effective values.
    Options,

    /// Lists the config files in use.
    Inis,

    /// Backports a merged pull request to one or more branches.
    Backport(BackportArgs),

    /// Reads `backport <PR> <BRANCH>...` lines from stdin until it closes.
    ///
    /// Requests for the same repository run one after another; different
    /// repositories run side by side.
    Serve(ServeArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
