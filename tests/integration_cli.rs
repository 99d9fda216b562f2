// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing.

use clap::{CommandFactory, Parser};
use portbot::cli::{Cli, Command};
use portbot::github::parse_pull_ref;

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn cli_no_command() {
    let cli = Cli::try_parse_from(["portbot"]).unwrap();
    assert!(cli.command.is_none());
}

#[test]
fn cli_backport_reference_resolves() {
    let cli = Cli::try_parse_from([
        "portbot",
        "-l",
        "4",
        "backport",
        "acme/widgets#42",
        "6.x",
        "7.x",
        "8.x",
    ])
    .unwrap();
    let Some(Command::Backport(args)) = cli.command else {
        panic!("expected backport command");
    };

    let (repo, number) = parse_pull_ref(&args.pr).unwrap();
    assert_eq!(repo.to_string(), "acme/widgets");
    assert_eq!(number, 42);
    assert_eq!(args.branches, ["6.x", "7.x", "8.x"]);
}

#[test]
fn cli_unknown_command_fails() {
    assert!(Cli::try_parse_from(["portbot", "frobnicate"]).is_err());
}

#[test]
fn cli_help_mentions_backport() {
    let help = Cli::command().render_long_help().to_string();
    assert!(help.contains("backport"));
    assert!(help.contains("serve"));
    assert!(help.contains("--github-token"));
}
