// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::cli::{Cli, Command};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_parse_version() {
    let cli = Cli::try_parse_from(["portbot", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_backport() {
    let cli = Cli::try_parse_from([
        "portbot",
        "backport",
        "https://github.com/acme/widgets/pull/42",
        "6.x",
        "7.x",
    ])
    .unwrap();
    insta::assert_debug_snapshot!(cli.command, @r#"
    Some(
        Backport(
            BackportArgs {
                pr: "https://github.com/acme/widgets/pull/42",
                branches: [
                    "6.x",
                    "7.x",
                ],
                three_way: false,
                repos_dir: None,
            },
        ),
    )
    "#);
}

#[test]
fn test_parse_serve() {
    let cli = Cli::try_parse_from(["portbot", "serve", "--repos-dir", "/srv/clones"]).unwrap();
    let Some(Command::Serve(args)) = cli.command else {
        panic!("expected serve");
    };
    assert!(!args.three_way);
    assert_eq!(args.repos_dir, Some(PathBuf::from("/srv/clones")));
}

#[test]
fn test_parse_backport_requires_branch() {
    let err = Cli::try_parse_from(["portbot", "backport", "acme/widgets#42"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}

#[test]
fn test_parse_backport_options() {
    let cli = Cli::try_parse_from([
        "portbot",
        "backport",
        "--three-way",
        "--repos-dir",
        "/srv/clones",
        "acme/widgets#42",
        "6.x",
    ])
    .unwrap();
    let Some(Command::Backport(args)) = cli.command else {
        panic!("expected backport command");
    };
    assert!(args.three_way);
    assert_eq!(args.repos_dir, Some(PathBuf::from("/srv/clones")));
    assert_eq!(args.branches, vec!["6.x".to_string()]);
}

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "portbot",
        "-l",
        "5",
        "-i",
        "a.toml",
        "--ini",
        "b.toml",
        "-s",
        "backport.remote=upstream",
        "options",
    ])
    .unwrap();
    assert_eq!(cli.global.log_level, Some(5));
    assert_eq!(
        cli.global.inis,
        vec![PathBuf::from("a.toml"), PathBuf::from("b.toml")]
    );
    assert!(matches!(cli.command, Some(Command::Options)));
}

#[test]
fn test_log_level_out_of_range() {
    assert!(Cli::try_parse_from(["portbot", "-l", "7", "version"]).is_err());
}

#[test]
fn test_config_overrides() {
    let cli = Cli::try_parse_from([
        "portbot",
        "-l",
        "4",
        "--log-file",
        "bot.log",
        "-s",
        "backport.label=port",
        "inis",
    ])
    .unwrap();
    insta::assert_debug_snapshot!(cli.global.to_config_overrides(), @r#"
    [
        "backport.label=port",
        "global.output_log_level=4",
        "global.file_log_level=4",
        "global.log_file=bot.log",
    ]
    "#);
}

#[test]
fn test_file_log_level_wins_over_log_level() {
    let cli =
        Cli::try_parse_from(["portbot", "-l", "2", "--file-log-level", "5", "version"]).unwrap();
    let overrides = cli.global.to_config_overrides();
    assert!(overrides.contains(&"global.output_log_level=2".to_string()));
    assert!(overrides.contains(&"global.file_log_level=5".to_string()));
}

#[test]
fn test_debug_hides_token() {
    let cli = Cli::try_parse_from(["portbot", "--github-token", "ghp_secret", "version"]).unwrap();
    assert_eq!(cli.global.github_token.as_deref(), Some("ghp_secret"));
    let rendered = format!("{:?}", cli.global);
    assert!(!rendered.contains("ghp_secret"));
    assert!(rendered.contains("[hidden]"));
}
