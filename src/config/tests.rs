// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::Config;
use super::loader::{ConfigLoader, ConfigSource};
use crate::config::types::ApplyStrategy;
use crate::logging::LogLevel;
use std::path::PathBuf;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.global.output_log_level, LogLevel::INFO);
    assert_eq!(config.github.api_url, "https://api.github.com");
    assert_eq!(config.backport.namespace, "portbot");
    assert_eq!(config.backport.remote, "origin");
    assert_eq!(config.backport.label, "backport");
    assert_eq!(config.backport.conflict_label, "conflicts");
    assert_eq!(config.backport.apply_strategy, ApplyStrategy::Reject);
    assert!(config.backport.committer().is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_apply_strategy_parse() {
    let parsed: Vec<_> = ["reject", "Three-Way", "3way", "merge"]
        .into_iter()
        .map(|s| (s, s.parse::<ApplyStrategy>().ok()))
        .collect();
    assert_eq!(
        parsed,
        vec![
            ("reject", Some(ApplyStrategy::Reject)),
            ("Three-Way", Some(ApplyStrategy::ThreeWay)),
            ("3way", Some(ApplyStrategy::ThreeWay)),
            ("merge", None),
        ]
    );
    assert_eq!(ApplyStrategy::ThreeWay.to_string(), "three-way");
}

#[test]
fn test_parse_toml() {
    let config = Config::parse(
        r#"
        [global]
        output_log_level = 4

        [github]
        api_url = "https://ghe.example.com/api/v3"

        [backport]
        namespace = "bot"
        repos_dir = "/var/lib/portbot/repos"
        templates_dir = "/etc/portbot/templates"
        conflict_label = "needs-resolution"
        apply_strategy = "three-way"
        committer_name = "Backport Bot"
        committer_email = "bot@example.com"
        "#,
    )
    .expect("config should parse");

    assert_eq!(config.global.output_log_level, LogLevel::DEBUG);
    assert_eq!(config.github.api_url, "https://ghe.example.com/api/v3");
    assert_eq!(config.backport.namespace, "bot");
    assert_eq!(
        config.backport.repos_dir,
        PathBuf::from("/var/lib/portbot/repos")
    );
    assert_eq!(
        config.backport.templates_dir,
        Some(PathBuf::from("/etc/portbot/templates"))
    );
    assert_eq!(config.backport.conflict_label, "needs-resolution");
    assert_eq!(config.backport.apply_strategy, ApplyStrategy::ThreeWay);
    assert_eq!(
        config.backport.committer(),
        Some(("Backport Bot", "bot@example.com"))
    );
    // untouched keys keep their defaults
    assert_eq!(config.backport.label, "backport");
}

#[test]
fn test_unknown_key_rejected() {
    let result = Config::parse(
        r#"
        [backport]
        nmespace = "typo"
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn test_invalid_values_rejected() {
    for toml in [
        "[backport]\nnamespace = \"\"",
        "[backport]\nnamespace = \"has space\"",
        "[backport]\nnamespace = \"trailing/\"",
        "[backport]\nremote = \"\"",
        "[backport]\ncommitter_name = \"Only Name\"",
        "[global]\noutput_log_level = 9",
    ] {
        assert!(Config::parse(toml).is_err(), "expected error for {toml:?}");
    }
}

#[test]
fn test_set_option_override() {
    let config = Config::builder()
        .add_toml_str("[backport]\nlabel = \"from-file\"")
        .set_option("backport.label = from-cli")
        .and_then(super::loader::ConfigLoader::build)
        .expect("override should apply");
    assert_eq!(config.backport.label, "from-cli");

    assert!(Config::builder().set_option("no-equals-sign").is_err());
    assert!(Config::builder().set_option("=value").is_err());
}

#[test]
fn test_format_options_hides_token() {
    let mut config = Config::default();
    config.github.token = "ghp_secret".to_string();
    config.backport.committer_name = "Bot".to_string();
    config.backport.committer_email = "bot@example.com".to_string();

    let options = config.format_options();
    let joined = options.join("\n");
    assert!(!joined.contains("ghp_secret"));
    assert!(joined.contains("[hidden]"));
    assert!(joined.contains("Bot <bot@example.com>"));
    assert!(joined.contains("(built-in)"));

    let keys: Vec<_> = options
        .iter()
        .filter_map(|line| line.split_whitespace().next())
        .collect();
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    assert_eq!(keys, sorted, "options should be ordered by key");
}

#[test]
fn test_loaded_files_listing() {
    let loader = Config::builder()
        .add_toml_str("")
        .add_toml_file_optional("definitely-missing-portbot.toml");
    assert_eq!(
        loader.format_loaded_files(),
        vec!["1. [string] <string>".to_string()]
    );
}

#[test]
fn test_set_option_rejects_malformed() {
    for option in ["no-equals", "=value", "  =x"] {
        let err = ConfigLoader::new().set_option(option).err().expect("rejected");
        assert!(err.to_string().contains("expected section.key=value"), "{option}");
    }
}

#[test]
fn test_required_file_listed_even_if_missing() {
    let loader = ConfigLoader::new().add_toml_file("missing-portbot.toml");
    assert_eq!(
        loader.sources(),
        &[ConfigSource::File(PathBuf::from("missing-portbot.toml"))]
    );
    assert_eq!(
        loader.format_loaded_files(),
        vec!["1. [file] missing-portbot.toml".to_string()]
    );
}
