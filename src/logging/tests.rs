// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogFormat, LogLevel};
use crate::config::types::GlobalConfig;
use std::path::{Path, PathBuf};

#[test]
fn test_log_level_from_u8() {
    assert_eq!(LogLevel::from_u8(0), Some(LogLevel::SILENT));
    assert_eq!(LogLevel::from_u8(3), Some(LogLevel::INFO));
    assert_eq!(LogLevel::from_u8(6), Some(LogLevel::DUMP));
    assert_eq!(LogLevel::from_u8(7), None);
}

#[test]
fn test_log_level_filters() {
    let filters: Vec<_> = (0..=6)
        .filter_map(LogLevel::from_u8)
        .map(LogLevel::to_filter_string)
        .collect();
    insta::assert_debug_snapshot!(filters, @r#"
    [
        "off",
        "error",
        "warn",
        "info,hyper=warn,reqwest=warn",
        "debug,hyper=warn,reqwest=warn",
        "trace,hyper=warn,reqwest=warn,h2=warn",
        "trace",
    ]
    "#);
}

#[test]
fn test_log_level_parse() {
    let parsed: Vec<_> = ["4", "debug", "TRACE", " warn ", "silent", "7", "loud"]
        .into_iter()
        .map(|s| s.parse::<LogLevel>().ok())
        .collect();
    assert_eq!(
        parsed,
        vec![
            Some(LogLevel::DEBUG),
            Some(LogLevel::DEBUG),
            Some(LogLevel::TRACE),
            Some(LogLevel::WARN),
            Some(LogLevel::SILENT),
            None,
            None,
        ]
    );
}

#[test]
fn test_log_level_display() {
    assert_eq!(LogLevel::INFO.to_string(), "3 (info)");
    assert_eq!(LogLevel::DUMP.name(), "dump");
}

#[test]
fn test_log_level_try_from() {
    assert!(LogLevel::try_from(5).is_ok());
    let err = LogLevel::try_from(9).unwrap_err();
    assert!(err.to_string().contains("got '9'"), "{err}");
}

#[test]
fn test_log_level_deserialize_number_or_name() {
    #[derive(serde::Deserialize)]
    struct Levels {
        a: LogLevel,
        b: LogLevel,
    }

    let levels: Levels = serde_json::from_str(r#"{ "a": 2, "b": "trace" }"#).unwrap();
    assert_eq!(levels.a, LogLevel::WARN);
    assert_eq!(levels.b, LogLevel::TRACE);
    assert!(serde_json::from_str::<Levels>(r#"{ "a": 300, "b": 1 }"#).is_err());
}

#[test]
fn test_log_level_tracing_mapping() {
    assert_eq!(LogLevel::SILENT.to_tracing_level(), None);
    assert_eq!(
        LogLevel::WARN.to_tracing_level(),
        Some(tracing::Level::WARN)
    );
    assert_eq!(
        LogLevel::DUMP.to_tracing_level(),
        Some(tracing::Level::TRACE)
    );
}

#[test]
fn test_log_config_builder() {
    let config = LogConfig::builder()
        .with_console_level(LogLevel::DEBUG)
        .with_log_file("logs/portbot.log")
        .build();

    assert_eq!(config.console_level(), LogLevel::DEBUG);
    assert_eq!(config.file_level(), LogLevel::TRACE);
    assert_eq!(config.log_file(), Some(Path::new("logs/portbot.log")));
    assert_eq!(config.file_format(), LogFormat::Text);

    let default = LogConfig::default();
    assert_eq!(default.console_level(), LogLevel::INFO);
    assert!(default.log_file().is_none());
}

#[test]
fn test_log_config_from_global() {
    let mut global = GlobalConfig {
        output_log_level: LogLevel::WARN,
        file_log_level: LogLevel::DEBUG,
        log_file: PathBuf::from("/var/log/portbot.jsonl"),
        log_format: LogFormat::Json,
    };
    let config = LogConfig::from(&global);
    assert_eq!(config.console_level(), LogLevel::WARN);
    assert_eq!(config.file_level(), LogLevel::DEBUG);
    assert_eq!(config.log_file(), Some(Path::new("/var/log/portbot.jsonl")));
    assert_eq!(config.file_format(), LogFormat::Json);

    global.log_file = PathBuf::new();
    assert!(LogConfig::from(&global).log_file().is_none());
}
