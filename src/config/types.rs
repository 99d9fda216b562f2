// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for portbot.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig (logging), GitHubConfig (API), BackportConfig (workflow)
//! ```
//!
//! # Apply Strategy
//!
//! ```text
//! ApplyStrategy: Reject (default, *.rej files) | ThreeWay (conflict markers)
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::logging::{LogFormat, LogLevel};

/// How `git apply` handles hunks that do not apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplyStrategy {
    /// Apply what applies, leave `*.rej` files for the rest.
    #[default]
    Reject,
    /// Fall back to a three-way merge, leaving conflict markers in place.
    ThreeWay,
}

impl std::fmt::Display for ApplyStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::ThreeWay => write!(f, "three-way"),
        }
    }
}

impl std::str::FromStr for ApplyStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "three-way" | "3way" | "threeway" => Ok(Self::ThreeWay),
            _ => Err(ConfigError::InvalidValue {
                section: "backport".to_string(),
                key: "apply_strategy".to_string(),
                message: format!("expected 'reject' or 'three-way', got '{s}'"),
            }),
        }
    }
}

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-6 or a name).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6 or a name).
    pub file_log_level: LogLevel,
    /// Path to log file. Empty disables file logging.
    pub log_file: PathBuf,
    /// Line format of the log file.
    pub log_format: LogFormat,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: PathBuf::from("portbot.log"),
            log_format: LogFormat::Text,
        }
    }
}

/// GitHub API access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubConfig {
    /// REST API base URL (GitHub Enterprise installs differ).
    pub api_url: String,
    /// API token. Usually supplied via `--github-token` or `GITHUB_TOKEN`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub token: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            token: String::new(),
        }
    }
}

/// Backport workflow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackportConfig {
    /// First segment of every backport branch name.
    pub namespace: String,
    /// Remote the clones fetch from and push to.
    pub remote: String,
    /// Directory holding one clone per repository (`<owner>/<name>`).
    pub repos_dir: PathBuf,
    /// Directory with template overrides. Empty uses the built-in templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
    /// Label attached to every backport pull request.
    pub label: String,
    /// Extra label attached to pull requests whose patch did not apply cleanly.
    pub conflict_label: String,
    /// How `git apply` treats failing hunks.
    pub apply_strategy: ApplyStrategy,
    /// Name used for backport commits. Empty uses the clone's git config.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub committer_name: String,
    /// Email used for backport commits. Empty uses the clone's git config.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub committer_email: String,
}

impl Default for BackportConfig {
    fn default() -> Self {
        Self {
            namespace: "portbot".to_string(),
            remote: "origin".to_string(),
            repos_dir: PathBuf::from("repos"),
            templates_dir: None,
            label: "backport".to_string(),
            conflict_label: "conflicts".to_string(),
            apply_strategy: ApplyStrategy::default(),
            committer_name: String::new(),
            committer_email: String::new(),
        }
    }
}

impl BackportConfig {
    /// Returns the committer identity if both name and email are configured.
    #[must_use]
    pub fn committer(&self) -> Option<(&str, &str)> {
        if self.committer_name.is_empty() || self.committer_email.is_empty() {
            None
        } else {
            Some((&self.committer_name, &self.committer_email))
        }
    }
}
