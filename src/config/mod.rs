// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for portbot.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. portbot.toml (cwd, optional)
//! 3. --ini FILE (repeatable)
//! 4. PORTBOT_* env vars
//! 5. --set KEY=VALUE
//! ```
//!
//! # Environment Variable Mapping
//!
//! Sections and keys are separated by a double underscore so keys may keep
//! their own single underscores:
//!
//! ```text
//! PORTBOT_GITHUB__API_URL=https://ghe/api/v3  → github.api_url
//! PORTBOT_BACKPORT__CONFLICT_LABEL=needs-love → backport.conflict_label
//! PORTBOT_GLOBAL__OUTPUT_LOG_LEVEL=4          → global.output_log_level
//! ```

pub mod loader;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{BackportConfig, GitHubConfig, GlobalConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// GitHub API access.
    pub github: GitHubConfig,
    /// Backport workflow settings.
    pub backport: BackportConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use portbot::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("portbot.toml")
    ///     .with_env_prefix("PORTBOT")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Validate values the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the branch namespace or remote is unusable,
    /// or if only half of the committer identity is set.
    pub fn validate(&self) -> Result<()> {
        let backport = &self.backport;
        if backport.namespace.is_empty()
            || backport.namespace.contains(char::is_whitespace)
            || backport.namespace.starts_with('/')
            || backport.namespace.ends_with('/')
        {
            return Err(invalid(
                "namespace",
                format!("'{}' is not a usable branch prefix", backport.namespace),
            ));
        }
        if backport.remote.is_empty() {
            return Err(invalid("remote", "must not be empty".to_string()));
        }
        if backport.label.is_empty() {
            return Err(invalid("label", "must not be empty".to_string()));
        }
        if backport.committer_name.is_empty() != backport.committer_email.is_empty() {
            return Err(invalid(
                "committer_name",
                "committer_name and committer_email must be set together".to_string(),
            ));
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// The API token is shown as `[hidden]`. Output is ordered by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_github_options(&mut options);
        self.format_backport_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        let global = &self.global;
        options.insert(
            "global.output_log_level".into(),
            global.output_log_level.to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            global.file_log_level.to_string(),
        );
        options.insert(
            "global.log_file".into(),
            if global.log_file.as_os_str().is_empty() {
                "(disabled)".to_string()
            } else {
                global.log_file.display().to_string()
            },
        );
        options.insert("global.log_format".into(), global.log_format.to_string());
    }

    fn format_github_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("github.api_url".into(), self.github.api_url.clone());
        if !self.github.token.is_empty() {
            options.insert("github.token".into(), "[hidden]".into());
        }
    }

    fn format_backport_options(&self, options: &mut BTreeMap<String, String>) {
        let backport = &self.backport;
        options.insert("backport.namespace".into(), backport.namespace.clone());
        options.insert("backport.remote".into(), backport.remote.clone());
        options.insert(
            "backport.repos_dir".into(),
            backport.repos_dir.display().to_string(),
        );
        options.insert(
            "backport.templates_dir".into(),
            backport
                .templates_dir
                .as_ref()
                .map_or_else(|| "(built-in)".to_string(), |p| p.display().to_string()),
        );
        options.insert("backport.label".into(), backport.label.clone());
        options.insert(
            "backport.conflict_label".into(),
            backport.conflict_label.clone(),
        );
        options.insert(
            "backport.apply_strategy".into(),
            backport.apply_strategy.to_string(),
        );
        if let Some((name, email)) = backport.committer() {
            options.insert("backport.committer".into(), format!("{name} <{email}>"));
        }
    }
}

fn invalid(key: &str, message: String) -> anyhow::Error {
    ConfigError::InvalidValue {
        section: "backport".to_string(),
        key: key.to_string(),
        message,
    }
    .into()
}
