// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Named text templates with `{{ name }}` placeholders.
//!
//! ```text
//! TemplateSet::load(dir?)
//!   built-in (embedded)  <-- overridden by <dir>/<name> when present
//!        |
//!        v
//!   render(name, &TemplateContext) --> String
//!     unknown template     -> TemplateError::NotFound
//!     unknown placeholder  -> TemplateError::UnknownPlaceholder
//! ```
//!
//! All override files are read up front, so rendering never touches disk.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::error::{PortResult, TemplateError};

/// Conflict instructions for humans.
pub const INSTRUCTIONS: &str = "backport.rej.md";
/// Script that starts a manual resolution.
pub const BEGIN_SCRIPT: &str = "begin-backport.rej";
/// Script that commits and pushes a manual resolution.
pub const FINISH_SCRIPT: &str = "finish-backport.rej";

const BUILTIN: [(&str, &str); 3] = [
    (INSTRUCTIONS, include_str!("../../templates/backport.rej.md")),
    (BEGIN_SCRIPT, include_str!("../../templates/begin-backport.rej")),
    (FINISH_SCRIPT, include_str!("../../templates/finish-backport.rej")),
];

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// Values available to a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    values: BTreeMap<&'static str, String>,
}

impl TemplateContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a value.
    #[must_use]
    pub fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        self.values.insert(key, value.to_string());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// The templates available to the artifact generator.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    templates: BTreeMap<String, String>,
}

impl TemplateSet {
    /// Built-in templates only.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            templates: BUILTIN
                .iter()
                .map(|(name, text)| ((*name).to_string(), (*text).to_string()))
                .collect(),
        }
    }

    /// Built-in templates, each replaced by `<dir>/<name>` if that file exists.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::ReadFailed` if an override file exists but
    /// cannot be read.
    pub fn load(dir: Option<&Path>) -> PortResult<Self> {
        let mut set = Self::builtin();
        let Some(dir) = dir else {
            return Ok(set);
        };

        for (name, text) in &mut set.templates {
            let path = dir.join(name);
            if !path.is_file() {
                continue;
            }
            *text = std::fs::read_to_string(&path).map_err(|source| TemplateError::ReadFailed {
                path: path.display().to_string(),
                source,
            })?;
            debug!(template = %name, path = %path.display(), "using template override");
        }
        Ok(set)
    }

    /// Adds or replaces a template.
    #[must_use]
    pub fn with_template(mut self, name: &str, text: &str) -> Self {
        self.templates.insert(name.to_string(), text.to_string());
        self
    }

    /// Renders `name` against `context`.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::NotFound` for an unknown template and
    /// `TemplateError::UnknownPlaceholder` for the first placeholder the
    /// context has no value for.
    pub fn render(&self, name: &str, context: &TemplateContext) -> PortResult<String> {
        let text = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;

        if let Some(unknown) = PLACEHOLDER
            .captures_iter(text)
            .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
            .find(|key| context.get(key).is_none())
        {
            return Err(TemplateError::UnknownPlaceholder {
                template: name.to_string(),
                placeholder: unknown.to_string(),
            }
            .into());
        }

        Ok(PLACEHOLDER
            .replace_all(text, |caps: &Captures<'_>| {
                caps.get(1)
                    .and_then(|m| context.get(m.as_str()))
                    .unwrap_or_default()
                    .to_string()
            })
            .into_owned())
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests;
