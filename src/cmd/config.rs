// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `options` and `inis`: show what configuration is in effect.

use crate::config::Config;
use crate::config::loader::ConfigLoader;

/// Prints the effective options grouped by section.
pub fn run_options_command(config: &Config) {
    let lines = config.format_options();
    let mut section = "";
    for line in &lines {
        let current = line.split('.').next().unwrap_or_default();
        if current != section {
            if !section.is_empty() {
                println!();
            }
            println!("[{current}]");
            section = current;
        }
        println!("  {line}");
    }
}

/// Prints the configuration sources in the order they are applied.
pub fn run_inis_command(loader: &ConfigLoader) {
    let files = loader.format_loaded_files();
    if files.is_empty() {
        println!("No configuration files loaded");
    } else {
        for line in files {
            println!("{line}");
        }
    }
    if let Some(prefix) = loader.env_prefix() {
        println!("Environment: {prefix}_<SECTION>__<KEY>");
    }
}
