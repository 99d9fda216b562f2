// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config (toml, env, flags) --> Logging --> Command Dispatch
//!   Backport | Serve | Options | Inis    (Version needs neither)
//! ```

use std::process::ExitCode;

use portbot::cli::global::GlobalOptions;
use portbot::cli::{self, Command};
use portbot::cmd::backport::run_backport_command;
use portbot::cmd::config::{run_inis_command, run_options_command};
use portbot::cmd::serve::run_serve_command;
use portbot::config::Config;
use portbot::config::loader::ConfigLoader;
use portbot::logging::init_logging;
use portbot::logging::LogConfig;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let command = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            return ExitCode::SUCCESS;
        }
        Some(command) => command,
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            return ExitCode::FAILURE;
        }
    };

    let config = match load_config(&cli.global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(&LogConfig::from(&config.global)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(command, &cli.global, &config).await
}

async fn dispatch_command(command: &Command, global: &GlobalOptions, config: &Config) -> ExitCode {
    let result = match command {
        Command::Version => {
            handle_version_command();
            Ok(())
        }
        Command::Options => {
            run_options_command(config);
            Ok(())
        }
        Command::Inis => build_config_loader(global).map(|loader| run_inis_command(&loader)),
        Command::Backport(args) => run_backport_command(args, config).await,
        Command::Serve(args) => run_serve_command(args, config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "command failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

/// Sources in increasing priority: `portbot.toml`, `--ini` files,
/// `PORTBOT_*` variables, then the token and `--set`/flag overrides.
fn build_config_loader(global: &GlobalOptions) -> portbot::error::Result<ConfigLoader> {
    let mut loader = ConfigLoader::new().add_toml_file_optional("portbot.toml");
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader = loader.with_env_prefix("PORTBOT");
    if let Some(token) = &global.github_token {
        loader = loader.set("github.token", token.as_str())?;
    }
    for option in global.to_config_overrides() {
        loader = loader.set_option(&option)?;
    }
    Ok(loader)
}

fn load_config(global: &GlobalOptions) -> portbot::error::Result<Config> {
    build_config_loader(global)?.build()
}
