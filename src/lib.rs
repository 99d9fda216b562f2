// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |       backport / serve / config
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, layered settings  |
//!              '-------------+-------------'
//!                            v
//!                   queue (one chain per repo)
//!                            |
//!                            v
//!                   backport (workflow)
//!                 /      |         \
//!                v       v          v
//!            github     git      artifacts
//!           REST API  git CLI   .rej files
//!                                   |
//!                                template
//!
//!   +-----------------------------------------+
//!   |  foundation   error, logging            |
//!   +-----------------------------------------+
//! ```

pub mod artifacts;
pub mod backport;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod logging;
pub mod queue;
pub mod template;
