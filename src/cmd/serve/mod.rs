// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Long-running mode: backport requests read line by line.
//!
//! ```text
//! stdin --> parse_command --> enqueue on one shared RepoQueue
//!   "backport <pr> <branch>..."        |
//!   blank / "# ..." skipped            v
//!   anything else: warned        summary on stdout, failures to the sink
//! ```
//!
//! Every request goes through the same queue, so two requests for one
//! repository never touch its clone at the same time. Input closing ends the
//! loop once everything queued has finished.

use std::fmt;
use std::sync::{Arc, LazyLock};

use anyhow::Context;
use futures_util::future::join_all;
use regex::Regex;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{error, info, warn};

use crate::backport::{BackportRequest, BackportSummary};
use crate::cli::serve::ServeArgs;
use crate::cmd::backport::BackportService;
use crate::config::Config;
use crate::error::{PortError, PortResult, Result, WorkflowError};
use crate::github::parse_pull_ref;
use crate::queue::{RepoKey, RepoQueue, TaskHandle};

static COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^backport\s+(\S+)((?:\s+\S+)+)$").expect("valid command pattern")
});

/// Parses one input line.
///
/// Blank lines and `#` comments give `Ok(None)`.
///
/// # Errors
///
/// Returns `WorkflowError::UnknownCommand` for any other line that is not
/// `backport <pr> <branch>...`, or `InvalidChangeRef` for a bad reference.
pub fn parse_command(line: &str) -> PortResult<Option<BackportRequest>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let caps = COMMAND
        .captures(line)
        .ok_or_else(|| WorkflowError::UnknownCommand(line.to_string()))?;
    let (repo, number) = parse_pull_ref(&caps[1])?;
    let targets = caps[2].split_whitespace().map(ToString::to_string).collect();
    Ok(Some(BackportRequest {
        repo,
        number,
        targets,
    }))
}

/// Counts for one serve session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeReport {
    pub queued: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub ignored: usize,
}

impl fmt::Display for ServeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} queued, {} succeeded, {} failed, {} lines ignored",
            self.queued, self.succeeded, self.failed, self.ignored
        )
    }
}

/// Reads commands from `input` and hands each request to `enqueue`.
///
/// Returns once `input` is exhausted and every queued task has finished.
///
/// # Errors
///
/// Returns an error only if reading `input` fails. Failed backports are
/// counted, not returned.
pub async fn serve<R, E>(input: R, mut enqueue: E) -> Result<ServeReport>
where
    R: AsyncRead + Unpin,
    E: FnMut(BackportRequest) -> TaskHandle<BackportSummary>,
{
    let mut lines = BufReader::new(input).lines();
    let mut report = ServeReport::default();
    let mut waiting = Vec::new();
    let mut line_number = 0usize;

    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read command input")?
    {
        line_number += 1;
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(request)) => {
                info!(
                    repo = %request.repo,
                    pr = request.number,
                    targets = ?request.targets,
                    "backport queued"
                );
                report.queued += 1;
                let handle = enqueue(request);
                waiting.push(tokio::spawn(async move {
                    let result = handle.wait().await;
                    if let Ok(summary) = &result {
                        println!("{summary}");
                    }
                    result.is_ok()
                }));
            }
            Err(e) => {
                warn!(line = line_number, error = %e, "ignoring input line");
                eprintln!("line {line_number}: {e}");
                report.ignored += 1;
            }
        }
    }

    for finished in join_all(waiting).await {
        if matches!(finished, Ok(true)) {
            report.succeeded += 1;
        } else {
            report.failed += 1;
        }
    }
    Ok(report)
}

/// Runs `portbot serve` on stdin.
///
/// # Errors
///
/// Returns an error if the templates cannot be loaded, stdin cannot be read,
/// or any queued backport failed.
pub async fn run_serve_command(args: &ServeArgs, config: &Config) -> Result<()> {
    let service = BackportService::from_config(config, args.three_way, args.repos_dir.clone())
        .context("Failed to prepare backport")?;
    let queue = RepoQueue::new(Arc::new(|key: &RepoKey, err: &PortError| {
        error!(repo = %key, error = %err, "backport failed");
        eprintln!("Backport on {key} failed: {err}");
    }));

    info!("reading backport commands from stdin");
    let report = serve(tokio::io::stdin(), |request| service.enqueue(&queue, request)).await?;
    info!(%report, "input closed");
    println!("{report}");

    anyhow::ensure!(
        report.failed == 0,
        "{} of {} backports failed",
        report.failed,
        report.queued
    );
    Ok(())
}
