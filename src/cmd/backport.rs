// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backport command.
//!
//! ```text
//! PR reference --> RepoQueue (key = owner/name)
//!                     |
//!                     v   one at a time per repository
//!   GitHub (working PR) --> local clone --> Backport --> summary
//! ```
//!
//! The clone is the shared resource, so opening or cloning it happens inside
//! the queued task, never before.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info};

use crate::backport::{Backport, BackportRequest, BackportSettings, BackportSummary};
use crate::cli::backport::BackportArgs;
use crate::config::Config;
use crate::config::types::ApplyStrategy;
use crate::error::{PortResult, Result};
use crate::git::repo::open_or_clone;
use crate::git::runner::ShellGit;
use crate::github::{GitHubApi, GitHubClient, parse_pull_ref};
use crate::queue::{RepoKey, RepoQueue, TaskHandle};
use crate::template::TemplateSet;

/// Everything needed to run backports, shared by every queued request.
#[derive(Clone)]
pub struct BackportService {
    github: Arc<dyn GitHubApi>,
    templates: Arc<TemplateSet>,
    settings: BackportSettings,
    repos_dir: PathBuf,
    committer: Option<(String, String)>,
}

impl BackportService {
    /// Builds the service from the effective configuration.
    ///
    /// `three_way` and `repos_dir` are command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns a `TemplateError` or `FsError` if the template overrides
    /// cannot be loaded.
    pub fn from_config(
        config: &Config,
        three_way: bool,
        repos_dir: Option<PathBuf>,
    ) -> PortResult<Self> {
        let github = GitHubClient::new(&config.github.api_url, &config.github.token);
        let templates = TemplateSet::load(config.backport.templates_dir.as_deref())?;

        let mut settings = BackportSettings::from(&config.backport);
        if three_way {
            settings.apply_strategy = ApplyStrategy::ThreeWay;
        }

        Ok(Self {
            github: Arc::new(github),
            templates: Arc::new(templates),
            settings,
            repos_dir: repos_dir.unwrap_or_else(|| config.backport.repos_dir.clone()),
            committer: config
                .backport
                .committer()
                .map(|(name, email)| (name.to_string(), email.to_string())),
        })
    }

    /// Queues `request` on its repository's chain.
    pub fn enqueue(&self, queue: &RepoQueue, request: BackportRequest) -> TaskHandle<BackportSummary> {
        let service = self.clone();
        queue.enqueue(RepoKey::from(&request.repo), move || async move {
            service.run(request).await
        })
    }

    /// Runs one backport right away. Callers must hold the repository's
    /// queue slot; use [`enqueue`](Self::enqueue).
    async fn run(&self, request: BackportRequest) -> PortResult<BackportSummary> {
        let working = self
            .github
            .pull_request(&request.repo, request.number)
            .await?;

        let workdir = open_or_clone(&self.repos_dir, &request.repo, &working.clone_url).await?;
        info!(repo = %request.repo, path = %workdir.display(), "using clone");

        let mut git = ShellGit::new(&workdir)?;
        if let Some((name, email)) = &self.committer {
            git = git.with_identity(name.as_str(), email.as_str());
        }

        Backport::builder()
            .with_github(Arc::clone(&self.github))
            .with_git(Arc::new(git))
            .with_templates(Arc::clone(&self.templates))
            .with_settings(self.settings.clone())
            .build()
            .run_change(working, &request.targets)
            .await
    }
}

/// Runs `portbot backport`.
///
/// # Errors
///
/// Returns an error if the reference cannot be parsed, the repository
/// cannot be cloned, the templates cannot be loaded, or the workflow fails.
pub async fn run_backport_command(args: &BackportArgs, config: &Config) -> Result<()> {
    let summary = backport(args, config).await?;
    println!("{summary}");
    Ok(())
}

/// Runs one backport and returns its summary.
///
/// # Errors
///
/// See [`run_backport_command`].
pub async fn backport(args: &BackportArgs, config: &Config) -> Result<BackportSummary> {
    let (repo, number) = parse_pull_ref(&args.pr)?;
    debug!(repo = %repo, number, "parsed pull request reference");

    let service = BackportService::from_config(config, args.three_way, args.repos_dir.clone())
        .context("Failed to prepare backport")?;
    let request = BackportRequest {
        repo: repo.clone(),
        number,
        targets: args.branches.clone(),
    };

    let summary = service
        .enqueue(&RepoQueue::default(), request)
        .wait()
        .await
        .with_context(|| format!("Backport of {repo}#{number} failed"))?;
    Ok(summary)
}
