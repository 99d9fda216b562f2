// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The backport workflow.
//!
//! # Run
//!
//! ```text
//! BackportRequest
//!      |
//!      v
//!  resolve   working PR, targets, proxy marker --> original PR, merged?
//!      |                                   (WorkflowError: nothing touched yet)
//!      v
//!  prepare   original's commits --> narrative
//!      |
//!      v
//!  apply     fetch remote, then per target, one at a time:
//!      |       reset, checkout -B target, recreate backport branch,
//!      |       git apply (diff fetched once), artifacts on conflict,
//!      |       add, commit
//!      v
//!  publish   push all  (concurrent, joined)
//!      |     open PRs  (concurrent, joined)
//!      v
//!  BackportSummary
//! ```
//!
//! A conflict on one target is recorded and never stops the others. Any
//! other failure ends the run where it happened; branches created so far
//! stay as they are so a rerun can pick them up.
//!
//! # Key Types
//!
//! | Type                | Purpose                                     |
//! |---------------------|---------------------------------------------|
//! | [`Backport`]        | Workflow with its collaborators             |
//! | [`BackportSettings`]| Naming, remote, labels, apply strategy      |
//! | [`BackportRequest`] | Which PR to backport where                  |
//! | [`BackportSummary`] | Result of a completed run                   |

pub mod branch;
pub mod change;
pub mod narrative;
pub mod patch;
pub mod report;

use bon::Builder;
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{Instrument, debug, info, warn};

use crate::artifacts::{ArtifactGenerator, ConflictContext};
use crate::config::types::{ApplyStrategy, BackportConfig};
use crate::error::{PortResult, WorkflowError};
use crate::git::ops::{self, ApplyOutcome};
use crate::git::runner::GitRunner;
use crate::github::{ChangeReference, CreatedPullRequest, GitHubApi, NewReviewRequest, RepoSlug};
use crate::logging::{backport_span, target_span};
use crate::template::TemplateSet;

pub use branch::backport_branch;
pub use change::{ResolvedChange, normalize_targets, proxy_target};
pub use patch::PatchFile;
pub use report::{BackportSummary, Classification, ConflictReport};

/// Naming, remote and labeling choices for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackportSettings {
    pub namespace: String,
    pub remote: String,
    pub label: String,
    pub conflict_label: String,
    pub apply_strategy: ApplyStrategy,
}

impl Default for BackportSettings {
    fn default() -> Self {
        Self::from(&BackportConfig::default())
    }
}

impl From<&BackportConfig> for BackportSettings {
    fn from(config: &BackportConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            remote: config.remote.clone(),
            label: config.label.clone(),
            conflict_label: config.conflict_label.clone(),
            apply_strategy: config.apply_strategy,
        }
    }
}

/// Backport pull request `number` of `repo` onto `targets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackportRequest {
    pub repo: RepoSlug,
    pub number: u64,
    pub targets: Vec<String>,
}

/// Changes resolved and targets checked.
#[derive(Debug)]
struct Resolved {
    change: ResolvedChange,
    targets: Vec<String>,
}

/// Narrative built.
#[derive(Debug)]
struct Prepared {
    change: ResolvedChange,
    targets: Vec<String>,
    narrative: String,
}

/// One target after its commit.
#[derive(Debug)]
struct TargetResult {
    branch: String,
    title: String,
    report: ConflictReport,
}

/// Every target committed locally.
#[derive(Debug)]
struct Applied {
    change: ResolvedChange,
    targets: Vec<String>,
    narrative: String,
    results: Vec<TargetResult>,
}

/// Branches pushed and pull requests open.
#[derive(Debug)]
struct Published {
    applied: Applied,
    pull_requests: Vec<CreatedPullRequest>,
}

/// The backport workflow and its collaborators.
///
/// The git runner's working directory must not be used by anything else
/// while [`run`](Self::run) is in progress; queue runs through
/// [`RepoQueue`](crate::queue::RepoQueue) keyed by repository.
#[derive(Builder)]
pub struct Backport {
    #[builder(setters(name = with_github))]
    github: Arc<dyn GitHubApi>,
    #[builder(setters(name = with_git))]
    git: Arc<dyn GitRunner>,
    #[builder(setters(name = with_templates), default)]
    templates: Arc<TemplateSet>,
    #[builder(setters(name = with_settings), default)]
    settings: BackportSettings,
}

impl Backport {
    #[must_use]
    pub const fn settings(&self) -> &BackportSettings {
        &self.settings
    }

    /// Runs the whole workflow for `request`.
    ///
    /// # Errors
    ///
    /// Returns a `WorkflowError` (before any git or API mutation) if the
    /// request is invalid, or the first git, network, template or filesystem
    /// error that stopped the run.
    pub async fn run(&self, request: BackportRequest) -> PortResult<BackportSummary> {
        let working = self
            .github
            .pull_request(&request.repo, request.number)
            .await?;
        self.run_change(working, &request.targets).await
    }

    /// Runs the workflow for a working change the caller already fetched.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn run_change(
        &self,
        working: ChangeReference,
        targets: &[String],
    ) -> PortResult<BackportSummary> {
        let span = backport_span(&working.repo.to_string(), working.number);
        async move {
            let resolved = self.resolve(working, targets).await?;
            let prepared = self.prepare(resolved).await?;
            let applied = self.apply_all(prepared).await?;
            let published = self.publish(applied).await?;
            let summary = summarize(published);
            info!(summary = %summary.message(), "backport complete");
            Ok(summary)
        }
        .instrument(span)
        .await
    }

    async fn resolve(&self, working: ChangeReference, targets: &[String]) -> PortResult<Resolved> {
        let targets = normalize_targets(&working, targets)?;

        let change = match proxy_target(&working.body) {
            Some(original) if original != working.number => {
                debug!(original, working = working.number, "proxy backport");
                let original = self.github.pull_request(&working.repo, original).await?;
                ResolvedChange { working, original }
            }
            _ => ResolvedChange::direct(working),
        };

        if !change.original.merged {
            return Err(WorkflowError::NotMerged {
                number: change.original.number,
            }
            .into());
        }

        info!(
            original = change.original.number,
            working = change.working.number,
            targets = ?targets,
            "resolved backport"
        );
        Ok(Resolved { change, targets })
    }

    async fn prepare(&self, resolved: Resolved) -> PortResult<Prepared> {
        let Resolved { change, targets } = resolved;
        let commits = self
            .github
            .commits(&change.original.repo, change.original.number)
            .await?;
        let narrative = narrative::narrative(&change, &commits);
        Ok(Prepared {
            change,
            targets,
            narrative,
        })
    }

    async fn apply_all(&self, prepared: Prepared) -> PortResult<Applied> {
        let working = &prepared.change.working;
        let mut patch = PatchFile::new(self.github.as_ref(), &working.repo, working.number);

        ops::fetch(self.git.as_ref(), &self.settings.remote).await?;

        let mut results = Vec::with_capacity(prepared.targets.len());
        for target in &prepared.targets {
            let branch = backport_branch(
                &self.settings.namespace,
                prepared.change.original.number,
                working.number,
                target,
            );
            let span = target_span(target, &branch);
            let result = self
                .apply_target(&prepared, target, branch, &mut patch)
                .instrument(span)
                .await?;
            results.push(result);
        }
        patch.release();

        Ok(Applied {
            change: prepared.change,
            targets: prepared.targets,
            narrative: prepared.narrative,
            results,
        })
    }

    async fn apply_target(
        &self,
        prepared: &Prepared,
        target: &str,
        branch: String,
        patch: &mut PatchFile<'_>,
    ) -> PortResult<TargetResult> {
        let git = self.git.as_ref();
        let remote = &self.settings.remote;
        let original = &prepared.change.original;
        let title = narrative::review_title(target, original.number, &original.title);
        let message = narrative::commit_message(&title, &prepared.narrative);

        ops::reset_hard(git).await?;
        ops::checkout_reset(git, target, &format!("{remote}/{target}")).await?;
        ops::delete_branch(git, &branch).await?;
        ops::checkout_new_branch(git, &branch).await?;

        let path = patch.path().await?.to_path_buf();
        let report = match ops::apply(git, &path, self.settings.apply_strategy).await? {
            ApplyOutcome::Clean => ConflictReport::clean(target, patch.files_touched()),
            ApplyOutcome::Conflicted(counts) => ConflictReport::from_counts(target, counts),
        };

        if report.has_conflicts() {
            warn!(outcome = %report.classification(), "patch did not apply cleanly");
            let context = ConflictContext {
                branch: branch.clone(),
                target: target.to_string(),
                remote: remote.clone(),
                original_number: original.number,
                original_url: original.html_url.clone(),
                counts: report.counts(),
                commit_message: message.clone(),
            };
            ArtifactGenerator::new(&self.templates)
                .generate(git.workdir(), &context)
                .await?;
        } else {
            info!(outcome = %report.classification(), "patch applied");
        }

        ops::add_all(git).await?;
        ops::commit(git, &message).await?;

        Ok(TargetResult {
            branch,
            title,
            report,
        })
    }

    async fn publish(&self, applied: Applied) -> PortResult<Published> {
        let git = self.git.as_ref();
        let remote = &self.settings.remote;

        let pushes = join_all(
            applied
                .results
                .iter()
                .map(|r| ops::push(git, remote, &r.branch)),
        )
        .await;
        pushes.into_iter().collect::<PortResult<Vec<()>>>()?;
        info!(count = applied.results.len(), "pushed backport branches");

        let change = &applied.change;
        let body = narrative::review_body(change, &applied.narrative);
        let requests: Vec<NewReviewRequest> = applied
            .targets
            .iter()
            .zip(&applied.results)
            .map(|(target, result)| {
                let mut labels = vec![self.settings.label.clone()];
                if result.report.has_conflicts() {
                    labels.push(self.settings.conflict_label.clone());
                }
                NewReviewRequest {
                    title: result.title.clone(),
                    body: body.clone(),
                    head: result.branch.clone(),
                    base: target.clone(),
                    assignees: change.original.merged_by.iter().cloned().collect(),
                    labels,
                }
            })
            .collect();

        let repo = &change.working.repo;
        let opened = join_all(
            requests
                .iter()
                .map(|request| self.github.open_review_request(repo, request)),
        )
        .await;
        let pull_requests = opened.into_iter().collect::<PortResult<Vec<_>>>()?;

        Ok(Published {
            applied,
            pull_requests,
        })
    }
}

fn summarize(published: Published) -> BackportSummary {
    let Published {
        applied,
        pull_requests,
    } = published;
    BackportSummary {
        original: applied.change.original.number,
        working: applied.change.working.number,
        targets: applied.targets,
        reports: applied.results.into_iter().map(|r| r.report).collect(),
        pull_requests,
    }
}
