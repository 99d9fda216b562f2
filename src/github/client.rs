// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitHub REST v3 client.
//!
//! ```text
//! GET  /repos/{o}/{r}/pulls/{n}            json  -> ChangeReference
//! GET  /repos/{o}/{r}/pulls/{n}            diff  -> String
//! GET  /repos/{o}/{r}/pulls/{n}/commits    json  -> Vec<CommitRecord> (paged)
//! POST /repos/{o}/{r}/issues               {title, body, assignees, labels}
//! POST /repos/{o}/{r}/pulls                {issue, head, base}
//! ```
//!
//! Every non-2xx response becomes `NetworkError::HttpError` with the
//! response body appended to the URL for context.

use futures_util::future::BoxFuture;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info};

use super::{
    ChangeReference, CommitRecord, CreatedPullRequest, GitHubApi, NewReviewRequest, RepoSlug,
    Signature,
};
use crate::error::{NetworkError, PortResult};

const JSON: &str = "application/vnd.github.v3+json";
const DIFF: &str = "application/vnd.github.v3.diff";
const PER_PAGE: usize = 100;

#[derive(Debug, Deserialize)]
struct PullInfo {
    number: u64,
    title: String,
    html_url: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    merged: bool,
    user: UserInfo,
    #[serde(default)]
    merged_by: Option<UserInfo>,
    base: RefInfo,
    head: RefInfo,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RefInfo {
    #[serde(rename = "ref")]
    ref_name: String,
    #[serde(default)]
    repo: Option<RepoInfo>,
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
    clone_url: String,
}

#[derive(Debug, Deserialize)]
struct CommitInfo {
    sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    author: SignatureInfo,
    committer: SignatureInfo,
    message: String,
}

#[derive(Debug, Deserialize)]
struct SignatureInfo {
    name: String,
    email: String,
    date: String,
}

#[derive(Debug, Deserialize)]
struct Created {
    number: u64,
    html_url: String,
}

impl From<SignatureInfo> for Signature {
    fn from(info: SignatureInfo) -> Self {
        Self {
            name: info.name,
            email: info.email,
            date: info.date,
        }
    }
}

/// Authenticated GitHub API client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    /// Creates a client for `api_url` (e.g. `https://api.github.com` or a
    /// GitHub Enterprise `/api/v3` root).
    ///
    /// An empty token sends unauthenticated requests, which is enough for
    /// reading public repositories but not for opening pull requests.
    #[must_use]
    pub fn new(api_url: &str, token: &str) -> Self {
        let http = Client::builder()
            .user_agent(format!("portbot/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn repo_url(&self, repo: &RepoSlug, rest: &str) -> String {
        format!("{}/repos/{repo}/{rest}", self.api_url)
    }

    fn authorize(&self, request: RequestBuilder, accept: &str) -> RequestBuilder {
        let request = request.header("Accept", accept);
        if self.token.is_empty() {
            request
        } else {
            request.header("Authorization", format!("Bearer {}", self.token))
        }
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> PortResult<Response> {
        let response = request.send().await.map_err(NetworkError::from)?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NetworkError::HttpError {
                status: status.as_u16(),
                url: format!("{url} (error: {body})"),
            }
            .into());
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> PortResult<T> {
        debug!(url, "GET");
        let request = self.authorize(self.http.get(url), JSON);
        let response = self.send(request, url).await?;
        parse_body(response, url).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> PortResult<T> {
        debug!(url, "POST");
        let request = self.authorize(self.http.post(url), JSON).json(payload);
        let response = self.send(request, url).await?;
        parse_body(response, url).await
    }

    async fn fetch_pull_request(&self, repo: &RepoSlug, number: u64) -> PortResult<ChangeReference> {
        let url = self.repo_url(repo, &format!("pulls/{number}"));
        let info: PullInfo = self.get_json(&url).await?;
        let clone_url = info
            .base
            .repo
            .map(|r| r.clone_url)
            .ok_or_else(|| NetworkError::UnexpectedResponse {
                url: url.clone(),
                message: "pull request has no base repository".to_string(),
            })?;

        Ok(ChangeReference {
            repo: repo.clone(),
            number: info.number,
            title: info.title,
            html_url: info.html_url,
            base: info.base.ref_name,
            head: info.head.ref_name,
            merged: info.merged,
            author: info.user.login,
            merged_by: info.merged_by.map(|u| u.login),
            body: info.body.unwrap_or_default(),
            clone_url,
        })
    }

    async fn fetch_commits(&self, repo: &RepoSlug, number: u64) -> PortResult<Vec<CommitRecord>> {
        let mut records = Vec::new();
        for page in 1.. {
            let url = self.repo_url(
                repo,
                &format!("pulls/{number}/commits?per_page={PER_PAGE}&page={page}"),
            );
            let batch: Vec<CommitInfo> = self.get_json(&url).await?;
            let last = batch.len() < PER_PAGE;
            records.extend(batch.into_iter().map(|c| CommitRecord {
                sha: c.sha,
                author: c.commit.author.into(),
                committer: c.commit.committer.into(),
                message: c.commit.message,
            }));
            if last {
                break;
            }
        }
        debug!(repo = %repo, pr = number, count = records.len(), "fetched commits");
        Ok(records)
    }

    async fn fetch_diff(&self, repo: &RepoSlug, number: u64) -> PortResult<String> {
        let url = self.repo_url(repo, &format!("pulls/{number}"));
        debug!(url, "GET diff");
        let request = self.authorize(self.http.get(&url), DIFF);
        let response = self.send(request, &url).await?;
        Ok(response.text().await.map_err(NetworkError::from)?)
    }

    async fn create_review_request(
        &self,
        repo: &RepoSlug,
        request: &NewReviewRequest,
    ) -> PortResult<CreatedPullRequest> {
        let issues_url = self.repo_url(repo, "issues");
        let issue: Created = self
            .post_json(
                &issues_url,
                &json!({
                    "title": request.title,
                    "body": request.body,
                    "assignees": request.assignees,
                    "labels": request.labels,
                }),
            )
            .await?;

        let pulls_url = self.repo_url(repo, "pulls");
        let pull: Created = self
            .post_json(
                &pulls_url,
                &json!({
                    "issue": issue.number,
                    "head": request.head,
                    "base": request.base,
                }),
            )
            .await?;

        info!(repo = %repo, pr = pull.number, base = %request.base, "opened pull request");
        Ok(CreatedPullRequest {
            number: pull.number,
            html_url: pull.html_url,
        })
    }
}

async fn parse_body<T: DeserializeOwned>(response: Response, url: &str) -> PortResult<T> {
    let text = response.text().await.map_err(NetworkError::from)?;
    serde_json::from_str(&text).map_err(|e| {
        NetworkError::UnexpectedResponse {
            url: url.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

impl GitHubApi for GitHubClient {
    fn pull_request<'a>(
        &'a self,
        repo: &'a RepoSlug,
        number: u64,
    ) -> BoxFuture<'a, PortResult<ChangeReference>> {
        Box::pin(self.fetch_pull_request(repo, number))
    }

    fn commits<'a>(
        &'a self,
        repo: &'a RepoSlug,
        number: u64,
    ) -> BoxFuture<'a, PortResult<Vec<CommitRecord>>> {
        Box::pin(self.fetch_commits(repo, number))
    }

    fn diff<'a>(&'a self, repo: &'a RepoSlug, number: u64) -> BoxFuture<'a, PortResult<String>> {
        Box::pin(self.fetch_diff(repo, number))
    }

    fn open_review_request<'a>(
        &'a self,
        repo: &'a RepoSlug,
        request: &'a NewReviewRequest,
    ) -> BoxFuture<'a, PortResult<CreatedPullRequest>> {
        Box::pin(self.create_review_request(repo, request))
    }
}
