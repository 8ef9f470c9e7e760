use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::api::HostingApi;
use super::types::{
    ApiError, ApiResult, HttpFailure, MergeUpstreamRequest, MergeUpstreamResponse, RefResponse,
    RepositoryResponse, UpdateRefRequest, UserResponse,
};
use crate::app::GitHubSettings;
use crate::repo::{RepositoryRef, DEFAULT_HOST};

const GITHUB_API_URL: &str = "https://api.github.com";

pub struct GitHubClient {
    client: reqwest::Client,
    host: String,
    api_url: Option<String>,
}

impl GitHubClient {
    pub fn new(token: Option<&str>, settings: &GitHubSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                "Authorization",
                HeaderValue::from_str(&format!("Bearer {}", token)).context("Invalid token")?,
            );
        }
        headers.insert(
            "Accept",
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("grove-sync/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            host: settings.host.clone(),
            api_url: settings.api_url.clone(),
        })
    }

    /// REST base URL serving repositories on `host`.
    pub fn api_base(&self, host: &str) -> String {
        if let Some(url) = &self.api_url {
            if host.eq_ignore_ascii_case(&self.host) {
                return url.trim_end_matches('/').to_string();
            }
        }

        if host.eq_ignore_ascii_case(DEFAULT_HOST) {
            GITHUB_API_URL.to_string()
        } else {
            format!("https://{}/api/v3", host)
        }
    }

    fn repo_url(&self, repo: &RepositoryRef, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.api_base(&repo.host),
            urlencoding::encode(&repo.owner),
            urlencoding::encode(&repo.name),
            path
        )
    }

    /// Single-ref lookup. Unlike `git/refs`, it never falls back to a prefix
    /// match, so a missing branch is a 404 rather than a list of lookalikes.
    fn branch_ref_url(&self, repo: &RepositoryRef, branch: &str) -> String {
        self.repo_url(repo, &format!("/git/ref/heads/{}", encode_ref(branch)))
    }

    fn update_ref_url(&self, repo: &RepositoryRef, branch: &str) -> String {
        self.repo_url(repo, &format!("/git/refs/heads/{}", encode_ref(branch)))
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> ApiResult<T> {
        let body = self.send_raw(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse API response: {}", e);
            ApiError::Decode(e.to_string())
        })
    }

    async fn send_raw(&self, request: reqwest::RequestBuilder) -> ApiResult<String> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("GitHub request failed: {}", e)))?;

        let status = response.status();
        tracing::debug!("GitHub API response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::debug!(
                "GitHub API error body: {}",
                &body.chars().take(500).collect::<String>()
            );
            return Err(ApiError::Status(HttpFailure::from_body(status.as_u16(), &body)));
        }

        Ok(body)
    }

    async fn repository(&self, repo: &RepositoryRef) -> ApiResult<RepositoryResponse> {
        let url = self.repo_url(repo, "");
        tracing::debug!("Fetching repository from: {}", url);
        self.send(self.client.get(&url)).await
    }
}

/// Path of a branch ref; slashes in the branch name stay path separators.
fn encode_ref(branch: &str) -> String {
    branch
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl HostingApi for GitHubClient {
    async fn current_login(&self, host: &str) -> ApiResult<String> {
        let url = format!("{}/user", self.api_base(host));
        let user: UserResponse = self.send(self.client.get(&url)).await?;
        Ok(user.login)
    }

    async fn default_branch(&self, repo: &RepositoryRef) -> ApiResult<String> {
        Ok(self.repository(repo).await?.default_branch)
    }

    async fn find_parent(&self, repo: &RepositoryRef) -> ApiResult<Option<RepositoryRef>> {
        let response = self.repository(repo).await?;
        Ok(response
            .parent
            .map(|parent| RepositoryRef::new(&repo.host, &parent.owner.login, &parent.name)))
    }

    async fn merge_upstream(
        &self,
        repo: &RepositoryRef,
        branch: &str,
    ) -> ApiResult<MergeUpstreamResponse> {
        let url = self.repo_url(repo, "/merge-upstream");
        tracing::debug!("POST {} branch={}", url, branch);
        self.send(
            self.client
                .post(&url)
                .json(&MergeUpstreamRequest { branch }),
        )
        .await
    }

    async fn branch_head(&self, repo: &RepositoryRef, branch: &str) -> ApiResult<String> {
        let url = self.branch_ref_url(repo, branch);
        tracing::debug!("GET {}", url);
        let response: RefResponse = self.send(self.client.get(&url)).await?;
        Ok(response.object.sha)
    }

    async fn update_branch_ref(
        &self,
        repo: &RepositoryRef,
        branch: &str,
        sha: &str,
        force: bool,
    ) -> ApiResult<()> {
        let url = self.update_ref_url(repo, branch);
        tracing::debug!("PATCH {} sha={} force={}", url, sha, force);
        self.send_raw(self.client.patch(&url).json(&UpdateRefRequest { sha, force }))
            .await?;
        Ok(())
    }
}
