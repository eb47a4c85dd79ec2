//! GitHub REST v3 client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use ghstats_core::error::{GhStatsError, Result, UpstreamError};

use super::{Profile, RepoSummary, StatsSource};
use crate::config::UpstreamSection;

#[derive(Debug, Deserialize)]
struct UserDto {
    login: String,
    #[serde(default)]
    followers: u64,
    #[serde(default)]
    following: u64,
}

#[derive(Debug, Deserialize)]
struct RepoDto {
    name: String,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    open_issues_count: u64,
}

#[derive(Debug, Deserialize)]
struct OrgDto {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

/// Token-authenticated client; one attempt per call, no retries.
pub struct GithubClient {
    client: Client,
    base_url: Url,
    token: String,
    per_page: u8,
}

impl GithubClient {
    pub fn new(cfg: &UpstreamSection) -> Result<Self> {
        Self::build(
            &cfg.base_url,
            &cfg.token,
            cfg.timeout(),
            &cfg.user_agent,
            cfg.per_page,
        )
    }

    pub fn build(
        base_url: &str,
        token: &str,
        timeout: Duration,
        user_agent: &str,
        per_page: u8,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| GhStatsError::Internal(format!("http client build failed: {e}")))?;

        let base_url = Url::parse(base_url)
            .map_err(|e| GhStatsError::Config(format!("upstream.base_url invalid: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GhStatsError::Config("upstream.base_url cannot be a base URL".into()));
        }

        Ok(Self {
            client,
            base_url,
            token: token.to_string(),
            per_page,
        })
    }

    /// Base URL plus percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> std::result::Result<T, UpstreamError> {
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| UpstreamError::Decode(e.to_string()));
        }

        let remaining = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiMessage>(&text)
            .map(|m| m.message)
            .unwrap_or(text);

        Err(match status {
            StatusCode::UNAUTHORIZED => UpstreamError::Unauthorized,
            StatusCode::NOT_FOUND => UpstreamError::NotFound(url.path().to_string()),
            StatusCode::TOO_MANY_REQUESTS => UpstreamError::RateLimited,
            StatusCode::FORBIDDEN if remaining.as_deref() == Some("0") => {
                UpstreamError::RateLimited
            }
            _ => UpstreamError::Status {
                status: status.as_u16(),
                message,
            },
        })
    }
}

fn map_transport_error(e: reqwest::Error) -> UpstreamError {
    if e.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Network(e.to_string())
    }
}

#[async_trait]
impl StatsSource for GithubClient {
    async fn fetch_profile(&self, username: &str) -> std::result::Result<Profile, UpstreamError> {
        let user: UserDto = self.get_json(self.endpoint(&["users", username])).await?;
        Ok(Profile {
            login: user.login,
            followers: user.followers,
            following: user.following,
        })
    }

    async fn list_repositories(
        &self,
        username: &str,
    ) -> std::result::Result<Vec<RepoSummary>, UpstreamError> {
        let mut url = self.endpoint(&["users", username, "repos"]);
        url.query_pairs_mut()
            .append_pair("per_page", &self.per_page.to_string());
        let repos: Vec<RepoDto> = self.get_json(url).await?;
        Ok(repos
            .into_iter()
            .map(|r| RepoSummary {
                name: r.name,
                stars: r.stargazers_count,
                forks: r.forks_count,
                open_issues: r.open_issues_count,
            })
            .collect())
    }

    async fn list_organizations(
        &self,
        username: &str,
    ) -> std::result::Result<Vec<String>, UpstreamError> {
        let orgs: Vec<OrgDto> = self
            .get_json(self.endpoint(&["users", username, "orgs"]))
            .await?;
        Ok(orgs.into_iter().map(|o| o.login).collect())
    }
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"[REDACTED]")
            .field("per_page", &self.per_page)
            .finish()
    }
}
