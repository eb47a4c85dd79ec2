//! Upstream data source (code-hosting API).
//!
//! The stats service only sees [`StatsSource`]; the GitHub REST client is
//! the production implementation and tests plug in fakes.

pub mod github;

use async_trait::async_trait;

use ghstats_core::error::UpstreamError;

pub use github::GithubClient;

/// Follower counts for one account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub login: String,
    pub followers: u64,
    pub following: u64,
}

/// One entry of an account's repository listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoSummary {
    pub name: String,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
}

/// Outbound collaborator. Errors are forwarded by callers without inspection.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn fetch_profile(&self, username: &str) -> Result<Profile, UpstreamError>;

    /// Repositories in the order the API returns them.
    async fn list_repositories(&self, username: &str) -> Result<Vec<RepoSummary>, UpstreamError>;

    /// Organization login names.
    async fn list_organizations(&self, username: &str) -> Result<Vec<String>, UpstreamError>;
}
