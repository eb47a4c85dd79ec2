#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use ghstats_core::UpstreamError;
use ghstats_gateway::config::{self, GatewayConfig};
use ghstats_gateway::upstream::{Profile, RepoSummary, StatsSource};

/// In-memory data source that counts calls per operation.
#[derive(Default)]
pub struct FakeSource {
    pub profile: Profile,
    pub repos: Vec<RepoSummary>,
    pub orgs: Vec<String>,
    pub fail_op: Option<(&'static str, UpstreamError)>,
    pub delay: Option<Duration>,
    pub profile_calls: AtomicUsize,
    pub repo_calls: AtomicUsize,
    pub org_calls: AtomicUsize,
    pub last_username: Mutex<Option<String>>,
}

impl FakeSource {
    pub fn new(followers: u64, following: u64, repos: &[(&str, u64, u64)]) -> Self {
        Self {
            profile: Profile {
                login: "fake".into(),
                followers,
                following,
            },
            repos: repos
                .iter()
                .map(|(name, stars, forks)| RepoSummary {
                    name: name.to_string(),
                    stars: *stars,
                    forks: *forks,
                    open_issues: 0,
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_orgs(mut self, orgs: &[&str]) -> Self {
        self.orgs = orgs.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn failing(mut self, op: &'static str, err: UpstreamError) -> Self {
        self.fail_op = Some((op, err));
        self
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn total_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
            + self.repo_calls.load(Ordering::SeqCst)
            + self.org_calls.load(Ordering::SeqCst)
    }

    async fn step(
        &self,
        op: &'static str,
        counter: &AtomicUsize,
        username: &str,
    ) -> Result<(), UpstreamError> {
        counter.fetch_add(1, Ordering::SeqCst);
        *self.last_username.lock().unwrap() = Some(username.to_string());
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        match &self.fail_op {
            Some((fail, err)) if *fail == op => Err(err.clone()),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl StatsSource for FakeSource {
    async fn fetch_profile(&self, username: &str) -> Result<Profile, UpstreamError> {
        self.step("fetch_profile", &self.profile_calls, username).await?;
        Ok(self.profile.clone())
    }

    async fn list_repositories(&self, username: &str) -> Result<Vec<RepoSummary>, UpstreamError> {
        self.step("list_repositories", &self.repo_calls, username).await?;
        Ok(self.repos.clone())
    }

    async fn list_organizations(&self, username: &str) -> Result<Vec<String>, UpstreamError> {
        self.step("list_organizations", &self.org_calls, username).await?;
        Ok(self.orgs.clone())
    }
}

pub fn test_config(extra: &str) -> GatewayConfig {
    let yaml = format!("version: 1\nupstream:\n  token: test-token\n{extra}");
    config::load_with_token_fallback(&yaml, None).expect("test config must parse")
}
