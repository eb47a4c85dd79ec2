//! Statistics model returned to HTTP callers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Number of repositories listed when the caller does not say otherwise.
pub const DEFAULT_FIRST_N_REPOS: i64 = 5;

/// Which parts of the summary the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludeOptions {
    pub stars: bool,
    pub followers: bool,
    pub following: bool,
    pub repos: bool,
    /// `<= 0` lists every repository.
    pub first_n_repos: i64,
    pub orgs: bool,
}

impl Default for IncludeOptions {
    fn default() -> Self {
        Self {
            stars: false,
            followers: false,
            following: false,
            repos: false,
            first_n_repos: DEFAULT_FIRST_N_REPOS,
            orgs: false,
        }
    }
}

impl IncludeOptions {
    /// Repository list cap, `None` when unbounded.
    pub fn repo_limit(&self) -> Option<usize> {
        usize::try_from(self.first_n_repos).ok().filter(|n| *n > 0)
    }
}

/// Per-repository summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoStats {
    pub name: String,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub contributors: HashMap<String, u64>,
}

/// Aggregated summary for one subject. Unrequested fields stay zero/empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResult {
    pub username: String,
    pub followers: u64,
    pub following: u64,
    pub total_stars: u64,
    pub repositories: Vec<RepoStats>,
    pub organizations: Vec<String>,
}

impl StatsResult {
    pub fn empty(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }
}
