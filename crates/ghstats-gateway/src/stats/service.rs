use std::sync::Arc;
use std::time::Duration;

use ghstats_core::error::{GhStatsError, Result, UpstreamError};
use ghstats_core::{FixedWindowLimiter, IncludeOptions, RepoStats, StatsResult, TtlCache};

use crate::upstream::{Profile, RepoSummary, StatsSource};

/// Stats orchestration: limiter, cache, then upstream.
///
/// Owns no global state; the cache and limiter are shared handles created by
/// whoever wires the service (normally `AppState`).
pub struct StatsService {
    source: Arc<dyn StatsSource>,
    cache: Arc<TtlCache<StatsResult>>,
    limiter: Arc<FixedWindowLimiter>,
    cache_ttl: Duration,
    upstream_deadline: Duration,
}

impl StatsService {
    pub fn new(
        source: Arc<dyn StatsSource>,
        cache: Arc<TtlCache<StatsResult>>,
        limiter: Arc<FixedWindowLimiter>,
        cache_ttl: Duration,
        upstream_deadline: Duration,
    ) -> Self {
        Self {
            source,
            cache,
            limiter,
            cache_ttl,
            upstream_deadline,
        }
    }

    pub fn cache(&self) -> &TtlCache<StatsResult> {
        &self.cache
    }

    pub fn limiter(&self) -> &FixedWindowLimiter {
        &self.limiter
    }

    /// Fetch (or reuse) the summary for `username`.
    ///
    /// Order matters: empty username is rejected before the limiter is
    /// consulted, and a limiter rejection never reaches the cache. Cached
    /// results are keyed by username only and returned as stored.
    pub async fn get_stats(&self, username: &str, opts: IncludeOptions) -> Result<StatsResult> {
        if username.is_empty() {
            return Err(GhStatsError::BadRequest("username is required".into()));
        }

        if !self.limiter.allow() {
            tracing::warn!(username = %username, "request limit exceeded");
            return Err(GhStatsError::RateLimited);
        }

        if let Some(cached) = self.cache.get(username) {
            tracing::debug!(username = %username, "stats cache hit");
            return Ok(cached);
        }
        tracing::debug!(username = %username, "stats cache miss");

        let fetched = tokio::time::timeout(self.upstream_deadline, self.fetch(username, opts))
            .await
            .map_err(|_| GhStatsError::upstream("fetch_stats", UpstreamError::Timeout))
            .and_then(|r| r);

        let (profile, repos, orgs) = match fetched {
            Ok(parts) => parts,
            Err(e) => {
                tracing::warn!(username = %username, error = %e, "upstream fetch failed");
                return Err(e);
            }
        };

        let stats = assemble(username, &profile, &repos, orgs, opts);
        self.cache.set(username, stats.clone(), self.cache_ttl);
        Ok(stats)
    }

    async fn fetch(
        &self,
        username: &str,
        opts: IncludeOptions,
    ) -> Result<(Profile, Vec<RepoSummary>, Vec<String>)> {
        let profile = self
            .source
            .fetch_profile(username)
            .await
            .map_err(|e| GhStatsError::upstream("fetch_profile", e))?;

        let repos = self
            .source
            .list_repositories(username)
            .await
            .map_err(|e| GhStatsError::upstream("list_repositories", e))?;

        let orgs = if opts.orgs {
            self.source
                .list_organizations(username)
                .await
                .map_err(|e| GhStatsError::upstream("list_organizations", e))?
        } else {
            Vec::new()
        };

        Ok((profile, repos, orgs))
    }
}

/// Build the response honoring `opts`.
///
/// Stars are summed over every repository while the listed repositories stop
/// at `first_n_repos`; both happen in the same pass.
pub fn assemble(
    username: &str,
    profile: &Profile,
    repos: &[RepoSummary],
    orgs: Vec<String>,
    opts: IncludeOptions,
) -> StatsResult {
    let mut stats = StatsResult::empty(username);

    if opts.followers {
        stats.followers = profile.followers;
    }
    if opts.following {
        stats.following = profile.following;
    }

    let limit = opts.repo_limit();
    for (i, repo) in repos.iter().enumerate() {
        if opts.stars {
            stats.total_stars += repo.stars;
        }
        if opts.repos && limit.map_or(true, |n| i < n) {
            stats.repositories.push(RepoStats {
                name: repo.name.clone(),
                stars: repo.stars,
                forks: repo.forks,
                open_issues: repo.open_issues,
                contributors: Default::default(),
            });
        }
    }

    if opts.orgs {
        stats.organizations = orgs;
    }

    stats
}
