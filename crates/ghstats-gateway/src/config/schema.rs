use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use ghstats_core::error::{GhStatsError, Result};
use ghstats_core::stats::DEFAULT_FIRST_N_REPOS;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub cache: CacheSection,

    #[serde(default)]
    pub rate_limit: RateLimitSection,

    #[serde(default)]
    pub upstream: UpstreamSection,

    #[serde(default)]
    pub stats: StatsSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(GhStatsError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.cache.validate()?;
        self.rate_limit.validate()?;
        self.upstream.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_ip")]
    pub ip: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_scheme")]
    pub scheme: Scheme,

    #[serde(default)]
    pub cert_file: Option<String>,

    #[serde(default)]
    pub key_file: Option<String>,

    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            ip: default_ip(),
            port: default_port(),
            scheme: default_scheme(),
            cert_file: None,
            key_file: None,
            path: default_path(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !self.path.starts_with('/') {
            return Err(GhStatsError::Config("server.path must start with '/'".into()));
        }
        if self.path.contains(&[':', '*'][..]) {
            return Err(GhStatsError::Config(
                "server.path must be a literal path (no ':' or '*')".into(),
            ));
        }
        if crate::ops::RESERVED_PATHS.contains(&self.path.as_str()) {
            return Err(GhStatsError::Config(format!(
                "server.path {} is reserved for operational endpoints",
                self.path
            )));
        }
        if self.scheme == Scheme::Https && (self.cert_file.is_none() || self.key_file.is_none()) {
            return Err(GhStatsError::Config(
                "server.cert_file and server.key_file are required for https".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .ip
            .parse()
            .map_err(|e| GhStatsError::Config(format!("server.ip invalid ({}): {e}", self.ip)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

fn default_ip() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}
fn default_scheme() -> Scheme {
    Scheme::Http
}
fn default_path() -> String {
    "/stats".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheSection {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CacheSection {
    pub fn validate(&self) -> Result<()> {
        if self.ttl_secs == 0 {
            return Err(GhStatsError::Config("cache.ttl_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

fn default_ttl_secs() -> u64 {
    3600
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitSection {
    #[serde(default = "default_rate_limit")]
    pub limit: u32,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for RateLimitSection {
    fn default() -> Self {
        Self {
            limit: default_rate_limit(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl RateLimitSection {
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(GhStatsError::Config("rate_limit.limit must be positive".into()));
        }
        if self.interval_ms == 0 {
            return Err(GhStatsError::Config(
                "rate_limit.interval_ms must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn default_rate_limit() -> u32 {
    10
}
fn default_interval_ms() -> u64 {
    60_000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Falls back to `GITHUB_TOKEN` when empty.
    #[serde(default)]
    pub token: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_per_page")]
    pub per_page: u8,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: String::new(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            per_page: default_per_page(),
        }
    }
}

impl UpstreamSection {
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(GhStatsError::Config(
                "upstream.base_url must be an http(s) URL".into(),
            ));
        }
        if self.token.trim().is_empty() {
            return Err(GhStatsError::Config(
                "upstream.token must be set (or GITHUB_TOKEN exported)".into(),
            ));
        }
        if !(100..=120_000).contains(&self.timeout_ms) {
            return Err(GhStatsError::Config(
                "upstream.timeout_ms must be between 100 and 120000".into(),
            ));
        }
        if !(1..=100).contains(&self.per_page) {
            return Err(GhStatsError::Config(
                "upstream.per_page must be between 1 and 100".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_base_url() -> String {
    "https://api.github.com".into()
}
fn default_timeout_ms() -> u64 {
    10_000
}
fn default_user_agent() -> String {
    concat!("ghstats/", env!("CARGO_PKG_VERSION")).into()
}
fn default_per_page() -> u8 {
    30
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatsSection {
    #[serde(default = "default_first_n_repos")]
    pub default_first_n_repos: i64,
}

impl Default for StatsSection {
    fn default() -> Self {
        Self {
            default_first_n_repos: default_first_n_repos(),
        }
    }
}

fn default_first_n_repos() -> i64 {
    DEFAULT_FIRST_N_REPOS
}
