//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use ghstats_core::error::{GhStatsError, Result};

pub use schema::{
    CacheSection, GatewayConfig, RateLimitSection, Scheme, ServerSection, StatsSection,
    UpstreamSection,
};

/// Environment variable consulted when `upstream.token` is empty.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| GhStatsError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    load_with_token_fallback(s, std::env::var(TOKEN_ENV).ok())
}

/// Parse, fill the token from `fallback_token` if the file has none, then validate.
pub fn load_with_token_fallback(s: &str, fallback_token: Option<String>) -> Result<GatewayConfig> {
    let mut cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| GhStatsError::Config(format!("invalid yaml: {e}")))?;

    if cfg.upstream.token.trim().is_empty() {
        if let Some(token) = fallback_token {
            cfg.upstream.token = token;
        }
    }

    cfg.validate()?;
    Ok(cfg)
}
