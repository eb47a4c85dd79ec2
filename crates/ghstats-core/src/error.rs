//! Shared error type across ghstats crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / missing username.
    BadRequest,
    /// Outbound request quota exhausted; retry later.
    RateLimited,
    /// Upstream API failed while fetching statistics.
    Upstream,
    /// Invalid configuration.
    Config,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::RateLimited => "RATE_LIMITED",
            ClientCode::Upstream => "UPSTREAM",
            ClientCode::Config => "CONFIG",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, GhStatsError>;

/// Failure reported by the code-hosting API collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("unauthorized (check the API token)")]
    Unauthorized,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("upstream rate limit exhausted")]
    RateLimited,
    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("deadline exceeded")]
    Timeout,
}

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum GhStatsError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("request limit exceeded")]
    RateLimited,
    #[error("upstream {op} failed: {source}")]
    Upstream {
        op: &'static str,
        #[source]
        source: UpstreamError,
    },
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl GhStatsError {
    /// Wrap a collaborator failure with the operation that produced it.
    pub fn upstream(op: &'static str, source: UpstreamError) -> Self {
        GhStatsError::Upstream { op, source }
    }

    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            GhStatsError::BadRequest(_) => ClientCode::BadRequest,
            GhStatsError::RateLimited => ClientCode::RateLimited,
            GhStatsError::Upstream { .. } => ClientCode::Upstream,
            GhStatsError::Config(_) => ClientCode::Config,
            GhStatsError::Internal(_) => ClientCode::Internal,
        }
    }
}
