//! Stats HTTP handler.
//!
//! Responsibilities:
//! - Extract username and inclusion flags from the query string
//! - Call the stats service
//! - Map errors to status codes and a JSON error body

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tokio::time::Instant;

use ghstats_core::error::{ClientCode, GhStatsError};
use ghstats_core::IncludeOptions;

use crate::app_state::AppState;

// --------------------
// Query parsing
// --------------------
/// Raw query values. Repeated keys keep their first occurrence.
#[derive(Debug, Default)]
pub struct StatsQuery {
    pub username: Option<String>,
    pub include_stars: Option<String>,
    pub include_followers: Option<String>,
    pub include_following: Option<String>,
    pub include_repos: Option<String>,
    pub include_orgs: Option<String>,
    pub include_first_n_repos: Option<String>,
}

fn flag(v: &Option<String>) -> bool {
    v.as_deref() == Some("true")
}

impl StatsQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut q = Self::default();
        for (k, v) in pairs {
            let slot = match k.as_str() {
                "username" => &mut q.username,
                "include_stars" => &mut q.include_stars,
                "include_followers" => &mut q.include_followers,
                "include_following" => &mut q.include_following,
                "include_repos" => &mut q.include_repos,
                "include_orgs" => &mut q.include_orgs,
                "include_first_n_repos" => &mut q.include_first_n_repos,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(v);
            }
        }
        q
    }

    /// Flags are on only for the literal `"true"`; an unparsable first-N keeps the default.
    pub fn include_options(&self, default_first_n: i64) -> IncludeOptions {
        let first_n_repos = self
            .include_first_n_repos
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(default_first_n);

        IncludeOptions {
            stars: flag(&self.include_stars),
            followers: flag(&self.include_followers),
            following: flag(&self.include_following),
            repos: flag(&self.include_repos),
            first_n_repos,
            orgs: flag(&self.include_orgs),
        }
    }
}

// --------------------
// Error mapping
// --------------------
pub fn status_for(code: ClientCode) -> StatusCode {
    match code {
        ClientCode::BadRequest => StatusCode::BAD_REQUEST,
        ClientCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ClientCode::Upstream | ClientCode::Config | ClientCode::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub fn error_response(err: &GhStatsError) -> Response {
    let code = err.client_code();
    let body = Json(json!({
        "error": code.as_str(),
        "message": err.to_string(),
    }));
    (status_for(code), body).into_response()
}

fn outcome_label(res: &Result<ghstats_core::StatsResult, GhStatsError>) -> &'static str {
    match res {
        Ok(_) => "ok",
        Err(e) => match e.client_code() {
            ClientCode::BadRequest => "bad_request",
            ClientCode::RateLimited => "rate_limited",
            ClientCode::Upstream => "upstream_error",
            ClientCode::Config | ClientCode::Internal => "internal",
        },
    }
}

// --------------------
// Entry
// --------------------
pub async fn get_stats(
    State(app): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let started = Instant::now();
    let q = StatsQuery::from_pairs(pairs);
    let username = q.username.as_deref().unwrap_or_default();
    let opts = q.include_options(app.cfg().stats.default_first_n_repos);

    let res = app.stats().get_stats(username, opts).await;

    let outcome = outcome_label(&res);
    let metrics = app.metrics();
    metrics.stats_requests.inc(&[("outcome", outcome)]);
    metrics
        .request_duration
        .observe(&[("outcome", outcome)], started.elapsed());

    match res {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => {
            if let GhStatsError::Upstream { op, .. } = &e {
                metrics.upstream_errors.inc(&[("op", *op)]);
            }
            error_response(&e)
        }
    }
}
