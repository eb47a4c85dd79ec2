#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::{Path, RawQuery};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use ghstats_core::UpstreamError;
use ghstats_gateway::upstream::{GithubClient, StatsSource};

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v == "Bearer good-token")
}

async fn user(Path(name): Path<String>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        let body = Json(json!({"message": "Bad credentials"}));
        return (StatusCode::UNAUTHORIZED, body).into_response();
    }
    match name.as_str() {
        "octocat" => Json(json!({
            "login": "octocat",
            "followers": 10,
            "following": 3,
            "id": 1
        }))
        .into_response(),
        "limited" => (
            StatusCode::FORBIDDEN,
            [("x-ratelimit-remaining", "0")],
            Json(json!({"message": "API rate limit exceeded"})),
        )
            .into_response(),
        "broken" => {
            let body = Json(json!({"message": "upstream sad"}));
            (StatusCode::BAD_GATEWAY, body).into_response()
        }
        "garbled" => (StatusCode::OK, "not json").into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Json(json!({"login": "slow"})).into_response()
        }
        _ => (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"}))).into_response(),
    }
}

async fn repos(Path(name): Path<String>, RawQuery(query): RawQuery) -> Response {
    if name != "octocat" {
        return StatusCode::NOT_FOUND.into_response();
    }
    assert_eq!(query.as_deref(), Some("per_page=30"));
    Json(json!([
        {"name": "hello-world", "stargazers_count": 5, "forks_count": 1, "open_issues_count": 2},
        {"name": "spoon-knife", "stargazers_count": 7, "forks_count": 0, "open_issues_count": 0}
    ]))
    .into_response()
}

async fn orgs(Path(name): Path<String>) -> Response {
    if name != "octocat" {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!([{"login": "github", "id": 1}, {"login": "octo-org", "id": 2}])).into_response()
}

async fn spawn_fake_upstream() -> SocketAddr {
    let app = Router::new()
        .route("/users/:name", get(user))
        .route("/users/:name/repos", get(repos))
        .route("/users/:name/orgs", get(orgs));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr, token: &str) -> GithubClient {
    GithubClient::build(
        &format!("http://{addr}"),
        token,
        Duration::from_millis(200),
        "ghstats-test",
        30,
    )
    .unwrap()
}

#[tokio::test]
async fn fetches_profile_repositories_and_organizations() {
    let addr = spawn_fake_upstream().await;
    let c = client(addr, "good-token");

    let profile = c.fetch_profile("octocat").await.unwrap();
    assert_eq!(profile.login, "octocat");
    assert_eq!(profile.followers, 10);
    assert_eq!(profile.following, 3);

    let repos = c.list_repositories("octocat").await.unwrap();
    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0].name, "hello-world");
    assert_eq!(repos[0].stars, 5);
    assert_eq!(repos[0].forks, 1);
    assert_eq!(repos[0].open_issues, 2);
    assert_eq!(repos[1].name, "spoon-knife");

    let orgs = c.list_organizations("octocat").await.unwrap();
    assert_eq!(orgs, ["github", "octo-org"]);
}

#[tokio::test]
async fn maps_error_statuses() {
    let addr = spawn_fake_upstream().await;

    let bad_token = client(addr, "nope");
    assert_eq!(
        bad_token.fetch_profile("octocat").await.unwrap_err(),
        UpstreamError::Unauthorized
    );

    let c = client(addr, "good-token");
    assert!(matches!(
        c.fetch_profile("ghost").await.unwrap_err(),
        UpstreamError::NotFound(path) if path == "/users/ghost"
    ));
    assert_eq!(
        c.fetch_profile("limited").await.unwrap_err(),
        UpstreamError::RateLimited
    );
    assert_eq!(
        c.fetch_profile("broken").await.unwrap_err(),
        UpstreamError::Status {
            status: 502,
            message: "upstream sad".into()
        }
    );
    assert!(matches!(
        c.fetch_profile("garbled").await.unwrap_err(),
        UpstreamError::Decode(_)
    ));
}

#[tokio::test]
async fn request_timeout_maps_to_timeout() {
    let addr = spawn_fake_upstream().await;
    let c = client(addr, "good-token");

    assert_eq!(c.fetch_profile("slow").await.unwrap_err(), UpstreamError::Timeout);
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let c = client(addr, "good-token");
    assert!(matches!(
        c.fetch_profile("octocat").await.unwrap_err(),
        UpstreamError::Network(_)
    ));
}

#[tokio::test]
async fn username_is_path_encoded() {
    let addr = spawn_fake_upstream().await;
    let c = client(addr, "good-token");

    // must not escape into /users/octocat/repos
    let err = c.fetch_profile("octocat/repos").await.unwrap_err();
    assert!(matches!(err, UpstreamError::NotFound(_)));
}

#[test]
fn invalid_base_url_is_config_error() {
    let err = GithubClient::build("not a url", "t", Duration::from_secs(1), "ua", 30).unwrap_err();
    assert_eq!(err.client_code().as_str(), "CONFIG");
}
