//! ghstats gateway binary.
//!
//! - `GET <server.path>?username=...` : aggregated profile statistics
//! - Plain HTTP via `axum::serve`, HTTPS via `axum-server` + rustls
//! - Graceful shutdown on Ctrl-C / SIGTERM (readiness flips to 503 first)

use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

use ghstats_core::error::{GhStatsError, Result};
use ghstats_gateway::{app_state::AppState, config, config::Scheme, router, transport};

const DEFAULT_CONFIG_PATH: &str = "ghstats.yaml";

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "ghstats-gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.server.listen_addr()?;
    let server = cfg.server.clone();

    let state = AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    match server.scheme {
        Scheme::Http => {
            tracing::info!(%listen, path = %server.path, "ghstats-gateway starting (http)");
            let listener = tokio::net::TcpListener::bind(listen)
                .await
                .map_err(|e| GhStatsError::Internal(format!("bind {listen} failed: {e}")))?;

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal(state))
                .await
                .map_err(|e| GhStatsError::Internal(format!("server failed: {e}")))
        }
        Scheme::Https => {
            let (Some(cert), Some(key)) = (server.cert_file.as_deref(), server.key_file.as_deref())
            else {
                return Err(GhStatsError::Config(
                    "https requires server.cert_file and server.key_file".into(),
                ));
            };
            let tls = transport::tls::load_server_config(cert, key)?;

            let handle = axum_server::Handle::new();
            tokio::spawn({
                let handle = handle.clone();
                async move {
                    shutdown_signal(state).await;
                    handle.graceful_shutdown(Some(Duration::from_secs(10)));
                }
            });

            tracing::info!(%listen, path = %server.path, "ghstats-gateway starting (https)");
            axum_server::bind_rustls(listen, tls)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .map_err(|e| GhStatsError::Internal(format!("server failed: {e}")))
        }
    }
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    state.set_draining();
    tracing::info!("signal received, starting graceful shutdown");
}
