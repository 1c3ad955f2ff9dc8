mod auth;
mod error;
mod handlers;
mod language_config;
mod metrics;
mod routes;

use anyhow::Context;
use axum::Router;
use devlab_common::config::AppConfig;
use devlab_judge::{Judge0Client, RedisStore, SubmissionService};
use language_config::LanguageRegistry;
use metrics::MeteredJudge;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

pub struct AppState {
    pub service: SubmissionService,
    pub languages: LanguageRegistry,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        )
        .with_target(false)
        .init();

    info!("DevLab API booting...");

    let config = AppConfig::from_env();

    let languages = match LanguageRegistry::load_from_file(&config.languages_path) {
        Ok(registry) => registry,
        Err(e) => {
            warn!(path = %config.languages_path.display(), error = %e, "Using built-in language options");
            LanguageRegistry::default()
        }
    };

    // Connect to Redis
    let store = Arc::new(
        RedisStore::connect(&config.redis_url)
            .await
            .context("Failed to connect to Redis")?,
    );
    info!("Connected to Redis: {}", config.redis_url);

    let judge = Judge0Client::new(&config.judge).context("Failed to build judge client")?;
    info!(
        judge_url = %config.judge.base_url,
        authenticated = config.judge.api_key.is_some(),
        timeout_secs = config.judge.timeout.as_secs(),
        "Judge client configured"
    );

    let service = SubmissionService::new(
        Arc::new(MeteredJudge::new(Arc::new(judge))),
        store.clone(),
        store,
    );

    let state = Arc::new(AppState { service, languages });

    // Build router
    let app = Router::new()
        .merge(routes::routes())
        .with_state(state);

    // Start server
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("API shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => warn!("Received shutdown signal, finishing in-flight requests..."),
        Err(e) => {
            error!(error = %e, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    }
}
