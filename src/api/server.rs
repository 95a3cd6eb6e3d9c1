use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::handlers::{alive, health_check, AppState};
use crate::alerts::Notifier;
use crate::config::ServiceConfig;
use crate::feed::FeedClient;
use crate::monitor::Monitor;
use crate::schedule::Scheduler;

/// Build the liveness router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(alive))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Shared outbound HTTP client; every request is bounded by `timeout`
pub fn build_http_client(timeout: std::time::Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("airwatch/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Start the scheduler and serve the liveness endpoint until Ctrl-C
pub async fn run_server(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.bind_addr();
    let http_client = build_http_client(config.request_timeout)?;

    let feed = FeedClient::new(
        http_client.clone(),
        &config.feed_host,
        &config.location,
        &config.feed_token,
    );
    let notifier = Notifier::new(http_client, &config.webhook_url);
    let monitor = Monitor::new(feed, notifier, config.utc_offset);

    // Bind first so a taken port fails before any check runs
    let listener = TcpListener::bind(addr).await?;

    // Start background scheduler
    let scheduler = Arc::new(Scheduler::new(config.schedule.clone(), config.run_on_start));
    let scheduler_handle = Arc::clone(&scheduler).start(monitor);

    let state = Arc::new(AppState::new(&config.location));
    let app = build_router(state);

    tracing::info!("Starting liveness server on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(Arc::clone(&scheduler)))
        .await?;

    // A cycle in flight is bounded by the request timeout
    if tokio::time::timeout(config.request_timeout * 2, scheduler_handle)
        .await
        .is_err()
    {
        tracing::warn!("Scheduler did not stop in time");
    }

    tracing::info!("airwatch stopped");
    Ok(())
}

async fn shutdown_signal(scheduler: Arc<Scheduler>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutdown signal received, stopping scheduler...");
    scheduler.stop();
}
