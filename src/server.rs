/// Server setup and initialization
///
/// Wires together the positioning client, session registry, page renderer and
/// HTTP routes. Provides the main application factory for creating the Axum app.

use crate::{
    api::{create_routes, AppState},
    config::Config,
    positioning::HttpPositioningClient,
    render::PageRenderer,
    session::{SessionRegistry, WorkflowSubmitter},
};
use anyhow::Result;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;

/// Create the main Axum application with all routes and middleware
///
/// Builds the reqwest client for the positioning service, compiles the page
/// template and starts the idle-session sweeper in the background.
pub async fn create_app(config: Config) -> Result<Router> {
    tracing::info!("🌐 Positioning service: {} (timeout {}s)", config.positioning.url, config.positioning.timeout_secs);
    let client = HttpPositioningClient::new(&config.positioning)?;
    let submitter = WorkflowSubmitter::new(Arc::new(client));

    tracing::info!("🖼️ Compiling page template");
    let renderer = Arc::new(PageRenderer::new()?);

    tracing::info!("📊 Initializing session registry");
    let registry = Arc::new(SessionRegistry::new());

    // Start the idle-session sweeper in background
    tracing::info!(
        "⏰ Sessions expire after {}s idle (sweep every {}s)",
        config.session.ttl_secs,
        config.session.sweep_interval_secs
    );
    spawn_session_sweeper(
        Arc::clone(&registry),
        config.session.ttl(),
        config.session.sweep_interval_secs,
    );

    let app_state = AppState {
        registry,
        submitter,
        renderer,
        display: config.display.clone(),
    };

    tracing::info!("📡 Creating HTTP router with all endpoints");
    let app = Router::new()
        // Health check endpoint
        .route("/healthz", get(health_check))
        // Positioning form and its actions
        .merge(create_routes().with_state(app_state))
        .layer(DefaultBodyLimit::max(config.server.max_body_bytes));

    tracing::info!("✅ Application initialized successfully");

    Ok(app)
}

/// Periodically drop sessions that have been idle longer than `ttl`
fn spawn_session_sweeper(registry: Arc<SessionRegistry>, ttl: chrono::Duration, sweep_interval_secs: u64) {
    let period = Duration::from_secs(sweep_interval_secs.max(1));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = registry.evict_idle(ttl);
            if evicted > 0 {
                tracing::debug!("🧹 Sweeper evicted {} sessions", evicted);
            }
        }
    });
}

/// Start the HTTP server with the given configuration
///
/// Creates the application and serves it on the configured address and port
/// until Ctrl-C.
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting n8n-tools server...");

    let app = create_app(config.clone()).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("❌ Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("🛑 Shutdown signal received");
}

/// Health check endpoint handler
async fn health_check() -> &'static str {
    "ok"
}
