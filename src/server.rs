// `server.rs` composes the HTTP application: it loads configuration, copies
// the frontend build into place, builds the Firebase client, and mounts the
// API handlers, static files, and middleware.
use crate::{
    config::Config,
    firebase::TelemetryClient,
    handlers::{self, AppState},
    static_files,
};
use axum::{
    extract::Extension,
    http::Request,
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnRequest, TraceLayer};
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;
    if !config.firebase_configured() {
        warn!("FIREBASE_DB_URL or FIREBASE_AUTH_TOKEN is not set; data endpoints will answer with 500");
    }

    // Copy the frontend before binding so the static mount is final.
    let static_root = static_files::prepare(config.frontend_dist.clone(), config.static_dir.clone()).await;

    let client = TelemetryClient::new(config.fetch_timeout)?;
    let bind_addr = config.bind_addr;
    let state = AppState { config: Arc::new(config), client };
    let app = app(state, static_root.as_deref());

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .init();
}

/// Build the router. API routes always exist; when `static_root` is given,
/// every other path is served from it. Layers are applied bottom -> top, so
/// CORS wraps everything including the static fallback.
pub fn app(state: AppState, static_root: Option<&Path>) -> Router {
    let mut router = Router::new()
        .route("/api/data/all", get(handlers::all_readings))
        .route("/api/data/last", get(handlers::last_reading))
        .route("/api/predict", post(handlers::predict))
        .route("/api/status", get(handlers::status));

    if let Some(root) = static_root {
        router = router.fallback_service(static_files::service(root));
    }

    router
        .layer(Extension(state))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::span!(
                        Level::INFO,
                        "request",
                        method = %request.method(),
                        uri = %request.uri()
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::INFO)),
        )
        .layer(CorsLayer::very_permissive())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received shutdown signal, shutting down gracefully"),
        Err(e) => {
            error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
