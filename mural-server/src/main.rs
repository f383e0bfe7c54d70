//! # Mural Server
//!
//! Shared-canvas server: records stroke updates, rasterizes them onto
//! the board, and streams diffs to polling clients.
//! Binds to localhost only for security.

use std::net::SocketAddr;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mural_raster::BrushSet;
use mural_server::metrics;
use mural_server::routes;
use mural_server::{AppState, Board, ServerConfig};

/// Build a CORS layer allowing localhost plus any configured origins.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let localhost_origins = [
        format!("http://localhost:{}", config.port),
        format!("http://127.0.0.1:{}", config.port),
    ];

    let origins: Vec<HeaderValue> = localhost_origins
        .iter()
        .chain(config.cors_origins.iter())
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,mural_server=debug,tower_http=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output (recommended for production).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mural_server=debug,tower_http=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    // Use JSON format in production (RUST_LOG_FORMAT=json)
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with optional JSON format
    init_tracing();

    // Initialize Prometheus metrics
    let metrics_handle = metrics::init_metrics()
        .map_err(|e| anyhow::anyhow!("Failed to initialize Prometheus metrics: {}", e))?;
    tracing::info!("Prometheus metrics initialized");

    let config = ServerConfig::from_env();

    let brushes = match &config.brush_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "loading brush stamps");
            BrushSet::load_dir(dir)?
        }
        None => BrushSet::procedural(),
    };

    let board = Board::open(
        &config.snapshot_path,
        config.canvas_width,
        config.canvas_height,
        brushes,
    )?;
    let state = AppState::new(board.clone());

    // Build metrics router with PrometheusHandle
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    let app = routes::router(state)
        .merge(metrics_router)
        // Request ID for distributed tracing correlation
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        // CORS configuration - localhost plus configured origins
        .layer(build_cors_layer(&config))
        // Structured request tracing with timing
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    // Bind to localhost ONLY (security requirement)
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Mural server starting on http://{}", addr);
    tracing::info!(path = %config.snapshot_path.display(), "canvas snapshot path");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Persist the canvas one last time before exit
    board.snapshot_now()?;
    tracing::info!("shutdown complete");

    Ok(())
}

/// Resolve when the process receives ctrl-c.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown signal received");
}

/// Prometheus metrics endpoint.
#[tracing::instrument(name = "metrics", skip(handle))]
async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
