//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing and timeout middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use portfolio_core::PortfolioConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use super::routes;
use crate::auth::AuthSettings;
use crate::db::{ConnectionCache, StoreHandle};

/// Origins allowed when CORS is not permissive
const LOCAL_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3000)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,

    /// Upper bound for handling one request
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from(&PortfolioConfig::default())
    }
}

impl From<&PortfolioConfig> for ServerConfig {
    fn from(config: &PortfolioConfig) -> Self {
        Self {
            bind_addr: config.server.bind,
            cors_permissive: config.server.cors_permissive,
            request_timeout: Duration::from_secs(config.server.request_timeout_secs),
        }
    }
}

/// Shared application state
pub struct AppState {
    /// Process-wide database handle
    pub db: ConnectionCache,
    pub auth: AuthSettings,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(db: ConnectionCache, auth: AuthSettings) -> Self {
        Self {
            db,
            auth,
            started_at: Instant::now(),
        }
    }

    pub fn from_config(config: &PortfolioConfig) -> Self {
        Self::new(
            ConnectionCache::from_config(&config.database),
            AuthSettings::from(&config.auth),
        )
    }

    /// Connected store handle, or a 500 envelope when no database answers
    pub async fn store(&self) -> Result<StoreHandle, ApiError> {
        Ok(self.db.connect().await?)
    }
}

fn cors_layer(permissive: bool) -> CorsLayer {
    if permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return CorsLayer::permissive();
    }

    // Localhost only; credentials so the session cookie travels
    let origins: Vec<HeaderValue> = LOCAL_ORIGINS
        .iter()
        .map(|origin| HeaderValue::from_static(origin))
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Bound the time spent on one request. An overrun answers with the error
/// envelope instead of dropping the connection.
async fn request_timeout(State(limit): State<Duration>, request: Request, next: Next) -> Response {
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => ApiError::Timeout {
            seconds: limit.as_secs(),
        }
        .into_response(),
    }
}

/// Build the application router with all routes
pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let api = Router::new()
        .merge(routes::health::router())
        .merge(routes::profile::router())
        .merge(routes::projects::router())
        .merge(routes::experiences::router())
        .merge(routes::education::router())
        .merge(routes::recommendations::router())
        .merge(routes::messages::router())
        .merge(routes::social_links::router())
        .merge(routes::content::router())
        .merge(routes::auth::router());

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(
            config.request_timeout,
            request_timeout,
        ))
        .layer(cors_layer(config.cors_permissive))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until a shutdown signal arrives.
///
/// The database is not contacted here; the first request that needs it
/// triggers the connection.
pub async fn run_server(state: Arc<AppState>, config: ServerConfig) -> Result<(), ServerError> {
    let app = build_router(state, &config);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
