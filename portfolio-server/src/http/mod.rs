//! HTTP server layer
//!
//! Axum server with:
//! - CORS (localhost only by default, credentials allowed)
//! - Request tracing and a request timeout
//! - Graceful shutdown
//! - JSON envelopes for success and error responses

pub mod error;
pub mod extractors;
pub mod response;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use response::{ApiResponse, ApiResult};
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
