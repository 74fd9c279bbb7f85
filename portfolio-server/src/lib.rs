//! portfolio-server: JSON API for the portfolio site
//!
//! - `db`: document store abstraction (MongoDB or in-process), the
//!   process-wide connection cache and typed repositories
//! - `auth`: password hashing, session and reset tokens, cookies
//! - `http`: axum router, extractors, envelopes and route handlers

pub mod auth;
pub mod db;
pub mod http;

pub use db::{ConnectionCache, Target};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
