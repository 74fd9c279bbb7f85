//! Command implementations for the portfolio CLI

pub mod check_db;
pub mod create_admin;
pub mod serve;

pub use check_db::run_check_db;
pub use create_admin::run_create_admin;
pub use serve::run_serve;
