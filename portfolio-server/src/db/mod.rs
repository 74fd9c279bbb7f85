//! Database layer - document store, connection cache and repositories
//!
//! # Design Principles
//!
//! - One store handle per process, shared through `ConnectionCache`
//! - Handlers call `connect()` then one repository operation
//! - Keyed upserts for singletons, no check-then-insert
//! - Unique indexes back every natural key

pub mod connection;
pub mod memory;
pub mod mongo;
pub mod repos;
pub mod store;

pub use connection::{ConnectError, ConnectionCache, Connector, StoreHandle, Target, UriConnector};
pub use repos::DbError;
pub use store::{DocumentStore, Filter, FindOptions, StoreError, Update};
