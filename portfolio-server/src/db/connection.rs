//! Process-wide database connection cache
//!
//! One store handle per process. The first caller starts a connection
//! attempt (local target, then remote); callers arriving while it runs await
//! the same attempt. A successful attempt is kept for the life of the
//! process. A failed one is forgotten so the next call starts over from the
//! local target.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use portfolio_core::config::DatabaseSection;
use portfolio_core::models::{Content, Profile, Session, User};
use portfolio_core::Document;
use serde::Serialize;
use thiserror::Error;

use super::memory::MemoryStore;
use super::mongo::MongoStore;
use super::store::{DocumentStore, StoreError};

/// URI scheme for the in-process store
pub const MEMORY_SCHEME: &str = "memory://";

/// Fields with a unique index, created on every fresh connection
const UNIQUE_FIELDS: &[(&str, &str)] = &[
    (Profile::COLLECTION, "key"),
    (Content::COLLECTION, "section"),
    (User::COLLECTION, "email"),
    (Session::COLLECTION, "tokenHash"),
];

pub type StoreHandle = Arc<dyn DocumentStore>;

/// Which configured database the cached handle talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Local,
    Remote,
}

impl Target {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ConnectError {
    #[error("local database unreachable ({local}) and no remote database configured")]
    LocalOnly { local: StoreError },

    #[error("local database unreachable ({local}); remote database unreachable ({remote})")]
    Exhausted { local: StoreError, remote: StoreError },
}

/// Opens a store for a connection URI.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self, uri: &str) -> Result<StoreHandle, StoreError>;
}

/// Resolves `mongodb://`, `mongodb+srv://` and `memory://` URIs
#[derive(Debug, Clone)]
pub struct UriConnector {
    database: String,
    timeout: Duration,
}

impl UriConnector {
    pub fn new(database: impl Into<String>, timeout: Duration) -> Self {
        Self {
            database: database.into(),
            timeout,
        }
    }

    pub fn from_config(section: &DatabaseSection) -> Self {
        Self::new(
            section.name.clone(),
            Duration::from_secs(section.connect_timeout_secs),
        )
    }
}

#[async_trait]
impl Connector for UriConnector {
    async fn connect(&self, uri: &str) -> Result<StoreHandle, StoreError> {
        let store: StoreHandle = if uri.starts_with(MEMORY_SCHEME) {
            Arc::new(MemoryStore::new())
        } else if uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://") {
            Arc::new(MongoStore::connect(uri, &self.database, self.timeout).await?)
        } else {
            return Err(StoreError::Connection(
                "unsupported connection scheme".to_string(),
            ));
        };

        for (collection, field) in UNIQUE_FIELDS {
            store.ensure_unique_index(collection, field).await?;
        }
        Ok(store)
    }
}

type AttemptOutcome = Result<(StoreHandle, Target), ConnectError>;
type Attempt = Shared<BoxFuture<'static, AttemptOutcome>>;

enum Slot {
    Empty,
    Connecting(Attempt),
    Ready { store: StoreHandle, target: Target },
}

pub struct ConnectionCache {
    connector: Arc<dyn Connector>,
    local_uri: String,
    remote_uri: Option<String>,
    slot: Mutex<Slot>,
}

impl ConnectionCache {
    pub fn new(
        connector: impl Connector,
        local_uri: impl Into<String>,
        remote_uri: Option<String>,
    ) -> Self {
        Self {
            connector: Arc::new(connector),
            local_uri: local_uri.into(),
            remote_uri,
            slot: Mutex::new(Slot::Empty),
        }
    }

    pub fn from_config(section: &DatabaseSection) -> Self {
        Self::new(
            UriConnector::from_config(section),
            section.local_uri.clone(),
            section.remote_uri.clone(),
        )
    }

    /// Return the cached handle, joining or starting a connection attempt
    /// when there is none.
    pub async fn connect(&self) -> Result<StoreHandle, ConnectError> {
        let attempt = {
            let mut slot = self.lock();
            match &*slot {
                Slot::Ready { store, .. } => return Ok(Arc::clone(store)),
                Slot::Connecting(attempt) => attempt.clone(),
                Slot::Empty => {
                    let attempt = self.start_attempt();
                    *slot = Slot::Connecting(attempt.clone());
                    attempt
                }
            }
        };

        let outcome = attempt.clone().await;
        self.settle(&attempt, &outcome);
        outcome.map(|(store, _)| store)
    }

    /// Target of the cached handle, if connected
    pub fn active_target(&self) -> Option<Target> {
        match &*self.lock() {
            Slot::Ready { target, .. } => Some(*target),
            _ => None,
        }
    }

    fn start_attempt(&self) -> Attempt {
        let connector = Arc::clone(&self.connector);
        let local_uri = self.local_uri.clone();
        let remote_uri = self.remote_uri.clone();

        async move {
            tracing::info!(db_target = "local", "Connecting to database");
            let local = match connector.connect(&local_uri).await {
                Ok(store) => {
                    tracing::info!(db_target = "local", backend = store.backend(), "Database connected");
                    return Ok((store, Target::Local));
                }
                Err(e) => e,
            };

            let Some(remote_uri) = remote_uri else {
                tracing::error!(db_target = "local", error = %local, "Database connection failed");
                return Err(ConnectError::LocalOnly { local });
            };

            tracing::warn!(db_target = "local", error = %local, "Local database unreachable, trying remote");
            match connector.connect(&remote_uri).await {
                Ok(store) => {
                    tracing::info!(db_target = "remote", backend = store.backend(), "Database connected");
                    Ok((store, Target::Remote))
                }
                Err(remote) => {
                    tracing::error!(db_target = "remote", error = %remote, "Database connection failed");
                    Err(ConnectError::Exhausted { local, remote })
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Record the outcome of `attempt` unless another caller already did.
    fn settle(&self, attempt: &Attempt, outcome: &AttemptOutcome) {
        let mut slot = self.lock();
        let current = matches!(&*slot, Slot::Connecting(pending) if pending.ptr_eq(attempt));
        if !current {
            return;
        }
        *slot = match outcome {
            Ok((store, target)) => Slot::Ready {
                store: Arc::clone(store),
                target: *target,
            },
            Err(_) => Slot::Empty,
        };
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
