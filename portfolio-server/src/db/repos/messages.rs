//! Contact-form inbox

use portfolio_core::models::{timestamp, Message, MessageFlags, Reply};
use portfolio_core::Document;
use serde_json::Value;
use uuid::Uuid;

use super::{encode, DbError, Repo};
use crate::db::store::{Direction, DocumentStore, Filter, FindOptions, Update};

pub struct MessageRepo<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> MessageRepo<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    fn touched() -> Update {
        Update::new().set("updatedAt", Value::String(timestamp::format(&timestamp::now())))
    }

    /// Newest first, narrowed by whichever flags are given
    pub async fn list(&self, flags: &MessageFlags) -> Result<Vec<Message>, DbError> {
        let filter = Filter::all()
            .eq_opt("read", flags.read)
            .eq_opt("starred", flags.starred)
            .eq_opt("archived", flags.archived);
        let options = FindOptions::default().sort_by("createdAt", Direction::Desc);
        Repo::<Message>::new(self.store).list(&filter, &options).await
    }

    /// Set the flags present in `flags`; others keep their value
    pub async fn set_flags(&self, id: Uuid, flags: &MessageFlags) -> Result<Message, DbError> {
        let update = Self::touched().set_all(encode(flags)?);
        Repo::<Message>::new(self.store).update(id, &update).await
    }

    /// Append a reply. Replying implies the message was read.
    pub async fn reply(&self, id: Uuid, reply: &Reply) -> Result<Message, DbError> {
        let update = Self::touched()
            .push("replies", Value::Object(encode(reply)?))
            .set("replied", true)
            .set("read", true);
        Repo::<Message>::new(self.store).update(id, &update).await
    }

    /// Returns how many messages were unread
    pub async fn mark_all_read(&self) -> Result<u64, DbError> {
        let update = Self::touched().set("read", true);
        Ok(self
            .store
            .update_many(Message::COLLECTION, &Filter::all().eq("read", false), &update)
            .await?)
    }

    /// Archive (and mark read) every message not yet archived. Returns how
    /// many were affected.
    pub async fn clear_all(&self) -> Result<u64, DbError> {
        let update = Self::touched().set("archived", true).set("read", true);
        Ok(self
            .store
            .update_many(Message::COLLECTION, &Filter::all().eq("archived", false), &update)
            .await?)
    }
}
