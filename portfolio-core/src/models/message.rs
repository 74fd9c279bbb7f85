//! Contact-form messages and their replies
//!
//! Replies are appended to the message document and never removed. The
//! read/starred/archived flags are the only fields the inbox updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{self as check, ValidationError};
use super::{timestamp, Document, IntoDocument, Validate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub message: String,
    #[serde(with = "timestamp")]
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub replied: bool,
    #[serde(default)]
    pub replies: Vec<Reply>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Document for Message {
    const COLLECTION: &'static str = "messages";
    const RESOURCE: &'static str = "Message";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Validate for Message {
    fn validate(&self) -> Result<(), ValidationError> {
        check::required("name", &self.name, 100)?;
        check::email("email", &self.email)?;
        check::required("subject", &self.subject, 200)?;
        check::required("message", &self.message, 5000)
    }
}

/// Public contact form payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl IntoDocument<Message> for NewMessage {
    fn into_document(self, id: Uuid, now: DateTime<Utc>) -> Message {
        Message {
            id,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            subject: self.subject.trim().to_string(),
            message: self.message,
            read: false,
            starred: false,
            archived: false,
            replied: false,
            replies: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Inbox flag update; absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageFlags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starred: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

impl MessageFlags {
    pub fn is_empty(&self) -> bool {
        self.read.is_none() && self.starred.is_none() && self.archived.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReply {
    #[serde(default)]
    pub message: String,
}

impl NewReply {
    pub fn into_reply(self, now: DateTime<Utc>) -> Result<Reply, ValidationError> {
        check::required("message", &self.message, 5000)?;
        Ok(Reply {
            message: self.message,
            sent_at: now,
        })
    }
}
