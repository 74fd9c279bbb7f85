//! Freeform page content, one document per section

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::ValidationError;
use super::{timestamp, Document, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSection {
    Hero,
    Footer,
    About,
}

impl ContentSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Footer => "footer",
            Self::About => "about",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub section: ContentSection,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Document for Content {
    const COLLECTION: &'static str = "contents";
    const RESOURCE: &'static str = "Content";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// POST /api/content payload: replaces the body of `section`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertContent {
    pub section: ContentSection,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Validate for UpsertContent {
    fn validate(&self) -> Result<(), ValidationError> {
        if !self.data.is_object() {
            return Err(ValidationError::InvalidFormat {
                field: "data",
                reason: "must be a JSON object",
            });
        }
        Ok(())
    }
}
