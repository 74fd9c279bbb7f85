//! Recommendations from people the owner worked with

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{self as check, ValidationError};
use super::{timestamp, Document, IntoDocument, Validate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relationship {
    Manager,
    #[default]
    Colleague,
    Client,
    Mentor,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default)]
    pub relationship: Relationship,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Document for Recommendation {
    const COLLECTION: &'static str = "recommendations";
    const RESOURCE: &'static str = "Recommendation";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Validate for Recommendation {
    fn validate(&self) -> Result<(), ValidationError> {
        check::required("name", &self.name, 100)?;
        check::optional("position", self.position.as_deref(), 100)?;
        check::optional("company", self.company.as_deref(), 100)?;
        check::required("text", &self.text, 2000)?;
        if let Some(avatar) = self.avatar.as_deref().filter(|a| !a.is_empty()) {
            check::media_url("avatar", avatar)?;
        }
        check::optional_web_url("linkedinUrl", self.linkedin_url.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecommendation {
    #[serde(default)]
    pub name: String,
    pub position: Option<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub relationship: Relationship,
    #[serde(default)]
    pub text: String,
    pub avatar: Option<String>,
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

impl IntoDocument<Recommendation> for NewRecommendation {
    fn into_document(self, id: Uuid, now: DateTime<Utc>) -> Recommendation {
        Recommendation {
            id,
            name: self.name.trim().to_string(),
            position: self.position,
            company: self.company,
            relationship: self.relationship,
            text: self.text,
            avatar: self.avatar,
            linkedin_url: self.linkedin_url,
            featured: self.featured,
            created_at: now,
            updated_at: now,
        }
    }
}
