//! Singleton owner profile
//!
//! There is at most one profile. It is addressed by the fixed `key` field
//! and only ever written through a keyed upsert, so concurrent first
//! requests cannot create duplicates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{self as check, ValidationError};
use super::{timestamp, Document, Validate};

/// Value of `key` on the one profile document
pub const PROFILE_KEY: &str = "primary";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub key: String,
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub bio: String,
    pub avatar: String,
    pub resume_url: String,
    pub skills: Vec<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Document for Profile {
    const COLLECTION: &'static str = "profiles";
    const RESOURCE: &'static str = "Profile";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Profile {
    /// Blank profile created on first read
    pub fn blank(id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            key: PROFILE_KEY.to_string(),
            created_at: now,
            updated_at: now,
            ..Self::default()
        }
    }
}

/// PUT /api/profile payload; absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
}

impl Validate for ProfileUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            check::required("name", name, 100)?;
        }
        check::optional("title", self.title.as_deref(), 150)?;
        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            check::email("email", email)?;
        }
        check::optional("phone", self.phone.as_deref(), 30)?;
        check::optional("location", self.location.as_deref(), 100)?;
        check::optional("bio", self.bio.as_deref(), 2000)?;
        if let Some(avatar) = self.avatar.as_deref().filter(|a| !a.is_empty()) {
            check::media_url("avatar", avatar)?;
        }
        if let Some(resume) = self.resume_url.as_deref().filter(|r| !r.is_empty()) {
            check::media_url("resumeUrl", resume)?;
        }
        if let Some(skills) = &self.skills {
            check::each("skills", skills, 100, 50)?;
        }
        Ok(())
    }
}
