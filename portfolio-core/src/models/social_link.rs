//! Social links shown in the footer and contact section

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{self as check, ValidationError};
use super::{timestamp, Document, Validate};

fn active_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub platform: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Manually maintained sort key
    #[serde(default)]
    pub order: i64,
    #[serde(default = "active_default")]
    pub is_active: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Document for SocialLink {
    const COLLECTION: &'static str = "social_links";
    const RESOURCE: &'static str = "Social link";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Validate for SocialLink {
    fn validate(&self) -> Result<(), ValidationError> {
        check::required("platform", &self.platform, 50)?;
        check::web_url("url", &self.url)?;
        check::optional("icon", self.icon.as_deref(), 100)?;
        if self.order < 0 {
            return Err(ValidationError::OutOfRange {
                field: "order",
                min: 0,
            });
        }
        Ok(())
    }
}

/// Create payload. `order` is assigned by the repository when omitted, so
/// this does not implement `IntoDocument`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSocialLink {
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub url: String,
    pub icon: Option<String>,
    pub order: Option<i64>,
    #[serde(default = "active_default")]
    pub is_active: bool,
}

impl NewSocialLink {
    pub fn into_link(self, id: Uuid, order: i64, now: DateTime<Utc>) -> SocialLink {
        SocialLink {
            id,
            platform: self.platform.trim().to_string(),
            url: self.url.trim().to_string(),
            icon: self.icon,
            order,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}
