//! Showcase projects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{self as check, ValidationError};
use super::{timestamp, Document, IntoDocument, Validate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectType {
    #[default]
    Web,
    Mobile,
    Desktop,
    Api,
    Library,
    Other,
}

/// Publication state. Only `Published` projects are meant for the public site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Published => "Published",
            Self::Archived => "Archived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: ProjectType,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub order: i64,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Document for Project {
    const COLLECTION: &'static str = "projects";
    const RESOURCE: &'static str = "Project";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Validate for Project {
    fn validate(&self) -> Result<(), ValidationError> {
        check::required("title", &self.title, 100)?;
        check::required("description", &self.description, 2000)?;
        check::each("technologies", &self.technologies, 30, 50)?;
        if self.images.len() > 20 {
            return Err(ValidationError::TooMany {
                field: "images",
                max: 20,
            });
        }
        self.images
            .iter()
            .try_for_each(|url| check::media_url("images", url))?;
        if let Some(url) = self.video_url.as_deref().filter(|u| !u.is_empty()) {
            check::media_url("videoUrl", url)?;
        }
        check::optional_web_url("liveUrl", self.live_url.as_deref())?;
        check::optional_web_url("githubUrl", self.github_url.as_deref())?;
        if self.order < 0 {
            return Err(ValidationError::OutOfRange {
                field: "order",
                min: 0,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: ProjectType,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub video_url: Option<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub order: i64,
}

impl IntoDocument<Project> for NewProject {
    fn into_document(self, id: Uuid, now: DateTime<Utc>) -> Project {
        Project {
            id,
            title: self.title.trim().to_string(),
            description: self.description,
            kind: self.kind,
            technologies: self.technologies,
            images: self.images,
            video_url: self.video_url,
            live_url: self.live_url,
            github_url: self.github_url,
            featured: self.featured,
            status: self.status,
            order: self.order,
            created_at: now,
            updated_at: now,
        }
    }
}
