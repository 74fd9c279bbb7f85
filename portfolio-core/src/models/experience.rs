//! Work experience timeline

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{self as check, ValidationError};
use super::{timestamp, Document, IntoDocument, Validate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentType {
    #[default]
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Freelance,
    Internship,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub employment_type: EmploymentType,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Document for Experience {
    const COLLECTION: &'static str = "experiences";
    const RESOURCE: &'static str = "Experience";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Validate for Experience {
    fn validate(&self) -> Result<(), ValidationError> {
        check::required("title", &self.title, 100)?;
        check::required("company", &self.company, 100)?;
        check::optional("location", self.location.as_deref(), 100)?;
        check::max_len("description", &self.description, 2000)?;
        check::each("achievements", &self.achievements, 20, 500)?;
        check::each("technologies", &self.technologies, 30, 50)?;
        check::date_range(self.start_date, self.end_date, self.current)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExperience {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    pub location: Option<String>,
    #[serde(default)]
    pub employment_type: EmploymentType,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

impl IntoDocument<Experience> for NewExperience {
    fn into_document(self, id: Uuid, now: DateTime<Utc>) -> Experience {
        Experience {
            id,
            title: self.title.trim().to_string(),
            company: self.company.trim().to_string(),
            location: self.location,
            employment_type: self.employment_type,
            start_date: self.start_date,
            end_date: self.end_date,
            current: self.current,
            description: self.description,
            achievements: self.achievements,
            technologies: self.technologies,
            created_at: now,
            updated_at: now,
        }
    }
}
