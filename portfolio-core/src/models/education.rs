//! Education timeline

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{self as check, ValidationError};
use super::{timestamp, Document, IntoDocument, Validate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub degree: String,
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Document for Education {
    const COLLECTION: &'static str = "education";
    const RESOURCE: &'static str = "Education";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Validate for Education {
    fn validate(&self) -> Result<(), ValidationError> {
        check::required("degree", &self.degree, 100)?;
        check::required("institution", &self.institution, 150)?;
        check::optional("fieldOfStudy", self.field_of_study.as_deref(), 100)?;
        check::optional("location", self.location.as_deref(), 100)?;
        check::optional("grade", self.grade.as_deref(), 50)?;
        check::max_len("description", &self.description, 1000)?;
        check::date_range(self.start_date, self.end_date, self.current)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEducation {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    pub field_of_study: Option<String>,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub grade: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl IntoDocument<Education> for NewEducation {
    fn into_document(self, id: Uuid, now: DateTime<Utc>) -> Education {
        Education {
            id,
            degree: self.degree.trim().to_string(),
            institution: self.institution.trim().to_string(),
            field_of_study: self.field_of_study,
            location: self.location,
            start_date: self.start_date,
            end_date: self.end_date,
            current: self.current,
            grade: self.grade,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }
}
