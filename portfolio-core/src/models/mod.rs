//! Documents with validation before write
//!
//! Each collection has a document type (what is stored and returned) and,
//! where clients create documents, a `New*` payload that becomes one via
//! [`IntoDocument`]. Invalid input returns ValidationError, not panic.

pub mod content;
pub mod education;
pub mod experience;
pub mod message;
pub mod profile;
pub mod project;
pub mod recommendation;
pub mod social_link;
pub mod timestamp;
pub mod user;
pub mod validation;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

pub use content::{Content, ContentSection, UpsertContent};
pub use education::{Education, NewEducation};
pub use experience::{EmploymentType, Experience, NewExperience};
pub use message::{Message, MessageFlags, NewMessage, NewReply, Reply};
pub use profile::{Profile, ProfileUpdate, PROFILE_KEY};
pub use project::{NewProject, Project, ProjectStatus, ProjectType};
pub use recommendation::{NewRecommendation, Recommendation, Relationship};
pub use social_link::{NewSocialLink, SocialLink};
pub use user::{validate_password, Session, User, UserView};
pub use validation::ValidationError;

/// A record stored in its own collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name in the store
    const COLLECTION: &'static str;
    /// Human name used in "not found" messages
    const RESOURCE: &'static str;

    fn id(&self) -> Uuid;
}

/// Field-level checks run before any write.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Client payload that becomes a stored document once it has an id.
pub trait IntoDocument<D: Document> {
    fn into_document(self, id: Uuid, now: DateTime<Utc>) -> D;
}

/// Fields a merge-patch may never touch.
pub const PROTECTED_FIELDS: &[&str] = &["_id", "createdAt", "updatedAt"];

/// Apply a partial update to a stored document.
///
/// Each top-level key in `patch` replaces the stored value; `null` drops the
/// field so it falls back to its default. Protected fields are ignored and
/// `updatedAt` becomes `now`. Fails when the result no longer deserializes,
/// e.g. a required field was nulled or an enum got an unknown value.
pub fn merge_patch<D: Document>(
    existing: &D,
    patch: &serde_json::Map<String, Value>,
    now: DateTime<Utc>,
) -> Result<D, serde_json::Error> {
    let mut value = serde_json::to_value(existing)?;
    if let Value::Object(fields) = &mut value {
        for (key, new_value) in patch {
            if PROTECTED_FIELDS.contains(&key.as_str()) {
                continue;
            }
            if new_value.is_null() {
                fields.remove(key);
            } else {
                fields.insert(key.clone(), new_value.clone());
            }
        }
        fields.insert("updatedAt".to_string(), Value::String(timestamp::format(&now)));
    }
    serde_json::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn link() -> SocialLink {
        let payload: NewSocialLink = serde_json::from_value(json!({
            "platform": "GitHub",
            "url": "https://github.com/ada",
            "icon": "github"
        }))
        .unwrap();
        payload.into_link(Uuid::new_v4(), 3, timestamp::now() - chrono::Duration::hours(1))
    }

    fn patch(value: Value) -> serde_json::Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("patch must be an object"),
        }
    }

    #[test]
    fn patch_replaces_and_drops_fields() {
        let original = link();
        let now = timestamp::now();
        let updated = merge_patch(
            &original,
            &patch(json!({"platform": "Codeberg", "icon": null, "order": 7})),
            now,
        )
        .unwrap();

        assert_eq!(updated.platform, "Codeberg");
        assert_eq!(updated.icon, None);
        assert_eq!(updated.order, 7);
        assert_eq!(updated.url, original.url);
        assert_eq!(updated.updated_at, now);
    }

    #[test]
    fn protected_fields_are_ignored() {
        let original = link();
        let updated = merge_patch(
            &original,
            &patch(json!({
                "_id": Uuid::new_v4(),
                "createdAt": "2000-01-01T00:00:00.000Z"
            })),
            timestamp::now(),
        )
        .unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
    }

    #[test]
    fn nulling_required_field_fails() {
        let err = merge_patch(&link(), &patch(json!({"url": null})), timestamp::now());
        assert!(err.is_err());
    }
}
