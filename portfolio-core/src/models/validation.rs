//! Validation error types and field checks

use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static WEB_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("valid url regex"));

/// Validation error for documents and payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// List holds too many entries
    TooMany { field: &'static str, max: usize },

    /// String doesn't match required format (e-mail, URL)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Number outside the accepted range
    OutOfRange { field: &'static str, min: i64 },

    /// Fields are individually fine but contradict each other
    Inconsistent { reason: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} is required", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::TooMany { field, max } => {
                write!(f, "{} cannot have more than {} entries", field, max)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::OutOfRange { field, min } => write!(f, "{} must be at least {}", field, min),
            Self::Inconsistent { reason } => f.write_str(reason),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Required text: non-blank and at most `max` characters.
pub fn required(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    max_len(field, value, max)
}

/// Length cap counted in characters, not bytes.
pub fn max_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

pub fn optional(field: &'static str, value: Option<&str>, max: usize) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |v| max_len(field, v, max))
}

/// Every entry required and capped; the list itself capped at `max_items`.
pub fn each(
    field: &'static str,
    values: &[String],
    max_items: usize,
    max: usize,
) -> Result<(), ValidationError> {
    if values.len() > max_items {
        return Err(ValidationError::TooMany {
            field,
            max: max_items,
        });
    }
    values.iter().try_for_each(|v| required(field, v, max))
}

pub fn email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    required(field, value, 254)?;
    if !EMAIL_RE.is_match(value.trim()) {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must be a valid email address",
        });
    }
    Ok(())
}

/// Absolute http(s) link
pub fn web_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    required(field, value, 2048)?;
    if !WEB_URL_RE.is_match(value.trim()) {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must be a valid http(s) URL",
        });
    }
    Ok(())
}

pub fn optional_web_url(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !v.is_empty() => web_url(field, v),
        _ => Ok(()),
    }
}

/// Media may be an absolute URL or a site-relative path like `/images/a.png`.
pub fn media_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.starts_with('/') && !value.contains(char::is_whitespace) {
        return max_len(field, value, 2048);
    }
    web_url(field, value)
}

/// Timeline entries: a current position has no end, and an end never
/// precedes its start.
pub fn date_range(
    start: NaiveDate,
    end: Option<NaiveDate>,
    current: bool,
) -> Result<(), ValidationError> {
    match end {
        Some(_) if current => Err(ValidationError::Inconsistent {
            reason: "endDate must be empty when current is true",
        }),
        Some(end) if end < start => Err(ValidationError::Inconsistent {
            reason: "endDate cannot be before startDate",
        }),
        _ => Ok(()),
    }
}
