//! Focus sessions and the tag catalog they are labelled from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// A completed focus countdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusSession {
    pub id: Uuid,
    /// Instant of completion.
    pub date: DateTime<Utc>,
    /// Length in seconds.
    pub duration: u64,
    /// Name of the tag selected when the session finished.
    pub tag: String,
}

impl FocusSession {
    pub fn new(date: DateTime<Utc>, duration: u64, tag: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            duration,
            tag: tag.into(),
        }
    }
}

/// Activity category a session can be labelled with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    /// Display color as `#rrggbb`.
    pub color: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }

    /// Out-of-the-box catalog.
    pub fn defaults() -> Vec<Tag> {
        vec![
            Tag::new("Dev", "#007aff"),
            Tag::new("Reading", "#ff9500"),
            Tag::new("Meeting", "#af52de"),
            Tag::new("Design", "#ff2d55"),
            Tag::new("Writing", "#34c759"),
            Tag::new("Other", "#8e8e93"),
        ]
    }
}

/// Ordered, non-empty set of tags with unique names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCatalog {
    tags: Vec<Tag>,
}

impl TagCatalog {
    /// Build a catalog, rejecting an empty list or duplicate names.
    pub fn new(tags: Vec<Tag>) -> Result<Self, ValidationError> {
        if tags.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "tags".into(),
                message: "catalog must contain at least one tag".into(),
            });
        }
        for (i, tag) in tags.iter().enumerate() {
            if tag.name.trim().is_empty() {
                return Err(ValidationError::InvalidValue {
                    field: "tags".into(),
                    message: "tag names must not be empty".into(),
                });
            }
            if tags[..i].iter().any(|t| t.name == tag.name) {
                return Err(ValidationError::InvalidValue {
                    field: "tags".into(),
                    message: format!("duplicate tag '{}'", tag.name),
                });
            }
        }
        Ok(Self { tags })
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// First entry, the default selection.
    pub fn first(&self) -> &Tag {
        &self.tags[0]
    }

    pub fn find(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name == name)
    }
}

impl Default for TagCatalog {
    fn default() -> Self {
        Self {
            tags: Tag::defaults(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_starts_with_dev() {
        let catalog = TagCatalog::default();
        assert_eq!(catalog.first().name, "Dev");
        assert_eq!(catalog.tags().len(), 6);
        assert!(catalog.find("Writing").is_some());
        assert!(catalog.find("writing").is_none());
    }

    #[test]
    fn catalog_rejects_duplicates_and_empty() {
        assert!(TagCatalog::new(vec![]).is_err());
        let dup = vec![Tag::new("Dev", "#000000"), Tag::new("Dev", "#ffffff")];
        assert!(TagCatalog::new(dup).is_err());
    }

    #[test]
    fn session_serializes_stored_fields() {
        let session = FocusSession::new(Utc::now(), 1500, "Dev");
        let json = serde_json::to_value(&session).unwrap();
        for key in ["id", "date", "duration", "tag"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
