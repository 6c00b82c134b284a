//! Declarative schema consumed by [`crate::validation`]
//!
//! A schema lists, for each section of a service, which keys are required
//! and the coarse type each key must have. Schemas are plain JSON:
//!
//! ```json
//! {
//!   "service": { "required": ["Entry"], "types": { "Entry": "int" } },
//!   "categories": { "required": [], "types": {} },
//!   "message_threads": { "required": [], "types": {} },
//!   "message_posts": { "required": [], "types": {} }
//! }
//! ```

use crate::error::{ArchiveError, Result};
use crate::file_reader;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Post keys that are mandatory whenever the schema declares them
pub const MANDATORY_POST_KEYS: [&str; 4] = ["Post", "Author", "Date", "Time"];

/// Coarse value type a schema can demand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Non-negative or signed integer
    Int,
    /// Single-line text
    String,
    /// Ordered list
    List,
    /// Keyed map
    Dict,
    /// Text that may span lines
    Multiline,
}

impl FieldType {
    /// Whether a JSON value has this type
    pub fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::Int => value.is_i64() || value.is_u64(),
            FieldType::String | FieldType::Multiline => value.is_string(),
            FieldType::List => value.is_array(),
            FieldType::Dict => value.is_object(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldType::Int => "int",
            FieldType::String => "string",
            FieldType::List => "list",
            FieldType::Dict => "dict",
            FieldType::Multiline => "multiline",
        })
    }
}

/// Requirements for one section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionSchema {
    /// Keys that must be present
    #[serde(default)]
    pub required: Vec<String>,
    /// Expected type per key, checked when the key is present
    #[serde(default)]
    pub types: IndexMap<String, FieldType>,
}

impl SectionSchema {
    fn new(required: &[&str], types: &[(&str, FieldType)]) -> Self {
        Self {
            required: required.iter().map(|key| key.to_string()).collect(),
            types: types
                .iter()
                .map(|(key, field_type)| (key.to_string(), *field_type))
                .collect(),
        }
    }

    /// Whether the section mentions `key` at all
    pub fn declares(&self, key: &str) -> bool {
        self.types.contains_key(key) || self.required.iter().any(|k| k == key)
    }
}

/// Validation schema for a service and its nested sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Service root keys
    #[serde(default)]
    pub service: SectionSchema,
    /// Each category
    #[serde(default)]
    pub categories: SectionSchema,
    /// Each message thread
    #[serde(default)]
    pub message_threads: SectionSchema,
    /// Each post inside a thread
    #[serde(default)]
    pub message_posts: SectionSchema,
}

impl Default for Schema {
    /// Schema describing the full entity model
    fn default() -> Self {
        use FieldType::{Dict, Int, List, Multiline};

        Self {
            service: SectionSchema::new(
                &["Entry", "Service"],
                &[
                    ("Entry", Int),
                    ("Service", FieldType::String),
                    ("ServiceType", FieldType::String),
                    ("ServiceLocation", FieldType::String),
                    ("TimeZone", FieldType::String),
                    ("Info", Multiline),
                    ("Interactions", List),
                    ("Status", List),
                    ("Categorization", Dict),
                    ("Categories", List),
                    ("Users", Dict),
                    ("MessageThreads", List),
                ],
            ),
            categories: SectionSchema::new(
                &["Kind", "ID"],
                &[
                    ("Kind", FieldType::String),
                    ("Type", FieldType::String),
                    ("Level", FieldType::String),
                    ("ID", Int),
                    ("InSub", Int),
                    ("Headline", FieldType::String),
                    ("Description", Multiline),
                ],
            ),
            message_threads: SectionSchema::new(
                &["Thread"],
                &[
                    ("Thread", Int),
                    ("Title", FieldType::String),
                    ("Type", FieldType::String),
                    ("State", FieldType::String),
                    ("Keywords", FieldType::String),
                    ("Category", List),
                    ("Forum", List),
                    ("Messages", List),
                ],
            ),
            message_posts: SectionSchema::new(
                &[],
                &[
                    ("Author", FieldType::String),
                    ("AuthorID", Int),
                    ("Time", FieldType::String),
                    ("Date", FieldType::String),
                    ("EditTime", FieldType::String),
                    ("EditDate", FieldType::String),
                    ("EditAuthor", FieldType::String),
                    ("EditAuthorID", Int),
                    ("SubType", FieldType::String),
                    ("SubTitle", FieldType::String),
                    ("Tags", FieldType::String),
                    ("Post", Int),
                    ("PinnedID", Int),
                    ("Nested", Int),
                    ("Message", Multiline),
                    ("Polls", List),
                ],
            ),
        }
    }
}

impl Schema {
    /// Keys every post must carry: the schema's own required keys plus the
    /// mandatory post keys the schema declares.
    pub fn required_post_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.message_posts.required.iter().map(String::as_str).collect();
        for key in MANDATORY_POST_KEYS {
            if self.message_posts.declares(key) && !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Parse a schema from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a schema from a JSON file (`.gz` aware)
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = file_reader::open(path).map_err(|err| ArchiveError::io(path, err))?;
        Ok(serde_json::from_reader(reader)?)
    }

    /// Pretty-printed JSON form
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_type_matches() {
        assert!(FieldType::Int.matches(&json!(3)));
        assert!(FieldType::Int.matches(&json!(-3)));
        assert!(!FieldType::Int.matches(&json!("3")));
        assert!(FieldType::Multiline.matches(&json!("a\nb")));
        assert!(FieldType::List.matches(&json!([])));
        assert!(FieldType::Dict.matches(&json!({})));
        assert!(!FieldType::Dict.matches(&json!([])));
    }

    #[test]
    fn test_required_post_keys_intersect_declared() {
        let schema = Schema::default();
        assert_eq!(schema.required_post_keys(), vec!["Post", "Author", "Date", "Time"]);

        let mut schema = Schema::default();
        schema.message_posts.types.shift_remove("Time");
        schema.message_posts.required.push("Tags".into());
        assert_eq!(schema.required_post_keys(), vec!["Tags", "Post", "Author", "Date"]);
    }

    #[test]
    fn test_schema_json_round_trip() {
        let schema = Schema::default();
        let text = schema.to_json_pretty().unwrap();
        assert!(text.contains("\"Entry\": \"int\""));
        assert_eq!(Schema::from_json_str(&text).unwrap(), schema);
    }

    #[test]
    fn test_partial_schema_defaults_missing_sections() {
        let schema =
            Schema::from_json_str(r#"{"service": {"required": ["Entry"]}}"#).unwrap();
        assert_eq!(schema.service.required, vec!["Entry"]);
        assert!(schema.service.types.is_empty());
        assert!(schema.categories.required.is_empty());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = Schema::from_json_str(r#"{"service": {"types": {"Entry": "float"}}}"#)
            .unwrap_err();
        assert!(matches!(err, ArchiveError::Json(_)));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, Schema::default().to_json_pretty().unwrap()).unwrap();
        assert_eq!(Schema::from_json_file(&path).unwrap(), Schema::default());
    }
}
