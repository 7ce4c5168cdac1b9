//! Intake form schema
//!
//! A single current document; `version` is a coarse timestamp used for last
//! writer wins. No history is kept.

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Input kind of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Number,
    SingleSelect,
    MultiSelect,
}

impl FieldType {
    /// Whether the field picks from a list of options
    #[inline]
    #[must_use]
    pub fn is_select(self) -> bool {
        matches!(self, Self::SingleSelect | Self::MultiSelect)
    }
}

/// One field of the intake form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
}

impl FieldDefinition {
    /// Create an optional field without options
    pub fn new(id: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            field_type,
            options: Vec::new(),
            required: false,
        }
    }

    /// With options
    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Mark as required
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Current form schema document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    pub fields: Vec<FieldDefinition>,
    pub version: i64,
}

impl FormSchema {
    /// Validate field definitions
    ///
    /// # Errors
    /// Rejects blank or repeated ids, blank labels, select fields without
    /// options and options on non-select fields.
    pub fn validate_fields(fields: &[FieldDefinition]) -> Result<(), ValidationError> {
        let mut ids = HashSet::new();
        for field in fields {
            if field.id.trim().is_empty() {
                return Err(ValidationError::InvalidSchema("field with blank id".to_string()));
            }
            if !ids.insert(field.id.as_str()) {
                return Err(ValidationError::InvalidSchema(format!(
                    "duplicate field id '{}'",
                    field.id
                )));
            }
            if field.label.trim().is_empty() {
                return Err(ValidationError::InvalidSchema(format!(
                    "field '{}' has a blank label",
                    field.id
                )));
            }
            match (field.field_type.is_select(), field.options.is_empty()) {
                (true, true) => {
                    return Err(ValidationError::InvalidSchema(format!(
                        "select field '{}' has no options",
                        field.id
                    )))
                }
                (false, false) => {
                    return Err(ValidationError::InvalidSchema(format!(
                        "field '{}' is not a select but lists options",
                        field.id
                    )))
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Version for a write at `now`
    ///
    /// Seconds since the epoch, bumped past `previous` when the clock has not
    /// moved forward so versions stay strictly increasing.
    #[must_use]
    pub fn next_version(previous: Option<i64>, now: DateTime<Utc>) -> i64 {
        let stamp = now.timestamp();
        match previous {
            Some(prev) if prev >= stamp => prev + 1,
            _ => stamp,
        }
    }

    /// Look up a field by id
    #[must_use]
    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("name", "Full name", FieldType::Text).required(),
            FieldDefinition::new("team", "Team", FieldType::SingleSelect)
                .with_options(["Platform", "ADAS"]),
        ]
    }

    #[test]
    fn accepts_well_formed_fields() {
        assert!(FormSchema::validate_fields(&fields()).is_ok());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut defs = fields();
        defs.push(FieldDefinition::new("name", "Again", FieldType::Text));
        assert!(FormSchema::validate_fields(&defs).is_err());
    }

    #[test]
    fn rejects_select_without_options() {
        let defs = vec![FieldDefinition::new("skills", "Skills", FieldType::MultiSelect)];
        assert!(FormSchema::validate_fields(&defs).is_err());
    }

    #[test]
    fn version_is_strictly_increasing() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(FormSchema::next_version(None, now), 1_700_000_000);
        assert_eq!(FormSchema::next_version(Some(1_600_000_000), now), 1_700_000_000);
        assert_eq!(FormSchema::next_version(Some(1_700_000_000), now), 1_700_000_001);
    }

    #[test]
    fn type_uses_kebab_case_on_the_wire() {
        let json = serde_json::to_value(&fields()[1]).unwrap();
        assert_eq!(json["type"], "single-select");
        assert_eq!(json["options"][1], "ADAS");
    }
}
