use std::fmt;

use schemars::JsonSchema;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a single form field, unique across the whole form.
///
/// Upstream payloads key fields by either a string or an integer; integers
/// are canonicalized to their decimal string so the id can serve as a JSON
/// object key everywhere.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, JsonSchema)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for FieldId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for FieldId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = FieldId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer field id")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<FieldId, E> {
                Ok(FieldId(value.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<FieldId, E> {
                Ok(FieldId(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<FieldId, E> {
                Ok(FieldId(value.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Closed set of widget kinds a field can render as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Number,
    Textarea,
    Radio,
    Select,
    DateTime,
    Search,
}

/// One selectable option of a radio/select field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldOption {
    pub id: FieldId,
    pub value: String,
}

/// Optional per-field value constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct Constraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_len: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_len: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// A single form input descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Field {
    pub id: FieldId,
    #[serde(rename = "type")]
    pub kind: FieldType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default)]
    pub is_multi: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Constraint>,
    /// Initial value; `null` means unset.
    #[serde(default)]
    pub value: Value,
}

impl Field {
    /// The label to present: explicit `label`, or the `name` title-cased.
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format_name(&self.name),
        }
    }
}

fn format_name(name: &str) -> String {
    name.split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
