use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::field::{Field, FieldId};

/// A named, ordered collection of fields rendered under one heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldGroup {
    pub group_title: String,
    pub fields: Vec<Field>,
}

/// Top-level form definition as fetched from the resource API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Form {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub main_fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_groups: Vec<FieldGroup>,
    /// Opaque rule-source text; absence means every field is always visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_rules: Option<String>,
}

impl Form {
    /// Every field of the form, main fields first, then group fields in
    /// group order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.main_fields
            .iter()
            .chain(self.field_groups.iter().flat_map(|group| &group.fields))
    }

    /// Declared field ids in declaration order.
    pub fn field_ids(&self) -> Vec<FieldId> {
        self.fields().map(|field| field.id.clone()).collect()
    }

    /// Looks a field up by id across main fields and groups.
    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.fields().find(|field| &field.id == id)
    }
}
