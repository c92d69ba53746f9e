use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::field::Field;
use crate::spec::form::Form;
use crate::visibility::VisibilityPartition;

/// A group after projection; may be left with no visible fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EffectiveGroup {
    pub group_title: String,
    pub fields: Vec<Field>,
}

/// The form as currently presented: main fields and group fields filtered
/// by the visibility partition, relative order preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EffectiveForm {
    pub id: String,
    pub title: String,
    pub main_fields: Vec<Field>,
    pub field_groups: Vec<EffectiveGroup>,
}

/// Filters the form down to its visible fields.
///
/// Suppression filters on the partition's `hidden` set. Groups are never
/// dropped here; a group whose every field is hidden comes through with
/// empty `fields`, and whether to render it is the presentation layer's
/// call.
pub fn project(form: &Form, partition: &VisibilityPartition) -> EffectiveForm {
    let visible = |field: &&Field| !partition.is_hidden(&field.id);

    EffectiveForm {
        id: form.id.clone(),
        title: form.title.clone(),
        main_fields: form.main_fields.iter().filter(visible).cloned().collect(),
        field_groups: form
            .field_groups
            .iter()
            .map(|group| EffectiveGroup {
                group_title: group.group_title.clone(),
                fields: group.fields.iter().filter(visible).cloned().collect(),
            })
            .collect(),
    }
}
