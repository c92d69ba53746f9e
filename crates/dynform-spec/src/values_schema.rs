use serde_json::{Map, Value, json};

use crate::spec::field::{Field, FieldType};
use crate::spec::form::Form;
use crate::visibility::VisibilityPartition;

/// Generates a JSON Schema describing the value snapshot, restricted to
/// fields visible under the given partition.
pub fn generate(form: &Form, partition: &VisibilityPartition) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in form.fields() {
        if partition.is_hidden(&field.id) {
            continue;
        }
        properties.insert(field.id.to_string(), field_schema(field));
        if field.required {
            required.push(Value::String(field.id.to_string()));
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn field_schema(field: &Field) -> Value {
    match field.kind {
        FieldType::Text | FieldType::Textarea | FieldType::Search => {
            json!({ "type": "string", "title": field.display_label() })
        }
        FieldType::DateTime => json!({
            "type": "string",
            "format": "date-time",
            "title": field.display_label(),
        }),
        FieldType::Number => json!({ "type": "number", "title": field.display_label() }),
        FieldType::Radio | FieldType::Select => {
            let choices: Vec<Value> = field
                .options
                .iter()
                .map(|option| Value::String(option.value.clone()))
                .collect();
            if field.is_multi {
                json!({
                    "type": "array",
                    "items": { "type": "string", "enum": choices },
                    "title": field.display_label(),
                })
            } else {
                json!({
                    "type": "string",
                    "enum": choices,
                    "title": field.display_label(),
                })
            }
        }
    }
}
