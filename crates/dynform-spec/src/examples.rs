use serde_json::{Map, Value, json};

use crate::spec::field::FieldType;
use crate::spec::form::Form;
use crate::visibility::VisibilityPartition;

/// Produces placeholder values for every visible field, keyed by id.
/// Hosts use this to pre-fill demo payloads.
pub fn generate(form: &Form, partition: &VisibilityPartition) -> Value {
    let mut map = Map::new();
    for field in form.fields() {
        if partition.is_hidden(&field.id) {
            continue;
        }
        let example = match field.kind {
            FieldType::Text | FieldType::Textarea | FieldType::Search => {
                json!(format!("example-{}", field.id))
            }
            FieldType::Number => json!(0),
            FieldType::DateTime => json!("1970-01-01T00:00:00Z"),
            FieldType::Radio | FieldType::Select => {
                let first = field
                    .options
                    .first()
                    .map(|option| option.value.clone())
                    .unwrap_or_default();
                if field.is_multi {
                    json!([first])
                } else {
                    json!(first)
                }
            }
        };
        map.insert(field.id.to_string(), example);
    }
    Value::Object(map)
}
