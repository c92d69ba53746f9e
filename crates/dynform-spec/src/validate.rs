use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::spec::field::{Constraint, Field, FieldType};
use crate::spec::form::Form;
use crate::values::FieldValueStore;
use crate::visibility::resolve_form_visibility;

/// One validation finding against a single field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Outcome of validating a value snapshot against a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub missing_required: Vec<String>,
    pub unknown_fields: Vec<String>,
}

/// Validates the snapshot against the form definition.
///
/// Hidden fields are exempt: a required field suppressed by the current
/// visibility partition is not reported missing, and its value (if any)
/// is not checked.
pub fn validate(form: &Form, store: &FieldValueStore) -> ValidationResult {
    let visibility = resolve_form_visibility(form, store);

    let mut errors = Vec::new();
    let mut missing_required = Vec::new();

    for field in form.fields() {
        if visibility.is_hidden(&field.id) {
            continue;
        }

        match store.value(&field.id).filter(|value| !value.is_null()) {
            None => {
                if field.required {
                    missing_required.push(field.id.to_string());
                }
            }
            Some(value) => {
                if let Some(error) = validate_value(field, value) {
                    errors.push(error);
                }
            }
        }
    }

    let all_ids: std::collections::BTreeSet<_> = form.field_ids().into_iter().collect();
    let unknown_fields: Vec<String> = store
        .entries()
        .iter()
        .filter(|(id, _)| !all_ids.contains(id))
        .map(|(id, _)| id.to_string())
        .collect();

    ValidationResult {
        valid: errors.is_empty() && missing_required.is_empty() && unknown_fields.is_empty(),
        errors,
        missing_required,
        unknown_fields,
    }
}

fn validate_value(field: &Field, value: &Value) -> Option<ValidationError> {
    if !matches_type(field, value) {
        return Some(base_error(field, "type mismatch", "type_mismatch"));
    }

    if let Some(constraint) = &field.constraint
        && let Some(error) = enforce_constraint(field, value, constraint)
    {
        return Some(error);
    }

    if matches!(field.kind, FieldType::Radio | FieldType::Select)
        && !selection_allowed(field, value)
    {
        return Some(base_error(field, "invalid option", "option_mismatch"));
    }

    None
}

fn matches_type(field: &Field, value: &Value) -> bool {
    match field.kind {
        FieldType::Text | FieldType::Textarea | FieldType::Search | FieldType::DateTime => {
            value.is_string()
        }
        FieldType::Number => value.is_number(),
        FieldType::Radio | FieldType::Select => {
            if field.is_multi {
                value
                    .as_array()
                    .is_some_and(|items| items.iter().all(Value::is_string))
            } else {
                value.is_string()
            }
        }
    }
}

fn selection_allowed(field: &Field, value: &Value) -> bool {
    let allowed = |text: &str| {
        field
            .options
            .iter()
            .any(|option| option.value == text || option.id.as_str() == text)
    };
    match value {
        Value::String(text) => allowed(text),
        Value::Array(items) => items
            .iter()
            .all(|item| item.as_str().is_some_and(allowed)),
        _ => false,
    }
}

fn enforce_constraint(
    field: &Field,
    value: &Value,
    constraint: &Constraint,
) -> Option<ValidationError> {
    if let Some(pattern) = &constraint.pattern
        && let Some(text) = value.as_str()
        && let Ok(regex) = Regex::new(pattern)
        && !regex.is_match(text)
    {
        return Some(base_error(
            field,
            "value does not match pattern",
            "pattern_mismatch",
        ));
    }

    if let Some(min_len) = constraint.min_len
        && let Some(text) = value.as_str()
        && text.len() < min_len
    {
        return Some(base_error(
            field,
            "string shorter than min length",
            "min_length",
        ));
    }

    if let Some(max_len) = constraint.max_len
        && let Some(text) = value.as_str()
        && text.len() > max_len
    {
        return Some(base_error(
            field,
            "string longer than max length",
            "max_length",
        ));
    }

    if let Some(min) = constraint.min
        && let Some(number) = value.as_f64()
        && number < min
    {
        return Some(base_error(field, "value below minimum", "min"));
    }

    if let Some(max) = constraint.max
        && let Some(number) = value.as_f64()
        && number > max
    {
        return Some(base_error(field, "value above maximum", "max"));
    }

    None
}

fn base_error(field: &Field, message: &str, code: &str) -> ValidationError {
    ValidationError {
        field_id: Some(field.id.to_string()),
        path: Some(format!("/{}", field.id)),
        message: message.into(),
        code: Some(code.into()),
    }
}
