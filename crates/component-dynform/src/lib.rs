use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use dynform_spec::{
    FieldId, FieldValueStore, Form, FormSession, build_render_payload, example_values,
    render_json_ui as spec_render_json_ui, render_text as spec_render_text, validate,
    values_schema,
};

const DEFAULT_FORM: &str = include_str!("../../dynform-spec/tests/fixtures/contact_form.json");

#[derive(Debug, Error)]
enum ComponentError {
    #[error("failed to parse config/{0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("form '{0}' is not available")]
    FormUnavailable(String),
    #[error("failed to parse value for field '{0}': {1}")]
    ValueParse(String, #[source] serde_json::Error),
    #[error("json encode error: {0}")]
    JsonEncode(#[source] serde_json::Error),
}

#[derive(Debug, Deserialize, Serialize, Default)]
struct ComponentConfig {
    #[serde(default)]
    form_json: Option<String>,
}

fn load_form(config_json: &str) -> Result<Form, ComponentError> {
    let config = if config_json.trim().is_empty() {
        ComponentConfig::default()
    } else {
        serde_json::from_str(config_json).map_err(ComponentError::ConfigParse)?
    };

    let form_json = config.form_json.as_deref().unwrap_or(DEFAULT_FORM);

    serde_json::from_str(form_json).map_err(ComponentError::ConfigParse)
}

fn ensure_form(form_id: &str, config_json: &str) -> Result<Form, ComponentError> {
    let form = load_form(config_json)?;
    if form.id != form_id {
        Err(ComponentError::FormUnavailable(form_id.to_string()))
    } else {
        Ok(form)
    }
}

fn parse_values(values_json: &str) -> FieldValueStore {
    serde_json::from_str(values_json).unwrap_or_default()
}

fn open_session(form: Form, values_json: &str) -> FormSession {
    FormSession::open_with_values(form, parse_values(values_json))
}

fn respond(result: Result<Value, ComponentError>) -> String {
    match result {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|error| {
            json!({"error": format!("json encode: {}", error)}).to_string()
        }),
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

fn respond_string(result: Result<String, ComponentError>) -> String {
    match result {
        Ok(value) => value,
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

/// Returns the raw form definition as JSON.
pub fn describe(form_id: &str, config_json: &str) -> String {
    respond(
        ensure_form(form_id, config_json)
            .and_then(|form| serde_json::to_value(form).map_err(ComponentError::JsonEncode)),
    )
}

/// JSON Schema for the value snapshot, restricted to visible fields.
pub fn get_values_schema(form_id: &str, config_json: &str, values_json: &str) -> String {
    respond(ensure_form(form_id, config_json).map(|form| {
        let session = open_session(form, values_json);
        values_schema(session.form(), session.partition())
    }))
}

/// Placeholder values per visible field.
pub fn get_example_values(form_id: &str, config_json: &str, values_json: &str) -> String {
    respond(ensure_form(form_id, config_json).map(|form| {
        let session = open_session(form, values_json);
        example_values(session.form(), session.partition())
    }))
}

/// Validates a snapshot against the form under current visibility.
pub fn validate_values(form_id: &str, config_json: &str, values_json: &str) -> String {
    respond(ensure_form(form_id, config_json).and_then(|form| {
        let session = open_session(form, values_json);
        serde_json::to_value(validate(session.form(), session.values()))
            .map_err(ComponentError::JsonEncode)
    }))
}

/// The raw displayed/hidden partition, for hosts that reason about
/// visibility directly rather than through the projected form.
pub fn visibility(form_id: &str, config_json: &str, values_json: &str) -> String {
    respond(ensure_form(form_id, config_json).and_then(|form| {
        let session = open_session(form, values_json);
        serde_json::to_value(session.partition()).map_err(ComponentError::JsonEncode)
    }))
}

/// The effective form as a JSON UI description.
pub fn effective(form_id: &str, config_json: &str, values_json: &str) -> String {
    respond(ensure_form(form_id, config_json).map(|form| {
        let session = open_session(form, values_json);
        spec_render_json_ui(&build_render_payload(&session))
    }))
}

/// The effective form as a human-readable summary.
pub fn render_text(form_id: &str, config_json: &str, values_json: &str) -> String {
    respond_string(ensure_form(form_id, config_json).map(|form| {
        let session = open_session(form, values_json);
        spec_render_text(&build_render_payload(&session))
    }))
}

/// Applies one edit and returns the resulting state in a single envelope:
/// new values, partition, effective form, and validation outcome.
pub fn set_value(
    form_id: &str,
    config_json: &str,
    values_json: &str,
    field_id: &str,
    value_json: &str,
) -> String {
    respond(ensure_form(form_id, config_json).and_then(|form| {
        let value: Value = serde_json::from_str(value_json)
            .map_err(|err| ComponentError::ValueParse(field_id.to_string(), err))?;
        let mut session = open_session(form, values_json);
        session.set(FieldId::from(field_id), value);

        let validation = validate(session.form(), session.values());
        let ui = spec_render_json_ui(&build_render_payload(&session));
        let partition =
            serde_json::to_value(session.partition()).map_err(ComponentError::JsonEncode)?;
        let values =
            serde_json::to_value(session.values()).map_err(ComponentError::JsonEncode)?;
        let validation_value =
            serde_json::to_value(&validation).map_err(ComponentError::JsonEncode)?;

        Ok(json!({
            "values": values,
            "visibility": partition,
            "effective": ui,
            "validation": validation_value,
        }))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn describe_returns_form_json() {
        let payload = describe("contact-form", "");
        let form: Value = serde_json::from_str(&payload).expect("valid json");
        assert_eq!(form["id"], "contact-form");
    }

    #[test]
    fn unknown_form_id_yields_error_envelope() {
        let payload = describe("other-form", "");
        let parsed: Value = serde_json::from_str(&payload).expect("json");
        assert!(parsed["error"].as_str().unwrap().contains("other-form"));
    }

    #[test]
    fn schema_lists_visible_fields() {
        let schema = get_values_schema("contact-form", "", "{}");
        let value: Value = serde_json::from_str(&schema).expect("json");
        let props = value["properties"].as_object().unwrap();
        assert!(props.contains_key("first_name"));
        assert!(!props.contains_key("company_name"));
    }

    #[test]
    fn example_values_follow_field_types() {
        let examples = get_example_values("contact-form", "", "{}");
        let parsed: Value = serde_json::from_str(&examples).expect("json");
        assert_eq!(parsed["first_name"], "example-first_name");
        assert_eq!(parsed["channels"], json!(["mail"]));
    }

    #[test]
    fn validate_values_reports_missing_required() {
        let result = validate_values("contact-form", "", "{}");
        let parsed: Value = serde_json::from_str(&result).expect("json");
        assert_eq!(parsed["valid"], false);
        assert_eq!(parsed["missing_required"][0], "first_name");
    }

    #[test]
    fn visibility_reflects_current_values() {
        let payload = visibility("contact-form", "", r#"{"kind":"company"}"#);
        let parsed: Value = serde_json::from_str(&payload).expect("json");
        let hidden = parsed["hidden"].as_array().expect("hidden");
        assert!(hidden.iter().any(|id| id == "first_name"));
    }

    #[test]
    fn effective_marks_hidden_fields() {
        let payload = effective("contact-form", "", "{}");
        let parsed: Value = serde_json::from_str(&payload).expect("json");
        let main_fields = parsed["main_fields"].as_array().expect("main fields");
        let company = main_fields
            .iter()
            .find(|field| field["id"] == "company_name")
            .expect("company_name");
        assert_eq!(company["visible"], false);
    }

    #[test]
    fn render_text_outputs_summary() {
        let output = render_text("contact-form", "", "{}");
        assert!(output.contains("Form:"));
        assert!(output.contains("First Name"));
    }

    #[test]
    fn set_value_recomputes_and_validates() {
        let response = set_value("contact-form", "", "{}", "kind", r#""company""#);
        let parsed: Value = serde_json::from_str(&response).expect("json");
        assert_eq!(parsed["values"]["kind"], "company");
        let hidden = parsed["visibility"]["hidden"].as_array().expect("hidden");
        assert!(hidden.iter().any(|id| id == "first_name"));
        // first_name is hidden now, so nothing required is missing.
        assert_eq!(parsed["validation"]["missing_required"], json!([]));
    }

    #[test]
    fn set_value_with_invalid_json_names_the_value_payload() {
        let response = set_value("contact-form", "", "{}", "kind", "not json");
        let parsed: Value = serde_json::from_str(&response).expect("json");
        let message = parsed["error"].as_str().expect("error message");
        assert!(message.contains("value for field 'kind'"));
        assert!(!message.contains("config"));
    }
}
