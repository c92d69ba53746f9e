use serde_json::{Map, Value, json};

use crate::session::FormSession;
use crate::spec::field::{Field, FieldType};
use crate::template::TemplateEngine;
use crate::values_schema;

/// Describes a single field for render outputs.
#[derive(Debug, Clone)]
pub struct RenderField {
    pub id: String,
    pub label: String,
    pub kind: FieldType,
    pub required: bool,
    pub is_multi: bool,
    pub visible: bool,
    pub current_value: Option<Value>,
    pub choices: Option<Vec<String>>,
}

/// A group of fields for render outputs.
#[derive(Debug, Clone)]
pub struct RenderGroup {
    pub title: String,
    pub fields: Vec<RenderField>,
}

/// Collected payload used by both text and JSON renderers.
#[derive(Debug, Clone)]
pub struct RenderPayload {
    pub form_id: String,
    pub form_title: String,
    pub main_fields: Vec<RenderField>,
    pub groups: Vec<RenderGroup>,
    pub displayed: usize,
    pub hidden: usize,
    pub schema: Value,
}

/// Builds the renderer payload from an open session.
pub fn build_render_payload(session: &FormSession) -> RenderPayload {
    let form = session.form();
    let partition = session.partition();
    let templates = TemplateEngine::new();

    let describe = |field: &Field| RenderField {
        id: field.id.to_string(),
        label: templates.render_label(&field.display_label(), session.values()),
        kind: field.kind,
        required: field.required,
        is_multi: field.is_multi,
        visible: !partition.is_hidden(&field.id),
        current_value: session.values().value(&field.id).cloned(),
        choices: if field.options.is_empty() {
            None
        } else {
            Some(
                field
                    .options
                    .iter()
                    .map(|option| option.value.clone())
                    .collect(),
            )
        },
    };

    let main_fields = form
        .main_fields
        .iter()
        .map(|field| describe(field))
        .collect::<Vec<_>>();
    let groups = form
        .field_groups
        .iter()
        .map(|group| RenderGroup {
            title: templates.render_label(&group.group_title, session.values()),
            fields: group.fields.iter().map(|field| describe(field)).collect(),
        })
        .collect::<Vec<_>>();

    let schema = values_schema::generate(form, partition);

    RenderPayload {
        form_id: form.id.clone(),
        form_title: form.title.clone(),
        main_fields,
        groups,
        displayed: partition.displayed.len(),
        hidden: partition.hidden.len(),
        schema,
    }
}

/// Render the payload as a structured JSON-friendly value.
pub fn render_json_ui(payload: &RenderPayload) -> Value {
    json!({
        "form_id": payload.form_id,
        "form_title": payload.form_title,
        "visibility": {
            "displayed": payload.displayed,
            "hidden": payload.hidden,
        },
        "main_fields": payload.main_fields.iter().map(field_json).collect::<Vec<_>>(),
        "field_groups": payload
            .groups
            .iter()
            .map(|group| json!({
                "group_title": group.title,
                "fields": group.fields.iter().map(field_json).collect::<Vec<_>>(),
            }))
            .collect::<Vec<_>>(),
        "schema": payload.schema,
    })
}

fn field_json(field: &RenderField) -> Value {
    let mut map = Map::new();
    map.insert("id".into(), Value::String(field.id.clone()));
    map.insert("label".into(), Value::String(field.label.clone()));
    map.insert(
        "type".into(),
        Value::String(field_type_label(field.kind).to_string()),
    );
    map.insert("required".into(), Value::Bool(field.required));
    map.insert("is_multi".into(), Value::Bool(field.is_multi));
    map.insert("visible".into(), Value::Bool(field.visible));
    if let Some(current_value) = &field.current_value {
        map.insert("current_value".into(), current_value.clone());
    }
    if let Some(choices) = &field.choices {
        map.insert(
            "choices".into(),
            Value::Array(
                choices
                    .iter()
                    .map(|choice| Value::String(choice.clone()))
                    .collect(),
            ),
        );
    }
    Value::Object(map)
}

/// Render the payload as human-friendly text.
///
/// Hidden fields are omitted, and so are groups left without any visible
/// field; that suppression is this renderer's presentation choice, the
/// projected structure itself keeps empty groups.
pub fn render_text(payload: &RenderPayload) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Form: {} ({})", payload.form_title, payload.form_id));
    lines.push(format!(
        "Visible: {} field(s), hidden: {}",
        payload.displayed, payload.hidden
    ));

    for field in payload.main_fields.iter().filter(|field| field.visible) {
        lines.push(field_line(field));
    }

    for group in &payload.groups {
        let visible: Vec<_> = group.fields.iter().filter(|field| field.visible).collect();
        if visible.is_empty() {
            continue;
        }
        lines.push(format!("[{}]", group.title));
        for field in visible {
            lines.push(field_line(field));
        }
    }

    lines.join("\n")
}

fn field_line(field: &RenderField) -> String {
    let mut entry = format!(" - {} ({})", field.label, field.id);
    if field.required {
        entry.push_str(" [required]");
    }
    if let Some(current_value) = &field.current_value {
        entry.push_str(&format!(" = {}", value_to_display(current_value)));
    }
    entry
}

fn field_type_label(kind: FieldType) -> &'static str {
    match kind {
        FieldType::Text => "text",
        FieldType::Number => "number",
        FieldType::Textarea => "textarea",
        FieldType::Radio => "radio",
        FieldType::Select => "select",
        FieldType::DateTime => "date-time",
        FieldType::Search => "search",
    }
}

fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(num) => num.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_display)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
