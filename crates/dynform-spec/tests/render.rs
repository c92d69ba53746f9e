use serde_json::json;

use dynform_spec::{
    FieldId, Form, FormSession, build_render_payload, render_json_ui, render_text,
};

fn fixture() -> Form {
    serde_json::from_str(include_str!("fixtures/contact_form.json")).expect("deserialize fixture")
}

#[test]
fn render_text_lists_visible_fields_only() {
    let session = FormSession::open(fixture());
    let payload = build_render_payload(&session);
    let text = render_text(&payload);
    assert!(text.contains("Form: Contact (contact-form)"));
    assert!(text.contains("First Name"));
    assert!(!text.contains("Company Name"));
    // Empty groups are suppressed by the text renderer.
    assert!(!text.contains("[Company details]"));
    assert!(text.contains("[Details]"));
}

#[test]
fn render_json_ui_exposes_structure() {
    let mut session = FormSession::open(fixture());
    session.set(FieldId::from("first_name"), json!("Ada"));
    let payload = build_render_payload(&session);
    let ui = render_json_ui(&payload);

    assert_eq!(ui["form_id"], "contact-form");
    let main_fields = ui["main_fields"].as_array().expect("main fields");
    assert_eq!(main_fields.len(), 3);
    let first_name = main_fields
        .iter()
        .find(|field| field["id"] == "first_name")
        .expect("first_name entry");
    assert_eq!(first_name["visible"], true);
    assert_eq!(first_name["current_value"], "Ada");
    let company_name = main_fields
        .iter()
        .find(|field| field["id"] == "company_name")
        .expect("company_name entry");
    assert_eq!(company_name["visible"], false);
}

#[test]
fn render_payload_schema_covers_visible_fields_only() {
    let session = FormSession::open(fixture());
    let payload = build_render_payload(&session);
    let props = payload.schema["properties"].as_object().expect("properties");
    assert!(props.contains_key("first_name"));
    assert!(!props.contains_key("company_name"));
    let required = payload.schema["required"].as_array().expect("required");
    assert!(required.iter().any(|id| id == "first_name"));
}

#[test]
fn group_titles_interpolate_current_values() {
    let mut form = fixture();
    form.field_groups[0].group_title = "Details for {{values.first_name}}".into();
    let mut session = FormSession::open(form);
    session.set(FieldId::from("first_name"), json!("Ada"));
    let payload = build_render_payload(&session);
    assert_eq!(payload.groups[0].title, "Details for Ada");
}
