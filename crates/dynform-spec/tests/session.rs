use serde_json::json;

use dynform_spec::{FieldId, Form, FormSession, validate};

fn contact_form() -> Form {
    serde_json::from_str(include_str!("fixtures/contact_form.json")).expect("deserialize fixture")
}

#[test]
fn open_seeds_initial_values_and_partition() {
    let session = FormSession::open(contact_form());
    // "kind" defaults to "person", so person fields are visible and
    // company fields hidden before any interaction.
    assert_eq!(
        session.values().value(&FieldId::from("kind")),
        Some(&json!("person"))
    );
    assert!(!session.partition().is_hidden(&FieldId::from("first_name")));
    assert!(session.partition().is_hidden(&FieldId::from("company_name")));
    assert!(session.partition().is_hidden(&FieldId::from("vat_number")));
}

#[test]
fn set_recomputes_visibility_synchronously() {
    let mut session = FormSession::open(contact_form());
    session.set(FieldId::from("kind"), json!("company"));
    assert!(session.partition().is_hidden(&FieldId::from("first_name")));
    assert!(!session.partition().is_hidden(&FieldId::from("company_name")));
    assert!(!session.partition().is_hidden(&FieldId::from("vat_number")));
}

#[test]
fn set_overwrites_without_duplicating() {
    let mut session = FormSession::open(contact_form());
    session.set(FieldId::from("first_name"), json!("Ada"));
    session.set(FieldId::from("first_name"), json!("Grace"));
    assert_eq!(
        session.values().value(&FieldId::from("first_name")),
        Some(&json!("Grace"))
    );
    let first_name_entries = session
        .values()
        .entries()
        .iter()
        .filter(|(id, _)| id == &FieldId::from("first_name"))
        .count();
    assert_eq!(first_name_entries, 1);
}

#[test]
fn effective_form_filters_but_keeps_empty_groups() {
    let session = FormSession::open(contact_form());
    let effective = session.effective();
    // Company details group loses its only field but stays present.
    assert_eq!(effective.field_groups.len(), 2);
    let company = &effective.field_groups[1];
    assert_eq!(company.group_title, "Company details");
    assert!(company.fields.is_empty());
    // Details group keeps its fields in declaration order.
    let details: Vec<_> = effective.field_groups[0]
        .fields
        .iter()
        .map(|field| field.id.to_string())
        .collect();
    assert_eq!(details, vec!["email", "channels"]);
}

#[test]
fn effective_main_fields_preserve_relative_order() {
    let mut session = FormSession::open(contact_form());
    session.set(FieldId::from("kind"), json!("company"));
    let order: Vec<_> = session
        .effective()
        .main_fields
        .iter()
        .map(|field| field.id.to_string())
        .collect();
    assert_eq!(order, vec!["kind", "company_name"]);
}

#[test]
fn hidden_required_fields_are_not_missing() {
    let session = FormSession::open(contact_form());
    // first_name is required and visible, so validation flags it; once the
    // contact becomes a company the field is hidden and exempt.
    let result = validate(session.form(), session.values());
    assert_eq!(result.missing_required, vec!["first_name"]);

    let mut session = session;
    session.set(FieldId::from("kind"), json!("company"));
    let result = validate(session.form(), session.values());
    assert!(result.missing_required.is_empty());
}

#[test]
fn validation_checks_option_membership() {
    let mut session = FormSession::open(contact_form());
    session.set(FieldId::from("first_name"), json!("Ada"));
    session.set(FieldId::from("channels"), json!(["mail", "fax"]));
    let result = validate(session.form(), session.values());
    assert!(!result.valid);
    assert_eq!(result.errors[0].code.as_deref(), Some("option_mismatch"));
}

#[test]
fn validation_enforces_pattern_constraint() {
    let mut session = FormSession::open(contact_form());
    session.set(FieldId::from("first_name"), json!("Ada"));
    session.set(FieldId::from("email"), json!("not-an-email"));
    let result = validate(session.form(), session.values());
    assert!(
        result
            .errors
            .iter()
            .any(|error| error.code.as_deref() == Some("pattern_mismatch"))
    );
}

#[test]
fn validation_reports_unknown_fields() {
    let mut session = FormSession::open(contact_form());
    session.set(FieldId::from("first_name"), json!("Ada"));
    session.set(FieldId::from("nickname"), json!("ada"));
    let result = validate(session.form(), session.values());
    assert_eq!(result.unknown_fields, vec!["nickname"]);
}
