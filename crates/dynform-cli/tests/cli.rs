use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use serde_json::Value;

const CONTACT_FORM: &str =
    include_str!("../../dynform-spec/tests/fixtures/contact_form.json");

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let file = dir.child(name);
    file.write_str(contents).expect("write fixture");
    file.path().to_path_buf()
}

#[test]
fn show_text_prints_visible_fields() {
    let dir = TempDir::new().expect("temp dir");
    let spec = write_fixture(&dir, "form.json", CONTACT_FORM);

    let output = Command::cargo_bin("dynform")
        .expect("binary")
        .args(["show", "--spec"])
        .arg(&spec)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    assert!(stdout.contains("Form: Contact (contact-form)"));
    assert!(stdout.contains("First Name"));
    assert!(!stdout.contains("Company Name"));
}

#[test]
fn show_json_reflects_supplied_values() {
    let dir = TempDir::new().expect("temp dir");
    let spec = write_fixture(&dir, "form.json", CONTACT_FORM);
    let values = write_fixture(&dir, "values.json", r#"{"kind":"company"}"#);

    let output = Command::cargo_bin("dynform")
        .expect("binary")
        .args(["show", "--format", "json", "--spec"])
        .arg(&spec)
        .arg("--values")
        .arg(&values)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    let parsed: Value = serde_json::from_str(&stdout).expect("json output");
    let main_fields = parsed["main_fields"].as_array().expect("main fields");
    let first_name = main_fields
        .iter()
        .find(|field| field["id"] == "first_name")
        .expect("first_name entry");
    assert_eq!(first_name["visible"], false);
}

#[test]
fn validate_fails_on_missing_required() {
    let dir = TempDir::new().expect("temp dir");
    let spec = write_fixture(&dir, "form.json", CONTACT_FORM);
    let values = write_fixture(&dir, "values.json", "{}");

    let output = Command::cargo_bin("dynform")
        .expect("binary")
        .args(["validate", "--spec"])
        .arg(&spec)
        .arg("--values")
        .arg(&values)
        .assert()
        .failure();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    assert!(stdout.contains("first_name"));
}

#[test]
fn validate_succeeds_on_complete_values() {
    let dir = TempDir::new().expect("temp dir");
    let spec = write_fixture(&dir, "form.json", CONTACT_FORM);
    let values = write_fixture(&dir, "values.json", r#"{"first_name":"Ada"}"#);

    Command::cargo_bin("dynform")
        .expect("binary")
        .args(["validate", "--spec"])
        .arg(&spec)
        .arg("--values")
        .arg(&values)
        .assert()
        .success();
}

#[test]
fn schema_lists_visible_properties() {
    let dir = TempDir::new().expect("temp dir");
    let spec = write_fixture(&dir, "form.json", CONTACT_FORM);

    let output = Command::cargo_bin("dynform")
        .expect("binary")
        .args(["schema", "--spec"])
        .arg(&spec)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    let parsed: Value = serde_json::from_str(&stdout).expect("json output");
    let props = parsed["properties"].as_object().expect("properties");
    assert!(props.contains_key("first_name"));
    assert!(!props.contains_key("vat_number"));
}

#[test]
fn session_applies_piped_edits() {
    let dir = TempDir::new().expect("temp dir");
    let spec = write_fixture(&dir, "form.json", CONTACT_FORM);

    let output = Command::cargo_bin("dynform")
        .expect("binary")
        .args(["session", "--values-json", "--spec"])
        .arg(&spec)
        .write_stdin("kind = company\n\n")
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    assert!(stdout.contains("Done ✅"));
    assert!(stdout.contains("\"kind\": \"company\""));
    assert!(stdout.contains("Company Name"));
}
