use std::fmt::Write;

use dynform_spec::{FieldValueStore, FormSession, ValidationResult, build_render_payload, render_text};

/// Controls which bits of state the session shell prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: the effective form only.
    Clean,
    /// Verbose output: partition counts, hidden field ids, parse details.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Prints session state after each edit and the final snapshot dump.
pub struct SessionPresenter {
    verbosity: Verbosity,
    header_printed: bool,
    show_values_json: bool,
}

impl SessionPresenter {
    pub fn new(verbosity: Verbosity, show_values_json: bool) -> Self {
        Self {
            verbosity,
            header_printed: false,
            show_values_json,
        }
    }

    pub fn show_header(&mut self, session: &FormSession) {
        if self.header_printed {
            return;
        }
        println!("Form: {}", session.form().title);
        println!("Enter edits as 'field = value'; blank line to finish.");
        self.header_printed = true;
    }

    pub fn show_effective(&self, session: &FormSession) {
        let payload = build_render_payload(session);
        println!("{}", render_text(&payload));
        if self.verbosity.is_verbose() && !session.partition().hidden.is_empty() {
            let hidden: Vec<_> = session
                .partition()
                .hidden
                .iter()
                .map(|id| id.to_string())
                .collect();
            println!("Hidden: {}", hidden.join(", "));
        }
    }

    pub fn show_parse_error(&self, error: &EditParseError) {
        eprintln!("Invalid edit: {}", error.user_message);
        if self.verbosity.is_verbose()
            && let Some(debug) = &error.debug_message
        {
            eprintln!("  Expected: {}", debug);
        }
    }

    pub fn show_validation(&self, result: &ValidationResult) {
        if result.valid {
            return;
        }
        if !result.missing_required.is_empty() {
            println!("Missing required: {}", result.missing_required.join(", "));
        }
        for error in &result.errors {
            println!(
                "Invalid value ({}): {}",
                error.field_id.as_deref().unwrap_or("?"),
                error.message
            );
        }
    }

    pub fn show_completion(&self, values: &FieldValueStore) {
        println!("Done ✅");
        match values.to_cbor() {
            Ok(bytes) => {
                println!("Values (CBOR hex): {}", encode_hex(&bytes));
            }
            Err(err) => {
                eprintln!("Failed to serialize values to CBOR: {}", err);
            }
        }
        if self.show_values_json {
            match values.to_json_pretty() {
                Ok(pretty) => println!("{}", pretty),
                Err(err) => {
                    eprintln!("Failed to serialize values to JSON: {}", err);
                }
            }
        }
    }
}

/// Error produced when parsing an edit line.
#[derive(Debug)]
pub struct EditParseError {
    pub user_message: String,
    pub debug_message: Option<String>,
}

impl EditParseError {
    pub fn new(user_message: impl Into<String>, debug_message: Option<String>) -> Self {
        Self {
            user_message: user_message.into(),
            debug_message,
        }
    }
}

fn encode_hex(bytes: &[u8]) -> String {
    let mut encoded = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        write!(&mut encoded, "{:02x}", byte).expect("writing to string cannot fail");
    }
    encoded
}
