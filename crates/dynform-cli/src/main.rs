mod presenter;

use clap::{Parser, Subcommand, ValueEnum};
use dynform_spec::{
    FieldId, FieldValueStore, Form, FormSession, build_render_payload, render_text, validate,
    values_schema,
};
use presenter::{EditParseError, SessionPresenter, Verbosity};
use serde_json::Value;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Dynamic form session CLI",
    long_about = "Opens form definitions, applies field edits, and shows the effective form under the current visibility rules."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RenderMode {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Open a form and apply edits interactively, one per line.
    Session {
        /// Path to the form definition JSON.
        #[arg(long, value_name = "FORM")]
        spec: PathBuf,
        /// Optional JSON file containing initial values.
        #[arg(long, value_name = "VALUES")]
        values: Option<PathBuf>,
        /// Show verbose output (hidden field ids, parse expectations).
        #[arg(long, alias = "debug")]
        verbose: bool,
        /// Also emit the final values as pretty JSON.
        #[arg(long)]
        values_json: bool,
    },
    /// Print the effective form for a definition plus a values snapshot.
    Show {
        /// Path to the form definition JSON.
        #[arg(long, value_name = "FORM")]
        spec: PathBuf,
        /// Optional JSON file containing current values.
        #[arg(long, value_name = "VALUES")]
        values: Option<PathBuf>,
        /// Output mode.
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
    },
    /// Validate a values snapshot against a form definition.
    Validate {
        /// Path to the form definition JSON.
        #[arg(long, value_name = "FORM")]
        spec: PathBuf,
        /// Path to the values JSON file.
        #[arg(long, value_name = "VALUES")]
        values: PathBuf,
    },
    /// Emit the values schema for the current visibility.
    Schema {
        /// Path to the form definition JSON.
        #[arg(long, value_name = "FORM")]
        spec: PathBuf,
        /// Optional JSON file containing current values.
        #[arg(long, value_name = "VALUES")]
        values: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Session {
            spec,
            values,
            verbose,
            values_json,
        } => run_session(spec, values, verbose, values_json),
        Command::Show {
            spec,
            values,
            format,
        } => run_show(spec, values, format),
        Command::Validate { spec, values } => run_validate(spec, values),
        Command::Schema { spec, values } => run_schema(spec, values),
    }
}

fn load_form(path: &PathBuf) -> CliResult<Form> {
    let text = fs::read_to_string(path)
        .map_err(|err| format!("failed to read form definition {}: {}", path.display(), err))?;
    let form = serde_json::from_str(&text)
        .map_err(|err| format!("failed to parse form definition {}: {}", path.display(), err))?;
    Ok(form)
}

fn load_values(path: Option<&PathBuf>) -> CliResult<FieldValueStore> {
    let Some(path) = path else {
        return Ok(FieldValueStore::new());
    };
    let text = fs::read_to_string(path)
        .map_err(|err| format!("failed to read values {}: {}", path.display(), err))?;
    let values = serde_json::from_str(&text)
        .map_err(|err| format!("failed to parse values {}: {}", path.display(), err))?;
    Ok(values)
}

fn open_session(spec: &PathBuf, values: Option<&PathBuf>) -> CliResult<FormSession> {
    let form = load_form(spec)?;
    let values = load_values(values)?;
    Ok(FormSession::open_with_values(form, values))
}

fn run_session(
    spec: PathBuf,
    values: Option<PathBuf>,
    verbose: bool,
    values_json: bool,
) -> CliResult<()> {
    let mut session = open_session(&spec, values.as_ref())?;
    let mut presenter =
        SessionPresenter::new(Verbosity::from_verbose(verbose), values_json);

    presenter.show_header(&session);
    presenter.show_effective(&session);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        match parse_edit(line) {
            Ok((id, value)) => {
                if session.form().field(&id).is_none() {
                    eprintln!("Unknown field '{}'; declared fields only.", id);
                    continue;
                }
                session.set(id, value);
                presenter.show_effective(&session);
            }
            Err(error) => presenter.show_parse_error(&error),
        }
    }

    presenter.show_validation(&validate(session.form(), session.values()));
    presenter.show_completion(session.values());
    Ok(())
}

/// Parses one `field = value` edit line. The value side is JSON when it
/// parses as JSON, a bare string otherwise.
fn parse_edit(line: &str) -> Result<(FieldId, Value), EditParseError> {
    let (field, raw_value) = line.split_once('=').ok_or_else(|| {
        EditParseError::new(
            "missing '='",
            Some("an edit line looks like: kind = company".to_string()),
        )
    })?;
    let field = field.trim();
    if field.is_empty() {
        return Err(EditParseError::new(
            "missing field id before '='",
            Some("an edit line looks like: kind = company".to_string()),
        ));
    }
    let raw_value = raw_value.trim();
    let value = serde_json::from_str(raw_value)
        .unwrap_or_else(|_| Value::String(raw_value.to_string()));
    Ok((FieldId::from(field), value))
}

fn run_show(spec: PathBuf, values: Option<PathBuf>, format: RenderMode) -> CliResult<()> {
    match format {
        RenderMode::Text => {
            let session = open_session(&spec, values.as_ref())?;
            println!("{}", render_text(&build_render_payload(&session)));
        }
        RenderMode::Json => {
            // JSON mode goes through the component surface so the output
            // matches what embedding hosts receive.
            let form_text = fs::read_to_string(&spec)?;
            let form: Form = serde_json::from_str(&form_text)?;
            let config = serde_json::json!({ "form_json": form_text }).to_string();
            let values_text = match values.as_ref() {
                Some(path) => fs::read_to_string(path)?,
                None => "{}".to_string(),
            };
            let payload = component_dynform::effective(&form.id, &config, &values_text);
            let parsed: Value = serde_json::from_str(&payload)?;
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
    }
    Ok(())
}

fn run_validate(spec: PathBuf, values: PathBuf) -> CliResult<()> {
    let session = open_session(&spec, Some(&values))?;
    let result = validate(session.form(), session.values());
    println!("{}", serde_json::to_string_pretty(&result)?);
    if !result.valid {
        std::process::exit(1);
    }
    Ok(())
}

fn run_schema(spec: PathBuf, values: Option<PathBuf>) -> CliResult<()> {
    let session = open_session(&spec, values.as_ref())?;
    let schema = values_schema(session.form(), session.partition());
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
