//! jsform CLI
//!
//! Renders a JSON Schema form to a standalone HTML page, optionally after
//! applying edits and submitting it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use jsform::{jsform, render_page, FieldValue, FormConfig, FormValues, Node, Submission};
use serde_json::Value;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Render JSON Schema forms to HTML.
#[derive(Parser)]
#[command(name = "jsform")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a schema as an HTML page.
    Render(RenderArgs),
}

#[derive(clap::Args, Debug, Clone)]
struct RenderArgs {
    /// JSON Schema file.
    #[arg(short, long, env = "JSFORM_SCHEMA")]
    schema: PathBuf,

    /// JSON file with initial values, flat by path or nested by fieldset.
    #[arg(short, long)]
    initial_values: Option<PathBuf>,

    /// Edit applied after the form is built, as `path=value`. Repeatable.
    #[arg(long = "set", value_name = "PATH=VALUE")]
    set: Vec<String>,

    /// Require an explicit inputType on every property.
    #[arg(long)]
    strict_input_type: bool,

    /// Submit the form and print the submission as JSON.
    #[arg(long)]
    submit: bool,

    /// Page title.
    #[arg(short, long, default_value = "Form")]
    title: String,

    /// Paragraph shown under the title.
    #[arg(long)]
    intro: Option<String>,

    /// Output file (stdout if not specified).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// What a render produced.
#[derive(Debug)]
struct Rendered {
    page: String,
    submission: Option<Submission>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Render(args) => {
            let rendered = render(&args)?;
            if let Some(submission) = &rendered.submission {
                println!("{}", serde_json::to_string_pretty(submission)?);
            }
            match &args.output {
                Some(path) => {
                    fs::write(path, &rendered.page)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Wrote {}", path.display());
                }
                None => println!("{}", rendered.page),
            }
        }
    }
    Ok(())
}

fn render(args: &RenderArgs) -> anyhow::Result<Rendered> {
    let schema = read_json(&args.schema)?;
    let mut initial = FormValues::new();
    if let Some(path) = &args.initial_values {
        flatten_values(&read_json(path)?, "", &mut initial);
    }
    let edits = args
        .set
        .iter()
        .map(|raw| parse_assignment(raw))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let form = jsform()
        .name("jsform")
        .schema(schema)
        .config(
            FormConfig::new()
                .initial_values(initial)
                .strict_input_type(args.strict_input_type),
        )
        .child(Node::new("button").attr("type", "submit").text("Submit"))
        .build()
        .with_context(|| format!("Failed to build form from {}", args.schema.display()))?;

    let controller = form.controller();
    for (path, value) in edits {
        controller
            .set_value(&path, value)
            .with_context(|| format!("Cannot apply --set {path}"))?;
    }

    let submission = if args.submit {
        match form.submit() {
            Some(submission) => Some(submission),
            None => bail!("Form has errors:\n{}", controller.errors()),
        }
    } else {
        None
    };
    debug!(valid = controller.is_valid(), "rendering page");

    Ok(Rendered {
        page: render_page(&args.title, args.intro.as_deref(), &form.to_html()),
        submission,
    })
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Flattens nested objects into dot-joined paths. Arrays and nulls are
/// skipped.
fn flatten_values(value: &Value, prefix: &str, out: &mut FormValues) {
    let Some(object) = value.as_object() else {
        return;
    };
    for (key, value) in object {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        if value.is_object() {
            flatten_values(value, &path, out);
        } else if let Some(field_value) = FieldValue::from_json(value) {
            out.insert(path, field_value);
        }
    }
}

/// Parses `path=value`. Values that read as a JSON scalar keep their type.
fn parse_assignment(raw: &str) -> anyhow::Result<(String, FieldValue)> {
    let Some((path, value)) = raw.split_once('=') else {
        bail!("Expected PATH=VALUE, got {raw:?}");
    };
    if path.is_empty() {
        bail!("Empty path in {raw:?}");
    }
    let value = serde_json::from_str::<Value>(value)
        .ok()
        .as_ref()
        .and_then(FieldValue::from_json)
        .unwrap_or_else(|| FieldValue::from(value));
    Ok((path.to_string(), value))
}
