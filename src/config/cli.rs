use crate::domain::ports::{InputSource, JobProvider};
use crate::engine::dispatch::Request;
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "data-converter")]
#[command(about = "Convert payloads between JSON, XML, YAML, CSV, Markdown, HTML and text encodings")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, global = true, help = "Log elapsed time and memory per phase")]
    pub monitor: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run one conversion described on the command line
    Convert(ConvertArgs),
    /// Run a conversion job described in a TOML file
    Run {
        #[arg(long, short)]
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ConvertArgs {
    /// Resource family: base64, binary, encoding, format, html or string
    pub resource: String,

    /// Operation within the resource, e.g. structuredToCsv
    pub operation: String,

    #[arg(long, short, help = "Input file; `-` or omitted reads stdin")]
    pub input: Option<String>,

    #[arg(long, short, conflicts_with = "input", help = "Inline input text")]
    pub text: Option<String>,

    #[arg(long, short, help = "Output file; omitted writes stdout")]
    pub output: Option<String>,

    #[arg(
        long = "option",
        value_name = "KEY=VALUE",
        help = "Operation option; the value is read as JSON when it parses, else as a string"
    )]
    pub options: Vec<String>,

    #[arg(long, value_name = "JSON", help = "Operation options as one JSON object")]
    pub options_json: Option<String>,
}

impl ConvertArgs {
    /// The flat request record. `--options-json` is applied first, then each
    /// `--option`, so individual flags win.
    pub fn record(&self) -> Result<Value> {
        let mut record = match &self.options_json {
            Some(raw) => match serde_json::from_str(raw) {
                Ok(Value::Object(map)) => map,
                Ok(other) => {
                    return Err(ConvertError::invalid_option(
                        "options-json",
                        other,
                        "Must be a JSON object",
                    ))
                }
                Err(e) => return Err(ConvertError::invalid_option("options-json", raw, e)),
            },
            None => Map::new(),
        };

        for option in &self.options {
            let (key, value) = split_option(option)?;
            record.insert(key.to_string(), option_value(value));
        }

        record.insert("resource".to_string(), Value::String(self.resource.clone()));
        record.insert("operation".to_string(), Value::String(self.operation.clone()));
        Ok(Value::Object(record))
    }
}

fn split_option(option: &str) -> Result<(&str, &str)> {
    match option.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(ConvertError::invalid_option(
            "option",
            option,
            "Expected KEY=VALUE",
        )),
    }
}

fn option_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

impl JobProvider for ConvertArgs {
    fn request(&self) -> Result<Request> {
        Request::from_record(self.record()?)
    }

    fn input_source(&self) -> InputSource {
        match (&self.text, &self.input) {
            (Some(text), _) => InputSource::Inline(text.clone()),
            (None, Some(path)) => InputSource::File(path.clone()),
            (None, None) => InputSource::File("-".to_string()),
        }
    }

    fn output_path(&self) -> Option<&str> {
        self.output.as_deref()
    }
}

impl Validate for ConvertArgs {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("resource", &self.resource)?;
        validate_non_empty_string("operation", &self.operation)?;

        if let Some(input) = &self.input {
            validate_path("input", input)?;
        }
        if let Some(output) = &self.output {
            validate_path("output", output)?;
        }
        for option in &self.options {
            split_option(option)?;
        }

        self.request().map(|_| ())
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Convert(args) => args.validate(),
            Command::Run { config } => validate_path("config", &config.to_string_lossy()),
        }
    }
}
