use crate::domain::ports::{InputSource, JobProvider};
use crate::engine::dispatch::Request;
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

static ENV_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// A conversion job described in TOML:
///
/// ```toml
/// [job]
/// name = "orders-to-csv"
///
/// [input]
/// path = "orders.json"
///
/// [request]
/// resource = "format"
/// operation = "structuredToCsv"
/// delimiter = ";"
///
/// [output]
/// path = "orders.csv"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub job: JobInfo,
    pub input: InputConfig,
    /// The flat request record: `resource`, `operation` and the operation's options.
    pub request: Map<String, Value>,
    pub output: Option<OutputConfig>,
    pub monitoring: Option<MonitoringConfig>,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl JobConfig {
    /// Load a job file. Relative input and output paths resolve against the
    /// file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.base_dir = path.as_ref().parent().map(Path::to_path_buf);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| ConvertError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the variable's value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("job.name", &self.job.name)?;

        match (&self.input.path, &self.input.text) {
            (Some(path), None) => validate_path("input.path", path)?,
            (None, Some(_)) => {}
            (Some(_), Some(_)) => {
                return Err(ConvertError::ConfigError {
                    message: "input.path and input.text are mutually exclusive".to_string(),
                })
            }
            (None, None) => {
                return Err(ConvertError::ConfigError {
                    message: "Missing required field: input.path or input.text".to_string(),
                })
            }
        }

        for field in ["resource", "operation"] {
            match self.request.get(field) {
                Some(Value::String(value)) => {
                    validate_non_empty_string(&format!("request.{}", field), value)?
                }
                Some(other) => {
                    return Err(ConvertError::invalid_option(
                        &format!("request.{}", field),
                        other,
                        "Must be a string",
                    ))
                }
                None => {
                    return Err(ConvertError::ConfigError {
                        message: format!("Missing required field: request.{}", field),
                    })
                }
            }
        }

        if let Some(output) = &self.output {
            validate_path("output.path", &output.path)?;
        }

        // Surface unknown operations and bad option types at load time.
        self.request().map(|_| ())
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl JobProvider for JobConfig {
    fn request(&self) -> Result<Request> {
        Request::from_record(Value::Object(self.request.clone()))
    }

    fn input_source(&self) -> InputSource {
        match (&self.input.text, &self.input.path) {
            (Some(text), _) => InputSource::Inline(text.clone()),
            (None, Some(path)) => InputSource::File(path.clone()),
            (None, None) => InputSource::File("-".to_string()),
        }
    }

    fn output_path(&self) -> Option<&str> {
        self.output.as_ref().map(|o| o.path.as_str())
    }
}

impl Validate for JobConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC_JOB: &str = r#"
[job]
name = "orders-to-csv"
description = "Flatten orders"

[input]
path = "orders.json"

[request]
resource = "format"
operation = "structuredToCsv"
delimiter = ";"

[output]
path = "orders.csv"
"#;

    #[test]
    fn test_parse_basic_job() {
        let config = JobConfig::from_toml_str(BASIC_JOB).unwrap();

        assert_eq!(config.job.name, "orders-to-csv");
        assert_eq!(config.input_source(), InputSource::File("orders.json".to_string()));
        assert_eq!(config.output_path(), Some("orders.csv"));
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());

        let request = config.request().unwrap();
        assert_eq!(request.resource(), "format");
        assert_eq!(request.operation(), "structuredToCsv");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DATA_CONVERTER_TEST_SEPARATOR", "_");

        let toml_content = r#"
[job]
name = "slug"

[input]
text = "Hello World"

[request]
resource = "string"
operation = "slugify"
separator = "${DATA_CONVERTER_TEST_SEPARATOR}"
keep = "${DATA_CONVERTER_UNSET_VARIABLE}"
"#;

        let config = JobConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.request["separator"], "_");
        assert_eq!(config.request["keep"], "${DATA_CONVERTER_UNSET_VARIABLE}");

        std::env::remove_var("DATA_CONVERTER_TEST_SEPARATOR");
    }

    #[test]
    fn test_input_must_name_exactly_one_source() {
        let both = BASIC_JOB.replace("path = \"orders.json\"", "path = \"a\"\ntext = \"b\"");
        assert!(JobConfig::from_toml_str(&both).unwrap().validate().is_err());

        let neither = BASIC_JOB.replace("path = \"orders.json\"", "");
        assert!(JobConfig::from_toml_str(&neither).unwrap().validate().is_err());
    }

    #[test]
    fn test_unknown_operation_fails_validation() {
        let content = BASIC_JOB.replace("structuredToCsv", "structuredToParquet");
        let config = JobConfig::from_toml_str(&content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConvertError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_missing_operation_fails_validation() {
        let content = BASIC_JOB.replace("operation = \"structuredToCsv\"", "");
        let config = JobConfig::from_toml_str(&content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_a_config_error() {
        assert!(matches!(
            JobConfig::from_toml_str("[job\nname = 1"),
            Err(ConvertError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_config_from_file_records_base_dir() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC_JOB.as_bytes()).unwrap();

        let config = JobConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.job.name, "orders-to-csv");
        assert_eq!(config.base_dir(), temp_file.path().parent());
    }
}
