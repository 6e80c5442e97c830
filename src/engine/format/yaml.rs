use crate::utils::error::{ConvertError, Result};
use serde_json::{Map, Number, Value};
use serde_yaml::Value as YamlValue;

/// Block style with 2-space mapping indent. Sequences nested in a mapping are
/// written compact (`tags:\n- x`), which YAML parsers read the same as the
/// indented form.
pub fn structured_to_yaml(value: &Value) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| ConvertError::format("structuredToYaml", e))
}

/// Merge keys (`<<`) are applied, tags are dropped, and non-string mapping
/// keys are stringified so any YAML document fits a JSON value.
pub fn yaml_to_structured(text: &str) -> Result<Value> {
    let mut document: YamlValue =
        serde_yaml::from_str(text).map_err(|e| ConvertError::parse("yamlToStructured", e))?;
    document
        .apply_merge()
        .map_err(|e| ConvertError::parse("yamlToStructured", e))?;
    Ok(yaml_to_json(document))
}

fn yaml_to_json(value: YamlValue) -> Value {
    match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(flag) => Value::Bool(flag),
        YamlValue::Number(number) => {
            if let Some(int) = number.as_i64() {
                Value::from(int)
            } else if let Some(uint) = number.as_u64() {
                Value::from(uint)
            } else {
                number
                    .as_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        YamlValue::String(text) => Value::String(text),
        YamlValue::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(key_text(key), yaml_to_json(value));
            }
            Value::Object(map)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn key_text(key: YamlValue) -> String {
    match key {
        YamlValue::String(text) => text,
        YamlValue::Null => "null".to_string(),
        YamlValue::Bool(flag) => flag.to_string(),
        YamlValue::Number(number) => number.to_string(),
        other => yaml_to_json(other).to_string(),
    }
}
