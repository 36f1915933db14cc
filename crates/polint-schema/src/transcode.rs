//! # YAML to JSON Transcoding
//!
//! Strict decoding happens on a `serde_json::Value`, so the parsed YAML
//! document is converted into the equivalent JSON tree. YAML tags are
//! dropped and scalar mapping keys are stringified. Anything with no JSON
//! representation (non-finite floats, sequence or mapping keys) is a
//! conversion error.

use serde_json::{Map, Number, Value};
use serde_yaml::Value as Yaml;

use polint_core::LintError;

/// Convert a parsed YAML document to a JSON value.
///
/// # Errors
///
/// Returns [`LintError::Conversion`] for the first node that has no JSON
/// equivalent.
pub fn yaml_to_json(yaml: &Yaml) -> Result<Value, LintError> {
    match yaml {
        Yaml::Null => Ok(Value::Null),
        Yaml::Bool(b) => Ok(Value::Bool(*b)),
        Yaml::Number(n) => json_number(n).map(Value::Number),
        Yaml::String(s) => Ok(Value::String(s.clone())),
        Yaml::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json)
            .collect::<Result<_, _>>()
            .map(Value::Array),
        Yaml::Mapping(map) => {
            let mut object = Map::with_capacity(map.len());
            for (key, value) in map {
                object.insert(json_key(key)?, yaml_to_json(value)?);
            }
            Ok(Value::Object(object))
        }
        Yaml::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

fn json_number(n: &serde_yaml::Number) -> Result<Number, LintError> {
    if let Some(i) = n.as_i64() {
        Ok(i.into())
    } else if let Some(u) = n.as_u64() {
        Ok(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .ok_or_else(|| LintError::Conversion(format!("cannot represent number {n} in JSON")))
    }
}

fn json_key(key: &Yaml) -> Result<String, LintError> {
    match key {
        Yaml::String(s) => Ok(s.clone()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Tagged(tagged) => json_key(&tagged.value),
        Yaml::Sequence(_) | Yaml::Mapping(_) => Err(LintError::Conversion(
            "mapping keys must be scalars".to_string(),
        )),
    }
}
