//! Loading and storing documents
//!
//! The raw form of a document is a JSON value (`.aiconfig.json`) or the same
//! structure written as YAML (`.aiconfig.yaml`). Loading goes through
//! [`AIConfigRecord`] and [`AIConfig::from_record`], so every loaded document
//! has a consistent prompt index. Storing omits absent optional fields and
//! writes unknown keys back where they were found.

use serde_json::Value;

use crate::config::LoadOptions;
use crate::document::{AIConfig, AIConfigRecord};
use crate::error::ParseError;

/// Build a document from its raw form with default [`LoadOptions`]
///
/// # Errors
/// Returns [`ParseError`] if `raw` does not have the document shape or breaks
/// a load-time constraint.
pub fn validate_and_parse(raw: Value) -> Result<AIConfig, ParseError> {
    validate_and_parse_with(raw, &LoadOptions::default())
}

/// Build a document from its raw form
///
/// # Errors
/// Returns [`ParseError`] if `raw` does not have the document shape or breaks
/// a load-time constraint.
pub fn validate_and_parse_with(raw: Value, options: &LoadOptions) -> Result<AIConfig, ParseError> {
    let record: AIConfigRecord = serde_json::from_value(raw)?;
    AIConfig::from_record(record, options)
}

/// Raw form of a document
///
/// # Errors
/// Returns [`ParseError::Json`] if a value cannot be represented as JSON.
pub fn to_raw(config: &AIConfig) -> Result<Value, ParseError> {
    Ok(serde_json::to_value(config)?)
}

/// Parse a JSON document
///
/// # Errors
/// Returns [`ParseError`] for malformed JSON or an invalid document.
pub fn from_json_str(input: &str, options: &LoadOptions) -> Result<AIConfig, ParseError> {
    let record: AIConfigRecord = serde_json::from_str(input)?;
    AIConfig::from_record(record, options)
}

/// Write a document as pretty-printed JSON
///
/// # Errors
/// Returns [`ParseError::Json`] if a value cannot be represented as JSON.
pub fn to_json_string(config: &AIConfig) -> Result<String, ParseError> {
    Ok(serde_json::to_string_pretty(config)?)
}

/// Parse a YAML document
///
/// # Errors
/// Returns [`ParseError`] for malformed YAML or an invalid document.
pub fn from_yaml_str(input: &str, options: &LoadOptions) -> Result<AIConfig, ParseError> {
    let record: AIConfigRecord = serde_yaml::from_str(input)?;
    AIConfig::from_record(record, options)
}

/// Write a document as YAML
///
/// # Errors
/// Returns [`ParseError::Yaml`] if a value cannot be represented as YAML.
pub fn to_yaml_string(config: &AIConfig) -> Result<String, ParseError> {
    Ok(serde_yaml::to_string(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuplicateNamePolicy;
    use serde_json::json;

    fn raw() -> Value {
        json!({
            "name": "travel",
            "schema_version": "latest",
            "metadata": {
                "parameters": {"city": "Paris"},
                "default_model": "gpt-3.5-turbo"
            },
            "description": "trip planning",
            "prompts": [
                {"name": "plan", "input": "Plan a trip to {{city}}"},
                {
                    "name": "review",
                    "input": "Review it",
                    "metadata": {"model": {"name": "gpt-4", "settings": {"top_p": 1}}}
                }
            ],
            "$schema": "https://json.schemastore.org/aiconfig-1.0"
        })
    }

    #[test]
    fn parse_builds_consistent_document() {
        let config = validate_and_parse(raw()).unwrap();
        assert_eq!(config.name(), "travel");
        assert_eq!(config.description(), Some("trip planning"));
        assert!(config.is_index_consistent());
        assert_eq!(config.get_model_name("review").unwrap(), "gpt-4");
        assert!(config.extra().contains_key("$schema"));
    }

    #[test]
    fn raw_round_trip() {
        let config = validate_and_parse(raw()).unwrap();
        assert_eq!(to_raw(&config).unwrap(), raw());
    }

    #[test]
    fn missing_version_defaults_to_latest() {
        let mut input = raw();
        input.as_object_mut().unwrap().remove("schema_version");
        let config = validate_and_parse(input).unwrap();
        assert_eq!(to_raw(&config).unwrap()["schema_version"], json!("latest"));
    }

    #[test]
    fn missing_name_is_rejected() {
        let err = validate_and_parse(json!({"metadata": {}})).unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn duplicate_policy_applies() {
        let input = json!({
            "name": "d",
            "metadata": {},
            "prompts": [{"name": "a", "input": "1"}, {"name": "a", "input": "2"}]
        });
        let opts = LoadOptions::new().with_duplicate_names(DuplicateNamePolicy::Reject);
        assert!(matches!(
            validate_and_parse_with(input.clone(), &opts),
            Err(ParseError::DuplicatePromptName(_))
        ));
        assert_eq!(validate_and_parse(input).unwrap().len(), 1);
    }

    #[test]
    fn json_text_round_trip() {
        let config = validate_and_parse(raw()).unwrap();
        let text = to_json_string(&config).unwrap();
        let reloaded = from_json_str(&text, &LoadOptions::default()).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn yaml_text_round_trip() {
        let config = validate_and_parse(raw()).unwrap();
        let text = to_yaml_string(&config).unwrap();
        assert!(text.contains("name: travel"));

        let reloaded = from_yaml_str(&text, &LoadOptions::default()).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn malformed_input_reports_format() {
        assert!(matches!(
            from_json_str("{", &LoadOptions::default()),
            Err(ParseError::Json(_))
        ));
        assert!(matches!(
            from_yaml_str("name: [", &LoadOptions::default()),
            Err(ParseError::Yaml(_))
        ));
    }
}
