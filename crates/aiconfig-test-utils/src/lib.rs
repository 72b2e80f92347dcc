//! Testing utilities for AIConfig workspace
//!
//! Shared test helpers, fixtures, and assertions.

#![allow(missing_docs)]

use aiconfig_core::{validate_and_parse, AIConfig};
use aiconfig_schema::{JsonObject, ModelBinding, ModelMetadata, Output, Prompt, PromptMetadata};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

/// Raw document with a string-bound prompt, a structured-bound prompt, one
/// output of each kind and unknown keys at every open level
pub fn sample_raw() -> Value {
    json!({
        "name": "NYC Trip Planner",
        "schema_version": "latest",
        "metadata": {
            "parameters": {"city": "New York"},
            "models": {
                "gpt-3.5-turbo": {"model": "gpt-3.5-turbo", "temperature": 1, "top_p": 1},
                "gpt-4": {"model": "gpt-4", "max_tokens": 3000}
            },
            "default_model": "gpt-3.5-turbo",
            "model_parsers": {"gpt-4": "OpenAIChatModelParser"},
            "env": "test"
        },
        "description": "Intrepid explorer with ChatGPT and AIConfig",
        "prompts": [
            {
                "name": "get_activities",
                "input": "Tell me 10 fun attractions to do in {{city}}",
                "metadata": {"model": "gpt-3.5-turbo", "tags": ["travel"]},
                "outputs": [
                    {
                        "output_type": "execute_result",
                        "execution_count": 0,
                        "data": "1. Central Park",
                        "metadata": {"role": "assistant"}
                    }
                ]
            },
            {
                "name": "gen_itinerary",
                "input": {"data": "Generate an itinerary ordered by {{order_by}}", "attachments": []},
                "metadata": {
                    "model": {"name": "gpt-4", "settings": {"max_tokens": 3000}},
                    "parameters": {"order_by": "geographic location"},
                    "remember_chat_context": true
                },
                "outputs": [
                    {
                        "output_type": "error",
                        "ename": "RateLimitError",
                        "evalue": "quota exceeded",
                        "traceback": ["line 1", "line 2"]
                    }
                ],
                "source": "planner"
            }
        ],
        "$schema": "https://json.schemastore.org/aiconfig-1.0"
    })
}

/// [`sample_raw`] loaded with default options
pub fn sample_document() -> AIConfig {
    validate_and_parse(sample_raw()).unwrap()
}

pub fn text_prompt(name: &str, text: &str) -> Prompt {
    Prompt::new(name, text)
}

pub fn prompt_with_model(name: &str, binding: impl Into<ModelBinding>) -> Prompt {
    Prompt::new(name, format!("input for {name}"))
        .with_metadata(PromptMetadata::new().with_model(binding))
}

pub fn structured_model(name: &str, settings: Value) -> ModelMetadata {
    ModelMetadata::new(name).with_settings(object(settings))
}

pub fn text_output(text: &str) -> Output {
    Output::execute_result(text)
}

pub fn error_output(message: &str) -> Output {
    Output::error("Error", message, Vec::new())
}

/// Unwrap a `json!` object literal
pub fn object(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Install a test-writer subscriber once per process; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Assert the prompt index names exactly the prompts in the sequence and
/// resolves each name to the stored prompt itself
pub fn assert_index_consistent(config: &AIConfig) {
    assert_eq!(
        config.prompt_index().len(),
        config.len(),
        "index and sequence differ in size"
    );
    for prompt in config.prompts() {
        let found = config
            .get_prompt(&prompt.name)
            .unwrap_or_else(|e| panic!("prompt '{}' missing from index: {e}", prompt.name));
        assert!(
            std::ptr::eq(found, prompt),
            "index entry for '{}' points at a different prompt",
            prompt.name
        );
    }
    assert!(config.is_index_consistent());
}
