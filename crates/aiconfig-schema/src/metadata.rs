//! Prompt-level and document-level metadata
//!
//! Both metadata records have a fixed set of known fields plus an `extra`
//! map that preserves any unknown keys. [`MetadataFields`] gives key-based
//! access over that combined shape: a key naming a known field reads or
//! writes the typed field, any other key goes to `extra`.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;
use crate::model::ModelBinding;
use crate::{InferenceSettings, JsonObject};

/// Key-based access to a metadata record
pub trait MetadataFields {
    /// Read a field as JSON; `None` if unset
    fn get_field(&self, key: &str) -> Option<Value>;

    /// Write a field. `null` clears a known field.
    ///
    /// # Errors
    /// Returns [`SchemaError::InvalidField`] if a known field cannot hold `value`.
    /// The record is unchanged on error.
    fn set_field(&mut self, key: &str, value: Value) -> Result<(), SchemaError>;

    /// Clear a field; returns `false` if it was not set
    fn remove_field(&mut self, key: &str) -> bool;

    /// Check whether a field is set
    #[inline]
    fn has_field(&self, key: &str) -> bool {
        self.get_field(key).is_some()
    }
}

/// Check tag constraints: pairwise unique, no commas
///
/// # Errors
/// Returns the first violation found, in tag order.
pub fn validate_tags(tags: &[String]) -> Result<(), SchemaError> {
    let mut seen = HashSet::with_capacity(tags.len());
    for tag in tags {
        if tag.contains(',') {
            return Err(SchemaError::TagContainsComma(tag.clone()));
        }
        if !seen.insert(tag.as_str()) {
            return Err(SchemaError::DuplicateTag(tag.clone()));
        }
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(key: &str, value: Value) -> Result<T, SchemaError> {
    serde_json::from_value(value).map_err(|e| SchemaError::invalid_field(key, e))
}

fn encode<T: Serialize>(field: Option<&T>) -> Option<Value> {
    field.and_then(|v| serde_json::to_value(v).ok())
}

/// Metadata attached to a single prompt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptMetadata {
    /// Model used by this prompt; overrides the document default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelBinding>,

    /// Tags; unique and comma-free
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Prompt-local parameters; shadow the global ones entirely when non-empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<JsonObject>,

    /// Unknown keys, preserved as-is
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl PromptMetadata {
    /// Known field name: `model`
    pub const MODEL: &'static str = "model";
    /// Known field name: `tags`
    pub const TAGS: &'static str = "tags";
    /// Known field name: `parameters`
    pub const PARAMETERS: &'static str = "parameters";

    /// Create empty metadata
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With model binding
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<ModelBinding>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// With tags
    #[inline]
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// With parameters
    #[inline]
    #[must_use]
    pub fn with_parameters(mut self, parameters: JsonObject) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Validate tags, if any
    ///
    /// # Errors
    /// Returns the first tag violation.
    pub fn validate(&self) -> Result<(), SchemaError> {
        self.tags.as_deref().map_or(Ok(()), validate_tags)
    }
}

impl MetadataFields for PromptMetadata {
    fn get_field(&self, key: &str) -> Option<Value> {
        match key {
            Self::MODEL => encode(self.model.as_ref()),
            Self::TAGS => encode(self.tags.as_ref()),
            Self::PARAMETERS => self.parameters.clone().map(Value::Object),
            _ => self.extra.get(key).cloned(),
        }
    }

    fn set_field(&mut self, key: &str, value: Value) -> Result<(), SchemaError> {
        match key {
            Self::MODEL => self.model = decode(key, value)?,
            Self::TAGS => self.tags = decode(key, value)?,
            Self::PARAMETERS => self.parameters = decode(key, value)?,
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
        Ok(())
    }

    fn remove_field(&mut self, key: &str) -> bool {
        match key {
            Self::MODEL => self.model.take().is_some(),
            Self::TAGS => self.tags.take().is_some(),
            Self::PARAMETERS => self.parameters.take().is_some(),
            _ => self.extra.shift_remove(key).is_some(),
        }
    }
}

/// Document-level metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Global parameters, visible to prompts without local parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<JsonObject>,

    /// Global settings per model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<IndexMap<String, InferenceSettings>>,

    /// Model used by prompts that name none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,

    /// Model ID to model parser ID; a `null` value marks a cleared parser
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_parsers: Option<IndexMap<String, Option<String>>>,

    /// Unknown keys, preserved as-is
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl ConfigMetadata {
    /// Known field name: `parameters`
    pub const PARAMETERS: &'static str = "parameters";
    /// Known field name: `models`
    pub const MODELS: &'static str = "models";
    /// Known field name: `default_model`
    pub const DEFAULT_MODEL: &'static str = "default_model";
    /// Known field name: `model_parsers`
    pub const MODEL_PARSERS: &'static str = "model_parsers";

    /// Create empty metadata
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With global parameters
    #[inline]
    #[must_use]
    pub fn with_parameters(mut self, parameters: JsonObject) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// With a registered model
    #[must_use]
    pub fn with_model(mut self, name: impl Into<String>, settings: InferenceSettings) -> Self {
        self.models
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), settings);
        self
    }

    /// With default model
    #[inline]
    #[must_use]
    pub fn with_default_model(mut self, name: impl Into<String>) -> Self {
        self.default_model = Some(name.into());
        self
    }
}

impl MetadataFields for ConfigMetadata {
    fn get_field(&self, key: &str) -> Option<Value> {
        match key {
            Self::PARAMETERS => self.parameters.clone().map(Value::Object),
            Self::MODELS => encode(self.models.as_ref()),
            Self::DEFAULT_MODEL => self.default_model.clone().map(Value::String),
            Self::MODEL_PARSERS => encode(self.model_parsers.as_ref()),
            _ => self.extra.get(key).cloned(),
        }
    }

    fn set_field(&mut self, key: &str, value: Value) -> Result<(), SchemaError> {
        match key {
            Self::PARAMETERS => self.parameters = decode(key, value)?,
            Self::MODELS => self.models = decode(key, value)?,
            Self::DEFAULT_MODEL => self.default_model = decode(key, value)?,
            Self::MODEL_PARSERS => self.model_parsers = decode(key, value)?,
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
        Ok(())
    }

    fn remove_field(&mut self, key: &str) -> bool {
        match key {
            Self::PARAMETERS => self.parameters.take().is_some(),
            Self::MODELS => self.models.take().is_some(),
            Self::DEFAULT_MODEL => self.default_model.take().is_some(),
            Self::MODEL_PARSERS => self.model_parsers.take().is_some(),
            _ => self.extra.shift_remove(key).is_some(),
        }
    }
}
