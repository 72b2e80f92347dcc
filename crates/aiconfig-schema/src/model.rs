//! Model bindings
//!
//! A prompt names its model either with a bare string or with a
//! [`ModelMetadata`] object that also carries inference settings.

use serde::{Deserialize, Serialize};

use crate::InferenceSettings;

/// Model identity plus the inference settings that apply to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model ID
    pub name: String,

    /// Inference settings: `None` when the key is absent, `Some(None)` for
    /// an explicit `null`
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub settings: Option<Option<InferenceSettings>>,
}

impl ModelMetadata {
    /// Create a binding without settings
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: None,
        }
    }

    /// With inference settings
    #[inline]
    #[must_use]
    pub fn with_settings(mut self, settings: InferenceSettings) -> Self {
        self.settings = Some(Some(settings));
        self
    }

    /// Inference settings, if set to a mapping
    #[inline]
    #[must_use]
    pub fn settings(&self) -> Option<&InferenceSettings> {
        self.settings.as_ref().and_then(Option::as_ref)
    }
}

/// How a prompt refers to its model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelBinding {
    /// Bare model name
    Name(String),
    /// Name plus settings
    Metadata(ModelMetadata),
}

impl ModelBinding {
    /// Model name regardless of form
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Metadata(meta) => &meta.name,
        }
    }

    /// Settings, only present on the structured form
    #[inline]
    #[must_use]
    pub fn settings(&self) -> Option<&InferenceSettings> {
        match self {
            Self::Name(_) => None,
            Self::Metadata(meta) => meta.settings(),
        }
    }
}

impl From<&str> for ModelBinding {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ModelBinding {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<ModelMetadata> for ModelBinding {
    fn from(meta: ModelMetadata) -> Self {
        Self::Metadata(meta)
    }
}
