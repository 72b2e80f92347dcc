//! Prompt inputs
//!
//! A prompt input is either plain text or a structured object carrying
//! attachments (images, audio, ...) and free-form data.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::JsonObject;

/// Non-text input passed alongside a prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Attachment payload
    pub data: Value,

    /// MIME type; plain text when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Attachment metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonObject>,
}

impl Attachment {
    /// Create an attachment
    #[inline]
    #[must_use]
    pub fn new(data: impl Into<Value>) -> Self {
        Self {
            data: data.into(),
            mime_type: None,
            metadata: None,
        }
    }

    /// With MIME type
    #[inline]
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Structured prompt input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptInputData {
    /// Attachments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,

    /// Free-form data for the prompt as a whole
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Unknown keys, preserved as-is
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Input of a prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PromptInput {
    /// Plain prompt text
    Text(String),
    /// Structured input
    Structured(PromptInputData),
}

impl PromptInput {
    /// Text of the input: the string itself, or `data` when it is a string
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Structured(input) => input.data.as_ref().and_then(Value::as_str),
        }
    }

    /// Attachments; empty for text input
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        match self {
            Self::Text(_) => &[],
            Self::Structured(input) => input.attachments.as_deref().unwrap_or_default(),
        }
    }
}

impl From<&str> for PromptInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for PromptInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<PromptInputData> for PromptInput {
    fn from(input: PromptInputData) -> Self {
        Self::Structured(input)
    }
}
