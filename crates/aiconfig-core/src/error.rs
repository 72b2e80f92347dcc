//! Error types for AIConfig Core
//!
//! Provides error handling for:
//! - Lookups of prompts, models, parameters and metadata keys
//! - Creation conflicts
//! - Caller contract violations in mutation operations
//! - Loading and storing documents

use aiconfig_schema::SchemaError;

use crate::scope::Scope;

/// Result alias for document operations
pub type AIConfigResult<T> = Result<T, AIConfigError>;

/// Errors from document queries and mutations
///
/// Every failure is detected before the document is touched, so an `Err`
/// always means the document is unchanged.
#[derive(Debug, thiserror::Error)]
pub enum AIConfigError {
    /// Prompt name not in the index
    #[error("prompt '{name}' not found in config, available prompts are: {available:?}")]
    PromptNotFound {
        /// Requested name
        name: String,
        /// Names currently in use
        available: Vec<String>,
    },

    /// Prompt name already taken
    #[error("prompt with name '{0}' already exists, use `update_prompt()`")]
    PromptAlreadyExists(String),

    /// Model not registered in document metadata
    #[error("model '{0}' does not exist")]
    ModelNotFound(String),

    /// Model already registered in document metadata
    #[error("model '{0}' already exists, use `update_model()`")]
    ModelAlreadyExists(String),

    /// Parameter not present in the target scope
    #[error("parameter '{name}' does not exist for {scope}")]
    ParameterNotFound {
        /// Parameter name
        name: String,
        /// Scope searched
        scope: Scope,
    },

    /// Target scope has no parameter mapping to update
    #[error("{0} has no parameters to update, use `set_parameter()`")]
    MissingParameters(Scope),

    /// Metadata key not present in the target scope
    #[error("metadata '{key}' does not exist for {scope}")]
    MetadataNotFound {
        /// Metadata key
        key: String,
        /// Scope searched
        scope: Scope,
    },

    /// Prompt names no model and the document has no default
    #[error("no default model specified in AIConfig metadata, prompt '{0}' does not specify a model")]
    NoDefaultModel(String),

    /// Prompt has no model binding whose settings could be updated
    #[error("cannot update model settings for prompt '{0}': no model is set for it, call `update_model()` with a model name first")]
    MissingModelBinding(String),

    /// Caller passed an unusable combination of arguments
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// A single argument is empty or otherwise unusable
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Schema-level validation failed
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl AIConfigError {
    /// Create a prompt-not-found error listing the available names
    pub fn prompt_not_found<'a>(
        name: impl Into<String>,
        available: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self::PromptNotFound {
            name: name.into(),
            available: available.into_iter().map(str::to_string).collect(),
        }
    }

    /// Check if a referenced entity was missing
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PromptNotFound { .. }
                | Self::ModelNotFound(_)
                | Self::ParameterNotFound { .. }
                | Self::MetadataNotFound { .. }
        )
    }

    /// Check if a creation collided with an existing entity
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::PromptAlreadyExists(_) | Self::ModelAlreadyExists(_))
    }
}

/// Errors while loading or storing documents
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// JSON could not be read or written
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML could not be read or written
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Two prompts share a name and the load policy rejects duplicates
    #[error("duplicate prompt name: '{0}'")]
    DuplicatePromptName(String),

    /// Schema-level validation failed
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}
