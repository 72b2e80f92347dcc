//! AIConfig Schema
//!
//! Value types for AIConfig documents and their serialized shape.
//!
//! # Overview
//!
//! The schema provides:
//! - **Prompt**: a named model input with optional metadata and recorded outputs
//! - **PromptMetadata / ConfigMetadata**: per-prompt and document-level settings,
//!   open to unknown keys via an extension map
//! - **ModelBinding**: a model referenced by name or by name plus settings
//! - **Output**: tagged union of execute results and errors
//! - **DocumentVersion**: structured `{major, minor}` version or a literal tag
//!
//! The types carry no document-level behavior. Index maintenance, scope
//! resolution and mutation live in `aiconfig-core`.
//!
//! # Example
//!
//! ```rust
//! use aiconfig_schema::{ModelBinding, Prompt, PromptMetadata};
//!
//! let prompt = Prompt::new("greet", "Say hello to {{name}}")
//!     .with_metadata(PromptMetadata::new().with_model(ModelBinding::from("gpt-4")));
//!
//! assert_eq!(prompt.model_binding().map(ModelBinding::name), Some("gpt-4"));
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod input;
pub mod metadata;
pub mod model;
pub mod output;
pub mod prompt;
pub mod version;

// Re-exports
pub use error::SchemaError;
pub use input::{Attachment, PromptInput, PromptInputData};
pub use metadata::{validate_tags, ConfigMetadata, MetadataFields, PromptMetadata};
pub use model::{ModelBinding, ModelMetadata};
pub use output::{
    ErrorOutput, ExecuteResult, FunctionCallData, Output, OutputData, OutputDataWithValue,
    ToolCallData, ToolCallKind,
};
pub use prompt::Prompt;
pub use version::{DocumentVersion, SchemaVersion, VersionParseError, VersionTag};

/// A JSON object with string keys
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Settings for model inference, as a JSON object
pub type InferenceSettings = JsonObject;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building AIConfig values
    pub use crate::{
        Attachment, ConfigMetadata, DocumentVersion, InferenceSettings, JsonObject,
        MetadataFields, ModelBinding, ModelMetadata, Output, OutputData, Prompt, PromptInput,
        PromptMetadata,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
