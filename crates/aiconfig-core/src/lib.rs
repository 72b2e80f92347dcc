//! AIConfig Core
//!
//! In-memory AIConfig documents with layered configuration.
//!
//! # Overview
//!
//! - **AIConfig**: the document aggregate; owns the ordered prompt sequence
//!   and the name index derived from it
//! - **PromptIndex**: name to position lookup, kept in step with every mutation
//! - **Scope resolution**: effective model name, parameters and global settings
//!   for a prompt or for the whole document
//! - **Mutation engine**: add/update/delete of prompts, models, parameters,
//!   metadata and outputs, each either fully applied or rejected
//! - **Codec**: JSON/YAML load and store, lossless for unknown keys
//!
//! # Example
//!
//! ```rust
//! use aiconfig_core::AIConfig;
//! use aiconfig_schema::{ModelBinding, Prompt, PromptMetadata};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), aiconfig_core::AIConfigError> {
//! let mut config = AIConfig::new("travel");
//! config.set_default_model(Some("gpt-3.5-turbo"));
//! config.set_parameter("city", json!("Paris"), None)?;
//!
//! config.add_prompt("plan", Prompt::new("plan", "Plan a trip to {{city}}"), None)?;
//! config.add_prompt(
//!     "review",
//!     Prompt::new("review", "Review the plan")
//!         .with_metadata(PromptMetadata::new().with_model(ModelBinding::from("gpt-4"))),
//!     None,
//! )?;
//!
//! assert_eq!(config.get_model_name("plan")?, "gpt-3.5-turbo");
//! assert_eq!(config.get_model_name("review")?, "gpt-4");
//! assert_eq!(config.get_parameters(Some("plan"))?.get("city"), Some(&json!("Paris")));
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod mutation;
pub mod resolve;
pub mod scope;
pub mod settings;

// Re-exports
pub use codec::{
    from_json_str, from_yaml_str, to_json_string, to_raw, to_yaml_string, validate_and_parse,
    validate_and_parse_with,
};
pub use config::{DuplicateNamePolicy, LoadOptions};
pub use document::{AIConfig, AIConfigRecord};
pub use error::{AIConfigError, AIConfigResult, ParseError};
pub use index::PromptIndex;
pub use mutation::Advisory;
pub use scope::Scope;
pub use settings::{GlobalDiffResolver, OverrideSettingsResolver};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with AIConfig documents
    pub use crate::{
        AIConfig, AIConfigError, AIConfigResult, Advisory, LoadOptions, OverrideSettingsResolver,
        Scope,
    };
    pub use aiconfig_schema::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
