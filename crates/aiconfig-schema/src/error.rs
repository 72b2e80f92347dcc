//! Error types for schema values

/// Errors raised while validating or editing schema values
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The same tag appears more than once on a prompt
    #[error("duplicate tag: '{0}'")]
    DuplicateTag(String),

    /// A tag contains a comma
    #[error("tag '{0}' must not contain a comma")]
    TagContainsComma(String),

    /// A known metadata field rejected the supplied value
    #[error("invalid value for metadata field '{key}': {source}")]
    InvalidField {
        /// Field name
        key: String,
        /// Decoding failure
        #[source]
        source: serde_json::Error,
    },
}

impl SchemaError {
    /// Create an invalid-field error
    pub fn invalid_field(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::InvalidField {
            key: key.into(),
            source,
        }
    }
}
