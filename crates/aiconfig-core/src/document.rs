//! The AIConfig document aggregate
//!
//! [`AIConfig`] exclusively owns its prompts and metadata. Reads go through
//! accessors and the resolvers in [`crate::resolve`]; writes go through the
//! operations in [`crate::mutation`], which keep the prompt sequence and the
//! [`PromptIndex`] in step.

use std::collections::HashSet;

use aiconfig_schema::{ConfigMetadata, DocumentVersion, JsonObject, Prompt};
use serde::{Deserialize, Serialize};

use crate::config::{DuplicateNamePolicy, LoadOptions};
use crate::error::{AIConfigError, AIConfigResult, ParseError};
use crate::index::PromptIndex;

/// Key under which older writers stored the derived index; never kept
const PROMPT_INDEX_KEY: &str = "prompt_index";

/// Raw document fields, before indexing and validation
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AIConfigRecord {
    /// Friendly name
    pub name: String,

    /// Schema version; `"latest"` when absent
    #[serde(default)]
    pub schema_version: DocumentVersion,

    /// Document-level metadata
    pub metadata: ConfigMetadata,

    /// Description, used for routing between documents
    #[serde(default)]
    pub description: Option<String>,

    /// Prompts in document order
    #[serde(default)]
    pub prompts: Vec<Prompt>,

    /// Unknown keys
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// An AIConfig document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AIConfigRecord")]
pub struct AIConfig {
    pub(crate) name: String,

    pub(crate) schema_version: DocumentVersion,

    pub(crate) metadata: ConfigMetadata,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,

    pub(crate) prompts: Vec<Prompt>,

    #[serde(flatten)]
    pub(crate) extra: JsonObject,

    #[serde(skip)]
    pub(crate) prompt_index: PromptIndex,

    #[serde(skip)]
    pub(crate) options: LoadOptions,
}

impl AIConfig {
    /// Create an empty document
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema_version: DocumentVersion::default(),
            metadata: ConfigMetadata::default(),
            description: None,
            prompts: Vec::new(),
            extra: JsonObject::new(),
            prompt_index: PromptIndex::new(),
            options: LoadOptions::default(),
        }
    }

    /// Build a document from its raw fields
    ///
    /// Duplicate prompt names are handled per `options.duplicate_names`, tags
    /// are checked when `options.validate_tags` is set, and the prompt index is
    /// built once from the resulting sequence.
    ///
    /// # Errors
    /// Returns [`ParseError::DuplicatePromptName`] under the `Reject` policy and
    /// [`ParseError::Schema`] for tag violations.
    pub fn from_record(record: AIConfigRecord, options: &LoadOptions) -> Result<Self, ParseError> {
        let AIConfigRecord {
            name,
            schema_version,
            metadata,
            description,
            prompts,
            mut extra,
        } = record;
        extra.remove(PROMPT_INDEX_KEY);

        let prompts = dedupe_prompts(prompts, options.duplicate_names)?;
        if options.validate_tags {
            for metadata in prompts.iter().filter_map(|p| p.metadata.as_ref()) {
                metadata.validate()?;
            }
        }

        let prompt_index = PromptIndex::rebuild(&prompts);
        tracing::debug!(document = %name, prompts = prompts.len(), "loaded AIConfig");

        Ok(Self {
            name,
            schema_version,
            metadata,
            description,
            prompts,
            extra,
            prompt_index,
            options: options.clone(),
        })
    }

    /// With load options (affects later tag checks)
    #[inline]
    #[must_use]
    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    /// With document metadata
    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, metadata: ConfigMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Document name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the document
    #[inline]
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Document description
    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Set the description
    #[inline]
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// Schema version
    #[inline]
    #[must_use]
    pub fn schema_version(&self) -> DocumentVersion {
        self.schema_version
    }

    /// Document-level metadata
    #[inline]
    #[must_use]
    pub fn metadata(&self) -> &ConfigMetadata {
        &self.metadata
    }

    /// Unknown top-level keys
    #[inline]
    #[must_use]
    pub fn extra(&self) -> &JsonObject {
        &self.extra
    }

    /// Load options in effect
    #[inline]
    #[must_use]
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Prompts in document order
    #[inline]
    #[must_use]
    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    /// Prompt names in document order
    pub fn prompt_names(&self) -> impl Iterator<Item = &str> {
        self.prompts.iter().map(|p| p.name.as_str())
    }

    /// The derived name index
    #[inline]
    #[must_use]
    pub fn prompt_index(&self) -> &PromptIndex {
        &self.prompt_index
    }

    /// Number of prompts
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    /// Check if the document has no prompts
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Check if a prompt name is in use
    #[inline]
    #[must_use]
    pub fn contains_prompt(&self, name: &str) -> bool {
        self.prompt_index.contains(name)
    }

    /// Look up a prompt by name
    ///
    /// # Errors
    /// Returns [`AIConfigError::PromptNotFound`] if no prompt has that name.
    pub fn get_prompt(&self, name: &str) -> AIConfigResult<&Prompt> {
        self.prompt_index
            .lookup(&self.prompts, name)
            .ok_or_else(|| self.prompt_not_found(name))
    }

    /// Check that the index matches the prompt sequence exactly
    #[inline]
    #[must_use]
    pub fn is_index_consistent(&self) -> bool {
        self.prompt_index.is_consistent_with(&self.prompts)
    }

    /// Re-check name uniqueness and, if enabled, tag constraints
    ///
    /// # Errors
    /// Returns [`AIConfigError::PromptAlreadyExists`] for a repeated name or
    /// [`AIConfigError::Schema`] for a tag violation.
    pub fn validate(&self) -> AIConfigResult<()> {
        let mut seen = HashSet::with_capacity(self.prompts.len());
        for prompt in &self.prompts {
            if !seen.insert(prompt.name.as_str()) {
                return Err(AIConfigError::PromptAlreadyExists(prompt.name.clone()));
            }
            if self.options.validate_tags {
                if let Some(metadata) = &prompt.metadata {
                    metadata.validate()?;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn prompt_not_found(&self, name: &str) -> AIConfigError {
        AIConfigError::prompt_not_found(name, self.prompt_names())
    }

    pub(crate) fn prompt_mut(&mut self, name: &str) -> AIConfigResult<&mut Prompt> {
        match self.prompt_index.position(name) {
            Some(pos) => Ok(&mut self.prompts[pos]),
            None => Err(self.prompt_not_found(name)),
        }
    }

    pub(crate) fn ensure_prompt(&self, name: Option<&str>) -> AIConfigResult<()> {
        match name {
            Some(name) if !self.prompt_index.contains(name) => Err(self.prompt_not_found(name)),
            _ => Ok(()),
        }
    }

    pub(crate) fn reindex(&mut self) {
        self.prompt_index = PromptIndex::rebuild(&self.prompts);
    }
}

impl TryFrom<AIConfigRecord> for AIConfig {
    type Error = ParseError;

    fn try_from(record: AIConfigRecord) -> Result<Self, Self::Error> {
        Self::from_record(record, &LoadOptions::default())
    }
}

fn dedupe_prompts(
    prompts: Vec<Prompt>,
    policy: DuplicateNamePolicy,
) -> Result<Vec<Prompt>, ParseError> {
    let mut seen = HashSet::with_capacity(prompts.len());
    let mut keep = |prompt: &Prompt| {
        let fresh = seen.insert(prompt.name.clone());
        if !fresh {
            tracing::warn!(prompt = %prompt.name, ?policy, "dropping prompt with duplicate name");
        }
        fresh
    };

    match policy {
        DuplicateNamePolicy::Reject => {
            let mut names = HashSet::with_capacity(prompts.len());
            if let Some(dup) = prompts.iter().find(|p| !names.insert(p.name.as_str())) {
                return Err(ParseError::DuplicatePromptName(dup.name.clone()));
            }
            Ok(prompts)
        }
        DuplicateNamePolicy::FirstWins => Ok(prompts.into_iter().filter(|p| keep(p)).collect()),
        DuplicateNamePolicy::LastWins => {
            let mut kept: Vec<Prompt> = prompts.into_iter().rev().filter(|p| keep(p)).collect();
            kept.reverse();
            Ok(kept)
        }
    }
}
