//! Load-time configuration
//!
//! Options are passed explicitly by the caller; nothing here reads the
//! environment.

use serde::{Deserialize, Serialize};

/// What to do when a loaded document repeats a prompt name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateNamePolicy {
    /// Keep the first prompt with a given name, drop later ones
    FirstWins,
    /// Keep the last prompt with a given name, drop earlier ones
    #[default]
    LastWins,
    /// Fail the load
    Reject,
}

/// Options applied when a document is built from its raw form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Duplicate prompt name handling
    pub duplicate_names: DuplicateNamePolicy,
    /// Enforce tag constraints on load and on `set_metadata("tags", ..)`
    pub validate_tags: bool,
}

impl LoadOptions {
    /// Create default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With duplicate name policy
    #[inline]
    #[must_use]
    pub fn with_duplicate_names(mut self, policy: DuplicateNamePolicy) -> Self {
        self.duplicate_names = policy;
        self
    }

    /// With tag validation on or off
    #[inline]
    #[must_use]
    pub fn with_tag_validation(mut self, enabled: bool) -> Self {
        self.validate_tags = enabled;
        self
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            duplicate_names: DuplicateNamePolicy::LastWins,
            validate_tags: true,
        }
    }
}
