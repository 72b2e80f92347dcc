//! Resolution scopes

use std::fmt::{self, Display, Formatter};

/// Where a parameter, setting or metadata key lives
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Document-level metadata
    Global,
    /// Metadata of the named prompt
    Prompt(String),
}

impl Scope {
    /// Scope for an optional prompt name
    #[inline]
    #[must_use]
    pub fn from_prompt(prompt_name: Option<&str>) -> Self {
        prompt_name.map_or(Self::Global, |name| Self::Prompt(name.to_string()))
    }

    /// Prompt name, if prompt-scoped
    #[inline]
    #[must_use]
    pub fn prompt_name(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::Prompt(name) => Some(name),
        }
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("AIConfig-scoped metadata"),
            Self::Prompt(name) => write!(f, "prompt '{name}'"),
        }
    }
}
