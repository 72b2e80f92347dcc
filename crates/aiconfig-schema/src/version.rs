//! Document version markers
//!
//! A document carries either a structured `{major, minor}` version or one of
//! the literal tags `"v1"` / `"latest"`. Exactly one form is present.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Structured schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
}

impl SchemaVersion {
    /// Create a structured version
    #[inline]
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

/// Literal version tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionTag {
    /// First published schema
    V1,
    /// Whatever the reader considers current
    Latest,
}

impl VersionTag {
    /// Canonical string form
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::Latest => "latest",
        }
    }
}

/// Version carried by a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentVersion {
    /// Literal tag form
    Tag(VersionTag),
    /// Structured form
    Structured(SchemaVersion),
}

impl DocumentVersion {
    /// The `"latest"` tag
    pub const LATEST: Self = Self::Tag(VersionTag::Latest);

    /// Structured version, if this is one
    #[inline]
    #[must_use]
    pub fn structured(&self) -> Option<SchemaVersion> {
        match self {
            Self::Structured(v) => Some(*v),
            Self::Tag(_) => None,
        }
    }
}

impl Default for DocumentVersion {
    fn default() -> Self {
        Self::LATEST
    }
}

impl From<SchemaVersion> for DocumentVersion {
    fn from(v: SchemaVersion) -> Self {
        Self::Structured(v)
    }
}

impl From<VersionTag> for DocumentVersion {
    fn from(tag: VersionTag) -> Self {
        Self::Tag(tag)
    }
}

impl Display for DocumentVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => f.write_str(tag.as_str()),
            Self::Structured(v) => write!(f, "{}.{}", v.major, v.minor),
        }
    }
}

/// Error parsing a version string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported schema version: {0}")]
pub struct VersionParseError(pub String);

impl FromStr for DocumentVersion {
    type Err = VersionParseError;

    /// Parse `"v1"`, `"latest"` or `"<major>.<minor>"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1" => return Ok(Self::Tag(VersionTag::V1)),
            "latest" => return Ok(Self::LATEST),
            _ => {}
        }

        let (major, minor) = s
            .split_once('.')
            .ok_or_else(|| VersionParseError(s.to_string()))?;
        let major = major.parse().map_err(|_| VersionParseError(s.to_string()))?;
        let minor = minor.parse().map_err(|_| VersionParseError(s.to_string()))?;
        Ok(Self::Structured(SchemaVersion::new(major, minor)))
    }
}
