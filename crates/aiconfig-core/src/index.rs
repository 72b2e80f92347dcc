//! Prompt name index
//!
//! Provides [`PromptIndex`], a name to position map over a document's ordered
//! prompt sequence. The sequence is the source of truth; the index is derived
//! from it and is only ever changed as part of changing the sequence.

use std::collections::HashMap;

use aiconfig_schema::Prompt;

/// Name to position lookup over an ordered prompt sequence
///
/// Holds positions rather than copies, so a lookup always yields the prompt
/// stored in the sequence itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptIndex {
    positions: HashMap<String, usize>,
}

impl PromptIndex {
    /// Create empty index
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            positions: HashMap::new(),
        }
    }

    /// Build a fresh index from a prompt sequence
    ///
    /// On a repeated name the last occurrence keeps the key.
    #[must_use]
    pub fn rebuild(prompts: &[Prompt]) -> Self {
        let mut positions = HashMap::with_capacity(prompts.len());
        for (pos, prompt) in prompts.iter().enumerate() {
            positions.insert(prompt.name.clone(), pos);
        }
        Self { positions }
    }

    /// Position of a prompt in the sequence
    #[inline]
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Look up a prompt by name in the sequence this index was built over
    #[must_use]
    pub fn lookup<'a>(&self, prompts: &'a [Prompt], name: &str) -> Option<&'a Prompt> {
        let prompt = prompts.get(self.position(name)?)?;
        debug_assert_eq!(prompt.name, name, "prompt index out of step with sequence");
        Some(prompt)
    }

    /// Check if a name is in use
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Number of indexed names
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if index is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Indexed names, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.positions.keys().map(String::as_str)
    }

    /// Check that the index has exactly one entry per prompt, each pointing
    /// at the prompt carrying that name
    #[must_use]
    pub fn is_consistent_with(&self, prompts: &[Prompt]) -> bool {
        self.positions.len() == prompts.len()
            && prompts
                .iter()
                .enumerate()
                .all(|(pos, prompt)| self.position(&prompt.name) == Some(pos))
    }

    /// Move the entry for `old` to `new`, keeping its position
    ///
    /// Returns `false` if `old` was not indexed.
    pub(crate) fn rename(&mut self, old: &str, new: &str) -> bool {
        match self.positions.remove(old) {
            Some(pos) => {
                self.positions.insert(new.to_string(), pos);
                true
            }
            None => false,
        }
    }
}
