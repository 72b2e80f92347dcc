//! Prompt records

use serde::{Deserialize, Serialize};

use crate::input::PromptInput;
use crate::metadata::PromptMetadata;
use crate::model::ModelBinding;
use crate::output::Output;
use crate::JsonObject;

/// A named unit of model input with optional metadata and recorded outputs
///
/// The name is unique within a document. Documents own their prompts; code
/// outside `aiconfig-core` only ever sees them by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    /// Unique name within the document
    pub name: String,

    /// Prompt text or structured input
    pub input: PromptInput,

    /// Prompt metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PromptMetadata>,

    /// Recorded outputs, oldest first; `None` when the key is absent, so an
    /// explicit empty list is written back as `[]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<Output>>,

    /// Unknown keys, preserved as-is
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl Prompt {
    /// Create a prompt without metadata or outputs
    #[must_use]
    pub fn new(name: impl Into<String>, input: impl Into<PromptInput>) -> Self {
        Self {
            name: name.into(),
            input: input.into(),
            metadata: None,
            outputs: None,
            extra: JsonObject::new(),
        }
    }

    /// With metadata
    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, metadata: PromptMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// With outputs
    #[inline]
    #[must_use]
    pub fn with_outputs(mut self, outputs: Vec<Output>) -> Self {
        self.outputs = Some(outputs);
        self
    }

    /// Recorded outputs, oldest first
    #[inline]
    #[must_use]
    pub fn outputs(&self) -> &[Output] {
        self.outputs.as_deref().unwrap_or_default()
    }

    /// Output list for editing, created empty if absent
    #[inline]
    pub fn outputs_mut(&mut self) -> &mut Vec<Output> {
        self.outputs.get_or_insert_with(Vec::new)
    }

    /// Replace the outputs with an empty list and return the previous ones
    pub fn take_outputs(&mut self) -> Vec<Output> {
        self.outputs.replace(Vec::new()).unwrap_or_default()
    }

    /// Append an output
    #[inline]
    pub fn add_output(&mut self, output: Output) {
        self.outputs_mut().push(output);
    }

    /// Model binding from metadata, if set
    #[inline]
    #[must_use]
    pub fn model_binding(&self) -> Option<&ModelBinding> {
        self.metadata.as_ref().and_then(|m| m.model.as_ref())
    }

    /// Prompt-local parameters, exactly as stored
    #[inline]
    #[must_use]
    pub fn local_parameters(&self) -> Option<&JsonObject> {
        self.metadata.as_ref().and_then(|m| m.parameters.as_ref())
    }

    /// Raw prompt text, before any parameter substitution
    #[inline]
    #[must_use]
    pub fn raw_prompt_text(&self) -> Option<&str> {
        self.input.text()
    }

    /// Most recent output
    #[inline]
    #[must_use]
    pub fn latest_output(&self) -> Option<&Output> {
        self.outputs().last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelMetadata;
    use serde_json::json;

    #[test]
    fn minimal_prompt_shape() {
        let prompt = Prompt::new("p1", "Hello");
        assert_eq!(
            serde_json::to_value(&prompt).unwrap(),
            json!({"name": "p1", "input": "Hello"})
        );
    }

    #[test]
    fn model_binding_through_metadata() {
        let prompt = Prompt::new("p1", "Hello").with_metadata(
            PromptMetadata::new().with_model(ModelMetadata::new("gpt-4")),
        );
        assert_eq!(prompt.model_binding().map(ModelBinding::name), Some("gpt-4"));
        assert!(Prompt::new("p2", "x").model_binding().is_none());
    }

    #[test]
    fn latest_output_is_last() {
        let mut prompt = Prompt::new("p1", "Hello");
        assert!(prompt.latest_output().is_none());

        prompt.add_output(Output::execute_result("one"));
        prompt.add_output(Output::execute_result("two"));
        assert_eq!(prompt.latest_output().and_then(Output::text), Some("two"));
    }

    #[test]
    fn unknown_prompt_keys_round_trip() {
        let raw = json!({
            "name": "p1",
            "input": {"data": "q", "attachments": []},
            "metadata": {"parameters": {"city": "Paris"}},
            "outputs": [{"output_type": "error", "ename": "E", "evalue": "v", "traceback": []}],
            "source_line": 12
        });
        let prompt: Prompt = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(prompt.extra.get("source_line"), Some(&json!(12)));
        assert_eq!(prompt.local_parameters().and_then(|p| p.get("city")), Some(&json!("Paris")));
        assert_eq!(serde_json::to_value(&prompt).unwrap(), raw);
    }

    #[test]
    fn empty_outputs_presence_round_trips() {
        let raw = json!({"name": "p", "input": "hi", "outputs": []});
        let prompt: Prompt = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(prompt.outputs, Some(Vec::new()));
        assert_eq!(serde_json::to_value(&prompt).unwrap(), raw);

        let bare: Prompt = serde_json::from_value(json!({"name": "p", "input": "hi"})).unwrap();
        assert!(bare.outputs.is_none());
        assert!(bare.outputs().is_empty());
    }

    #[test]
    fn take_outputs_leaves_empty_list() {
        let mut prompt = Prompt::new("p", "x");
        prompt.add_output(Output::execute_result("one"));

        let taken = prompt.take_outputs();
        assert_eq!(taken.len(), 1);
        assert_eq!(
            serde_json::to_value(&prompt).unwrap(),
            json!({"name": "p", "input": "x", "outputs": []})
        );
    }

    #[test]
    fn raw_text_from_structured_input() {
        let prompt: Prompt =
            serde_json::from_value(json!({"name": "p", "input": {"data": "What is {{x}}?"}}))
                .unwrap();
        assert_eq!(prompt.raw_prompt_text(), Some("What is {{x}}?"));
    }
}
