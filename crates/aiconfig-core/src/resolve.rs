//! Scope resolution
//!
//! Read-only algorithms answering "what is in effect" for a prompt, or for
//! the document as a whole:
//! - model name: the prompt's own binding, else the document default
//! - parameters: the prompt's own non-empty mapping, else the global one.
//!   The two are never merged; local parameters shadow global ones entirely.
//! - global settings: whatever is registered for a model name, else empty

use std::borrow::Cow;

use aiconfig_schema::{
    InferenceSettings, JsonObject, MetadataFields, ModelMetadata, Output, Prompt,
};

use crate::document::AIConfig;
use crate::error::{AIConfigError, AIConfigResult};
use crate::settings::{GlobalDiffResolver, OverrideSettingsResolver};

impl AIConfig {
    /// Effective model name for a prompt
    ///
    /// # Errors
    /// Returns [`AIConfigError::PromptNotFound`] for an unknown prompt and
    /// [`AIConfigError::NoDefaultModel`] if neither the prompt nor the
    /// document names a model.
    pub fn get_model_name(&self, prompt_name: &str) -> AIConfigResult<&str> {
        let prompt = self.get_prompt(prompt_name)?;
        self.model_name_of(prompt)
    }

    /// Effective model name for a prompt value, which need not belong to
    /// this document
    ///
    /// # Errors
    /// Returns [`AIConfigError::NoDefaultModel`] if neither the prompt nor the
    /// document names a model.
    pub fn model_name_of<'a>(&'a self, prompt: &'a Prompt) -> AIConfigResult<&'a str> {
        match prompt.model_binding() {
            Some(binding) => Ok(binding.name()),
            None => self
                .metadata
                .default_model
                .as_deref()
                .ok_or_else(|| AIConfigError::NoDefaultModel(prompt.name.clone())),
        }
    }

    /// Document default model
    #[inline]
    #[must_use]
    pub fn get_default_model(&self) -> Option<&str> {
        self.metadata.default_model.as_deref()
    }

    /// Parameters in effect for a prompt, or the global ones for `None`
    ///
    /// # Errors
    /// Returns [`AIConfigError::PromptNotFound`] for an unknown prompt.
    pub fn get_parameters(&self, prompt_name: Option<&str>) -> AIConfigResult<Cow<'_, JsonObject>> {
        match prompt_name {
            None => Ok(self.get_global_parameters()),
            Some(name) => {
                let prompt = self.get_prompt(name)?;
                Ok(self.parameters_for(prompt))
            }
        }
    }

    /// Parameters in effect for a prompt value
    #[must_use]
    pub fn parameters_for<'a>(&'a self, prompt: &'a Prompt) -> Cow<'a, JsonObject> {
        match prompt.local_parameters() {
            Some(local) if !local.is_empty() => Cow::Borrowed(local),
            _ => self.get_global_parameters(),
        }
    }

    /// Global parameters; empty if unset
    #[must_use]
    pub fn get_global_parameters(&self) -> Cow<'_, JsonObject> {
        self.metadata
            .parameters
            .as_ref()
            .map_or_else(|| Cow::Owned(JsonObject::new()), Cow::Borrowed)
    }

    /// A prompt's own parameters; empty if unset
    #[must_use]
    pub fn get_prompt_parameters<'a>(&self, prompt: &'a Prompt) -> Cow<'a, JsonObject> {
        prompt
            .local_parameters()
            .map_or_else(|| Cow::Owned(JsonObject::new()), Cow::Borrowed)
    }

    /// Settings registered for a model; empty if the model is unregistered
    #[must_use]
    pub fn get_global_settings(&self, model_name: &str) -> Cow<'_, InferenceSettings> {
        self.metadata
            .models
            .as_ref()
            .and_then(|models| models.get(model_name))
            .map_or_else(|| Cow::Owned(InferenceSettings::new()), Cow::Borrowed)
    }

    /// Metadata for a prompt, or the document metadata for `None`
    ///
    /// A prompt without metadata yields `Ok(None)`.
    ///
    /// # Errors
    /// Returns [`AIConfigError::PromptNotFound`] for an unknown prompt.
    pub fn get_metadata(
        &self,
        prompt_name: Option<&str>,
    ) -> AIConfigResult<Option<&dyn MetadataFields>> {
        match prompt_name {
            None => Ok(Some(&self.metadata)),
            Some(name) => Ok(self
                .get_prompt(name)?
                .metadata
                .as_ref()
                .map(|m| m as &dyn MetadataFields)),
        }
    }

    /// Most recent output of a prompt
    ///
    /// # Errors
    /// Returns [`AIConfigError::PromptNotFound`] for an unknown prompt.
    pub fn get_latest_output(&self, prompt_name: &str) -> AIConfigResult<Option<&Output>> {
        Ok(self.get_prompt(prompt_name)?.latest_output())
    }

    /// Text of a prompt's most recent output; `None` for errors and
    /// non-text data
    ///
    /// # Errors
    /// Returns [`AIConfigError::PromptNotFound`] for an unknown prompt.
    pub fn get_output_text(&self, prompt_name: &str) -> AIConfigResult<Option<&str>> {
        Ok(self.get_latest_output(prompt_name)?.and_then(Output::text))
    }

    /// Model binding for `model_id` carrying only the override settings
    ///
    /// When no settings override the global ones, the result has no
    /// `settings` at all rather than an empty mapping. The same holds for a
    /// resolver that returns an empty mapping.
    #[must_use]
    pub fn get_model_metadata(
        &self,
        settings: &InferenceSettings,
        model_id: &str,
    ) -> ModelMetadata {
        self.get_model_metadata_with(&GlobalDiffResolver, settings, model_id)
    }

    /// [`Self::get_model_metadata`] with a custom resolver
    #[must_use]
    pub fn get_model_metadata_with<R>(
        &self,
        resolver: &R,
        settings: &InferenceSettings,
        model_id: &str,
    ) -> ModelMetadata
    where
        R: OverrideSettingsResolver + ?Sized,
    {
        let metadata = ModelMetadata::new(model_id);
        match resolver
            .resolve(self, settings, model_id)
            .filter(|overrides| !overrides.is_empty())
        {
            Some(overrides) => metadata.with_settings(overrides),
            None => metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiconfig_schema::{ConfigMetadata, ModelBinding, PromptMetadata};
    use serde_json::{json, Value};

    fn obj(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn doc() -> AIConfig {
        let mut config = AIConfig::new("doc").with_metadata(
            ConfigMetadata::new()
                .with_parameters(obj(json!({"a": 1})))
                .with_model("gpt-4", obj(json!({"temperature": 0.7})))
                .with_default_model("gpt-3.5-turbo"),
        );
        config
            .add_prompt("plain", Prompt::new("plain", "x"), None)
            .unwrap();
        config
            .add_prompt(
                "named",
                Prompt::new("named", "x")
                    .with_metadata(PromptMetadata::new().with_model(ModelBinding::from("claude"))),
                None,
            )
            .unwrap();
        config
            .add_prompt(
                "structured",
                Prompt::new("structured", "x").with_metadata(
                    PromptMetadata::new()
                        .with_model(ModelMetadata::new("gpt-4"))
                        .with_parameters(obj(json!({"b": 2}))),
                ),
                None,
            )
            .unwrap();
        config
            .add_prompt(
                "empty_params",
                Prompt::new("empty_params", "x")
                    .with_metadata(PromptMetadata::new().with_parameters(JsonObject::new())),
                None,
            )
            .unwrap();
        config
    }

    #[test]
    fn model_name_precedence() {
        let config = doc();
        assert_eq!(config.get_model_name("named").unwrap(), "claude");
        assert_eq!(config.get_model_name("structured").unwrap(), "gpt-4");
        assert_eq!(config.get_model_name("plain").unwrap(), "gpt-3.5-turbo");
        assert!(config.get_model_name("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn model_name_without_default_fails() {
        let mut config = doc();
        config.set_default_model(None);
        assert!(matches!(
            config.get_model_name("plain"),
            Err(AIConfigError::NoDefaultModel(name)) if name == "plain"
        ));
        assert_eq!(config.get_model_name("named").unwrap(), "claude");
    }

    #[test]
    fn model_name_of_detached_prompt() {
        let config = doc();
        let detached = Prompt::new("elsewhere", "x");
        assert_eq!(config.model_name_of(&detached).unwrap(), "gpt-3.5-turbo");
    }

    #[test]
    fn local_parameters_shadow_global() {
        let config = doc();
        let params = config.get_parameters(Some("structured")).unwrap();
        assert_eq!(Value::Object(params.into_owned()), json!({"b": 2}));
    }

    #[test]
    fn missing_or_empty_local_parameters_fall_back() {
        let config = doc();
        for name in ["plain", "empty_params"] {
            let params = config.get_parameters(Some(name)).unwrap();
            assert_eq!(Value::Object(params.into_owned()), json!({"a": 1}));
        }
        let global = config.get_parameters(None).unwrap();
        assert_eq!(Value::Object(global.into_owned()), json!({"a": 1}));
    }

    #[test]
    fn unset_global_parameters_are_empty() {
        let config = AIConfig::new("doc");
        assert!(config.get_parameters(None).unwrap().is_empty());
    }

    #[test]
    fn prompt_parameters_exact() {
        let config = doc();
        let plain = config.get_prompt("plain").unwrap();
        assert!(config.get_prompt_parameters(plain).is_empty());
    }

    #[test]
    fn global_settings_lookup() {
        let config = doc();
        assert_eq!(
            config.get_global_settings("gpt-4").get("temperature"),
            Some(&json!(0.7))
        );
        assert!(config.get_global_settings("unknown").is_empty());
    }

    #[test]
    fn metadata_views() {
        let config = doc();
        let global = config.get_metadata(None).unwrap().unwrap();
        assert_eq!(global.get_field("default_model"), Some(json!("gpt-3.5-turbo")));

        assert!(config.get_metadata(Some("plain")).unwrap().is_none());
        let named = config.get_metadata(Some("named")).unwrap().unwrap();
        assert_eq!(named.get_field("model"), Some(json!("claude")));
        assert!(config.get_metadata(Some("nope")).is_err());
    }

    #[test]
    fn output_text_follows_latest_output() {
        let mut config = doc();
        assert_eq!(config.get_output_text("plain").unwrap(), None);

        config.add_output("plain", Output::execute_result("hi"), false).unwrap();
        assert_eq!(config.get_output_text("plain").unwrap(), Some("hi"));

        config
            .add_output("plain", Output::error("ValueError", "boom", Vec::new()), false)
            .unwrap();
        assert!(config.get_latest_output("plain").unwrap().unwrap().is_error());
        assert_eq!(config.get_output_text("plain").unwrap(), None);
    }

    #[test]
    fn model_metadata_omits_settings_without_overrides() {
        let config = doc();
        let same = config.get_model_metadata(&obj(json!({"temperature": 0.7})), "gpt-4");
        assert!(same.settings().is_none());

        let changed = config.get_model_metadata(&obj(json!({"temperature": 0.1})), "gpt-4");
        assert_eq!(changed.settings(), Some(&obj(json!({"temperature": 0.1}))));
    }

    #[test]
    fn model_metadata_with_custom_resolver() {
        let config = doc();
        let everything =
            |_: &AIConfig, s: &InferenceSettings, _: &str| Some(s.clone());
        let meta = config.get_model_metadata_with(
            &everything,
            &obj(json!({"temperature": 0.7})),
            "gpt-4",
        );
        assert_eq!(meta.settings(), Some(&obj(json!({"temperature": 0.7}))));
    }

    #[test]
    fn empty_resolver_result_omits_settings() {
        let config = doc();
        let nothing = |_: &AIConfig, _: &InferenceSettings, _: &str| Some(JsonObject::new());
        let meta = config.get_model_metadata_with(
            &nothing,
            &obj(json!({"temperature": 0.1})),
            "gpt-4",
        );
        assert!(meta.settings.is_none());
        assert_eq!(serde_json::to_value(&meta).unwrap(), json!({"name": "gpt-4"}));
    }
}
