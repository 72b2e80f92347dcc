//! Mutation engine
//!
//! Every operation checks its preconditions before touching the document, so
//! an `Err` always leaves the document as it was. Operations that add, remove
//! or rename prompts update the prompt sequence and the [`PromptIndex`] together.
//!
//! [`PromptIndex`]: crate::index::PromptIndex

use std::fmt::{self, Display, Formatter};

use aiconfig_schema::{
    InferenceSettings, JsonObject, MetadataFields, ModelBinding, ModelMetadata, Output, Prompt,
    PromptMetadata,
};
use indexmap::IndexMap;
use serde_json::Value;

use crate::document::AIConfig;
use crate::error::{AIConfigError, AIConfigResult};
use crate::scope::Scope;

/// Non-fatal signal returned alongside a successful mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// `update_model` without a prompt name changed document-level settings
    AmbiguousScope {
        /// Model whose global settings were updated
        model_name: String,
    },
}

impl Display for Advisory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousScope { model_name } => write!(
                f,
                "no prompt name was given to update model '{model_name}', \
                 updated AIConfig-level settings instead"
            ),
        }
    }
}

impl AIConfig {
    // Prompts

    /// Insert a prompt under `name`, at `index` or at the end
    ///
    /// The stored prompt takes `name` as its name. An `index` past the end
    /// appends.
    ///
    /// # Errors
    /// Returns [`AIConfigError::PromptAlreadyExists`] if `name` is taken.
    pub fn add_prompt(
        &mut self,
        name: &str,
        mut prompt: Prompt,
        index: Option<usize>,
    ) -> AIConfigResult<()> {
        if self.prompt_index.contains(name) {
            return Err(AIConfigError::PromptAlreadyExists(name.to_string()));
        }

        prompt.name = name.to_string();
        let position = index.map_or(self.prompts.len(), |i| i.min(self.prompts.len()));
        self.prompts.insert(position, prompt);
        self.reindex();

        tracing::debug!(prompt = name, position, "added prompt");
        Ok(())
    }

    /// Replace the prompt stored under `name`, renaming it if `prompt.name`
    /// differs
    ///
    /// # Errors
    /// Returns [`AIConfigError::PromptNotFound`] for an unknown `name` and
    /// [`AIConfigError::PromptAlreadyExists`] if the new name belongs to
    /// another prompt.
    pub fn update_prompt(&mut self, name: &str, prompt: Prompt) -> AIConfigResult<()> {
        let position = self
            .prompt_index
            .position(name)
            .ok_or_else(|| self.prompt_not_found(name))?;

        let renamed = prompt.name != name;
        if renamed && self.prompt_index.contains(&prompt.name) {
            return Err(AIConfigError::PromptAlreadyExists(prompt.name));
        }

        let new_name = prompt.name.clone();
        self.prompts[position] = prompt;
        if renamed {
            self.prompt_index.rename(name, &new_name);
        }

        tracing::debug!(prompt = name, new_name = %new_name, "updated prompt");
        Ok(())
    }

    /// Remove a prompt and return it
    ///
    /// # Errors
    /// Returns [`AIConfigError::PromptNotFound`] for an unknown `name`.
    pub fn delete_prompt(&mut self, name: &str) -> AIConfigResult<Prompt> {
        let position = self
            .prompt_index
            .position(name)
            .ok_or_else(|| self.prompt_not_found(name))?;

        let removed = self.prompts.remove(position);
        self.reindex();

        tracing::debug!(prompt = name, "deleted prompt");
        Ok(removed)
    }

    // Models

    /// Register global settings for a new model
    ///
    /// # Errors
    /// Returns [`AIConfigError::ModelAlreadyExists`] if the model is registered.
    pub fn add_model(&mut self, name: &str, settings: InferenceSettings) -> AIConfigResult<()> {
        let models = self.metadata.models.get_or_insert_with(IndexMap::new);
        if models.contains_key(name) {
            return Err(AIConfigError::ModelAlreadyExists(name.to_string()));
        }
        models.insert(name.to_string(), settings);

        tracing::debug!(model = name, "added model");
        Ok(())
    }

    /// Unregister a model and return its global settings
    ///
    /// # Errors
    /// Returns [`AIConfigError::ModelNotFound`] if the model is not registered.
    pub fn delete_model(&mut self, name: &str) -> AIConfigResult<InferenceSettings> {
        let settings = self
            .metadata
            .models
            .as_mut()
            .and_then(|models| models.shift_remove(name))
            .ok_or_else(|| AIConfigError::ModelNotFound(name.to_string()))?;

        tracing::debug!(model = name, "deleted model");
        Ok(settings)
    }

    /// Set or clear the document default model
    pub fn set_default_model(&mut self, name: Option<&str>) {
        self.metadata.default_model = name.map(str::to_string);
        tracing::debug!(model = ?name, "set default model");
    }

    /// Map a model to a model parser
    ///
    /// `None` stores an explicit `null` entry rather than removing the key.
    pub fn set_model_parser(&mut self, model_name: &str, parser_id: Option<&str>) {
        self.metadata
            .model_parsers
            .get_or_insert_with(IndexMap::new)
            .insert(model_name.to_string(), parser_id.map(str::to_string));
        tracing::debug!(model = model_name, parser = ?parser_id, "set model parser");
    }

    /// Update a model name and/or its settings, on a prompt or globally
    ///
    /// - prompt and model name: rebind the prompt to `model_name`, keeping
    ///   the settings of a structured binding, then apply `settings` if given
    /// - prompt and settings only: replace the settings of the prompt's
    ///   current binding
    /// - model name without a prompt: update the document-level settings for
    ///   that model; `settings` replace them, `None` keeps them. Returns
    ///   [`Advisory::AmbiguousScope`].
    ///
    /// # Errors
    /// Returns [`AIConfigError::InvalidArguments`] if neither `model_name` nor
    /// `settings` is given, or if only `settings` is given without a prompt.
    /// Returns [`AIConfigError::PromptNotFound`] for an unknown prompt and
    /// [`AIConfigError::MissingModelBinding`] when updating only the settings
    /// of a prompt that has no model.
    pub fn update_model(
        &mut self,
        model_name: Option<&str>,
        settings: Option<InferenceSettings>,
        prompt_name: Option<&str>,
    ) -> AIConfigResult<Option<Advisory>> {
        match (prompt_name, model_name, settings) {
            (_, None, None) => Err(AIConfigError::InvalidArguments(
                "either a model name or model settings must be specified".into(),
            )),
            (None, None, Some(_)) => Err(AIConfigError::InvalidArguments(
                "settings without a prompt name need a model name, \
                 the AIConfig can hold several models"
                    .into(),
            )),
            (Some(prompt_name), model_name, settings) => {
                self.update_prompt_model(prompt_name, model_name, settings)?;
                Ok(None)
            }
            (None, Some(model_name), settings) => {
                Ok(Some(self.update_global_model(model_name, settings)))
            }
        }
    }

    fn update_prompt_model(
        &mut self,
        prompt_name: &str,
        model_name: Option<&str>,
        settings: Option<InferenceSettings>,
    ) -> AIConfigResult<()> {
        let prompt = self.prompt_mut(prompt_name)?;
        let current = prompt.metadata.as_ref().and_then(|m| m.model.as_ref());

        let binding = match (model_name, current) {
            (Some(name), Some(ModelBinding::Metadata(existing))) => ModelMetadata::new(name)
                .with_settings(existing.settings().cloned().unwrap_or_default()),
            (Some(name), _) => ModelMetadata::new(name).with_settings(InferenceSettings::new()),
            (None, Some(existing)) => match existing.settings() {
                Some(current) => ModelMetadata::new(existing.name()).with_settings(current.clone()),
                None => ModelMetadata::new(existing.name()),
            },
            (None, None) => return Err(AIConfigError::MissingModelBinding(prompt_name.to_string())),
        };
        let binding = match settings {
            Some(settings) => binding.with_settings(settings),
            None => binding,
        };

        tracing::debug!(prompt = prompt_name, model = %binding.name, "updated prompt model");
        prompt
            .metadata
            .get_or_insert_with(PromptMetadata::default)
            .model = Some(ModelBinding::Metadata(binding));
        Ok(())
    }

    fn update_global_model(
        &mut self,
        model_name: &str,
        settings: Option<InferenceSettings>,
    ) -> Advisory {
        tracing::warn!(
            model = model_name,
            "no prompt name given, updating AIConfig-level model settings"
        );

        let models = self.metadata.models.get_or_insert_with(IndexMap::new);
        match settings {
            Some(settings) => {
                models.insert(model_name.to_string(), settings);
            }
            None => {
                models.entry(model_name.to_string()).or_default();
            }
        }

        Advisory::AmbiguousScope {
            model_name: model_name.to_string(),
        }
    }

    // Parameters

    /// Set one parameter in the given scope, creating the parameter mapping
    /// (and the prompt metadata) if absent
    ///
    /// # Errors
    /// Returns [`AIConfigError::PromptNotFound`] for an unknown prompt.
    pub fn set_parameter(
        &mut self,
        name: &str,
        value: Value,
        prompt_name: Option<&str>,
    ) -> AIConfigResult<()> {
        self.parameters_entry(prompt_name)?
            .insert(name.to_string(), value);
        tracing::debug!(
            parameter = name,
            scope = %Scope::from_prompt(prompt_name),
            "set parameter"
        );
        Ok(())
    }

    /// Replace every parameter in the given scope
    ///
    /// Existing keys are deleted one by one, then each key of `parameters` is
    /// set, so the scope ends up holding exactly `parameters`.
    ///
    /// # Errors
    /// Returns [`AIConfigError::PromptNotFound`] for an unknown prompt.
    pub fn set_parameters(
        &mut self,
        parameters: JsonObject,
        prompt_name: Option<&str>,
    ) -> AIConfigResult<()> {
        self.ensure_prompt(prompt_name)?;

        let stale: Vec<String> = self
            .existing_parameters_mut(prompt_name)?
            .map(|current| current.keys().cloned().collect())
            .unwrap_or_default();
        for name in &stale {
            self.delete_parameter(name, prompt_name)?;
        }
        for (name, value) in parameters {
            self.set_parameter(&name, value, prompt_name)?;
        }
        Ok(())
    }

    /// Overwrite one parameter in a scope that already has parameters
    ///
    /// # Errors
    /// Returns [`AIConfigError::PromptNotFound`] for an unknown prompt and
    /// [`AIConfigError::MissingParameters`] if the scope has no parameters.
    pub fn update_parameter(
        &mut self,
        name: &str,
        value: Value,
        prompt_name: Option<&str>,
    ) -> AIConfigResult<()> {
        self.existing_parameters_mut(prompt_name)?
            .ok_or_else(|| AIConfigError::MissingParameters(Scope::from_prompt(prompt_name)))?
            .insert(name.to_string(), value);
        tracing::debug!(
            parameter = name,
            scope = %Scope::from_prompt(prompt_name),
            "updated parameter"
        );
        Ok(())
    }

    /// Remove a parameter and return its value
    ///
    /// # Errors
    /// Returns [`AIConfigError::PromptNotFound`] for an unknown prompt and
    /// [`AIConfigError::ParameterNotFound`] if the scope lacks the key.
    pub fn delete_parameter(
        &mut self,
        name: &str,
        prompt_name: Option<&str>,
    ) -> AIConfigResult<Value> {
        let value = self
            .existing_parameters_mut(prompt_name)?
            .and_then(|parameters| parameters.shift_remove(name))
            .ok_or_else(|| AIConfigError::ParameterNotFound {
                name: name.to_string(),
                scope: Scope::from_prompt(prompt_name),
            })?;
        tracing::debug!(
            parameter = name,
            scope = %Scope::from_prompt(prompt_name),
            "deleted parameter"
        );
        Ok(value)
    }

    fn parameters_entry(&mut self, prompt_name: Option<&str>) -> AIConfigResult<&mut JsonObject> {
        let slot = match prompt_name {
            None => &mut self.metadata.parameters,
            Some(name) => {
                &mut self
                    .prompt_mut(name)?
                    .metadata
                    .get_or_insert_with(PromptMetadata::default)
                    .parameters
            }
        };
        Ok(slot.get_or_insert_with(JsonObject::new))
    }

    fn existing_parameters_mut(
        &mut self,
        prompt_name: Option<&str>,
    ) -> AIConfigResult<Option<&mut JsonObject>> {
        match prompt_name {
            None => Ok(self.metadata.parameters.as_mut()),
            Some(name) => Ok(self
                .prompt_mut(name)?
                .metadata
                .as_mut()
                .and_then(|metadata| metadata.parameters.as_mut())),
        }
    }

    // Metadata

    /// Set a metadata key on a prompt, or on the document for `None`
    ///
    /// Known fields are decoded into their typed form; other keys are kept
    /// as-is. Prompt metadata is created if absent.
    ///
    /// # Errors
    /// Returns [`AIConfigError::PromptNotFound`] for an unknown prompt and
    /// [`AIConfigError::Schema`] if a known field cannot hold `value` or the
    /// tags break tag constraints.
    pub fn set_metadata(
        &mut self,
        key: &str,
        value: Value,
        prompt_name: Option<&str>,
    ) -> AIConfigResult<()> {
        let validate_tags = self.options.validate_tags;
        match prompt_name {
            None => self.metadata.set_field(key, value)?,
            Some(name) => {
                let prompt = self.prompt_mut(name)?;
                let mut metadata = prompt.metadata.clone().unwrap_or_default();
                metadata.set_field(key, value)?;
                if validate_tags && key == PromptMetadata::TAGS {
                    metadata.validate()?;
                }
                prompt.metadata = Some(metadata);
            }
        }
        tracing::debug!(key, scope = %Scope::from_prompt(prompt_name), "set metadata");
        Ok(())
    }

    /// Remove a metadata key from a prompt, or from the document for `None`
    ///
    /// # Errors
    /// Returns [`AIConfigError::PromptNotFound`] for an unknown prompt and
    /// [`AIConfigError::MetadataNotFound`] if the key is not set.
    pub fn delete_metadata(&mut self, key: &str, prompt_name: Option<&str>) -> AIConfigResult<()> {
        let removed = match prompt_name {
            None => self.metadata.remove_field(key),
            Some(name) => self
                .prompt_mut(name)?
                .metadata
                .as_mut()
                .is_some_and(|metadata| metadata.remove_field(key)),
        };
        if !removed {
            return Err(AIConfigError::MetadataNotFound {
                key: key.to_string(),
                scope: Scope::from_prompt(prompt_name),
            });
        }
        tracing::debug!(key, scope = %Scope::from_prompt(prompt_name), "deleted metadata");
        Ok(())
    }

    // Outputs

    /// Record an output on a prompt, replacing all previous outputs if
    /// `overwrite` is set
    ///
    /// # Errors
    /// Returns [`AIConfigError::PromptNotFound`] for an unknown prompt.
    pub fn add_output(
        &mut self,
        prompt_name: &str,
        output: Output,
        overwrite: bool,
    ) -> AIConfigResult<()> {
        let prompt = self.prompt_mut(prompt_name)?;
        if overwrite {
            prompt.outputs = Some(vec![output]);
        } else {
            prompt.add_output(output);
        }
        tracing::debug!(prompt = prompt_name, overwrite, "added output");
        Ok(())
    }

    /// Record several outputs on a prompt, replacing all previous outputs if
    /// `overwrite` is set
    ///
    /// # Errors
    /// Returns [`AIConfigError::InvalidArgument`] if `outputs` is empty and
    /// [`AIConfigError::PromptNotFound`] for an unknown prompt.
    pub fn add_outputs(
        &mut self,
        prompt_name: &str,
        outputs: Vec<Output>,
        overwrite: bool,
    ) -> AIConfigResult<()> {
        if outputs.is_empty() {
            return Err(AIConfigError::InvalidArgument(format!(
                "no outputs provided for prompt '{prompt_name}'"
            )));
        }
        let prompt = self.prompt_mut(prompt_name)?;
        let count = outputs.len();
        if overwrite {
            prompt.outputs = Some(outputs);
        } else {
            prompt.outputs_mut().extend(outputs);
        }
        tracing::debug!(prompt = prompt_name, count, overwrite, "added outputs");
        Ok(())
    }

    /// Clear a prompt's outputs and return them
    ///
    /// The prompt keeps an empty `outputs` list afterwards.
    ///
    /// # Errors
    /// Returns [`AIConfigError::PromptNotFound`] for an unknown prompt.
    pub fn delete_output(&mut self, prompt_name: &str) -> AIConfigResult<Vec<Output>> {
        let outputs = self.prompt_mut(prompt_name)?.take_outputs();
        tracing::debug!(prompt = prompt_name, count = outputs.len(), "deleted outputs");
        Ok(outputs)
    }
}
