//! Override settings
//!
//! Before a prompt is bound to a model, the settings requested at the call
//! site are reduced to the ones that actually override the document's global
//! settings for that model. The reduction is pluggable through
//! [`OverrideSettingsResolver`]; [`GlobalDiffResolver`] is the default.

use aiconfig_schema::InferenceSettings;

use crate::document::AIConfig;

/// Computes the settings that should be stored on a model binding
pub trait OverrideSettingsResolver {
    /// Settings from `settings` that override the document's view of
    /// `model_id`, or `None` if nothing needs storing
    fn resolve(
        &self,
        config: &AIConfig,
        settings: &InferenceSettings,
        model_id: &str,
    ) -> Option<InferenceSettings>;
}

impl<F> OverrideSettingsResolver for F
where
    F: Fn(&AIConfig, &InferenceSettings, &str) -> Option<InferenceSettings>,
{
    fn resolve(
        &self,
        config: &AIConfig,
        settings: &InferenceSettings,
        model_id: &str,
    ) -> Option<InferenceSettings> {
        self(config, settings, model_id)
    }
}

/// Keeps the entries that are missing from, or differ from, the global
/// settings registered for the model
///
/// If the model has no global settings every entry counts as an override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalDiffResolver;

impl OverrideSettingsResolver for GlobalDiffResolver {
    fn resolve(
        &self,
        config: &AIConfig,
        settings: &InferenceSettings,
        model_id: &str,
    ) -> Option<InferenceSettings> {
        let global = config.get_global_settings(model_id);
        let overrides: InferenceSettings = if global.is_empty() {
            settings.clone()
        } else {
            settings
                .iter()
                .filter(|(key, value)| global.get(key.as_str()) != Some(*value))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        };

        (!overrides.is_empty()).then_some(overrides)
    }
}
