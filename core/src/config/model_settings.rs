//! Model settings: optional parameters for a single LLM call

use super::types::{Reasoning, ToolChoice, Truncation};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Settings to use when calling an LLM.
///
/// Every field is independently optional, and an absent field is different
/// from any concrete value: `max_tokens: None` is not `Some(0)`, and
/// `store: None` is not `Some(false)`. Defaults such as "parallel tool calls
/// off" or "store responses" belong to whoever builds the request; this type
/// never fills them in.
///
/// Not all models or providers support all of these parameters. Nothing here
/// checks ranges or provider capabilities.
///
/// Instances are usually built once per agent or call site and then layered
/// with [`ModelSettings::resolve`]:
///
/// ```rust
/// use model_settings::ModelSettings;
///
/// let agent = ModelSettings::new().with_temperature(0.7).with_max_tokens(100);
/// let run = ModelSettings::new().with_temperature(0.9);
///
/// let effective = agent.resolve(Some(&run));
/// assert_eq!(effective.temperature, Some(0.9));
/// assert_eq!(effective.max_tokens, Some(100));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSettings {
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Nucleus-sampling probability mass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    /// Repetition penalty scaled by token frequency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,

    /// Repetition penalty applied once a token has appeared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,

    /// Tool-invocation policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,

    /// Whether the model may issue several tool calls in one turn.
    /// Callers usually treat absent as `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_tool_calls: Option<bool>,

    /// Context-truncation strategy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncation: Option<Truncation>,

    /// Maximum number of output tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i64>,

    /// Options for reasoning models
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<Reasoning>,

    /// Metadata to include with the model call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,

    /// Whether the provider should keep the response for later retrieval.
    /// Callers usually treat absent as `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<bool>,
}

impl ModelSettings {
    /// Names of all settings fields, in declaration order
    pub const FIELDS: [&'static str; 11] = [
        "temperature",
        "top_p",
        "frequency_penalty",
        "presence_penalty",
        "tool_choice",
        "parallel_tool_calls",
        "truncation",
        "max_tokens",
        "reasoning",
        "metadata",
        "store",
    ];

    /// Create settings with every field absent
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from a JSON document.
    ///
    /// Keys are field names. A missing key and an explicit `null` both leave
    /// the field absent; unknown keys are rejected.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Produce new settings by overlaying the present fields of `override_settings`
    /// on top of `self`.
    ///
    /// Each field comes from the override when it is present there, and from
    /// `self` otherwise. Composite fields (`metadata`, `reasoning`) are taken
    /// whole, never merged key by key. With no override the result equals
    /// `self`. Neither input is modified.
    pub fn resolve(&self, override_settings: Option<&ModelSettings>) -> ModelSettings {
        let Some(over) = override_settings else {
            return self.clone();
        };

        ModelSettings {
            temperature: pick(&over.temperature, &self.temperature),
            top_p: pick(&over.top_p, &self.top_p),
            frequency_penalty: pick(&over.frequency_penalty, &self.frequency_penalty),
            presence_penalty: pick(&over.presence_penalty, &self.presence_penalty),
            tool_choice: pick(&over.tool_choice, &self.tool_choice),
            parallel_tool_calls: pick(&over.parallel_tool_calls, &self.parallel_tool_calls),
            truncation: pick(&over.truncation, &self.truncation),
            max_tokens: pick(&over.max_tokens, &self.max_tokens),
            reasoning: pick(&over.reasoning, &self.reasoning),
            metadata: pick(&over.metadata, &self.metadata),
            store: pick(&over.store, &self.store),
        }
    }

    /// Overlay an ordered list of layers, lowest priority first.
    ///
    /// Starts from settings with every field absent, so an empty list yields
    /// empty settings.
    pub fn resolve_all<'a, I>(layers: I) -> ModelSettings
    where
        I: IntoIterator<Item = &'a ModelSettings>,
    {
        layers
            .into_iter()
            .fold(ModelSettings::new(), |acc, layer| acc.resolve(Some(layer)))
    }

    /// Whether every field is absent
    pub fn is_empty(&self) -> bool {
        self.present_fields().is_empty()
    }

    /// Names of the fields that are present, in declaration order
    pub fn present_fields(&self) -> Vec<&'static str> {
        let present = [
            self.temperature.is_some(),
            self.top_p.is_some(),
            self.frequency_penalty.is_some(),
            self.presence_penalty.is_some(),
            self.tool_choice.is_some(),
            self.parallel_tool_calls.is_some(),
            self.truncation.is_some(),
            self.max_tokens.is_some(),
            self.reasoning.is_some(),
            self.metadata.is_some(),
            self.store.is_some(),
        ];

        Self::FIELDS
            .iter()
            .zip(present)
            .filter_map(|(name, is_present)| is_present.then_some(*name))
            .collect()
    }

    /// Set the temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set top_p
    #[must_use]
    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set the frequency penalty
    #[must_use]
    pub fn with_frequency_penalty(mut self, penalty: f64) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    /// Set the presence penalty
    #[must_use]
    pub fn with_presence_penalty(mut self, penalty: f64) -> Self {
        self.presence_penalty = Some(penalty);
        self
    }

    /// Set the tool choice
    #[must_use]
    pub fn with_tool_choice(mut self, tool_choice: impl Into<ToolChoice>) -> Self {
        self.tool_choice = Some(tool_choice.into());
        self
    }

    /// Allow or forbid parallel tool calls
    #[must_use]
    pub fn with_parallel_tool_calls(mut self, parallel: bool) -> Self {
        self.parallel_tool_calls = Some(parallel);
        self
    }

    /// Set the truncation strategy
    #[must_use]
    pub fn with_truncation(mut self, truncation: Truncation) -> Self {
        self.truncation = Some(truncation);
        self
    }

    /// Set the output token cap
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: i64) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the reasoning options
    #[must_use]
    pub fn with_reasoning(mut self, reasoning: Reasoning) -> Self {
        self.reasoning = Some(reasoning);
        self
    }

    /// Replace the metadata map
    #[must_use]
    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Add a single metadata entry, creating the map if needed
    #[must_use]
    pub fn with_metadata_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Set whether the response is stored
    #[must_use]
    pub fn with_store(mut self, store: bool) -> Self {
        self.store = Some(store);
        self
    }
}

fn pick<T: Clone>(over: &Option<T>, base: &Option<T>) -> Option<T> {
    over.as_ref().or(base.as_ref()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{ReasoningEffort, ReasoningSummary};

    fn full_settings() -> ModelSettings {
        ModelSettings::new()
            .with_temperature(0.2)
            .with_top_p(0.9)
            .with_frequency_penalty(0.1)
            .with_presence_penalty(0.3)
            .with_tool_choice(ToolChoice::Required)
            .with_parallel_tool_calls(true)
            .with_truncation(Truncation::Auto)
            .with_max_tokens(512)
            .with_reasoning(Reasoning::with_effort(ReasoningEffort::Medium))
            .with_metadata_entry("team", "search")
            .with_store(false)
    }

    #[test]
    fn test_resolve_without_override_is_identity() {
        let base = full_settings();
        assert_eq!(base.resolve(None), base);

        let empty = ModelSettings::new();
        assert_eq!(empty.resolve(None), empty);
    }

    #[test]
    fn test_resolve_prefers_present_override_fields() {
        let base = ModelSettings::new().with_temperature(0.7).with_max_tokens(100);
        let over = ModelSettings::new().with_temperature(0.9);

        let resolved = base.resolve(Some(&over));

        assert_eq!(
            resolved,
            ModelSettings::new().with_temperature(0.9).with_max_tokens(100)
        );
        assert_eq!(resolved.present_fields(), vec!["temperature", "max_tokens"]);
    }

    #[test]
    fn test_resolve_full_override_replaces_everything() {
        let base = full_settings();
        let over = ModelSettings::new()
            .with_temperature(1.0)
            .with_top_p(0.5)
            .with_frequency_penalty(0.0)
            .with_presence_penalty(0.0)
            .with_tool_choice("lookup_order")
            .with_parallel_tool_calls(false)
            .with_truncation(Truncation::Disabled)
            .with_max_tokens(0)
            .with_reasoning(Reasoning::default())
            .with_metadata(BTreeMap::new())
            .with_store(true);

        assert_eq!(base.resolve(Some(&over)), over);
    }

    #[test]
    fn test_resolve_falls_back_to_base_for_absent_fields() {
        let base = full_settings();
        let resolved = base.resolve(Some(&ModelSettings::new()));
        assert_eq!(resolved, base);
    }

    #[test]
    fn test_zero_and_false_count_as_present() {
        let base = ModelSettings::new()
            .with_max_tokens(4096)
            .with_store(true)
            .with_parallel_tool_calls(true);
        let over = ModelSettings::new()
            .with_max_tokens(0)
            .with_store(false)
            .with_parallel_tool_calls(false);

        let resolved = base.resolve(Some(&over));

        assert_eq!(resolved.max_tokens, Some(0));
        assert_eq!(resolved.store, Some(false));
        assert_eq!(resolved.parallel_tool_calls, Some(false));
    }

    #[test]
    fn test_metadata_is_replaced_wholesale() {
        let base = ModelSettings::new().with_metadata_entry("b", "2");
        let over = ModelSettings::new().with_metadata_entry("a", "1");

        let resolved = base.resolve(Some(&over));

        let expected: BTreeMap<String, String> = [("a".to_string(), "1".to_string())].into();
        assert_eq!(resolved.metadata, Some(expected));
    }

    #[test]
    fn test_empty_metadata_override_clears_base_entries() {
        let base = ModelSettings::new().with_metadata_entry("b", "2");
        let over = ModelSettings::new().with_metadata(BTreeMap::new());

        assert_eq!(base.resolve(Some(&over)).metadata, Some(BTreeMap::new()));
    }

    #[test]
    fn test_reasoning_is_replaced_wholesale() {
        let base = ModelSettings::new().with_reasoning(
            Reasoning::with_effort(ReasoningEffort::High).summary(ReasoningSummary::Detailed),
        );
        let over = ModelSettings::new().with_reasoning(Reasoning::with_effort(ReasoningEffort::Low));

        let resolved = base.resolve(Some(&over));

        assert_eq!(
            resolved.reasoning,
            Some(Reasoning::with_effort(ReasoningEffort::Low))
        );
    }

    #[test]
    fn test_resolve_does_not_mutate_inputs() {
        let base = full_settings();
        let over = ModelSettings::new()
            .with_temperature(1.5)
            .with_metadata_entry("run", "42");
        let base_before = base.clone();
        let over_before = over.clone();

        let _ = base.resolve(Some(&over));

        assert_eq!(base, base_before);
        assert_eq!(over, over_before);
    }

    #[test]
    fn test_self_merge_is_idempotent() {
        let base = full_settings();
        assert_eq!(base.resolve(Some(&base)), base);

        let partial = ModelSettings::new().with_tool_choice("none").with_top_p(0.4);
        assert_eq!(partial.resolve(Some(&partial)), partial);
    }

    #[test]
    fn test_resolve_all_applies_layers_in_order() {
        let user = ModelSettings::new().with_temperature(0.2).with_store(false);
        let project = ModelSettings::new().with_temperature(0.5).with_max_tokens(256);
        let flags = ModelSettings::new().with_max_tokens(64);

        let resolved = ModelSettings::resolve_all([&user, &project, &flags]);

        assert_eq!(
            resolved,
            ModelSettings::new()
                .with_temperature(0.5)
                .with_store(false)
                .with_max_tokens(64)
        );
        assert_eq!(
            resolved,
            user.resolve(Some(&project)).resolve(Some(&flags))
        );
    }

    #[test]
    fn test_resolve_all_of_nothing_is_empty() {
        let resolved = ModelSettings::resolve_all(std::iter::empty::<&ModelSettings>());
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_present_fields_follow_declaration_order() {
        assert!(ModelSettings::new().present_fields().is_empty());
        assert_eq!(
            full_settings().present_fields(),
            ModelSettings::FIELDS.to_vec()
        );

        let sparse = ModelSettings::new().with_store(true).with_temperature(0.1);
        assert_eq!(sparse.present_fields(), vec!["temperature", "store"]);
    }

    #[test]
    fn test_from_json_null_and_missing_are_absent() {
        let settings = ModelSettings::from_json(
            r#"{
                "temperature": 0.7,
                "max_tokens": null,
                "tool_choice": "auto",
                "metadata": {"team": "support"}
            }"#,
        )
        .unwrap();

        assert_eq!(settings.temperature, Some(0.7));
        assert_eq!(settings.max_tokens, None);
        assert_eq!(settings.store, None);
        assert_eq!(settings.tool_choice, Some(ToolChoice::Auto));
        assert_eq!(
            settings.present_fields(),
            vec!["temperature", "tool_choice", "metadata"]
        );
    }

    #[test]
    fn test_from_json_rejects_unknown_fields() {
        let err = ModelSettings::from_json(r#"{"temprature": 0.7}"#).unwrap_err();
        assert!(matches!(err, crate::error::Error::Serialization(_)));
    }

    #[test]
    fn test_float_values_pass_through_unchanged() {
        let settings =
            ModelSettings::from_json(r#"{"temperature": 0.7, "top_p": 0.123456789}"#).unwrap();

        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["temperature"], serde_json::json!(0.7));
        assert_eq!(value["top_p"], serde_json::json!(0.123456789));
        assert!(serde_json::to_string(&settings)
            .unwrap()
            .contains(r#""top_p":0.123456789"#));
    }

    #[test]
    fn test_max_tokens_accepts_any_integer() {
        let settings = ModelSettings::from_json(r#"{"max_tokens": -1}"#).unwrap();
        assert_eq!(settings.max_tokens, Some(-1));

        let large = ModelSettings::from_json(r#"{"max_tokens": 5000000000}"#).unwrap();
        assert_eq!(large.max_tokens, Some(5_000_000_000));
    }

    #[test]
    fn test_reasoning_with_newer_provider_values_parses() {
        let settings = ModelSettings::from_json(
            r#"{"reasoning": {"effort": "minimal", "generate_summary": "concise"}}"#,
        )
        .unwrap();

        assert_eq!(
            settings.reasoning,
            Some(Reasoning {
                effort: Some(ReasoningEffort::Other("minimal".to_string())),
                summary: None,
                generate_summary: Some(ReasoningSummary::Concise),
            })
        );
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let settings = ModelSettings::new()
            .with_tool_choice("get_weather")
            .with_truncation(Truncation::Disabled)
            .with_store(false);

        let value = serde_json::to_value(&settings).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "tool_choice": "get_weather",
                "truncation": "disabled",
                "store": false
            })
        );
        assert_eq!(
            serde_json::to_value(ModelSettings::new()).unwrap(),
            serde_json::json!({})
        );
    }

    #[test]
    fn test_settings_can_be_shared_across_threads() {
        let base = std::sync::Arc::new(full_settings());
        let over = std::sync::Arc::new(ModelSettings::new().with_temperature(0.0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let base = base.clone();
                let over = over.clone();
                std::thread::spawn(move || base.resolve(Some(&*over)))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().temperature, Some(0.0));
        }
    }
}
