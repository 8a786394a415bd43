//! Per-field command-line overrides

use clap::{ArgAction, Args};
use model_settings::{
    ModelSettings, Reasoning, ReasoningEffort, ReasoningSummary, ToolChoice, Truncation,
};
use std::collections::BTreeMap;

/// Flags that set individual settings fields
///
/// Together they form the highest-priority layer. Flags that are not given
/// leave the field absent in that layer.
#[derive(Args, Debug)]
pub struct SettingsFlags {
    /// Sampling temperature
    #[arg(long, global = true)]
    pub temperature: Option<f64>,

    /// Nucleus-sampling probability mass
    #[arg(long, global = true)]
    pub top_p: Option<f64>,

    /// Frequency penalty
    #[arg(long, global = true)]
    pub frequency_penalty: Option<f64>,

    /// Presence penalty
    #[arg(long, global = true)]
    pub presence_penalty: Option<f64>,

    /// Tool choice: auto, required, none, or a tool name
    #[arg(long, global = true)]
    pub tool_choice: Option<String>,

    /// Allow parallel tool calls (true/false)
    #[arg(long, global = true, action = ArgAction::Set)]
    pub parallel_tool_calls: Option<bool>,

    /// Truncation strategy (auto, disabled)
    #[arg(long, global = true)]
    pub truncation: Option<Truncation>,

    /// Maximum output tokens
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub max_tokens: Option<i64>,

    /// Reasoning effort (low, medium, high, or any provider level)
    #[arg(long, global = true)]
    pub reasoning_effort: Option<ReasoningEffort>,

    /// Reasoning summary (auto, concise, detailed)
    #[arg(long, global = true)]
    pub reasoning_summary: Option<ReasoningSummary>,

    /// Metadata entry KEY=VALUE; repeatable, replaces all metadata from lower layers
    #[arg(long = "metadata", global = true, value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub metadata: Vec<(String, String)>,

    /// Store the response server-side (true/false)
    #[arg(long, global = true, action = ArgAction::Set)]
    pub store: Option<bool>,
}

impl SettingsFlags {
    /// Build the flag overrides layer
    pub fn to_settings(&self) -> ModelSettings {
        let reasoning = if self.reasoning_effort.is_some() || self.reasoning_summary.is_some() {
            Some(Reasoning {
                effort: self.reasoning_effort.clone(),
                summary: self.reasoning_summary,
                generate_summary: None,
            })
        } else {
            None
        };

        let metadata = if self.metadata.is_empty() {
            None
        } else {
            Some(self.metadata.iter().cloned().collect::<BTreeMap<_, _>>())
        };

        ModelSettings {
            temperature: self.temperature,
            top_p: self.top_p,
            frequency_penalty: self.frequency_penalty,
            presence_penalty: self.presence_penalty,
            tool_choice: self.tool_choice.clone().map(ToolChoice::named),
            parallel_tool_calls: self.parallel_tool_calls,
            truncation: self.truncation,
            max_tokens: self.max_tokens,
            reasoning,
            metadata,
            store: self.store,
        }
    }
}

/// Parse a single KEY=VALUE pair
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{}`", s))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{}`", s));
    }
    Ok((key.to_string(), value.to_string()))
}
