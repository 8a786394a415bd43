//! Model settings configuration types
//!
//! Only exports pure data types. All file discovery and loading lives in the CLI layer.

pub mod model_settings;
pub mod types;

pub use model_settings::ModelSettings;
pub use types::{Reasoning, ReasoningEffort, ReasoningSummary, ToolChoice, Truncation};
