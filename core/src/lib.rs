//! # model-settings Core
//!
//! Optional parameters for a language-model call and the rule for layering them.
//!
//! [`ModelSettings`] holds sampling, penalty, truncation, tool-choice and
//! related options, each independently optional. [`ModelSettings::resolve`]
//! overlays one instance on another so that agent-level defaults can be
//! refined per run or per call without mutating either side.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{
    ModelSettings, Reasoning, ReasoningEffort, ReasoningSummary, ToolChoice, Truncation,
};
pub use error::{ConfigError, Error, Result};

/// Current version of the model-settings library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing with a specific debug mode
///
/// `RUST_LOG` still wins when it is set.
pub fn init_tracing_with_debug(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
