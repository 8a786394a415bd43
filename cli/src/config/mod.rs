//! Settings discovery, loading and flag overrides for the CLI

pub mod flags;
pub mod loader;

pub use flags::SettingsFlags;
pub use loader::{field_sources, resolve_layers, LayerSource, SettingsLayer, SettingsLoader};
