//! Show which layer supplied each effective setting

use anyhow::Result;

use crate::config::{field_sources, resolve_layers, SettingsLoader};

/// Print one line per settings field: name, effective value, source layer
pub async fn explain_command(config_loader: SettingsLoader) -> Result<()> {
    let layers = config_loader.load_layers().await?;
    let resolved = serde_json::to_value(resolve_layers(&layers))?;

    for (field, source) in field_sources(&layers) {
        let value = resolved
            .get(field)
            .map(|value| value.to_string())
            .unwrap_or_else(|| "-".to_string());
        let source = source
            .map(|source| source.to_string())
            .unwrap_or_else(|| "-".to_string());

        println!("{:<20} {:<32} {}", field, value, source);
    }

    Ok(())
}
