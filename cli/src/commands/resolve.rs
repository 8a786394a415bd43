//! Print the effective settings after overlaying all layers

use anyhow::Result;
use tracing::debug;

use crate::config::SettingsLoader;

/// Resolve all settings layers and print the result as JSON
pub async fn resolve_command(config_loader: SettingsLoader, compact: bool) -> Result<()> {
    let settings = config_loader.load().await?;
    debug!(fields = ?settings.present_fields(), "Resolved settings");

    let output = if compact {
        serde_json::to_string(&settings)?
    } else {
        serde_json::to_string_pretty(&settings)?
    };
    println!("{}", output);

    Ok(())
}
