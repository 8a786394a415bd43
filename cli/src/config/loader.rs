//! Layered settings loader for the msettings CLI
//!
//! Layers are applied lowest priority first, each overlaid with
//! `ModelSettings::resolve`:
//! 1. User config: <config_dir>/model-settings/settings.json
//! 2. Project: ./model_settings.json or ./.model-settings/settings.json
//! 3. Each --file path, in command-line order
//! 4. Flag overrides (highest priority)

use anyhow::{anyhow, Context, Result};
use model_settings::ModelSettings;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name looked up inside settings directories
const SETTINGS_FILE: &str = "settings.json";

/// Where a settings layer came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerSource {
    /// Per-user settings file
    User(PathBuf),
    /// Settings file found in the working directory
    Project(PathBuf),
    /// Settings file passed with --file
    File(PathBuf),
    /// Per-field command-line flags
    Flags,
}

impl fmt::Display for LayerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerSource::User(path) => write!(f, "user:{}", path.display()),
            LayerSource::Project(path) => write!(f, "project:{}", path.display()),
            LayerSource::File(path) => write!(f, "file:{}", path.display()),
            LayerSource::Flags => f.write_str("flags"),
        }
    }
}

/// One loaded layer of settings
#[derive(Debug, Clone)]
pub struct SettingsLayer {
    pub source: LayerSource,
    pub settings: ModelSettings,
}

/// Overlay layers in order, lowest priority first
pub fn resolve_layers(layers: &[SettingsLayer]) -> ModelSettings {
    ModelSettings::resolve_all(layers.iter().map(|layer| &layer.settings))
}

/// For every settings field, the highest-priority layer that sets it
pub fn field_sources(layers: &[SettingsLayer]) -> Vec<(&'static str, Option<&LayerSource>)> {
    ModelSettings::FIELDS
        .iter()
        .map(|field| {
            let source = layers
                .iter()
                .rev()
                .find(|layer| layer.settings.present_fields().contains(field))
                .map(|layer| &layer.source);
            (*field, source)
        })
        .collect()
}

/// CLI settings loader
pub struct SettingsLoader {
    /// Explicit settings files/directories, lowest priority first
    files: Vec<PathBuf>,
    /// Settings built from per-field flags
    flag_overrides: ModelSettings,
    /// Whether to look for user and project settings files
    discovery: bool,
    /// Directory searched for project settings (defaults to cwd)
    working_dir: Option<PathBuf>,
    /// Base directory for user settings (defaults to the platform config dir)
    user_config_dir: Option<PathBuf>,
}

impl SettingsLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            flag_overrides: ModelSettings::new(),
            discovery: true,
            working_dir: None,
            user_config_dir: None,
        }
    }

    /// Add an explicit settings file or directory
    pub fn with_file(mut self, path: PathBuf) -> Self {
        self.files.push(path);
        self
    }

    /// Set the flag overrides layer
    pub fn with_flag_overrides(mut self, settings: ModelSettings) -> Self {
        self.flag_overrides = settings;
        self
    }

    /// Enable or disable user/project discovery
    pub fn with_discovery(mut self, discovery: bool) -> Self {
        self.discovery = discovery;
        self
    }

    /// Set the directory searched for project settings
    pub fn with_working_dir(mut self, path: PathBuf) -> Self {
        self.working_dir = Some(path);
        self
    }

    /// Set the base directory for user settings
    pub fn with_user_config_dir(mut self, path: PathBuf) -> Self {
        self.user_config_dir = Some(path);
        self
    }

    /// Load every layer, lowest priority first
    pub async fn load_layers(&self) -> Result<Vec<SettingsLayer>> {
        let mut layers = Vec::new();

        if self.discovery {
            if let Some(layer) = self.try_load_user().await? {
                layers.push(layer);
            }
            if let Some(layer) = self.try_load_project().await? {
                layers.push(layer);
            }
        } else {
            debug!("Settings discovery disabled");
        }

        for path in &self.files {
            let settings = self
                .load_from_path(path)
                .await
                .with_context(|| format!("Failed to load settings from: {}", path.display()))?;
            layers.push(SettingsLayer {
                source: LayerSource::File(path.clone()),
                settings,
            });
        }

        if !self.flag_overrides.is_empty() {
            debug!(
                fields = ?self.flag_overrides.present_fields(),
                "Applying flag overrides"
            );
            layers.push(SettingsLayer {
                source: LayerSource::Flags,
                settings: self.flag_overrides.clone(),
            });
        }

        info!("Loaded {} settings layer(s)", layers.len());
        Ok(layers)
    }

    /// Load all layers and resolve them into effective settings
    pub async fn load(&self) -> Result<ModelSettings> {
        let layers = self.load_layers().await?;
        Ok(resolve_layers(&layers))
    }

    /// Try loading the per-user settings file
    async fn try_load_user(&self) -> Result<Option<SettingsLayer>> {
        let Some(config_dir) = self.user_config_dir.clone().or_else(dirs::config_dir) else {
            debug!("No user config directory available");
            return Ok(None);
        };

        let path = config_dir.join("model-settings").join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let settings = self.load_file(&path).await?;
        Ok(Some(SettingsLayer {
            source: LayerSource::User(path),
            settings,
        }))
    }

    /// Try loading project settings from the working directory
    async fn try_load_project(&self) -> Result<Option<SettingsLayer>> {
        let dir = match &self.working_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        // Try ./model_settings.json first
        let candidates = [
            dir.join("model_settings.json"),
            dir.join(".model-settings").join(SETTINGS_FILE),
        ];

        for path in candidates {
            if path.exists() {
                let settings = self.load_file(&path).await?;
                return Ok(Some(SettingsLayer {
                    source: LayerSource::Project(path),
                    settings,
                }));
            }
        }

        Ok(None)
    }

    /// Load settings from a specific path (file or directory)
    async fn load_from_path(&self, path: &Path) -> Result<ModelSettings> {
        if path.is_file() {
            self.load_file(path).await
        } else if path.is_dir() {
            let settings_file = path.join(SETTINGS_FILE);
            if settings_file.exists() {
                self.load_file(&settings_file).await
            } else {
                Err(anyhow!(
                    "No {} found in directory: {}",
                    SETTINGS_FILE,
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Settings path does not exist: {}", path.display()))
        }
    }

    /// Load a single settings file
    async fn load_file(&self, path: &Path) -> Result<ModelSettings> {
        debug!("Reading settings file: {}", path.display());

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        ModelSettings::from_json(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}
