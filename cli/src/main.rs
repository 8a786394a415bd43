//! # msettings CLI
//!
//! Command-line interface for model settings.
//!
//! ## Usage
//!
//! - `msettings` / `msettings resolve` - Print the effective settings as JSON
//! - `msettings explain` - Show which layer supplied each setting
//!
//! Settings are layered from the user config directory, the project
//! directory, `--file` arguments and per-field flags, in that order.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

use commands::{explain_command, resolve_command};
use config::{SettingsFlags, SettingsLoader};

/// msettings - Resolve layered LLM call settings
#[derive(Parser)]
#[command(name = "msettings")]
#[command(version = model_settings::VERSION)]
#[command(about = "Resolve layered LLM call settings")]
#[command(long_about = None)]
struct Cli {
    /// Settings file or directory; repeatable, later files take precedence
    #[arg(short, long = "file", global = true)]
    files: Vec<PathBuf>,

    /// Do not look for user or project settings files
    #[arg(long, global = true)]
    no_discovery: bool,

    /// Directory searched for project settings
    #[arg(long, global = true)]
    working_dir: Option<PathBuf>,

    /// Base directory for user settings
    #[arg(long, global = true, env = "MODEL_SETTINGS_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    flags: SettingsFlags,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective settings as JSON
    Resolve {
        /// Print JSON on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Show which layer supplied each setting
    Explain,
}

/// Build a settings loader from CLI arguments
fn build_config_loader(cli: &Cli) -> SettingsLoader {
    let mut loader = SettingsLoader::new()
        .with_discovery(!cli.no_discovery)
        .with_flag_overrides(cli.flags.to_settings());

    for path in &cli.files {
        loader = loader.with_file(path.clone());
    }

    if let Some(working_dir) = &cli.working_dir {
        loader = loader.with_working_dir(working_dir.clone());
    }

    if let Some(config_dir) = &cli.config_dir {
        loader = loader.with_user_config_dir(config_dir.clone());
    }

    loader
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the settings
    model_settings::init_tracing_with_debug(cli.verbose);

    let config_loader = build_config_loader(&cli);

    match cli.command {
        Some(Commands::Explain) => explain_command(config_loader).await,
        Some(Commands::Resolve { compact }) => resolve_command(config_loader, compact).await,
        None => resolve_command(config_loader, false).await,
    }
}
