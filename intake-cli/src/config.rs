//! Configuration loading and the `config` subcommand

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use intake_server::config::{config_dir, global_config_path, LOCAL_CONFIG_FILE};
use intake_server::IntakeConfig;
use tracing::debug;

/// Load environment variables from .env files
///
/// Priority order (highest to lowest):
/// 1. Environment variables already set
/// 2. Current directory .env
/// 3. ~/.intake/.env
///
/// dotenvy never overwrites variables that are already set.
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded .env from current directory: {}", path.display());
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            match dotenvy::from_path(&env_file) {
                Ok(()) => debug!("Loaded .env from {}", env_file.display()),
                Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
            }
        }
    }
}

/// Load the layered config and apply a `--database-url` override.
pub fn load(explicit: Option<&Path>, database_url: Option<String>) -> Result<IntakeConfig> {
    let mut config = IntakeConfig::load(explicit).context("Failed to load configuration")?;
    if let Some(url) = database_url {
        config.database.url = url;
    }
    Ok(config)
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML (password redacted)
    Show,
    /// Show the config file locations that are consulted
    Path,
}

pub fn run_config(args: ConfigArgs, config: &IntakeConfig) -> Result<()> {
    match args.command {
        ConfigCommands::Show => run_show(config),
        ConfigCommands::Path => run_path(),
    }
}

fn run_show(config: &IntakeConfig) -> Result<()> {
    let mut shown = config.clone();
    shown.database.url = config.database.redacted_url();
    let toml_str = toml::to_string_pretty(&shown).context("Failed to serialize config")?;
    print!("{}", toml_str);
    Ok(())
}

fn run_path() -> Result<()> {
    let global = global_config_path().unwrap_or_else(|| PathBuf::from("~/.intake/config.toml"));
    println!("{}", global.display());
    println!("{}", LOCAL_CONFIG_FILE);
    Ok(())
}
