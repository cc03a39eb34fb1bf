//! Configuration for the intake service
//!
//! Layering (later wins):
//! 1. Built-in defaults
//! 2. ~/.intake/config.toml (user defaults)
//! 3. ./intake.toml (project-specific)
//! 4. Explicit `--config` file
//! 5. Environment (`DATABASE_URL`, `INTAKE_BIND`)
//!
//! Files are merged table-by-table before deserializing, so a local file
//! only needs the keys it overrides.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::TableName;

/// Configuration load error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntakeConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub store: StoreOptions,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Connection descriptor, passed opaquely to the pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection URL
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Pool size; 1 reproduces a single-connection model
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Upper bound on waiting for a connection
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// URL with the password (if any) replaced by `***`, for display.
    pub fn redacted_url(&self) -> String {
        redact_url(&self.url)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

/// Behaviour switches for the request store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreOptions {
    /// Request table name
    #[serde(default)]
    pub table: TableName,

    /// Verify the table exists before listing, reporting NotFound if absent
    #[serde(default = "default_true")]
    pub check_table_on_list: bool,

    /// Report NotFound when a status update matches no row
    #[serde(default)]
    pub strict_updates: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            table: TableName::default(),
            check_table_on_list: true,
            strict_updates: false,
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:5000)
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    /// Allow any origin
    ///
    /// WARNING: Setting this to true allows any origin.
    #[serde(default)]
    pub cors_permissive: bool,

    /// Origins allowed when not permissive
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_permissive: false,
            allowed_origins: default_allowed_origins(),
        }
    }
}

// Default value functions for serde
fn default_database_url() -> String {
    "postgres://localhost/intake".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

/// Get the intake config directory path (~/.intake)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".intake"))
}

/// Path of the user-level config file (~/.intake/config.toml)
pub fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Name of the project-level config file, looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "intake.toml";

impl IntakeConfig {
    /// Load configuration from the standard locations plus an optional
    /// explicit file, then apply environment overrides.
    ///
    /// Implicit files that fail to parse are skipped with a warning; an
    /// explicit file must exist and parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut merged = toml::Table::new();

        let implicit = global_config_path()
            .into_iter()
            .chain(std::iter::once(PathBuf::from(LOCAL_CONFIG_FILE)));
        for path in implicit {
            if !path.exists() {
                continue;
            }
            match read_table(&path) {
                Ok(table) => {
                    debug!("Loaded config from {}", path.display());
                    merge_tables(&mut merged, table);
                }
                Err(e) => warn!("Skipping config: {}", e),
            }
        }

        if let Some(path) = explicit {
            let table = read_table(path)?;
            debug!("Loaded explicit config from {}", path.display());
            merge_tables(&mut merged, table);
        }

        let mut config = Self::from_table(merged)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a single TOML document (no layering, no environment).
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(s).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        Self::from_table(table)
    }

    fn from_table(table: toml::Table) -> Result<Self, ConfigError> {
        toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Invalid(e.to_string()))
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database.url = url;
        }
        if let Some(bind) = lookup("INTAKE_BIND").filter(|v| !v.is_empty()) {
            self.server.bind = bind
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("INTAKE_BIND is not an address: {bind}")))?;
        }
        Ok(())
    }
}

fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Deep-merge `overlay` into `base`; nested tables merge, other values replace.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(incoming) => {
                if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                    merge_tables(existing, incoming);
                } else {
                    base.insert(key, toml::Value::Table(incoming));
                }
            }
            other => {
                base.insert(key, other);
            }
        }
    }
}

fn redact_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let rest = &url[scheme_end + 3..];
    let Some(at) = rest.rfind('@') else {
        return url.to_string();
    };
    let userinfo = &rest[..at];
    match userinfo.find(':') {
        Some(colon) => format!(
            "{}{}:***{}",
            &url[..scheme_end + 3],
            &userinfo[..colon],
            &rest[at..]
        ),
        None => url.to_string(),
    }
}
