//! Subcommand implementations

pub mod requests;
pub mod serve;

pub use requests::{
    run_create, run_init_db, run_list, run_ping, run_set_status, run_stats, CreateArgs, ListArgs,
    SetStatusArgs,
};
pub use serve::{run_serve, ServeArgs};

use anyhow::{Context, Result};
use intake_server::{IntakeConfig, RequestStore};

/// Build a store from the effective configuration.
pub(crate) fn open_store(config: &IntakeConfig) -> Result<RequestStore> {
    RequestStore::connect(&config.database, config.store.clone())
        .context("Failed to configure database connection")
}
