//! HTTP server command
//!
//! Bootstraps the schema, then serves until Ctrl+C/SIGTERM. A bootstrap
//! failure aborts startup.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use intake_server::http::run_server;
use intake_server::IntakeConfig;

use super::open_store;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides config; default 127.0.0.1:5000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins)
    #[arg(long)]
    pub cors_permissive: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, mut config: IntakeConfig) -> Result<()> {
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if args.cors_permissive {
        config.server.cors_permissive = true;
    }

    tracing::info!(
        database = %config.database.redacted_url(),
        table = %config.store.table,
        "Starting intake server on {}",
        config.server.bind
    );

    let store = open_store(&config)?;
    let outcome = store
        .ensure_schema()
        .await
        .context("Schema bootstrap failed; refusing to serve")?;
    tracing::info!(table = %config.store.table, "request table {}", outcome);

    run_server(store, &config.server)
        .await
        .context("Server error")?;

    Ok(())
}
