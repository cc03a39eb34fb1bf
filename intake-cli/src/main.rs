//! intake CLI - request intake service
//!
//! Entry point for the `intake` binary, which provides:
//! - The HTTP server (`serve`), bootstrapping the schema first
//! - Schema bootstrap on its own (`init-db`)
//! - One-shot store operations (`ping`, `create`, `list`, `stats`, `set-status`)
//! - Configuration inspection (`config`)

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "intake",
    author,
    version,
    about = "Request intake service: collect, list and triage customer requests"
)]
struct Cli {
    /// Config file (layered over ~/.intake/config.toml and ./intake.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Database URL (overrides config)
    #[arg(long, global = true, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Bootstrap the schema and run the HTTP API server
    Serve(commands::ServeArgs),
    /// Create the request table if it does not exist
    InitDb,
    /// Check database connectivity
    Ping,
    /// Submit a new request
    Create(commands::CreateArgs),
    /// List requests, newest first
    List(commands::ListArgs),
    /// Show request counts per status
    Stats,
    /// Overwrite the status of a request
    SetStatus(commands::SetStatusArgs),
    /// Inspect configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();
    config::load_dotenv();

    // clap reads DATABASE_URL before .env files are loaded; pick it up again
    let database_url = cli
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok());
    let config = config::load(cli.config.as_deref(), database_url)?;

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, config).await?,
        Commands::InitDb => commands::run_init_db(&config).await?,
        Commands::Ping => commands::run_ping(&config).await?,
        Commands::Create(args) => commands::run_create(args, &config).await?,
        Commands::List(args) => commands::run_list(args, &config).await?,
        Commands::Stats => commands::run_stats(&config).await?,
        Commands::SetStatus(args) => commands::run_set_status(args, &config).await?,
        Commands::Config(args) => config::run_config(args, &config)?,
    }
    Ok(())
}
