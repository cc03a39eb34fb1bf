//! One-shot store operations for operators

use anyhow::{Context, Result};
use clap::Parser;
use intake_server::models::{ListFilter, Request};
use intake_server::IntakeConfig;

use super::open_store;

#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Customer name
    #[arg(long)]
    pub name: String,

    /// Contact phone
    #[arg(long)]
    pub phone: String,

    /// Request text
    #[arg(long)]
    pub message: String,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only requests with this status
    #[arg(long)]
    pub status: Option<String>,

    /// Case-insensitive text search over name, phone and message
    #[arg(long)]
    pub query: Option<String>,

    /// Output as JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct SetStatusArgs {
    /// Request id
    pub id: i64,

    /// New status label (e.g. in_progress, completed)
    pub status: String,
}

/// Create the request table if missing
pub async fn run_init_db(config: &IntakeConfig) -> Result<()> {
    let store = open_store(config)?;
    let outcome = store.ensure_schema().await.context("Schema bootstrap failed")?;
    println!("table '{}': {}", config.store.table, outcome);
    Ok(())
}

/// Database round-trip
pub async fn run_ping(config: &IntakeConfig) -> Result<()> {
    let store = open_store(config)?;
    let result = store.health_check().await.context("Database health check failed")?;
    println!("ok (result = {})", result);
    Ok(())
}

pub async fn run_create(args: CreateArgs, config: &IntakeConfig) -> Result<()> {
    let store = open_store(config)?;
    store
        .create(&args.name, &args.phone, &args.message)
        .await
        .context("Failed to create request")?;
    println!("request created");
    Ok(())
}

pub async fn run_list(args: ListArgs, config: &IntakeConfig) -> Result<()> {
    let filter = ListFilter::from_params(args.status.as_deref(), args.query.as_deref())?;
    let store = open_store(config)?;
    let requests = store.list(&filter).await.context("Failed to list requests")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&requests)?);
    } else {
        print_table(&requests);
    }
    Ok(())
}

pub async fn run_stats(config: &IntakeConfig) -> Result<()> {
    let store = open_store(config)?;
    let stats = store.stats().await.context("Failed to count requests")?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

pub async fn run_set_status(args: SetStatusArgs, config: &IntakeConfig) -> Result<()> {
    let store = open_store(config)?;
    let affected = store
        .update_status(args.id, &args.status)
        .await
        .context("Failed to update status")?;

    if affected == 0 {
        // Not an error by default; say so rather than staying silent
        println!("no request with id {} (nothing changed)", args.id);
    } else {
        println!("request {} -> {}", args.id, args.status.trim());
    }
    Ok(())
}

fn print_table(requests: &[Request]) {
    if requests.is_empty() {
        println!("no requests");
        return;
    }
    for r in requests {
        println!(
            "#{:<6} {:<12} {:<28} {:<20} {:<20} {}",
            r.id,
            r.status,
            r.created_at,
            truncate(&r.name, 20),
            r.phone,
            truncate(&r.message, 60)
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Перезвоните", 5), "Пере…");
    }
}
