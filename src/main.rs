//! Loft monitor - performance and health monitoring for the loft booking platform
//!
//! Runs the monitoring services over the in-process store until SIGINT or SIGTERM.

#![allow(missing_docs)]

use anyhow::Context;
use clap::Parser;
use loft_monitor::{Config, HealthState, InMemoryStore, LoftMonitor, OsSignalSource, build_info};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

/// Tables the health checks expect to exist
const TABLES: [&str; 3] = ["lofts", "reservations", "loft_availability"];

#[derive(Debug, Parser)]
#[command(name = "loft-monitor", version, about)]
struct Args {
    /// YAML configuration file; defaults and `LOFT_MONITOR_*` variables are used otherwise
    #[arg(short, long, env = "LOFT_MONITOR_CONFIG")]
    config: Option<PathBuf>,

    /// JSON file mapping table names to rows, loaded into the store at start-up
    #[arg(long, env = "LOFT_MONITOR_FIXTURES")]
    fixtures: Option<PathBuf>,

    /// Log filter directive, overrides the configured level
    #[arg(long)]
    log_level: Option<String>,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,

    /// Run one health check, print the status and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path).await?,
        None => Config::from_env()?,
    };
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    config.logging.json |= args.json_logs;
    loft_monitor::utils::logging::init_logging(&config.logging)?;

    let build = build_info();
    info!(
        version = build.version,
        git_hash = build.git_hash,
        "Starting loft monitor"
    );

    let store = InMemoryStore::new();
    for table in TABLES {
        store.create_table(table);
    }
    if let Some(path) = &args.fixtures {
        load_fixtures(&store, path).await?;
    }

    let monitor = LoftMonitor::with_store(config, store, Arc::new(OsSignalSource));

    if !args.once {
        monitor.run().await?;
        info!("Loft monitor stopped");
        return Ok(ExitCode::SUCCESS);
    }

    let service = monitor.service();
    let result = service.initialize(None).await;
    let status = monitor.health().perform_health_check().await;
    println!("{}", serde_json::to_string_pretty(&status)?);

    if let Err(e) = service.shutdown().await {
        error!("Shutdown failed: {}", e);
    }

    if result.success && status.status != HealthState::Critical {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

async fn load_fixtures(store: &InMemoryStore, path: &Path) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read fixtures file {:?}", path))?;
    let tables: HashMap<String, Vec<Value>> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid fixtures file {:?}", path))?;

    for (table, rows) in tables {
        info!(table = %table, rows = rows.len(), "Loading fixtures");
        store.create_table(&table);
        for row in rows {
            store.insert(&table, row);
        }
    }
    Ok(())
}
