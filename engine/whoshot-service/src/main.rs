//! Whos Hot sync service entry point.

use clap::Parser;
use nhl_client::{NhlApi, NhlHttpClient};
use stats_store::{InMemoryStore, StatsStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use whoshot_service::{initialize_logging, ServiceConfig, SyncScheduler, SyncService};

#[derive(Debug, Parser)]
#[command(name = "whoshot", about = "NHL sync-and-derive pipeline service")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run one full sync and exit instead of scheduling.
    #[arg(long)]
    once: bool,

    /// Season to sync (e.g. 20252026); defaults to the current season.
    #[arg(long)]
    season: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    initialize_logging()?;

    let args = Args::parse();
    let config = ServiceConfig::load(args.config.as_deref())?;

    info!("Starting Whos Hot sync service v{}", env!("CARGO_PKG_VERSION"));
    info!("Current NHL season: {}", season_resolver::current_season_id());

    let api: Arc<dyn NhlApi> = Arc::new(NhlHttpClient::new(config.nhl.clone())?);
    let store: Arc<dyn StatsStore> = Arc::new(InMemoryStore::new());
    let scheduler_config = config.scheduler.clone();
    let service = Arc::new(SyncService::new(api, store, config));

    if args.once {
        let report = service.run_full_sync(args.season.as_deref()).await?;
        info!(
            "Sync completed: {} teams, {} players, {} player failures",
            report.teams, report.players, report.player_failures
        );
        return Ok(());
    }

    SyncScheduler::new(service, scheduler_config).start().await
}
