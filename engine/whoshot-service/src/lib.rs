//! # whoshot-service
//!
//! Sync-and-derive engine for NHL standings and player statistics: pulls
//! provider snapshots, reconciles them into season-scoped durable records,
//! and recomputes rolling-window ratings, streaks, and hot/cold flags.
//!
//! The trigger surface is [`SyncService`]: each entry point validates the
//! season, runs the requested sync, and follows it with a derive pass as a
//! single logical unit of work, so derived fields are never computed
//! against a half-replaced history.

pub mod config;
pub mod error;
pub mod logging;
pub mod queries;
pub mod scheduler;
pub mod stats;
pub mod sync;

pub use config::{RetryConfig, SchedulerConfig, ServiceConfig, StatsConfig, SyncConfig};
pub use error::SyncError;
pub use logging::initialize_logging;
pub use queries::StatsQueries;
pub use scheduler::SyncScheduler;
pub use stats::StatsEngine;
pub use sync::SyncPipeline;

use nhl_client::NhlApi;
use stats_store::{Season, StatsStore};
use std::sync::Arc;
use tracing::info;

/// Counts from one trigger-level run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncReport {
    pub teams: usize,
    pub schedule_failures: usize,
    pub players: usize,
    pub player_failures: usize,
    pub headshots: usize,
    pub derived_players: usize,
    pub derived_teams: usize,
}

/// Trigger surface for the sync-and-derive pipeline. One instance serves
/// any number of seasons; runs for different seasons are independent.
pub struct SyncService {
    store: Arc<dyn StatsStore>,
    pipeline: SyncPipeline,
    engine: StatsEngine,
}

impl SyncService {
    pub fn new(api: Arc<dyn NhlApi>, store: Arc<dyn StatsStore>, config: ServiceConfig) -> Self {
        let pipeline = SyncPipeline::new(
            Arc::clone(&api),
            Arc::clone(&store),
            config.sync.clone(),
            config.stats.clone(),
        );
        let engine = StatsEngine::new(Arc::clone(&store), config.stats.clone());
        Self { store, pipeline, engine }
    }

    /// Sync standings and player statistics, then recompute derived
    /// statistics. `None` resolves to the current season.
    pub async fn run_full_sync(&self, season: Option<&str>) -> Result<SyncReport, SyncError> {
        let season = self.resolve_season(season)?;
        self.ensure_active_season().await?;
        info!("=== Starting full data synchronization for season {} ===", season);

        let standings = self.pipeline.sync_standings(&season).await?;
        let players = self.pipeline.sync_player_stats(&season).await?;
        let derived = self.engine.recalculate_season(&season).await?;

        info!("=== Full data synchronization completed for season {} ===", season);
        Ok(SyncReport {
            teams: standings.teams,
            schedule_failures: standings.schedule_failures,
            players: players.players,
            player_failures: players.failures,
            headshots: players.headshots,
            derived_players: derived.players,
            derived_teams: derived.teams,
        })
    }

    /// Sync standings only, then recompute derived statistics.
    pub async fn sync_standings_only(&self, season: Option<&str>) -> Result<SyncReport, SyncError> {
        let season = self.resolve_season(season)?;
        self.ensure_active_season().await?;

        let standings = self.pipeline.sync_standings(&season).await?;
        let derived = self.engine.recalculate_season(&season).await?;

        Ok(SyncReport {
            teams: standings.teams,
            schedule_failures: standings.schedule_failures,
            derived_players: derived.players,
            derived_teams: derived.teams,
            ..SyncReport::default()
        })
    }

    /// Sync player statistics only, then recompute derived statistics.
    pub async fn sync_player_stats_only(
        &self,
        season: Option<&str>,
    ) -> Result<SyncReport, SyncError> {
        let season = self.resolve_season(season)?;
        self.ensure_active_season().await?;

        let players = self.pipeline.sync_player_stats(&season).await?;
        let derived = self.engine.recalculate_season(&season).await?;

        Ok(SyncReport {
            players: players.players,
            player_failures: players.failures,
            headshots: players.headshots,
            derived_players: derived.players,
            derived_teams: derived.teams,
            ..SyncReport::default()
        })
    }

    /// Direct access to the pipeline, for targeted re-syncs.
    pub fn pipeline(&self) -> &SyncPipeline {
        &self.pipeline
    }

    /// Validate a caller-supplied season id, or resolve the current season.
    /// Invalid ids are rejected before any fetch and never coerced.
    fn resolve_season(&self, requested: Option<&str>) -> Result<String, SyncError> {
        match requested {
            Some(season) if season_resolver::is_valid_season_id(season) => {
                Ok(season.to_string())
            }
            Some(season) => Err(SyncError::InvalidSeasonId(season.to_string())),
            None => Ok(season_resolver::current_season_id()),
        }
    }

    /// Create the active season row on the first pipeline run.
    async fn ensure_active_season(&self) -> Result<(), SyncError> {
        if self.store.active_season().await?.is_some() {
            return Ok(());
        }

        let season_id = season_resolver::current_season_id();
        let display_name = season_resolver::format_display(&season_id);
        info!("No active season found; creating season {} ({})", season_id, display_name);

        self.store
            .upsert_season(Season {
                season_id,
                display_name,
                is_active: true,
                last_updated: Some(sync::now_timestamp()),
            })
            .await?;
        Ok(())
    }
}
