//! Service configuration.

use anyhow::{Context, Result};
use nhl_client::NhlApiConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for the sync service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// NHL API endpoints.
    pub nhl: NhlApiConfig,

    /// Sync pipeline settings.
    pub sync: SyncConfig,

    /// Derived-statistics thresholds.
    pub stats: StatsConfig,

    /// Scheduler settings.
    pub scheduler: SchedulerConfig,
}

/// Sync pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Maximum concurrent per-player detail fetches.
    pub player_fetch_concurrency: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { player_fetch_concurrency: 8 }
    }
}

/// Thresholds for the derived-statistics engine. Defaults mirror the
/// provider-facing product behavior and should not be changed casually.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Number of recent games in the hot-rating window.
    pub hot_rating_window: usize,

    /// A player is hot above this rating (requires a window of at least 3).
    pub hot_rating_threshold: f64,

    /// A player is cold below this rating (requires a window of at least 4).
    pub cold_rating_threshold: f64,

    /// Consecutive games with a point for the player point-streak flag.
    pub point_streak_games: i32,

    /// Consecutive wins for the team hot flag.
    pub team_hot_win_streak: i32,

    /// Consecutive losses for the team cold flag.
    pub team_cold_loss_streak: i32,

    /// Consecutive wins for the team point-streak flag.
    pub team_point_streak_wins: i32,

    /// Recent-form window for the last-N win percentage.
    pub recent_form_window: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            hot_rating_window: 10,
            hot_rating_threshold: 1.5,
            cold_rating_threshold: 0.2,
            point_streak_games: 5,
            team_hot_win_streak: 3,
            team_cold_loss_streak: 3,
            team_point_streak_wins: 5,
            recent_form_window: 10,
        }
    }
}

/// Scheduler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Hours between scheduled full syncs.
    pub sync_interval_hours: u64,

    /// Retry configuration for scheduled runs.
    pub retry: RetryConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { sync_interval_hours: 6, retry: RetryConfig::default() }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts.
    pub max_retries: u32,

    /// Initial retry delay in seconds.
    pub initial_delay_secs: u64,

    /// Maximum retry delay in seconds.
    pub max_delay_secs: u64,

    /// Backoff multiplier.
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_secs: 5,
            max_delay_secs: 300,
            backoff_multiplier: 2.0,
        }
    }
}

impl ServiceConfig {
    /// Load configuration: TOML file (when given) layered under environment
    /// overrides, then validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let loaded = config::Config::builder()
                    .add_source(config::File::from(path))
                    .build()
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                loaded.try_deserialize().context("Failed to parse configuration")?
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("WHOSHOT_NHL_BASE_URL") {
            self.nhl.base_url = url;
        }

        if let Ok(url) = std::env::var("WHOSHOT_NHL_STATS_BASE_URL") {
            self.nhl.stats_base_url = url;
        }

        if let Ok(hours) = std::env::var("WHOSHOT_SYNC_INTERVAL_HOURS") {
            if let Ok(hours) = hours.parse() {
                self.scheduler.sync_interval_hours = hours;
            }
        }

        if let Ok(concurrency) = std::env::var("WHOSHOT_PLAYER_FETCH_CONCURRENCY") {
            if let Ok(concurrency) = concurrency.parse() {
                self.sync.player_fetch_concurrency = concurrency;
            }
        }

        if let Ok(window) = std::env::var("WHOSHOT_HOT_RATING_WINDOW") {
            if let Ok(window) = window.parse() {
                self.stats.hot_rating_window = window;
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.sync.player_fetch_concurrency == 0 {
            return Err(anyhow::anyhow!("player_fetch_concurrency must be at least 1"));
        }

        if self.stats.hot_rating_window == 0 {
            return Err(anyhow::anyhow!("hot_rating_window must be at least 1"));
        }

        if self.scheduler.sync_interval_hours == 0 {
            return Err(anyhow::anyhow!("sync_interval_hours must be at least 1"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = StatsConfig::default();
        assert_eq!(config.hot_rating_window, 10);
        assert_eq!(config.hot_rating_threshold, 1.5);
        assert_eq!(config.cold_rating_threshold, 0.2);
        assert_eq!(config.point_streak_games, 5);
        assert_eq!(config.team_hot_win_streak, 3);
        assert_eq!(config.team_cold_loss_streak, 3);
        assert_eq!(config.team_point_streak_wins, 5);
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut config = ServiceConfig::default();
        config.sync.player_fetch_concurrency = 0;
        assert!(config.validate().is_err());
    }
}
