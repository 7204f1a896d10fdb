//! HTTP client for the NHL APIs.

use crate::error::NhlClientError;
use crate::models::{
    GameLogResponse, PlayerLanding, ScheduleResponse, SkaterStatsResponse, StandingsResponse,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Provider endpoints and client settings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NhlApiConfig {
    /// Web API base URL.
    pub base_url: String,

    /// Stats REST API base URL.
    pub stats_base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for NhlApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-web.nhle.com".to_string(),
            stats_base_url: "https://api.nhle.com/stats/rest".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Abstract provider seam. The sync pipeline depends on this trait so tests
/// can drive it with scripted snapshots.
#[async_trait::async_trait]
pub trait NhlApi: Send + Sync {
    /// Current league standings.
    async fn standings(&self) -> Result<StandingsResponse, NhlClientError>;

    /// League-wide skater season totals for a season.
    async fn skater_stats(&self, season_id: &str) -> Result<SkaterStatsResponse, NhlClientError>;

    /// Full-season schedule for a club.
    async fn team_schedule(
        &self,
        team_code: &str,
        season_id: &str,
    ) -> Result<ScheduleResponse, NhlClientError>;

    /// Game-by-game feed for a player. `None` when the provider has no feed
    /// for the player (e.g. no games played yet).
    async fn player_game_log(
        &self,
        player_id: i64,
        season_id: &str,
        game_type: i32,
    ) -> Result<Option<GameLogResponse>, NhlClientError>;

    /// Player landing page. `None` when the provider has no page for the id.
    async fn player_landing(&self, player_id: i64)
        -> Result<Option<PlayerLanding>, NhlClientError>;
}

/// reqwest-backed [`NhlApi`] implementation.
pub struct NhlHttpClient {
    config: NhlApiConfig,
    client: reqwest::Client,
}

impl NhlHttpClient {
    pub fn new(config: NhlApiConfig) -> Result<Self, NhlClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// GET a JSON document. Decode failures are reported separately from
    /// transport failures so callers can classify malformed snapshots.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, NhlClientError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NhlClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| NhlClientError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// GET a JSON document where a 404 means "no such feed" rather than an
    /// error.
    async fn get_json_optional<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Option<T>, NhlClientError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(NhlClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| NhlClientError::Decode { url: url.to_string(), message: e.to_string() })
    }
}

#[async_trait::async_trait]
impl NhlApi for NhlHttpClient {
    async fn standings(&self) -> Result<StandingsResponse, NhlClientError> {
        let url = format!("{}/v1/standings/now", self.config.base_url);
        self.get_json(&url).await
    }

    async fn skater_stats(&self, season_id: &str) -> Result<SkaterStatsResponse, NhlClientError> {
        // cayenneExp filters to regular-season rows for the requested season.
        let url = format!(
            "{}/en/skater/summary?limit=-1&cayenneExp=seasonId%3D{}%20and%20gameTypeId%3D2",
            self.config.stats_base_url, season_id
        );
        self.get_json(&url).await
    }

    async fn team_schedule(
        &self,
        team_code: &str,
        season_id: &str,
    ) -> Result<ScheduleResponse, NhlClientError> {
        let url = format!(
            "{}/v1/club-schedule-season/{}/{}",
            self.config.base_url, team_code, season_id
        );
        self.get_json(&url).await
    }

    async fn player_game_log(
        &self,
        player_id: i64,
        season_id: &str,
        game_type: i32,
    ) -> Result<Option<GameLogResponse>, NhlClientError> {
        let url = format!(
            "{}/v1/player/{}/game-log/{}/{}",
            self.config.base_url, player_id, season_id, game_type
        );
        self.get_json_optional(&url).await
    }

    async fn player_landing(
        &self,
        player_id: i64,
    ) -> Result<Option<PlayerLanding>, NhlClientError> {
        let url = format!("{}/v1/player/{}/landing", self.config.base_url, player_id);
        self.get_json_optional(&url).await
    }
}
