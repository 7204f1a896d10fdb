//! Storage trait for season-partitioned entities.

use crate::entity::{GameLog, Player, PlayerKey, Season, Team, TeamGame, TeamKey};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Abstract trait for keyed stats storage.
///
/// Contract notes:
/// - Upserts are keyed on the entity's composite key; a second upsert with
///   the same key updates in place.
/// - `replace_game_logs` / `replace_team_games` swap the entire history set
///   for an owner atomically. Concurrent readers observe either the old set
///   or the new set, never a mix.
/// - Ordered scans return rows sorted by the named criterion; history reads
///   return rows ordered by game date descending (most recent first).
#[async_trait::async_trait]
pub trait StatsStore: Send + Sync {
    // --- Seasons ---

    /// Find the currently active season, if any.
    async fn active_season(&self) -> Result<Option<Season>>;

    /// Find a season by its ID.
    async fn find_season(&self, season_id: &str) -> Result<Option<Season>>;

    /// Insert or update a season. Activating a season deactivates every
    /// other season, preserving the at-most-one-active invariant.
    async fn upsert_season(&self, season: Season) -> Result<()>;

    // --- Teams ---

    /// Insert or update a single team row.
    async fn upsert_team(&self, team: Team) -> Result<()>;

    /// Persist a batch of team rows as one write.
    async fn save_teams(&self, teams: Vec<Team>) -> Result<()>;

    /// Find a team by composite key.
    async fn find_team(&self, key: &TeamKey) -> Result<Option<Team>>;

    /// All teams for a season ordered by points descending (standings).
    async fn teams_by_points(&self, season: &str) -> Result<Vec<Team>>;

    // --- Players ---

    /// Insert or update a single player row.
    async fn upsert_player(&self, player: Player) -> Result<()>;

    /// Persist a batch of player rows as one write.
    async fn save_players(&self, players: Vec<Player>) -> Result<()>;

    /// Find a player by composite key.
    async fn find_player(&self, key: &PlayerKey) -> Result<Option<Player>>;

    /// All players for a season ordered by points descending.
    async fn players_by_points(&self, season: &str) -> Result<Vec<Player>>;

    /// Players on a team for a season.
    async fn players_by_team(&self, team_code: &str, season: &str) -> Result<Vec<Player>>;

    // --- Player game logs ---

    /// Atomically replace the full game log set for a player+season.
    async fn replace_game_logs(&self, key: &PlayerKey, logs: Vec<GameLog>) -> Result<()>;

    /// Game logs for a player+season, most recent first.
    async fn game_logs_desc(&self, key: &PlayerKey) -> Result<Vec<GameLog>>;

    /// The most recent `limit` game logs for a player+season.
    async fn recent_game_logs(&self, key: &PlayerKey, limit: usize) -> Result<Vec<GameLog>>;

    // --- Team games ---

    /// Atomically replace the full game set for a team+season.
    async fn replace_team_games(&self, key: &TeamKey, games: Vec<TeamGame>) -> Result<()>;

    /// Team games for a team+season, most recent first.
    async fn team_games_desc(&self, key: &TeamKey) -> Result<Vec<TeamGame>>;

    /// The most recent `limit` games for a team+season.
    async fn recent_team_games(&self, key: &TeamKey, limit: usize) -> Result<Vec<TeamGame>>;
}
