//! Read accessors over stored state.
//!
//! Pure reads; no derivation happens at query time. Callers validate season
//! ids with `season_resolver` before reaching this layer. A season with no
//! synced data yields empty result sets, not errors.

use stats_store::{GameLog, Player, PlayerKey, Season, StatsStore, StoreError, Team, TeamKey};
use std::cmp::Ordering;
use std::sync::Arc;

/// Query facade exposed to the (out-of-scope) HTTP read layer.
pub struct StatsQueries {
    store: Arc<dyn StatsStore>,
}

impl StatsQueries {
    pub fn new(store: Arc<dyn StatsStore>) -> Self {
        Self { store }
    }

    /// Team standings for a season, ordered by points.
    pub async fn standings(&self, season: &str) -> Result<Vec<Team>, StoreError> {
        self.store.teams_by_points(season).await
    }

    /// Player point standings for a season.
    pub async fn player_standings(&self, season: &str) -> Result<Vec<Player>, StoreError> {
        self.store.players_by_points(season).await
    }

    /// Players with an active point streak, longest streak first.
    pub async fn players_with_point_streaks(
        &self,
        season: &str,
    ) -> Result<Vec<Player>, StoreError> {
        let mut players = self.store.players_by_points(season).await?;
        players.retain(|player| player.current_point_streak > 0);
        players.sort_by(|a, b| b.current_point_streak.cmp(&a.current_point_streak));
        Ok(players)
    }

    /// Players with a known hot rating, hottest first.
    pub async fn hot_players(&self, season: &str) -> Result<Vec<Player>, StoreError> {
        let mut players = self.store.players_by_points(season).await?;
        players.retain(|player| player.hot_rating.is_some());
        players.sort_by(|a, b| {
            b.hot_rating.partial_cmp(&a.hot_rating).unwrap_or(Ordering::Equal)
        });
        Ok(players)
    }

    /// Teams with an active win streak, longest first.
    pub async fn team_win_streaks(&self, season: &str) -> Result<Vec<Team>, StoreError> {
        let mut teams = self.store.teams_by_points(season).await?;
        teams.retain(|team| team.current_win_streak > 0);
        teams.sort_by(|a, b| b.current_win_streak.cmp(&a.current_win_streak));
        Ok(teams)
    }

    /// Teams with an active loss streak, longest first.
    pub async fn team_loss_streaks(&self, season: &str) -> Result<Vec<Team>, StoreError> {
        let mut teams = self.store.teams_by_points(season).await?;
        teams.retain(|team| team.current_loss_streak > 0);
        teams.sort_by(|a, b| b.current_loss_streak.cmp(&a.current_loss_streak));
        Ok(teams)
    }

    /// A single team by code and season.
    pub async fn team(&self, team_code: &str, season: &str) -> Result<Option<Team>, StoreError> {
        self.store.find_team(&TeamKey::new(team_code, season)).await
    }

    /// A single player by id and season.
    pub async fn player(
        &self,
        player_id: i64,
        season: &str,
    ) -> Result<Option<Player>, StoreError> {
        self.store.find_player(&PlayerKey::new(player_id, season)).await
    }

    /// Players on a team for a season.
    pub async fn team_players(
        &self,
        team_code: &str,
        season: &str,
    ) -> Result<Vec<Player>, StoreError> {
        self.store.players_by_team(team_code, season).await
    }

    /// A player's game log for a season, most recent game first.
    pub async fn player_game_log(
        &self,
        player_id: i64,
        season: &str,
    ) -> Result<Vec<GameLog>, StoreError> {
        self.store.game_logs_desc(&PlayerKey::new(player_id, season)).await
    }

    /// The currently active season, if one has been created.
    pub async fn current_season(&self) -> Result<Option<Season>, StoreError> {
        self.store.active_season().await
    }
}
