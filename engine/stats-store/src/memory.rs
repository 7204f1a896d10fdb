//! In-memory store implementation.
//!
//! All maps live behind a single `RwLock`, so every replace call swaps its
//! history set in one critical section and ordered reads see a consistent
//! snapshot.

use crate::entity::{GameLog, Player, PlayerKey, Season, Team, TeamGame, TeamKey};
use crate::store::{Result, StatsStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    seasons: HashMap<String, Season>,
    teams: HashMap<TeamKey, Team>,
    players: HashMap<PlayerKey, Player>,
    // History vectors are kept sorted by game date descending.
    game_logs: HashMap<PlayerKey, Vec<GameLog>>,
    team_games: HashMap<TeamKey, Vec<TeamGame>>,
}

/// In-memory [`StatsStore`] backend.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_logs_desc(logs: &mut [GameLog]) {
    logs.sort_by(|a, b| b.game_date.cmp(&a.game_date).then(b.game_id.cmp(&a.game_id)));
}

fn sort_games_desc(games: &mut [TeamGame]) {
    games.sort_by(|a, b| b.game_date.cmp(&a.game_date).then(b.game_id.cmp(&a.game_id)));
}

#[async_trait::async_trait]
impl StatsStore for InMemoryStore {
    async fn active_season(&self) -> Result<Option<Season>> {
        let inner = self.inner.read().await;
        Ok(inner.seasons.values().find(|s| s.is_active).cloned())
    }

    async fn find_season(&self, season_id: &str) -> Result<Option<Season>> {
        let inner = self.inner.read().await;
        Ok(inner.seasons.get(season_id).cloned())
    }

    async fn upsert_season(&self, season: Season) -> Result<()> {
        let mut inner = self.inner.write().await;
        if season.is_active {
            for existing in inner.seasons.values_mut() {
                if existing.is_active && existing.season_id != season.season_id {
                    tracing::info!(
                        "Deactivating season {} in favor of {}",
                        existing.season_id,
                        season.season_id
                    );
                }
                existing.is_active = false;
            }
        }
        inner.seasons.insert(season.season_id.clone(), season);
        Ok(())
    }

    async fn upsert_team(&self, team: Team) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.teams.insert(team.key(), team);
        Ok(())
    }

    async fn save_teams(&self, teams: Vec<Team>) -> Result<()> {
        let mut inner = self.inner.write().await;
        for team in teams {
            inner.teams.insert(team.key(), team);
        }
        Ok(())
    }

    async fn find_team(&self, key: &TeamKey) -> Result<Option<Team>> {
        let inner = self.inner.read().await;
        Ok(inner.teams.get(key).cloned())
    }

    async fn teams_by_points(&self, season: &str) -> Result<Vec<Team>> {
        let inner = self.inner.read().await;
        let mut teams: Vec<Team> =
            inner.teams.values().filter(|t| t.season == season).cloned().collect();
        teams.sort_by(|a, b| b.points.cmp(&a.points).then(a.team_code.cmp(&b.team_code)));
        Ok(teams)
    }

    async fn upsert_player(&self, player: Player) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.players.insert(player.key(), player);
        Ok(())
    }

    async fn save_players(&self, players: Vec<Player>) -> Result<()> {
        let mut inner = self.inner.write().await;
        for player in players {
            inner.players.insert(player.key(), player);
        }
        Ok(())
    }

    async fn find_player(&self, key: &PlayerKey) -> Result<Option<Player>> {
        let inner = self.inner.read().await;
        Ok(inner.players.get(key).cloned())
    }

    async fn players_by_points(&self, season: &str) -> Result<Vec<Player>> {
        let inner = self.inner.read().await;
        let mut players: Vec<Player> =
            inner.players.values().filter(|p| p.season == season).cloned().collect();
        players.sort_by(|a, b| b.points.cmp(&a.points).then(a.player_id.cmp(&b.player_id)));
        Ok(players)
    }

    async fn players_by_team(&self, team_code: &str, season: &str) -> Result<Vec<Player>> {
        let inner = self.inner.read().await;
        let mut players: Vec<Player> = inner
            .players
            .values()
            .filter(|p| p.season == season && p.team_code.as_deref() == Some(team_code))
            .cloned()
            .collect();
        players.sort_by(|a, b| b.points.cmp(&a.points).then(a.player_id.cmp(&b.player_id)));
        Ok(players)
    }

    async fn replace_game_logs(&self, key: &PlayerKey, mut logs: Vec<GameLog>) -> Result<()> {
        sort_logs_desc(&mut logs);
        let mut inner = self.inner.write().await;
        inner.game_logs.insert(key.clone(), logs);
        Ok(())
    }

    async fn game_logs_desc(&self, key: &PlayerKey) -> Result<Vec<GameLog>> {
        let inner = self.inner.read().await;
        Ok(inner.game_logs.get(key).cloned().unwrap_or_default())
    }

    async fn recent_game_logs(&self, key: &PlayerKey, limit: usize) -> Result<Vec<GameLog>> {
        let inner = self.inner.read().await;
        Ok(inner
            .game_logs
            .get(key)
            .map(|logs| logs.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn replace_team_games(&self, key: &TeamKey, mut games: Vec<TeamGame>) -> Result<()> {
        sort_games_desc(&mut games);
        let mut inner = self.inner.write().await;
        inner.team_games.insert(key.clone(), games);
        Ok(())
    }

    async fn team_games_desc(&self, key: &TeamKey) -> Result<Vec<TeamGame>> {
        let inner = self.inner.read().await;
        Ok(inner.team_games.get(key).cloned().unwrap_or_default())
    }

    async fn recent_team_games(&self, key: &TeamKey, limit: usize) -> Result<Vec<TeamGame>> {
        let inner = self.inner.read().await;
        Ok(inner
            .team_games
            .get(key)
            .map(|games| games.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(code: &str, season: &str, points: i32) -> Team {
        Team {
            team_code: code.to_string(),
            season: season.to_string(),
            team_name: format!("Team {code}"),
            points,
            ..Team::default()
        }
    }

    fn log(player_id: i64, season: &str, game_id: i64, date: &str, points: i32) -> GameLog {
        GameLog {
            player_id,
            season: season.to_string(),
            game_id,
            game_date: date.to_string(),
            points,
            ..GameLog::default()
        }
    }

    #[tokio::test]
    async fn test_upsert_team_is_idempotent() {
        let store = InMemoryStore::new();
        let key = TeamKey::new("TOR", "20252026");

        store.upsert_team(team("TOR", "20252026", 40)).await.unwrap();
        store.upsert_team(team("TOR", "20252026", 42)).await.unwrap();

        let stored = store.find_team(&key).await.unwrap().unwrap();
        assert_eq!(stored.points, 42);
        assert_eq!(store.teams_by_points("20252026").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_season_isolation() {
        let store = InMemoryStore::new();
        store.upsert_team(team("TOR", "20242025", 90)).await.unwrap();
        store.upsert_team(team("TOR", "20252026", 10)).await.unwrap();

        let old = store.find_team(&TeamKey::new("TOR", "20242025")).await.unwrap().unwrap();
        assert_eq!(old.points, 90);
        assert_eq!(store.teams_by_points("20242025").await.unwrap().len(), 1);
        assert_eq!(store.teams_by_points("20252026").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_standings_ordered_by_points() {
        let store = InMemoryStore::new();
        store.upsert_team(team("BOS", "20252026", 30)).await.unwrap();
        store.upsert_team(team("TOR", "20252026", 45)).await.unwrap();
        store.upsert_team(team("MTL", "20252026", 12)).await.unwrap();

        let standings = store.teams_by_points("20252026").await.unwrap();
        let codes: Vec<&str> = standings.iter().map(|t| t.team_code.as_str()).collect();
        assert_eq!(codes, vec!["TOR", "BOS", "MTL"]);
    }

    #[tokio::test]
    async fn test_replace_game_logs_wholesale() {
        let store = InMemoryStore::new();
        let key = PlayerKey::new(8478402, "20252026");

        let first = vec![log(8478402, "20252026", 1, "2025-10-08", 2)];
        store.replace_game_logs(&key, first).await.unwrap();

        let second = vec![
            log(8478402, "20252026", 2, "2025-10-10", 0),
            log(8478402, "20252026", 3, "2025-10-12", 1),
        ];
        store.replace_game_logs(&key, second).await.unwrap();

        // Old set is fully gone, new set is fully present, most recent first.
        let logs = store.game_logs_desc(&key).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].game_id, 3);
        assert_eq!(logs[1].game_id, 2);
    }

    #[tokio::test]
    async fn test_recent_game_logs_limit() {
        let store = InMemoryStore::new();
        let key = PlayerKey::new(1, "20252026");
        let logs = vec![
            log(1, "20252026", 1, "2025-10-08", 1),
            log(1, "20252026", 2, "2025-10-10", 2),
            log(1, "20252026", 3, "2025-10-12", 3),
        ];
        store.replace_game_logs(&key, logs).await.unwrap();

        let recent = store.recent_game_logs(&key, 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].game_id, 3);
    }

    #[tokio::test]
    async fn test_single_active_season() {
        let store = InMemoryStore::new();
        store
            .upsert_season(Season {
                season_id: "20242025".to_string(),
                display_name: "2024-2025".to_string(),
                is_active: true,
                last_updated: None,
            })
            .await
            .unwrap();
        store
            .upsert_season(Season {
                season_id: "20252026".to_string(),
                display_name: "2025-2026".to_string(),
                is_active: true,
                last_updated: None,
            })
            .await
            .unwrap();

        let active = store.active_season().await.unwrap().unwrap();
        assert_eq!(active.season_id, "20252026");
        let old = store.find_season("20242025").await.unwrap().unwrap();
        assert!(!old.is_active);
    }
}
