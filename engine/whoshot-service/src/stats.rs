//! Derived statistics: rolling-window ratings, streaks, and hot/cold
//! classification.
//!
//! Everything here is pure computation over history slices ordered most
//! recent first; the [`StatsEngine`] wraps it with a full per-season pass
//! that is idempotent against unchanged history.

use crate::config::StatsConfig;
use crate::error::SyncError;
use stats_store::{GameLog, Player, StatsStore, Team, TeamGame};
use std::sync::Arc;
use tracing::info;

/// Current form of a team derived from its game history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamForm {
    pub win_streak: i32,
    pub loss_streak: i32,
    pub last_n_win_pct: Option<f64>,
}

/// Average points over the most recent `window` entries of a
/// most-recent-first points list. `None` when no games are available.
pub fn hot_rating(points_desc: &[i32], window: usize) -> Option<f64> {
    let recent = &points_desc[..points_desc.len().min(window)];
    if recent.is_empty() {
        return None;
    }
    let total: i32 = recent.iter().sum();
    Some(f64::from(total) / recent.len() as f64)
}

/// Consecutive games with at least one point, counted from the most recent
/// game and stopping at the first pointless game.
pub fn point_streak(points_desc: &[i32]) -> i32 {
    points_desc.iter().take_while(|points| **points > 0).count() as i32
}

/// Win/loss streak and recent-form win percentage from a most-recent-first
/// outcome list. The streak type is fixed by the most recent game and runs
/// until the first game of the other type; the win percentage covers the
/// most recent `window` games (fewer near season start).
pub fn team_form(won_desc: &[bool], window: usize) -> TeamForm {
    let mut form = TeamForm::default();

    if let Some(&latest_won) = won_desc.first() {
        let run = won_desc.iter().take_while(|won| **won == latest_won).count() as i32;
        if latest_won {
            form.win_streak = run;
        } else {
            form.loss_streak = run;
        }
    }

    let considered = &won_desc[..won_desc.len().min(window)];
    if !considered.is_empty() {
        let wins = considered.iter().filter(|won| **won).count();
        form.last_n_win_pct = Some(wins as f64 / considered.len() as f64);
    }

    form
}

/// Recompute a player's derived fields from their game log history
/// (most recent first).
pub fn apply_player_derived(player: &mut Player, logs_desc: &[GameLog], config: &StatsConfig) {
    let points: Vec<i32> = logs_desc.iter().map(|log| log.points).collect();

    // With no game logs yet, fall back to the season points-per-game.
    player.hot_rating = hot_rating(&points, config.hot_rating_window).or(player.points_per_game);
    player.current_point_streak = point_streak(&points);

    let window = config.hot_rating_window;
    player.hot = window >= 3
        && player.hot_rating.is_some_and(|rating| rating > config.hot_rating_threshold);
    player.cold = window >= 4
        && player.hot_rating.is_some_and(|rating| rating < config.cold_rating_threshold);
    player.point_streak = player.current_point_streak >= config.point_streak_games;
}

/// Recompute a team's derived fields from its game history
/// (most recent first).
pub fn apply_team_derived(team: &mut Team, games_desc: &[TeamGame], config: &StatsConfig) {
    let outcomes: Vec<bool> = games_desc.iter().map(|game| game.won).collect();
    let form = team_form(&outcomes, config.recent_form_window);

    team.current_win_streak = form.win_streak;
    team.current_loss_streak = form.loss_streak;
    team.last10_win_pct = form.last_n_win_pct;

    team.hot = form.win_streak >= config.team_hot_win_streak;
    team.cold = form.loss_streak >= config.team_cold_loss_streak;
    team.point_streak = form.win_streak >= config.team_point_streak_wins;
}

/// Counts from a derive pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeriveReport {
    pub players: usize,
    pub teams: usize,
}

/// Full-season recomputation of derived statistics.
pub struct StatsEngine {
    store: Arc<dyn StatsStore>,
    config: StatsConfig,
}

impl StatsEngine {
    pub fn new(store: Arc<dyn StatsStore>, config: StatsConfig) -> Self {
        Self { store, config }
    }

    /// Recompute derived fields for every player and team in a season and
    /// persist each entity type as one bulk write. Must run after the
    /// season's history sets have been fully replaced.
    pub async fn recalculate_season(&self, season: &str) -> Result<DeriveReport, SyncError> {
        info!("Recalculating derived statistics for season {}", season);

        let mut players = self.store.players_by_points(season).await?;
        for player in &mut players {
            let logs = self.store.game_logs_desc(&player.key()).await?;
            apply_player_derived(player, &logs, &self.config);
        }
        let player_count = players.len();
        self.store.save_players(players).await?;

        let mut teams = self.store.teams_by_points(season).await?;
        for team in &mut teams {
            let games = self.store.team_games_desc(&team.key()).await?;
            apply_team_derived(team, &games, &self.config);
        }
        let team_count = teams.len();
        self.store.save_teams(teams).await?;

        info!(
            "Derived statistics updated for {} players and {} teams in season {}",
            player_count, team_count, season
        );

        Ok(DeriveReport { players: player_count, teams: team_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StatsConfig {
        StatsConfig::default()
    }

    #[test]
    fn test_hot_rating_window() {
        // Last three games: 2, 0, 1 -> 1.0 points per game.
        assert_eq!(hot_rating(&[2, 0, 1], 3), Some(1.0));
        // Window truncates older games.
        assert_eq!(hot_rating(&[2, 0, 1, 9, 9], 3), Some(1.0));
        assert_eq!(hot_rating(&[], 3), None);
    }

    #[test]
    fn test_point_streak_stops_at_first_blank() {
        assert_eq!(point_streak(&[1, 0, 2, 3]), 1);
        assert_eq!(point_streak(&[0, 2, 3]), 0);
        assert_eq!(point_streak(&[2, 1, 1, 3]), 4);
        assert_eq!(point_streak(&[]), 0);
    }

    #[test]
    fn test_team_form_win_streak() {
        // W W L W W -> two straight wins, no loss streak.
        let form = team_form(&[true, true, false, true, true], 10);
        assert_eq!(form.win_streak, 2);
        assert_eq!(form.loss_streak, 0);
        assert_eq!(form.last_n_win_pct, Some(0.8));
    }

    #[test]
    fn test_team_form_loss_streak() {
        // L L L W W -> three straight losses.
        let form = team_form(&[false, false, false, true, true], 10);
        assert_eq!(form.win_streak, 0);
        assert_eq!(form.loss_streak, 3);
        assert_eq!(form.last_n_win_pct, Some(0.4));
    }

    #[test]
    fn test_team_form_window_caps_percentage_not_streak() {
        // Twelve straight wins: the streak is unbounded, the percentage
        // only covers the window.
        let outcomes = vec![true; 12];
        let form = team_form(&outcomes, 10);
        assert_eq!(form.win_streak, 12);
        assert_eq!(form.last_n_win_pct, Some(1.0));
    }

    #[test]
    fn test_team_form_empty_history() {
        let form = team_form(&[], 10);
        assert_eq!(form.win_streak, 0);
        assert_eq!(form.loss_streak, 0);
        assert_eq!(form.last_n_win_pct, None);
    }

    #[test]
    fn test_player_flags() {
        let mut config = config();
        config.hot_rating_window = 3;

        let mut player = Player::default();
        let logs: Vec<GameLog> = [2, 0, 1]
            .iter()
            .map(|&points| GameLog { points, ..GameLog::default() })
            .collect();
        apply_player_derived(&mut player, &logs, &config);

        // Rating of exactly 1.0 does not clear the 1.5 hot bar.
        assert_eq!(player.hot_rating, Some(1.0));
        assert!(!player.hot);
        // Window of 3 can never mark a player cold.
        assert!(!player.cold);
        assert_eq!(player.current_point_streak, 1);
        assert!(!player.point_streak);
    }

    #[test]
    fn test_player_hot_flag_requires_threshold() {
        let mut player = Player::default();
        let logs: Vec<GameLog> = [3, 2, 2, 1, 2]
            .iter()
            .map(|&points| GameLog { points, ..GameLog::default() })
            .collect();
        apply_player_derived(&mut player, &logs, &config());

        assert_eq!(player.hot_rating, Some(2.0));
        assert!(player.hot);
        assert!(!player.cold);
        assert_eq!(player.current_point_streak, 5);
        assert!(player.point_streak);
    }

    #[test]
    fn test_player_cold_flag() {
        let mut player = Player::default();
        let logs: Vec<GameLog> = [0, 0, 1, 0, 0, 0, 0, 0, 0, 0]
            .iter()
            .map(|&points| GameLog { points, ..GameLog::default() })
            .collect();
        apply_player_derived(&mut player, &logs, &config());

        assert_eq!(player.hot_rating, Some(0.1));
        assert!(player.cold);
        assert!(!player.hot);
    }

    #[test]
    fn test_player_rating_falls_back_to_points_per_game() {
        let mut player = Player { points_per_game: Some(1.25), ..Player::default() };
        apply_player_derived(&mut player, &[], &config());
        assert_eq!(player.hot_rating, Some(1.25));

        let mut unknown = Player::default();
        apply_player_derived(&mut unknown, &[], &config());
        assert_eq!(unknown.hot_rating, None);
        assert!(!unknown.hot);
        assert!(!unknown.cold);
    }

    #[test]
    fn test_team_flags() {
        let config = config();
        let mut team = Team::default();

        let games: Vec<TeamGame> = [false, false, false, true, true]
            .iter()
            .map(|&won| TeamGame { won, ..TeamGame::default() })
            .collect();
        apply_team_derived(&mut team, &games, &config);

        assert_eq!(team.current_win_streak, 0);
        assert_eq!(team.current_loss_streak, 3);
        assert!(!team.hot);
        assert!(team.cold);
        assert!(!team.point_streak);
    }

    #[test]
    fn test_team_point_streak_flag() {
        let config = config();
        let mut team = Team::default();

        let games: Vec<TeamGame> =
            (0..5).map(|_| TeamGame { won: true, ..TeamGame::default() }).collect();
        apply_team_derived(&mut team, &games, &config);

        assert_eq!(team.current_win_streak, 5);
        assert!(team.hot);
        assert!(team.point_streak);
    }
}
