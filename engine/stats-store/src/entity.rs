//! Durable entity types.
//!
//! All season-scoped entities carry their season ID as part of their
//! identity; re-syncing a season updates rows in place and never creates
//! duplicates.

use serde::{Deserialize, Serialize};

/// Composite key for a team row: three-letter team code plus season ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamKey {
    pub team_code: String,
    pub season: String,
}

impl TeamKey {
    pub fn new(team_code: impl Into<String>, season: impl Into<String>) -> Self {
        Self { team_code: team_code.into(), season: season.into() }
    }
}

/// Composite key for a player row: provider player ID plus season ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerKey {
    pub player_id: i64,
    pub season: String,
}

impl PlayerKey {
    pub fn new(player_id: i64, season: impl Into<String>) -> Self {
        Self { player_id, season: season.into() }
    }
}

/// The league season marker. At most one season is active at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    /// 8-digit season ID (e.g. "20252026").
    pub season_id: String,

    /// Display name (e.g. "2025-2026").
    pub display_name: String,

    /// Whether this is the active season.
    pub is_active: bool,

    /// ISO-8601 timestamp of the last update.
    pub last_updated: Option<String>,
}

/// An NHL team's season summary plus derived streak state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub team_code: String,
    pub season: String,
    pub team_name: String,
    pub franchise_name: Option<String>,
    pub logo_url: Option<String>,

    // Season summary, overwritten from each standings snapshot.
    pub games_played: i32,
    pub wins: i32,
    pub losses: i32,
    pub overtime_losses: i32,
    pub points: i32,
    pub point_percentage: Option<f64>,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_differential: i32,
    pub conference_name: Option<String>,
    pub division_name: Option<String>,

    // Derived from team game history.
    pub current_win_streak: i32,
    pub current_loss_streak: i32,
    pub last10_win_pct: Option<f64>,
    pub hot: bool,
    pub cold: bool,
    pub point_streak: bool,

    // Next scheduled game lookahead; unset when no upcoming game exists.
    pub next_opponent_code: Option<String>,
    pub next_game_date: Option<String>,
    pub next_game_is_home: Option<bool>,

    pub last_updated: Option<String>,
}

impl Team {
    pub fn key(&self) -> TeamKey {
        TeamKey::new(self.team_code.clone(), self.season.clone())
    }
}

/// An NHL skater's season totals plus derived hot/cold state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: i64,
    pub season: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub position_code: Option<String>,
    pub team_code: Option<String>,
    pub headshot_url: Option<String>,

    // Season totals, overwritten from each stats snapshot.
    pub games_played: i32,
    pub goals: i32,
    pub assists: i32,
    pub points: i32,
    pub points_per_game: Option<f64>,
    pub plus_minus: i32,
    pub penalty_minutes: i32,
    pub power_play_goals: i32,
    pub shorthanded_goals: i32,
    pub game_winning_goals: i32,
    pub overtime_goals: i32,
    pub shots: i32,
    /// Shooting percentage on a 0-100 scale. The provider reports 0% and
    /// "no value" identically, so zero stays unset here.
    pub shooting_percentage: Option<f64>,

    // Derived from game log history.
    pub current_point_streak: i32,
    pub hot_rating: Option<f64>,
    pub hot: bool,
    pub cold: bool,
    pub point_streak: bool,

    pub last_updated: Option<String>,
}

impl Player {
    pub fn key(&self) -> PlayerKey {
        PlayerKey::new(self.player_id, self.season.clone())
    }
}

/// One row per player per completed game. Immutable once written; the full
/// set for a player+season is replaced wholesale on each sync.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameLog {
    pub player_id: i64,
    pub season: String,
    pub game_id: i64,
    /// Game date as reported by the provider ("YYYY-MM-DD"); lexicographic
    /// order matches chronological order.
    pub game_date: String,
    pub opponent_team_code: Option<String>,
    pub home_game: bool,
    pub goals: i32,
    pub assists: i32,
    pub points: i32,
    pub plus_minus: i32,
    pub shots: i32,
    /// Time on ice in seconds; unset when the provider value is malformed.
    pub time_on_ice_seconds: Option<i32>,
}

/// One row per team per completed regular-season game. Same wholesale
/// replace lifecycle as [`GameLog`], scoped to team+season.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamGame {
    pub game_id: i64,
    pub team_code: String,
    pub season: String,
    pub game_date: String,
    pub opponent_team_code: String,
    pub home_game: bool,
    pub goals_for: i32,
    pub goals_against: i32,
    pub won: bool,
    pub overtime_loss: bool,
    pub game_type: String,
    /// Position in the season schedule, assigned 1..N chronologically.
    pub game_number: i32,
}
