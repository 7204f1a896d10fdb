//! Snapshot DTOs for NHL API responses.
//!
//! Field names mirror the provider's camelCase JSON. Sub-fields default to
//! zero/unset when absent; only the top-level collection of each snapshot is
//! required.

use serde::{Deserialize, Serialize};

/// Localized string wrapper used throughout the web API
/// (e.g. `{"default": "Maple Leafs"}`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LocalizedName {
    #[serde(default)]
    pub default: String,
}

/// Standings snapshot. The `standings` collection is required.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StandingsResponse {
    pub standings: Vec<StandingsTeam>,
}

/// One team entry in the standings snapshot.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StandingsTeam {
    #[serde(rename = "teamAbbrev", default)]
    pub team_abbrev: LocalizedName,

    #[serde(rename = "teamName", default)]
    pub team_name: LocalizedName,

    #[serde(rename = "teamCommonName", default)]
    pub team_common_name: LocalizedName,

    #[serde(rename = "gamesPlayed", default)]
    pub games_played: i32,

    #[serde(default)]
    pub wins: i32,

    #[serde(default)]
    pub losses: i32,

    #[serde(rename = "otLosses", default)]
    pub ot_losses: i32,

    #[serde(default)]
    pub points: i32,

    #[serde(rename = "pointPctg", default)]
    pub point_pctg: Option<f64>,

    #[serde(rename = "goalFor", default)]
    pub goal_for: i32,

    #[serde(rename = "goalAgainst", default)]
    pub goal_against: i32,

    #[serde(rename = "goalDifferential", default)]
    pub goal_differential: i32,

    #[serde(rename = "conferenceName", default)]
    pub conference_name: Option<String>,

    #[serde(rename = "divisionName", default)]
    pub division_name: Option<String>,
}

/// League-wide skater summary snapshot from the stats API.
/// The `data` collection is required.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SkaterStatsResponse {
    pub data: Vec<SkaterSeasonTotals>,
}

/// One skater's season totals from the stats API.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SkaterSeasonTotals {
    #[serde(rename = "playerId", default)]
    pub player_id: i64,

    /// Full name as "First Last".
    #[serde(rename = "skaterFullName", default)]
    pub skater_full_name: String,

    #[serde(rename = "lastName", default)]
    pub last_name: String,

    #[serde(rename = "positionCode", default)]
    pub position_code: Option<String>,

    /// Comma-separated when the player was traded mid-season.
    #[serde(rename = "teamAbbrevs", default)]
    pub team_abbrevs: String,

    #[serde(rename = "gamesPlayed", default)]
    pub games_played: i32,

    #[serde(default)]
    pub goals: i32,

    #[serde(default)]
    pub assists: i32,

    #[serde(default)]
    pub points: i32,

    #[serde(rename = "pointsPerGame", default)]
    pub points_per_game: Option<f64>,

    #[serde(rename = "plusMinus", default)]
    pub plus_minus: i32,

    #[serde(rename = "penaltyMinutes", default)]
    pub penalty_minutes: i32,

    #[serde(rename = "ppGoals", default)]
    pub pp_goals: i32,

    #[serde(rename = "shGoals", default)]
    pub sh_goals: i32,

    #[serde(rename = "gameWinningGoals", default)]
    pub game_winning_goals: i32,

    #[serde(rename = "otGoals", default)]
    pub ot_goals: i32,

    #[serde(default)]
    pub shots: i32,

    /// Fraction on a 0-1 scale (e.g. 0.115 for 11.5%).
    #[serde(rename = "shootingPct", default)]
    pub shooting_pct: Option<f64>,
}

/// Full-season club schedule snapshot. The `games` collection is required.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduleResponse {
    pub games: Vec<ScheduledGame>,
}

/// One game in a club schedule.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScheduledGame {
    #[serde(default)]
    pub id: i64,

    /// 1 = preseason, 2 = regular season, 3 = playoffs.
    #[serde(rename = "gameType", default)]
    pub game_type: i32,

    #[serde(rename = "gameDate", default)]
    pub game_date: String,

    /// "FUT", "LIVE", "FINAL", "OFF", ...
    #[serde(rename = "gameState", default)]
    pub game_state: String,

    #[serde(rename = "homeTeam", default)]
    pub home_team: ScheduleTeam,

    #[serde(rename = "awayTeam", default)]
    pub away_team: ScheduleTeam,

    #[serde(rename = "periodDescriptor", default)]
    pub period_descriptor: PeriodDescriptor,
}

impl ScheduledGame {
    pub fn is_regular_season(&self) -> bool {
        self.game_type == 2
    }

    pub fn is_final(&self) -> bool {
        self.game_state == "FINAL" || self.game_state == "OFF"
    }
}

/// Home/away team block inside a scheduled game.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScheduleTeam {
    #[serde(default)]
    pub abbrev: String,

    /// Absent until the game has started.
    #[serde(default)]
    pub score: Option<i32>,
}

/// Descriptor of the last period played.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PeriodDescriptor {
    /// "REG", "OT", or "SO".
    #[serde(rename = "periodType", default)]
    pub period_type: String,
}

/// Player game-by-game feed. The `gameLog` collection is required.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GameLogResponse {
    #[serde(rename = "gameLog")]
    pub game_log: Vec<GameLogEntry>,
}

/// One game in a player's game log.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GameLogEntry {
    #[serde(rename = "gameId", default)]
    pub game_id: i64,

    #[serde(rename = "gameDate", default)]
    pub game_date: String,

    #[serde(rename = "opponentAbbrev", default)]
    pub opponent_abbrev: Option<String>,

    /// "H" for home, "R" for road.
    #[serde(rename = "homeRoadFlag", default)]
    pub home_road_flag: String,

    #[serde(default)]
    pub goals: i32,

    #[serde(default)]
    pub assists: i32,

    #[serde(default)]
    pub points: i32,

    #[serde(rename = "plusMinus", default)]
    pub plus_minus: i32,

    #[serde(default)]
    pub shots: i32,

    /// Time on ice as "MM:SS".
    #[serde(default)]
    pub toi: String,
}

/// Player landing page; only the headshot reference is consumed.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlayerLanding {
    #[serde(default)]
    pub headshot: Option<String>,
}
