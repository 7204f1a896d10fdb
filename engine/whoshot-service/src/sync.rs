//! Sync pipeline: pulls provider snapshots and reconciles them into
//! season-scoped durable state.
//!
//! Full-season snapshot fetches (standings, skater stats) are hard
//! failures that abort the enclosing call. Per-subject fetches (one team's
//! schedule, one player's game log or landing page) are best-effort:
//! logged, counted, and skipped without touching sibling work.

use crate::config::{StatsConfig, SyncConfig};
use crate::error::SyncError;
use crate::stats;
use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use nhl_client::{
    NhlApi, ScheduleResponse, ScheduledGame, SkaterSeasonTotals, StandingsTeam,
};
use stats_store::{GameLog, Player, PlayerKey, StatsStore, Team, TeamGame, TeamKey};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Regular-season game type in the provider's schedule and game-log feeds.
const REGULAR_SEASON: i32 = 2;

/// Emit a progress line after this many per-player fetches.
const PROGRESS_LOG_EVERY: usize = 50;

/// Counts from a standings sync.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandingsSyncReport {
    pub teams: usize,
    pub schedule_failures: usize,
}

/// Counts from a player stats sync.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerSyncReport {
    pub players: usize,
    pub game_logs: usize,
    pub headshots: usize,
    pub failures: usize,
}

/// Pulls one provider snapshot per operation and reconciles it into the
/// store for a single season.
pub struct SyncPipeline {
    api: Arc<dyn NhlApi>,
    store: Arc<dyn StatsStore>,
    sync_config: SyncConfig,
    stats_config: StatsConfig,
}

impl SyncPipeline {
    pub fn new(
        api: Arc<dyn NhlApi>,
        store: Arc<dyn StatsStore>,
        sync_config: SyncConfig,
        stats_config: StatsConfig,
    ) -> Self {
        Self { api, store, sync_config, stats_config }
    }

    /// Sync team standings for a season: upsert every team row from the
    /// snapshot, rebuild each team's game history from its schedule,
    /// recompute streaks, and record the next scheduled game.
    pub async fn sync_standings(&self, season: &str) -> Result<StandingsSyncReport, SyncError> {
        info!("Syncing team standings for season {}", season);

        let snapshot =
            self.api.standings().await.map_err(|e| SyncError::from_client("standings", e))?;

        let timestamp = now_timestamp();
        let mut report = StandingsSyncReport::default();

        for entry in &snapshot.standings {
            let team_code = entry.team_abbrev.default.trim();
            if team_code.is_empty() {
                warn!("Skipping standings entry without a team abbreviation");
                continue;
            }

            let key = TeamKey::new(team_code, season);
            let mut team = self.store.find_team(&key).await?.unwrap_or_default();
            apply_standings(&mut team, entry);
            team.season = season.to_string();
            team.last_updated = Some(timestamp.clone());

            // Schedule data is best-effort: a failed fetch keeps the
            // previously stored games and lookahead visible.
            match self.api.team_schedule(team_code, season).await {
                Ok(schedule) => {
                    self.replace_team_games(&key, &schedule).await?;
                    apply_next_game(&mut team, &schedule);
                }
                Err(e) => {
                    warn!("Could not sync schedule for team {} season {}: {}", team_code, season, e);
                    report.schedule_failures += 1;
                }
            }

            let games = self.store.team_games_desc(&key).await?;
            stats::apply_team_derived(&mut team, &games, &self.stats_config);

            self.store.upsert_team(team).await?;
            report.teams += 1;
            debug!("Saved team {} for season {}", team_code, season);
        }

        info!("Team standings sync completed for {} teams", report.teams);
        Ok(report)
    }

    /// Fetch a team's schedule and rebuild its completed-game set for a
    /// season. Standings syncs do this inline with a single schedule fetch;
    /// this entry point serves targeted re-syncs.
    pub async fn sync_team_games(&self, team_code: &str, season: &str) -> Result<usize, SyncError> {
        let key = TeamKey::new(team_code, season);
        let schedule = self
            .api
            .team_schedule(team_code, season)
            .await
            .map_err(|e| SyncError::from_client("team schedule", e))?;
        self.replace_team_games(&key, &schedule).await
    }

    /// Rebuild the completed-game set for a team+season from a schedule
    /// snapshot. The replacement is atomic; readers never see a partial set.
    async fn replace_team_games(
        &self,
        key: &TeamKey,
        schedule: &ScheduleResponse,
    ) -> Result<usize, SyncError> {
        let mut completed: Vec<&ScheduledGame> = schedule
            .games
            .iter()
            .filter(|game| game.is_regular_season() && game.is_final())
            .collect();

        // Chronological order so game numbers count up from opening night.
        completed.sort_by(|a, b| a.game_date.cmp(&b.game_date).then(a.id.cmp(&b.id)));

        let games: Vec<TeamGame> = completed
            .iter()
            .enumerate()
            .map(|(index, game)| parse_team_game(key, game, index as i32 + 1))
            .collect();

        let count = games.len();
        self.store.replace_team_games(key, games).await?;
        debug!("Replaced {} games for team {} season {}", count, key.team_code, key.season);
        Ok(count)
    }

    /// Sync season totals for every skater in a season, then fan out
    /// per-player game log and headshot fetches with bounded concurrency.
    /// Individual player failures are counted, never fatal to the batch.
    pub async fn sync_player_stats(&self, season: &str) -> Result<PlayerSyncReport, SyncError> {
        info!("Syncing player statistics for season {}", season);

        let snapshot = self
            .api
            .skater_stats(season)
            .await
            .map_err(|e| SyncError::from_client("skater stats", e))?;

        let timestamp = now_timestamp();
        let mut players = Vec::with_capacity(snapshot.data.len());

        for totals in &snapshot.data {
            let key = PlayerKey::new(totals.player_id, season);
            let mut player = self.store.find_player(&key).await?.unwrap_or_default();
            apply_season_totals(&mut player, totals);
            player.season = season.to_string();
            player.last_updated = Some(timestamp.clone());
            players.push(player);
        }

        self.store.save_players(players.clone()).await?;
        info!("Player season totals synced for {} players", players.len());

        let report = self.sync_player_details(season, &mut players).await?;

        // Second bulk write carries the headshots picked up in the fan-out.
        self.store.save_players(players).await?;

        info!(
            "Player sync completed: {} players, {} game log sets, {} headshots, {} failures",
            report.players, report.game_logs, report.headshots, report.failures
        );
        Ok(report)
    }

    /// Fan out per-player detail fetches (game log replace + headshot) and
    /// collect with a partial-success-is-success policy.
    async fn sync_player_details(
        &self,
        season: &str,
        players: &mut [Player],
    ) -> Result<PlayerSyncReport, SyncError> {
        let total = players.len();
        let semaphore = Arc::new(Semaphore::new(self.sync_config.player_fetch_concurrency));
        let completed = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::with_capacity(total);
        for player in players.iter() {
            let api = Arc::clone(&self.api);
            let store = Arc::clone(&self.store);
            let semaphore = Arc::clone(&semaphore);
            let completed = Arc::clone(&completed);
            let key = PlayerKey::new(player.player_id, season);

            tasks.push(tokio::spawn(async move {
                let _permit =
                    semaphore.acquire_owned().await.context("player fetch semaphore closed")?;

                let result = sync_one_player_detail(api.as_ref(), store.as_ref(), &key).await;

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if done % PROGRESS_LOG_EVERY == 0 {
                    info!("Progress: {} / {} players", done, total);
                }

                result.map(|headshot| (key.player_id, headshot))
            }));
        }

        let results = futures::future::join_all(tasks).await;

        let mut report = PlayerSyncReport { players: total, ..PlayerSyncReport::default() };
        let mut headshots: HashMap<i64, String> = HashMap::new();

        for result in results {
            match result {
                Ok(Ok((player_id, headshot))) => {
                    report.game_logs += 1;
                    if let Some(url) = headshot {
                        headshots.insert(player_id, url);
                    }
                }
                Ok(Err(e)) => {
                    warn!("Could not fetch details for a player: {:#}", e);
                    report.failures += 1;
                }
                Err(e) => {
                    warn!("Player detail task aborted: {}", e);
                    report.failures += 1;
                }
            }
        }

        report.headshots = headshots.len();
        for player in players.iter_mut() {
            if let Some(url) = headshots.remove(&player.player_id) {
                player.headshot_url = Some(url);
            }
        }

        Ok(report)
    }

    /// Replace the game log set for one player+season from the provider's
    /// game-by-game feed. A missing feed is not an error; it yields an
    /// empty set.
    pub async fn sync_player_game_logs(
        &self,
        player_id: i64,
        season: &str,
    ) -> Result<usize, SyncError> {
        let key = PlayerKey::new(player_id, season);
        replace_player_game_logs(self.api.as_ref(), self.store.as_ref(), &key).await
    }
}

/// Fetch one player's game log and landing page and apply both. Returns the
/// headshot URL when the landing page carries one.
async fn sync_one_player_detail(
    api: &dyn NhlApi,
    store: &dyn StatsStore,
    key: &PlayerKey,
) -> anyhow::Result<Option<String>> {
    let count = replace_player_game_logs(api, store, key)
        .await
        .with_context(|| format!("game log sync failed for player {}", key.player_id))?;
    debug!("Replaced {} game logs for player {} season {}", count, key.player_id, key.season);

    // The landing page only contributes the headshot; ignore a missing page.
    let headshot = api
        .player_landing(key.player_id)
        .await
        .with_context(|| format!("landing fetch failed for player {}", key.player_id))?
        .and_then(|landing| landing.headshot)
        .filter(|url| !url.is_empty());

    Ok(headshot)
}

async fn replace_player_game_logs(
    api: &dyn NhlApi,
    store: &dyn StatsStore,
    key: &PlayerKey,
) -> Result<usize, SyncError> {
    let response = api
        .player_game_log(key.player_id, &key.season, REGULAR_SEASON)
        .await
        .map_err(|e| SyncError::from_client("player game log", e))?;

    let logs: Vec<GameLog> = match response {
        Some(response) => response
            .game_log
            .iter()
            .map(|entry| GameLog {
                player_id: key.player_id,
                season: key.season.clone(),
                game_id: entry.game_id,
                game_date: entry.game_date.clone(),
                opponent_team_code: entry.opponent_abbrev.clone(),
                home_game: entry.home_road_flag == "H",
                goals: entry.goals,
                assists: entry.assists,
                points: entry.points,
                plus_minus: entry.plus_minus,
                shots: entry.shots,
                time_on_ice_seconds: parse_toi_seconds(&entry.toi),
            })
            .collect(),
        None => Vec::new(),
    };

    let count = logs.len();
    store.replace_game_logs(key, logs).await?;
    Ok(count)
}

/// Overwrite a team's season summary fields from a standings entry.
fn apply_standings(team: &mut Team, entry: &StandingsTeam) {
    let team_code = entry.team_abbrev.default.trim().to_string();
    team.logo_url =
        Some(format!("https://assets.nhle.com/logos/nhl/svg/{}_light.svg", team_code));
    team.team_code = team_code;
    team.team_name = entry.team_name.default.clone();
    team.franchise_name = non_empty(&entry.team_common_name.default);

    team.games_played = entry.games_played;
    team.wins = entry.wins;
    team.losses = entry.losses;
    team.overtime_losses = entry.ot_losses;
    team.points = entry.points;
    team.point_percentage = entry.point_pctg;
    team.goals_for = entry.goal_for;
    team.goals_against = entry.goal_against;
    team.goal_differential = entry.goal_differential;
    team.conference_name = entry.conference_name.clone();
    team.division_name = entry.division_name.clone();
}

/// Overwrite a player's season totals from a stats snapshot entry.
fn apply_season_totals(player: &mut Player, totals: &SkaterSeasonTotals) {
    player.player_id = totals.player_id;

    let full_name = totals.skater_full_name.trim();
    match full_name.split_once(char::is_whitespace) {
        Some((first, rest)) => {
            player.first_name = first.to_string();
            player.last_name = rest.trim_start().to_string();
        }
        None => {
            // No split point: the whole string is the first name and the
            // provider's dedicated field supplies the last name.
            player.first_name = full_name.to_string();
            player.last_name = totals.last_name.clone();
        }
    }
    player.full_name = full_name.to_string();

    player.position_code = totals.position_code.clone();
    // Traded players list multiple clubs; keep the first.
    player.team_code = totals
        .team_abbrevs
        .split(',')
        .next()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string);

    player.games_played = totals.games_played;
    player.goals = totals.goals;
    player.assists = totals.assists;
    player.points = totals.points;
    player.points_per_game = totals.points_per_game.filter(|ppg| *ppg > 0.0);
    player.plus_minus = totals.plus_minus;
    player.penalty_minutes = totals.penalty_minutes;
    player.power_play_goals = totals.pp_goals;
    player.shorthanded_goals = totals.sh_goals;
    player.game_winning_goals = totals.game_winning_goals;
    player.overtime_goals = totals.ot_goals;
    player.shots = totals.shots;
    // The provider reports the fraction on a 0-1 scale and conflates 0%
    // with "no value"; zero stays unset.
    player.shooting_percentage = totals.shooting_pct.filter(|pct| *pct > 0.0).map(|pct| pct * 100.0);
}

/// Build a TeamGame row from this team's perspective of a scheduled game.
fn parse_team_game(key: &TeamKey, game: &ScheduledGame, game_number: i32) -> TeamGame {
    let home_game = game.home_team.abbrev == key.team_code;
    let (us, them) = if home_game {
        (&game.home_team, &game.away_team)
    } else {
        (&game.away_team, &game.home_team)
    };

    let goals_for = us.score.unwrap_or(0);
    let goals_against = them.score.unwrap_or(0);
    let won = goals_for > goals_against;
    let period_type = game.period_descriptor.period_type.as_str();
    let overtime_loss = !won && (period_type == "OT" || period_type == "SO");

    TeamGame {
        game_id: game.id,
        team_code: key.team_code.clone(),
        season: key.season.clone(),
        game_date: game.game_date.clone(),
        opponent_team_code: them.abbrev.clone(),
        home_game,
        goals_for,
        goals_against,
        won,
        overtime_loss,
        game_type: "REGULAR".to_string(),
        game_number,
    }
}

/// Record the next scheduled (non-final) regular-season game, or clear the
/// lookahead when the schedule holds none.
fn apply_next_game(team: &mut Team, schedule: &ScheduleResponse) {
    team.next_opponent_code = None;
    team.next_game_date = None;
    team.next_game_is_home = None;

    let next = schedule
        .games
        .iter()
        .filter(|game| game.is_regular_season() && !game.is_final())
        .min_by(|a, b| a.game_date.cmp(&b.game_date).then(a.id.cmp(&b.id)));

    if let Some(game) = next {
        let home_game = game.home_team.abbrev == team.team_code;
        let opponent = if home_game { &game.away_team } else { &game.home_team };
        team.next_opponent_code = Some(opponent.abbrev.clone());
        team.next_game_date = Some(game.game_date.clone());
        team.next_game_is_home = Some(home_game);
    }
}

/// Parse a "MM:SS" time-on-ice string into seconds. Malformed or empty
/// strings yield `None`.
fn parse_toi_seconds(toi: &str) -> Option<i32> {
    let (minutes, seconds) = toi.split_once(':')?;
    let minutes: i32 = minutes.trim().parse().ok()?;
    let seconds: i32 = seconds.trim().parse().ok()?;
    Some(minutes * 60 + seconds)
}

pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nhl_client::{PeriodDescriptor, ScheduleTeam};

    #[test]
    fn test_parse_toi_seconds() {
        assert_eq!(parse_toi_seconds("12:34"), Some(754));
        assert_eq!(parse_toi_seconds("0:05"), Some(5));
        assert_eq!(parse_toi_seconds(""), None);
        assert_eq!(parse_toi_seconds("20"), None);
        assert_eq!(parse_toi_seconds("ab:cd"), None);
    }

    #[test]
    fn test_apply_season_totals_name_split() {
        let mut player = Player::default();
        let totals = SkaterSeasonTotals {
            player_id: 8478402,
            skater_full_name: "Connor McDavid".to_string(),
            team_abbrevs: "EDM".to_string(),
            ..SkaterSeasonTotals::default()
        };
        apply_season_totals(&mut player, &totals);

        assert_eq!(player.first_name, "Connor");
        assert_eq!(player.last_name, "McDavid");
        assert_eq!(player.full_name, "Connor McDavid");
        assert_eq!(player.team_code.as_deref(), Some("EDM"));
    }

    #[test]
    fn test_apply_season_totals_name_fallback() {
        let mut player = Player::default();
        let totals = SkaterSeasonTotals {
            skater_full_name: "Mononym".to_string(),
            last_name: "Fallback".to_string(),
            ..SkaterSeasonTotals::default()
        };
        apply_season_totals(&mut player, &totals);

        assert_eq!(player.first_name, "Mononym");
        assert_eq!(player.last_name, "Fallback");
    }

    #[test]
    fn test_apply_season_totals_first_team_of_many() {
        let mut player = Player::default();
        let totals = SkaterSeasonTotals {
            team_abbrevs: "COL, TOR".to_string(),
            ..SkaterSeasonTotals::default()
        };
        apply_season_totals(&mut player, &totals);
        assert_eq!(player.team_code.as_deref(), Some("COL"));
    }

    #[test]
    fn test_apply_season_totals_shooting_percentage() {
        let mut player = Player::default();
        let totals = SkaterSeasonTotals {
            shooting_pct: Some(0.11522),
            ..SkaterSeasonTotals::default()
        };
        apply_season_totals(&mut player, &totals);
        let pct = player.shooting_percentage.unwrap();
        assert!((pct - 11.522).abs() < 1e-9);

        // Zero is indistinguishable from absent in the snapshot; keep it
        // unset rather than storing a literal 0%.
        let zeroed = SkaterSeasonTotals { shooting_pct: Some(0.0), ..SkaterSeasonTotals::default() };
        apply_season_totals(&mut player, &zeroed);
        assert_eq!(player.shooting_percentage, None);
    }

    fn scheduled_game(
        id: i64,
        date: &str,
        state: &str,
        home: (&str, Option<i32>),
        away: (&str, Option<i32>),
        period_type: &str,
    ) -> ScheduledGame {
        ScheduledGame {
            id,
            game_type: REGULAR_SEASON,
            game_date: date.to_string(),
            game_state: state.to_string(),
            home_team: ScheduleTeam { abbrev: home.0.to_string(), score: home.1 },
            away_team: ScheduleTeam { abbrev: away.0.to_string(), score: away.1 },
            period_descriptor: PeriodDescriptor { period_type: period_type.to_string() },
        }
    }

    #[test]
    fn test_parse_team_game_home_win() {
        let key = TeamKey::new("TOR", "20252026");
        let game =
            scheduled_game(1, "2025-10-08", "OFF", ("TOR", Some(4)), ("BOS", Some(2)), "REG");
        let parsed = parse_team_game(&key, &game, 1);

        assert!(parsed.home_game);
        assert!(parsed.won);
        assert!(!parsed.overtime_loss);
        assert_eq!(parsed.opponent_team_code, "BOS");
        assert_eq!(parsed.goals_for, 4);
        assert_eq!(parsed.goals_against, 2);
        assert_eq!(parsed.game_number, 1);
    }

    #[test]
    fn test_parse_team_game_road_overtime_loss() {
        let key = TeamKey::new("TOR", "20252026");
        let game =
            scheduled_game(2, "2025-10-10", "FINAL", ("MTL", Some(3)), ("TOR", Some(2)), "OT");
        let parsed = parse_team_game(&key, &game, 2);

        assert!(!parsed.home_game);
        assert!(!parsed.won);
        assert!(parsed.overtime_loss);
        assert_eq!(parsed.opponent_team_code, "MTL");
    }

    #[test]
    fn test_regulation_loss_is_not_overtime_loss() {
        let key = TeamKey::new("TOR", "20252026");
        let game =
            scheduled_game(3, "2025-10-12", "OFF", ("TOR", Some(1)), ("NYR", Some(5)), "REG");
        let parsed = parse_team_game(&key, &game, 3);
        assert!(!parsed.won);
        assert!(!parsed.overtime_loss);
    }

    #[test]
    fn test_apply_next_game_picks_first_upcoming() {
        let mut team =
            Team { team_code: "TOR".to_string(), ..Team::default() };
        let schedule = ScheduleResponse {
            games: vec![
                scheduled_game(1, "2025-10-08", "OFF", ("TOR", Some(4)), ("BOS", Some(2)), "REG"),
                scheduled_game(3, "2025-10-14", "FUT", ("TOR", None), ("NYR", None), ""),
                scheduled_game(2, "2025-10-12", "FUT", ("MTL", None), ("TOR", None), ""),
            ],
        };
        apply_next_game(&mut team, &schedule);

        assert_eq!(team.next_opponent_code.as_deref(), Some("MTL"));
        assert_eq!(team.next_game_date.as_deref(), Some("2025-10-12"));
        assert_eq!(team.next_game_is_home, Some(false));
    }

    #[test]
    fn test_apply_next_game_clears_when_none_upcoming() {
        let mut team = Team {
            team_code: "TOR".to_string(),
            next_opponent_code: Some("BOS".to_string()),
            next_game_date: Some("2025-04-01".to_string()),
            next_game_is_home: Some(true),
            ..Team::default()
        };
        let schedule = ScheduleResponse {
            games: vec![scheduled_game(
                1,
                "2025-10-08",
                "OFF",
                ("TOR", Some(4)),
                ("BOS", Some(2)),
                "REG",
            )],
        };
        apply_next_game(&mut team, &schedule);

        assert_eq!(team.next_opponent_code, None);
        assert_eq!(team.next_game_date, None);
        assert_eq!(team.next_game_is_home, None);
    }
}
