//! NHL season identifier resolution and validation.
//!
//! Seasons span two calendar years and are identified by an 8-digit string
//! concatenating the start and end years (e.g. "20252026" for 2025-2026).

use chrono::{Datelike, NaiveDate, Utc};

/// The NHL played its first season in 1917-1918.
pub const MIN_SEASON_START_YEAR: i32 = 1917;

/// Get the season ID for the current date.
///
/// The season starts in October and ends in June, so January through June
/// belong to the season that started the previous calendar year.
pub fn current_season_id() -> String {
    season_id_for_date(Utc::now().date_naive())
}

/// Get the season ID a given calendar date falls into.
///
/// July through September is the off-season; those months resolve to the
/// upcoming season, matching the provider's convention.
pub fn season_id_for_date(date: NaiveDate) -> String {
    let year = date.year();
    let start_year = if (1..=6).contains(&date.month()) { year - 1 } else { year };
    year_to_season_id(start_year)
}

/// Convert a starting year to a season ID (e.g. 2025 -> "20252026").
pub fn year_to_season_id(start_year: i32) -> String {
    format!("{}{}", start_year, start_year + 1)
}

/// Validate a season ID: 8 numeric characters, end year exactly one after
/// the start year, and the start year within [MIN_SEASON_START_YEAR,
/// current start year + 1]. Never panics on malformed input.
pub fn is_valid_season_id(season_id: &str) -> bool {
    is_valid_for_date(season_id, Utc::now().date_naive())
}

fn is_valid_for_date(season_id: &str, today: NaiveDate) -> bool {
    let Some((start_year, end_year)) = split_years(season_id) else {
        return false;
    };

    if end_year != start_year + 1 {
        return false;
    }

    if start_year < MIN_SEASON_START_YEAR {
        return false;
    }

    // Allow one season of future tolerance for schedule planning.
    let current = season_id_for_date(today);
    let current_start = current[..4].parse::<i32>().unwrap_or(MIN_SEASON_START_YEAR);
    start_year <= current_start + 1
}

/// Extract the start year from a valid season ID.
pub fn start_year(season_id: &str) -> Option<i32> {
    if !is_valid_season_id(season_id) {
        return None;
    }
    split_years(season_id).map(|(start, _)| start)
}

/// Format a season ID for display (e.g. "20252026" -> "2025-2026").
/// Invalid IDs render as the sentinel "Invalid Season".
pub fn format_display(season_id: &str) -> String {
    if !is_valid_season_id(season_id) {
        return "Invalid Season".to_string();
    }
    format!("{}-{}", &season_id[..4], &season_id[4..8])
}

fn split_years(season_id: &str) -> Option<(i32, i32)> {
    if season_id.len() != 8 || !season_id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let start = season_id[..4].parse::<i32>().ok()?;
    let end = season_id[4..8].parse::<i32>().ok()?;
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_season_for_first_half_of_calendar_year() {
        // January through June belong to the season started the prior year.
        assert_eq!(season_id_for_date(date(2026, 1, 15)), "20252026");
        assert_eq!(season_id_for_date(date(2026, 6, 30)), "20252026");
    }

    #[test]
    fn test_season_for_second_half_of_calendar_year() {
        assert_eq!(season_id_for_date(date(2025, 10, 8)), "20252026");
        assert_eq!(season_id_for_date(date(2025, 12, 31)), "20252026");
        // Off-season months resolve to the upcoming season.
        assert_eq!(season_id_for_date(date(2025, 7, 1)), "20252026");
    }

    #[test]
    fn test_valid_season_id() {
        assert!(is_valid_for_date("20252026", date(2025, 11, 1)));
        assert!(is_valid_for_date("19171918", date(2025, 11, 1)));
        // One season of future tolerance.
        assert!(is_valid_for_date("20262027", date(2025, 11, 1)));
    }

    #[test]
    fn test_invalid_end_year() {
        assert!(!is_valid_for_date("20252028", date(2025, 11, 1)));
        assert!(!is_valid_for_date("20252025", date(2025, 11, 1)));
    }

    #[test]
    fn test_invalid_format() {
        assert!(!is_valid_for_date("1900", date(2025, 11, 1)));
        assert!(!is_valid_for_date("", date(2025, 11, 1)));
        assert!(!is_valid_for_date("2025abcd", date(2025, 11, 1)));
        assert!(!is_valid_for_date("202520267", date(2025, 11, 1)));
    }

    #[test]
    fn test_below_minimum_start_year() {
        assert!(!is_valid_for_date("19001901", date(2025, 11, 1)));
        assert!(!is_valid_for_date("19161917", date(2025, 11, 1)));
    }

    #[test]
    fn test_too_far_in_future() {
        assert!(!is_valid_for_date("20272028", date(2025, 11, 1)));
    }

    #[test]
    fn test_format_display() {
        assert!(is_valid_for_date("20242025", date(2025, 11, 1)));
        assert_eq!(format_display("20242025"), "2024-2025");
        assert_eq!(format_display("garbage"), "Invalid Season");
    }

    #[test]
    fn test_year_round_trip() {
        assert_eq!(year_to_season_id(2025), "20252026");
        assert_eq!(start_year("20252026"), Some(2025));
        assert_eq!(start_year("20252028"), None);
    }
}
