//! Lineup extraction from the rendered lineups page.
//!
//! The page interleaves several games in one flat `innerText` dump. Each game
//! opens with a timestamp header line and an "AWAY @ HOME" team-code line,
//! followed by two marker-delimited batting sections and then weather/odds
//! noise. Everything here is a pure function of the page text; fetching is a
//! thin wrapper over the renderer.

use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{BattingSlot, Game, Lineups, Starters, Teams};
use crate::render::PageRenderer;

/// Timestamp header opening a game block, e.g. "Friday 6/14 7:05 PM ET".
static GAME_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[A-Z][a-z]+ \d{1,2}/\d{1,2} \d{1,2}:\d{2} [AP]M ET[ \t\r]*$").unwrap()
});

/// Team-code line, two 2-3 letter uppercase codes around "@".
static TEAM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Z]{2,3}) @ ([A-Z]{2,3})$").unwrap());

/// Away starter layout: "(HAND) Name".
static AWAY_PITCHER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(([RLS])\)\s+(.+)$").unwrap());

/// Home starter layout: "Name (HAND)".
static HOME_PITCHER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s+\(([RLS])\)$").unwrap());

/// Away batting row: "ORDER NAME (HAND) POSITION".
static AWAY_ROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([1-9])\s+(.+?)\s+\(([RLS])\)\s+([0-9A-Z]{1,3})$").unwrap());

/// Home batting row, mirrored: "POSITION (HAND) NAME ORDER".
static HOME_ROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9A-Z]{1,3})\s+\(([RLS])\)\s+(.+?)\s+([1-9])$").unwrap());

/// How many lines past the team-code line may hold the starter entries.
const PITCHER_WINDOW: usize = 5;

/// Lineup-section marker lines toggling between the away and home sides.
const MARKERS: [&str; 2] = ["Official Lineup", "Projected Lineup"];

/// Lines that signal the lineup section is over and weather/odds begin.
const TERMINATORS: [&str; 3] = ["°", "MLRun", "Current Lines"];

/// Fetch and parse today's lineups. An empty list means no games are
/// scheduled and is not an error.
pub async fn fetch_lineups(
    renderer: &dyn PageRenderer,
    config: &Config,
) -> Result<Vec<Game>, ApiError> {
    let page = renderer
        .render(
            &config.lineups_url,
            Duration::from_millis(config.lineups_settle_ms),
            None,
        )
        .await?;
    let games = parse_lineups(&page.text);
    info!("extracted {} game(s) from lineups page", games.len());
    Ok(games)
}

/// Split the page text into game blocks at timestamp headers and parse each.
/// Pure function of its input; blocks without a team-code line contribute
/// nothing.
pub fn parse_lineups(text: &str) -> Vec<Game> {
    let mut games = Vec::new();
    let headers: Vec<(usize, usize)> = GAME_TIME_RE
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();

    // Anything before the first header is still a candidate block; some page
    // variants omit the timestamp for the first game.
    let lead_end = headers.first().map(|(s, _)| *s).unwrap_or(text.len());
    if let Some(game) = parse_game_block(None, &text[..lead_end]) {
        games.push(game);
    }

    for (i, (start, end)) in headers.iter().enumerate() {
        let block_end = headers.get(i + 1).map(|(s, _)| *s).unwrap_or(text.len());
        let game_time = text[*start..*end].trim().to_string();
        if let Some(game) = parse_game_block(Some(game_time), &text[*end..block_end]) {
            games.push(game);
        }
    }

    games
}

/// Parse one game block. Returns `None` when no team-code line is present.
fn parse_game_block(game_time: Option<String>, block: &str) -> Option<Game> {
    let lines: Vec<&str> = block
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let (team_idx, teams) = lines.iter().enumerate().find_map(|(i, line)| {
        TEAM_RE.captures(line).map(|caps| {
            (
                i,
                Teams {
                    away: caps[1].to_string(),
                    home: caps[2].to_string(),
                },
            )
        })
    })?;

    let starters = find_starters(&lines, team_idx);
    let lineups = find_lineups(&lines, team_idx);

    Some(Game {
        game_time,
        teams,
        starters,
        lineups,
    })
}

/// Scan a fixed window past the team line for the two starter layouts.
fn find_starters(lines: &[&str], team_idx: usize) -> Starters {
    let mut starters = Starters::default();
    let window_end = (team_idx + 1 + PITCHER_WINDOW).min(lines.len());

    for line in &lines[team_idx + 1..window_end] {
        if starters.away.is_none() {
            if let Some(caps) = AWAY_PITCHER_RE.captures(line) {
                starters.away = Some(caps[2].trim().to_string());
                continue;
            }
        }
        if starters.home.is_none() {
            if let Some(caps) = HOME_PITCHER_RE.captures(line) {
                starters.home = Some(caps[1].trim().to_string());
            }
        }
        if starters.away.is_some() && starters.home.is_some() {
            break;
        }
    }

    starters
}

/// Walk the block for marker-delimited batting sections.
///
/// The away section opens at the first marker line; the scan flips to the
/// home side on the second marker or after nine accepted away rows, whichever
/// comes first (the second marker is missing on some page variants). The scan
/// stops dead at the first weather/odds line.
fn find_lineups(lines: &[&str], team_idx: usize) -> Lineups {
    let mut lineups = Lineups::default();
    let mut in_lineup = false;
    let mut home_side = false;
    let mut markers_seen = 0;

    for line in &lines[team_idx..] {
        if TERMINATORS.iter().any(|t| line.contains(t)) {
            break;
        }
        if MARKERS.iter().any(|m| line.contains(m)) {
            markers_seen += 1;
            in_lineup = true;
            if markers_seen >= 2 {
                home_side = true;
            }
            continue;
        }
        if !in_lineup {
            continue;
        }

        if !home_side {
            if let Some(slot) = parse_away_row(line) {
                if accept(&mut lineups.away, slot) && lineups.away.len() == 9 {
                    home_side = true;
                }
            }
        } else if let Some(slot) = parse_home_row(line) {
            accept(&mut lineups.home, slot);
        }
    }

    lineups
}

/// Accept a row only when its printed order extends the side's 1, 2, 3, …
/// sequence. Keeps each side strictly increasing from 1 and capped at nine;
/// anything else is discarded silently.
fn accept(side: &mut Vec<BattingSlot>, slot: BattingSlot) -> bool {
    if slot.order as usize == side.len() + 1 {
        side.push(slot);
        true
    } else {
        false
    }
}

/// Away-side row: "3   Mike Trout (R) CF".
pub fn parse_away_row(line: &str) -> Option<BattingSlot> {
    let caps = AWAY_ROW_RE.captures(line)?;
    Some(BattingSlot {
        order: caps[1].parse().ok()?,
        name: caps[2].trim().to_string(),
        position: caps[4].to_string(),
    })
}

/// Home-side row, mirrored columns: "CF (R) Mike Trout   3".
pub fn parse_home_row(line: &str) -> Option<BattingSlot> {
    let caps = HOME_ROW_RE.captures(line)?;
    Some(BattingSlot {
        order: caps[4].parse().ok()?,
        name: caps[3].trim().to_string(),
        position: caps[1].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const AWAY_NAMES: [&str; 9] = [
        "J.P. Crawford",
        "Julio Rodriguez",
        "Cal Raleigh",
        "Mitch Garver",
        "Ty France",
        "Dominic Canzone",
        "Luke Raley",
        "Dylan Moore",
        "Leo Rivas",
    ];

    const HOME_NAMES: [&str; 9] = [
        "Ian Happ",
        "Seiya Suzuki",
        "Cody Bellinger",
        "Christopher Morel",
        "Dansby Swanson",
        "Michael Busch",
        "Mike Tauchman",
        "Nico Hoerner",
        "Miguel Amaya",
    ];

    fn full_game_text() -> String {
        let mut text = String::from("Friday 6/14 7:05 PM ET\nSEA @ CHC\n(R) Logan Gilbert\nShota Imanaga (L)\nOfficial Lineup\n");
        for (i, name) in AWAY_NAMES.iter().enumerate() {
            text.push_str(&format!("{}   {} (L) SS\n", i + 1, name));
        }
        text.push_str("Projected Lineup\n");
        for (i, name) in HOME_NAMES.iter().enumerate() {
            text.push_str(&format!("LF (S) {}   {}\n", name, i + 1));
        }
        text.push_str("72° Partly Cloudy\nCurrent Lines\n");
        text
    }

    #[test]
    fn test_full_game_extracts_nine_a_side() {
        let games = parse_lineups(&full_game_text());
        assert_eq!(games.len(), 1);
        let game = &games[0];
        assert_eq!(game.game_time.as_deref(), Some("Friday 6/14 7:05 PM ET"));
        assert_eq!(game.teams.away, "SEA");
        assert_eq!(game.teams.home, "CHC");
        assert_eq!(game.starters.away.as_deref(), Some("Logan Gilbert"));
        assert_eq!(game.starters.home.as_deref(), Some("Shota Imanaga"));
        assert_eq!(game.lineups.away.len(), 9);
        assert_eq!(game.lineups.home.len(), 9);
        for (i, slot) in game.lineups.away.iter().enumerate() {
            assert_eq!(slot.order, i as u32 + 1);
        }
        for (i, slot) in game.lineups.home.iter().enumerate() {
            assert_eq!(slot.order, i as u32 + 1);
        }
        assert_eq!(game.lineups.home[0].name, "Ian Happ");
        assert_eq!(game.lineups.home[0].position, "LF");
    }

    #[test]
    fn test_away_row_round_trip() {
        let slot = parse_away_row("3   Mike Trout (R) CF").unwrap();
        assert_eq!(slot.order, 3);
        assert_eq!(slot.name, "Mike Trout");
        assert_eq!(slot.position, "CF");
    }

    #[test]
    fn test_home_row_round_trip_matches_away() {
        let away = parse_away_row("3   Mike Trout (R) CF").unwrap();
        let home = parse_home_row("CF (R) Mike Trout   3").unwrap();
        assert_eq!(away, home);
    }

    #[test]
    fn test_row_layouts_are_mutually_exclusive() {
        assert!(parse_home_row("3   Mike Trout (R) CF").is_none());
        assert!(parse_away_row("CF (R) Mike Trout   3").is_none());
    }

    #[test]
    fn test_block_without_team_line_yields_no_game() {
        let text = "Friday 6/14 7:05 PM ET\nSome unrelated page chrome\nOfficial Lineup\n";
        assert!(parse_lineups(text).is_empty());
    }

    #[test]
    fn test_empty_page_yields_empty_list() {
        assert!(parse_lineups("").is_empty());
    }

    #[test]
    fn test_idempotent_over_identical_input() {
        let text = full_game_text();
        assert_eq!(parse_lineups(&text), parse_lineups(&text));
    }

    #[test]
    fn test_forced_switch_after_nine_away_rows() {
        // Second marker missing entirely; home rows follow the away section
        // directly and must still land on the home side.
        let mut text = String::from("SEA @ CHC\n(R) Logan Gilbert\nOfficial Lineup\n");
        for (i, name) in AWAY_NAMES.iter().enumerate() {
            text.push_str(&format!("{}   {} (L) SS\n", i + 1, name));
        }
        for (i, name) in HOME_NAMES.iter().enumerate() {
            text.push_str(&format!("CF (R) {}   {}\n", name, i + 1));
        }
        let games = parse_lineups(&text);
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].lineups.away.len(), 9);
        assert_eq!(games[0].lineups.home.len(), 9);
        assert_eq!(games[0].lineups.home[2].name, "Cody Bellinger");
    }

    #[test]
    fn test_terminator_stops_block_scan() {
        let text = "SEA @ CHC\nOfficial Lineup\n1   J.P. Crawford (L) SS\n72° Clear\n2   Julio Rodriguez (R) CF\n";
        let games = parse_lineups(text);
        assert_eq!(games[0].lineups.away.len(), 1);
    }

    #[test]
    fn test_partial_rows_discarded_silently() {
        let text =
            "SEA @ CHC\nOfficial Lineup\n1   J.P. Crawford (L) SS\nnot a lineup row\n2   Julio Rodriguez (R) CF\n";
        let games = parse_lineups(text);
        assert_eq!(games[0].lineups.away.len(), 2);
    }

    #[test]
    fn test_rows_before_marker_ignored() {
        let text = "SEA @ CHC\n1   J.P. Crawford (L) SS\nOfficial Lineup\n1   Julio Rodriguez (R) CF\n";
        let games = parse_lineups(text);
        assert_eq!(games[0].lineups.away.len(), 1);
        assert_eq!(games[0].lineups.away[0].name, "Julio Rodriguez");
    }

    #[test]
    fn test_two_games_in_page_order() {
        let mut text = full_game_text();
        text.push_str("Friday 6/14 9:40 PM ET\nNYY @ LAD\n(L) Carlos Rodon\nTyler Glasnow (R)\n");
        let games = parse_lineups(&text);
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].teams.away, "SEA");
        assert_eq!(games[1].teams.away, "NYY");
        assert_eq!(games[1].starters.home.as_deref(), Some("Tyler Glasnow"));
    }

    #[test]
    fn test_game_without_timestamp_header() {
        let text = "SEA @ CHC\n(R) Logan Gilbert\nShota Imanaga (L)\n";
        let games = parse_lineups(text);
        assert_eq!(games.len(), 1);
        assert!(games[0].game_time.is_none());
    }
}
