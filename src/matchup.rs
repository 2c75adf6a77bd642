//! Matchup composition: one game's lineups joined with both starters'
//! arsenals and every batter's record against the opposing arsenal.

use anyhow::anyhow;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    ArsenalEntry, BatterMatchup, BatterVsPitchStats, BattingMatchups, Game, MatchupAnalysis,
    PitchMatchup, PitchingMatchup, StarterArsenal,
};
use crate::render::PageRenderer;
use crate::scrape;

/// Compose a full matchup analysis for the game matching the two team codes.
///
/// All sub-fetches run strictly sequentially; the rendering resource is not
/// reentrant, and a fixed delay is inserted after each batter fetch to avoid
/// overloading the source site. Any single lookup or extraction failure
/// aborts the whole response; there is no partial-result policy.
pub async fn compose_matchup(
    renderer: &dyn PageRenderer,
    config: &Config,
    away_code: &str,
    home_code: &str,
) -> Result<MatchupAnalysis, ApiError> {
    let games = scrape::fetch_lineups(renderer, config).await?;
    let game = find_game(&games, away_code, home_code)
        .cloned()
        .ok_or(ApiError::GameNotFound)?;

    let away_starter = game
        .starters
        .away
        .clone()
        .ok_or_else(|| anyhow!("no away starting pitcher listed for {}", game.teams.away))?;
    let home_starter = game
        .starters
        .home
        .clone()
        .ok_or_else(|| anyhow!("no home starting pitcher listed for {}", game.teams.home))?;

    info!(
        "composing matchup {} @ {} ({} vs {})",
        game.teams.away, game.teams.home, away_starter, home_starter
    );

    let away_arsenal = scrape::fetch_pitch_arsenal(renderer, config, &away_starter).await?;
    let home_arsenal = scrape::fetch_pitch_arsenal(renderer, config, &home_starter).await?;

    let batter_delay = Duration::from_millis(config.batter_delay_ms);
    let mut batting_matchups = BattingMatchups::default();

    // Away batters face the home starter and vice versa.
    let sides = [
        (&game.lineups.away, &home_arsenal, &mut batting_matchups.away),
        (&game.lineups.home, &away_arsenal, &mut batting_matchups.home),
    ];
    for (lineup, opposing_arsenal, out) in sides {
        for batter in lineup {
            let stats = scrape::fetch_batter_vs_pitch(renderer, config, &batter.name).await?;
            let vs_opposing = restrict_to_arsenal(&stats, opposing_arsenal);
            out.push(BatterMatchup {
                batter: batter.clone(),
                vs_all_pitch_types: stats,
                vs_opposing_pitcher_arsenal: vs_opposing,
            });
            tokio::time::sleep(batter_delay).await;
        }
    }

    Ok(MatchupAnalysis {
        pitching: PitchingMatchup {
            away: StarterArsenal {
                name: away_starter,
                arsenal: away_arsenal,
            },
            home: StarterArsenal {
                name: home_starter,
                arsenal: home_arsenal,
            },
        },
        batting_matchups,
        game,
    })
}

/// First game whose away and home team fields contain the supplied codes,
/// case-insensitively.
pub fn find_game<'a>(games: &'a [Game], away_code: &str, home_code: &str) -> Option<&'a Game> {
    let away_code = away_code.to_lowercase();
    let home_code = home_code.to_lowercase();
    games.iter().find(|g| {
        g.teams.away.to_lowercase().contains(&away_code)
            && g.teams.home.to_lowercase().contains(&home_code)
    })
}

/// Intersect a batter's vs-pitch-type map with the opposing arsenal on pitch
/// type, annotating each hit with the pitcher's usage rate for that pitch.
pub fn restrict_to_arsenal(
    stats: &BatterVsPitchStats,
    arsenal: &[ArsenalEntry],
) -> BTreeMap<String, PitchMatchup> {
    let mut out = BTreeMap::new();
    for entry in arsenal {
        let ArsenalEntry::Row(pitch) = entry else {
            continue;
        };
        if pitch.pitch_type.is_empty() {
            continue;
        }
        if let Some(batter_stats) = stats.get(&pitch.pitch_type) {
            out.insert(
                pitch.pitch_type.clone(),
                PitchMatchup {
                    pitcher_usage: pitch.pitch_pct.clone(),
                    batter_stats: batter_stats.clone(),
                },
            );
        }
    }
    out
}
