use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One scheduled MLB game as scraped from the lineups page.
///
/// Constructed fresh on every fetch, never persisted, discarded once the
/// HTTP response has been sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Timestamp header line as displayed on the page (e.g. "Friday 6/14 7:05 PM ET")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_time: Option<String>,
    pub teams: Teams,
    pub starters: Starters,
    pub lineups: Lineups,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teams {
    /// Short team code, e.g. "SEA"
    pub away: String,
    pub home: String,
}

/// Starting pitchers. Either side may be missing on a malformed page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Starters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,
}

/// Batting orders for both sides. Each side holds at most 9 slots with
/// strictly increasing `order` starting at 1; malformed pages yield fewer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lineups {
    pub away: Vec<BattingSlot>,
    pub home: Vec<BattingSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingSlot {
    /// Batting order position, 1-9
    pub order: u32,
    /// Display name as printed, punctuation and suffixes included
    pub name: String,
    /// Positional abbreviation, e.g. "SS", "LF", "1B"
    pub position: String,
}

/// One pitch type a pitcher throws, read positionally from the arsenal table.
///
/// All fields are kept as display strings ("23.4%", "—" for missing) since
/// the source formatting varies; callers parse numerics on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchArsenalRow {
    pub pitch_type: String,
    pub count: String,
    pub pitch_pct: String,
    pub velo: String,
    pub max_velo: String,
    pub spin: String,
    pub exit_velo: String,
    pub launch_angle: String,
    pub whiff_pct: String,
    pub k_pct: String,
    pub put_away_pct: String,
    pub hard_hit_pct: String,
    pub xba: String,
    pub xslg: String,
    pub xwoba: String,
    pub chase_pct: String,
    pub est_woba: String,
    pub run_value: String,
    pub rv100: String,
}

/// An arsenal entry: a structured row, or a degraded free-text summary when
/// the canonical table is absent from the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArsenalEntry {
    Row(PitchArsenalRow),
    Summary { summary: String },
}

/// A batter's performance against one pitch type, read positionally from the
/// run-values table. Same display-string policy as [`PitchArsenalRow`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatterVsPitchRow {
    pub pitch_type: String,
    pub count: String,
    pub pitch_pct: String,
    pub pa: String,
    pub ab: String,
    pub hits: String,
    pub ba: String,
    pub slg: String,
    pub iso: String,
    pub babip: String,
    pub woba: String,
    pub xwoba: String,
    pub xba: String,
    pub xslg: String,
    pub wobacon: String,
    pub xwobacon: String,
    pub ev: String,
    pub la: String,
    pub barrels: String,
    pub hard_hit: String,
    pub whiff: String,
    pub swing_pct: String,
    pub run_value: String,
    pub rv100: String,
}

/// Batter-vs-pitch entry: structured row, or raw cell array from the
/// alternate-selector fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatterVsPitch {
    Row(BatterVsPitchRow),
    Raw {
        #[serde(rename = "pitchType")]
        pitch_type: String,
        data: Vec<String>,
    },
}

/// Map from pitch-type code to the batter's record against it.
pub type BatterVsPitchStats = BTreeMap<String, BatterVsPitch>;

/// Composed matchup: one game plus, per team, per batter, their vs-pitch-type
/// stats intersected with the opposing starter's arsenal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupAnalysis {
    pub game: Game,
    pub pitching: PitchingMatchup,
    pub batting_matchups: BattingMatchups,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitchingMatchup {
    pub away: StarterArsenal,
    pub home: StarterArsenal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarterArsenal {
    pub name: String,
    pub arsenal: Vec<ArsenalEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattingMatchups {
    pub away: Vec<BatterMatchup>,
    pub home: Vec<BatterMatchup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatterMatchup {
    pub batter: BattingSlot,
    pub vs_all_pitch_types: BatterVsPitchStats,
    /// Only the pitch types the opposing starter actually throws.
    pub vs_opposing_pitcher_arsenal: BTreeMap<String, PitchMatchup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitchMatchup {
    /// How often the opposing pitcher throws this pitch, as displayed
    pub pitcher_usage: String,
    pub batter_stats: BatterVsPitch,
}
