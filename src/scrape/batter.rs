//! Batter performance vs pitch type, from a batter's profile page.
//!
//! Unlike the arsenal extractor the result is keyed by pitch type: downstream
//! matchup composition looks batters up against the opposing pitcher's
//! arsenal by key.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{BatterVsPitch, BatterVsPitchRow, BatterVsPitchStats};
use crate::render::PageRenderer;

use super::lookup::{self, StatsView};
use super::tables::{self, HeaderSignature};

/// The run-values table carries a pitch-type-like column and a batting-average one.
const BATTER_SIGNATURE: HeaderSignature = &[&["pitch type", "pitch%"], &["ba", "avg"]];

/// Heading the page scrolls to before capture, mirroring interactive behavior.
const RUN_VALUES_HINT: &str = "run value";

/// Alternate selectors probed when the canonical table is absent.
static FALLBACK_SEL: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"[id*="pitchType"], .pitch-type-table, [class*="run-value"]"#).unwrap()
});

static ROW_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("tbody tr").unwrap());
static CELL_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());

/// Resolve the batter's profile and extract their record against every pitch
/// type faced, keyed by pitch-type code.
pub async fn fetch_batter_vs_pitch(
    renderer: &dyn PageRenderer,
    config: &Config,
    name: &str,
) -> Result<BatterVsPitchStats, ApiError> {
    let url = lookup::resolve_profile_url(renderer, config, name, StatsView::Hitting).await?;
    let page = renderer
        .render(
            &url,
            Duration::from_millis(config.profile_settle_ms),
            Some(RUN_VALUES_HINT),
        )
        .await?;
    let stats = parse_batter_vs_pitch(&page.html);
    info!("extracted {} pitch-type rows for '{}'", stats.len(), name);
    Ok(stats)
}

/// Select the run-values table by header signature and decode rows into the
/// fixed 24-column record. Falls back to raw cell arrays from the alternate
/// selectors; an empty map is valid.
pub fn parse_batter_vs_pitch(html: &str) -> BatterVsPitchStats {
    let all_tables = tables::extract_tables(html);
    let mut stats = BatterVsPitchStats::new();

    if let Some(table) = tables::select_table(&all_tables, BATTER_SIGNATURE) {
        for cells in &table.rows {
            let pitch_type = tables::cell(cells, 0);
            if pitch_type.is_empty() {
                continue;
            }
            stats.insert(pitch_type, BatterVsPitch::Row(row_from_cells(cells)));
        }
    }

    if stats.is_empty() {
        stats = fallback_rows(html);
        if !stats.is_empty() {
            warn!("no run-values table found, degraded to {} raw rows", stats.len());
        }
    }

    stats
}

/// Fixed 24-column layout of the run-values table. When the upstream page
/// reorders columns, update these indices only.
fn row_from_cells(cells: &[String]) -> BatterVsPitchRow {
    let c = |idx| tables::cell(cells, idx);
    BatterVsPitchRow {
        pitch_type: c(0),
        count: c(1),
        pitch_pct: c(2),
        pa: c(3),
        ab: c(4),
        hits: c(5),
        ba: c(6),
        slg: c(7),
        iso: c(8),
        babip: c(9),
        woba: c(10),
        xwoba: c(11),
        xba: c(12),
        xslg: c(13),
        wobacon: c(14),
        xwobacon: c(15),
        ev: c(16),
        la: c(17),
        barrels: c(18),
        hard_hit: c(19),
        whiff: c(20),
        swing_pct: c(21),
        run_value: c(22),
        rv100: c(23),
    }
}

/// Degraded path: raw per-row cell arrays keyed by pitch type.
fn fallback_rows(html: &str) -> BatterVsPitchStats {
    let document = Html::parse_document(html);
    let mut stats = BatterVsPitchStats::new();

    for container in document.select(&FALLBACK_SEL) {
        for tr in container.select(&ROW_SEL) {
            let cells: Vec<String> = tr
                .select(&CELL_SEL)
                .map(|td| td.text().collect::<String>().trim().to_string())
                .collect();
            let pitch_type = tables::cell(&cells, 0);
            if pitch_type.is_empty() {
                continue;
            }
            stats.insert(
                pitch_type.clone(),
                BatterVsPitch::Raw {
                    pitch_type,
                    data: cells,
                },
            );
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_values_table(rows: &str) -> String {
        format!(
            r#"<html><body>
            <table>
              <thead><tr>
                <th>Pitch Type</th><th>Pitches</th><th>Pitch%</th><th>PA</th>
                <th>AB</th><th>H</th><th>BA</th><th>SLG</th><th>ISO</th>
                <th>BABIP</th><th>wOBA</th><th>xwOBA</th><th>xBA</th><th>xSLG</th>
                <th>wOBAcon</th><th>xwOBAcon</th><th>EV</th><th>LA</th>
                <th>Barrels</th><th>Hard Hit</th><th>Whiff</th><th>Swing %</th>
                <th>RV</th><th>RV/100</th>
              </tr></thead>
              <tbody>{rows}</tbody>
            </table>
            </body></html>"#
        )
    }

    #[test]
    fn test_rows_keyed_by_pitch_type() {
        let html = run_values_table(
            "<tr><td>FF</td><td>620</td><td>38.4%</td><td>141</td><td>128</td>\
             <td>41</td><td>.320</td><td>.602</td><td>.282</td><td>.333</td>\
             <td>.412</td><td>.398</td><td>.301</td><td>.571</td><td>.480</td>\
             <td>.466</td><td>93.1</td><td>15</td><td>18</td><td>52.4%</td>\
             <td>19.2%</td><td>48.1%</td><td>12</td><td>1.9</td></tr>\
             <tr><td>SL</td><td>214</td></tr>",
        );
        let stats = parse_batter_vs_pitch(&html);
        assert_eq!(stats.len(), 2);
        match stats.get("FF") {
            Some(BatterVsPitch::Row(row)) => {
                assert_eq!(row.ba, ".320");
                assert_eq!(row.swing_pct, "48.1%");
                assert_eq!(row.rv100, "1.9");
            }
            other => panic!("expected structured FF row, got {:?}", other),
        }
    }

    #[test]
    fn test_short_row_pads_with_empty_strings() {
        let html = run_values_table("<tr><td>SL</td><td>214</td></tr>");
        let stats = parse_batter_vs_pitch(&html);
        match stats.get("SL") {
            Some(BatterVsPitch::Row(row)) => {
                assert_eq!(row.count, "214");
                assert_eq!(row.pa, "");
                assert_eq!(row.rv100, "");
            }
            other => panic!("expected structured SL row, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_pitch_type_rows_skipped() {
        let html = run_values_table("<tr><td></td><td>99</td></tr><tr><td>CH</td></tr>");
        let stats = parse_batter_vs_pitch(&html);
        assert_eq!(stats.len(), 1);
        assert!(stats.contains_key("CH"));
    }

    #[test]
    fn test_fallback_raw_rows() {
        let html = r#"<html><body>
            <div class="run-value-by-pitch">
              <table><tbody>
                <tr><td>FF</td><td>620</td><td>.320</td></tr>
                <tr><td>CU</td><td>88</td><td>.198</td></tr>
              </tbody></table>
            </div>
            </body></html>"#;
        let stats = parse_batter_vs_pitch(html);
        assert_eq!(stats.len(), 2);
        match stats.get("CU") {
            Some(BatterVsPitch::Raw { pitch_type, data }) => {
                assert_eq!(pitch_type, "CU");
                assert_eq!(data, &vec!["CU".to_string(), "88".into(), ".198".into()]);
            }
            other => panic!("expected raw CU row, got {:?}", other),
        }
    }

    #[test]
    fn test_no_table_is_empty_not_error() {
        assert!(parse_batter_vs_pitch("<html><body></body></html>").is_empty());
    }
}
