//! Pitch-arsenal extraction from a pitcher's profile page.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{ArsenalEntry, PitchArsenalRow};
use crate::render::PageRenderer;

use super::lookup::{self, StatsView};
use super::tables::{self, HeaderSignature};

/// The arsenal table carries a pitch-type-like column and a velocity-like one.
const ARSENAL_SIGNATURE: HeaderSignature = &[&["pitch type", "pitch %"], &["velo"]];

/// Elements whose class hints at pitch-summary content, for the degraded path.
static SUMMARY_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#".pitch-summary, [class*="pitch-type"]"#).unwrap());

/// Resolve the pitcher's profile and extract one row per pitch type thrown,
/// in source page order.
pub async fn fetch_pitch_arsenal(
    renderer: &dyn PageRenderer,
    config: &Config,
    name: &str,
) -> Result<Vec<ArsenalEntry>, ApiError> {
    let url = lookup::resolve_profile_url(renderer, config, name, StatsView::Pitching).await?;
    let page = renderer
        .render(&url, Duration::from_millis(config.profile_settle_ms), None)
        .await?;
    let arsenal = parse_arsenal(&page.html);
    info!("extracted {} arsenal entries for '{}'", arsenal.len(), name);
    Ok(arsenal)
}

/// Select the arsenal table by header signature and decode its rows
/// positionally. Falls back to raw pitch-summary text when no structured row
/// can be recovered; an empty result is valid.
pub fn parse_arsenal(html: &str) -> Vec<ArsenalEntry> {
    let all_tables = tables::extract_tables(html);
    let mut entries: Vec<ArsenalEntry> = Vec::new();

    if let Some(table) = tables::select_table(&all_tables, ARSENAL_SIGNATURE) {
        entries = table
            .rows
            .iter()
            .filter(|cells| !cells.is_empty())
            .map(|cells| ArsenalEntry::Row(row_from_cells(cells)))
            .collect();
    }

    if entries.is_empty() {
        entries = pitch_summaries(html);
        if !entries.is_empty() {
            warn!("no arsenal table found, degraded to {} raw summaries", entries.len());
        }
    }

    entries
}

/// Fixed 19-column layout of the arsenal table. When the upstream page
/// reorders columns, update these indices only.
fn row_from_cells(cells: &[String]) -> PitchArsenalRow {
    let c = |idx| tables::cell(cells, idx);
    PitchArsenalRow {
        pitch_type: c(0),
        count: c(1),
        pitch_pct: c(2),
        velo: c(3),
        max_velo: c(4),
        spin: c(5),
        exit_velo: c(6),
        launch_angle: c(7),
        whiff_pct: c(8),
        k_pct: c(9),
        put_away_pct: c(10),
        hard_hit_pct: c(11),
        xba: c(12),
        xslg: c(13),
        xwoba: c(14),
        chase_pct: c(15),
        est_woba: c(16),
        run_value: c(17),
        rv100: c(18),
    }
}

fn pitch_summaries(html: &str) -> Vec<ArsenalEntry> {
    let document = Html::parse_document(html);
    document
        .select(&SUMMARY_SEL)
        .filter_map(|el| {
            let summary = el.text().collect::<String>().trim().to_string();
            (!summary.is_empty()).then_some(ArsenalEntry::Summary { summary })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arsenal_table(rows: &str) -> String {
        format!(
            r#"<html><body>
            <table>
              <thead><tr><th>Season</th><th>G</th></tr></thead>
              <tbody><tr><td>2024</td><td>17</td></tr></tbody>
            </table>
            <table>
              <thead><tr>
                <th>Pitch Type</th><th>Pitches</th><th>Pitch %</th><th>Velocity</th>
                <th>Max Velo</th><th>Spin</th><th>EV</th><th>LA</th><th>Whiff %</th>
                <th>K %</th><th>PutAway %</th><th>Hard Hit %</th><th>xBA</th>
                <th>xSLG</th><th>xwOBA</th><th>Chase %</th><th>wOBA</th>
                <th>RV</th><th>RV/100</th>
              </tr></thead>
              <tbody>{rows}</tbody>
            </table>
            </body></html>"#
        )
    }

    #[test]
    fn test_selects_arsenal_table_and_decodes_rows() {
        let html = arsenal_table(
            "<tr><td>FF</td><td>812</td><td>41.2%</td><td>96.4</td><td>99.1</td>\
             <td>2310</td><td>89.3</td><td>14</td><td>22.1%</td><td>24.8%</td>\
             <td>18.0%</td><td>38.5%</td><td>.241</td><td>.399</td><td>.310</td>\
             <td>28.4%</td><td>.305</td><td>4</td><td>0.6</td></tr>\
             <tr><td>SL</td><td>401</td><td>20.3%</td><td>87.1</td></tr>",
        );
        let entries = parse_arsenal(&html);
        assert_eq!(entries.len(), 2);
        match &entries[0] {
            ArsenalEntry::Row(row) => {
                assert_eq!(row.pitch_type, "FF");
                assert_eq!(row.pitch_pct, "41.2%");
                assert_eq!(row.velo, "96.4");
                assert_eq!(row.rv100, "0.6");
            }
            other => panic!("expected structured row, got {:?}", other),
        }
    }

    #[test]
    fn test_short_row_pads_with_empty_strings() {
        let html = arsenal_table("<tr><td>SL</td><td>401</td><td>20.3%</td><td>87.1</td></tr>");
        let entries = parse_arsenal(&html);
        match &entries[0] {
            ArsenalEntry::Row(row) => {
                assert_eq!(row.velo, "87.1");
                assert_eq!(row.max_velo, "");
                assert_eq!(row.rv100, "");
            }
            other => panic!("expected structured row, got {:?}", other),
        }
    }

    #[test]
    fn test_rows_keep_page_order() {
        let html = arsenal_table(
            "<tr><td>FF</td></tr><tr><td>SL</td></tr><tr><td>CH</td></tr>",
        );
        let types: Vec<String> = parse_arsenal(&html)
            .into_iter()
            .filter_map(|e| match e {
                ArsenalEntry::Row(row) => Some(row.pitch_type),
                _ => None,
            })
            .collect();
        assert_eq!(types, vec!["FF", "SL", "CH"]);
    }

    #[test]
    fn test_fallback_to_pitch_summaries() {
        let html = r#"<html><body>
            <div class="pitch-summary">4-Seam Fastball 41.2% 96.4 mph</div>
            <span class="player-pitch-type-badge">Slider 20.3%</span>
            </body></html>"#;
        let entries = parse_arsenal(html);
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            ArsenalEntry::Summary {
                summary: "4-Seam Fastball 41.2% 96.4 mph".into()
            }
        );
    }

    #[test]
    fn test_no_table_no_summaries_is_empty_not_error() {
        assert!(parse_arsenal("<html><body><p>off-season</p></body></html>").is_empty());
    }
}
