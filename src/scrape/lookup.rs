//! Player name → profile URL resolution.
//!
//! A direct slug URL is tried first; when the site answers 404 the search box
//! on the landing page is driven through the renderer and the numeric player
//! id is pulled out of the first result's link. Every lookup opens a fresh
//! rendering session; there is no name→URL caching across calls.

use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::ApiError;
use crate::render::PageRenderer;

/// Numeric player id embedded in a profile link.
static PLAYER_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"savant-player/.*?-(\d+)").unwrap());

/// Which statistics view of a profile page to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsView {
    Pitching,
    Hitting,
}

impl StatsView {
    fn query(self) -> &'static str {
        match self {
            StatsView::Pitching => "statcast-r-pitching-mlb",
            StatsView::Hitting => "statcast-r-hitting-mlb",
        }
    }
}

/// Lowercase, spaces to hyphens.
pub fn slugify(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

/// Resolve a display name to a profile URL for the requested view.
///
/// Fails with [`ApiError::PlayerNotResolvable`] when the search dropdown
/// yields no link with a player id; the caller must treat that as terminal
/// for this player.
pub async fn resolve_profile_url(
    renderer: &dyn PageRenderer,
    config: &Config,
    name: &str,
    view: StatsView,
) -> Result<String, ApiError> {
    let slug = slugify(name);
    let direct = format!("{}/savant-player/{}", config.savant_url, slug);
    let settle = Duration::from_millis(config.search_settle_ms);

    let page = renderer.render(&direct, settle, None).await?;
    if !page.is_not_found() {
        return Ok(format!("{}?stats={}", direct, view.query()));
    }

    debug!("direct profile URL 404 for '{}', falling back to search", name);
    let result = renderer
        .evaluate(&config.savant_url, settle, &search_script(name))
        .await?;

    let href = result.as_str().unwrap_or_default();
    let id = extract_player_id(href)
        .ok_or_else(|| ApiError::PlayerNotResolvable(name.to_string()))?;

    Ok(format!(
        "{}/savant-player/{}-{}?stats={}",
        config.savant_url,
        slug,
        id,
        view.query()
    ))
}

fn extract_player_id(href: &str) -> Option<String> {
    PLAYER_ID_RE
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Drive the landing-page search box: type the raw name, wait for the results
/// dropdown, return the first result's link (or null).
fn search_script(name: &str) -> String {
    let needle = name.replace(['"', '\\'], "");
    format!(
        r#"async () => {{
            const box = document.querySelector('input[type="text"][placeholder*="Player"]');
            if (!box) return null;
            box.value = "{needle}";
            box.dispatchEvent(new Event('input', {{ bubbles: true }}));
            await new Promise(resolve => setTimeout(resolve, 2000));
            const first = document.querySelector('.player-search-results a, .ui-menu-item a');
            return first ? first.href : null;
        }}"#
    )
}
