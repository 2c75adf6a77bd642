pub mod chromium;

pub use chromium::ChromiumRenderer;

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Final state of a rendered page.
#[derive(Debug, Clone, Default)]
pub struct RenderedPage {
    /// HTTP status of the main document navigation, when the browser reported one.
    pub status: Option<u16>,
    /// `document.body.innerText` after the settle delay.
    pub text: String,
    /// Full serialized HTML after the settle delay.
    pub html: String,
}

impl RenderedPage {
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

/// Trait every page renderer must implement.
///
/// Each call gets an isolated, short-lived browser context that is torn down
/// unconditionally before the call returns, on success and failure alike.
/// Nothing below this trait touches the network directly.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Navigate to `url`, wait out the settle delay, and capture the page.
    ///
    /// When `scroll_hint` is given, the first heading whose text contains the
    /// hint is scrolled into view before capture, mirroring how the source
    /// page behaves under interaction.
    async fn render(
        &self,
        url: &str,
        settle: Duration,
        scroll_hint: Option<&str>,
    ) -> Result<RenderedPage>;

    /// Navigate to `url`, wait out the settle delay, then run a JS function
    /// in the page and return its JSON-serializable result.
    async fn evaluate(
        &self,
        url: &str,
        settle: Duration,
        function: &str,
    ) -> Result<serde_json::Value>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
