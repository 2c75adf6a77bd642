use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures_util::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{PageRenderer, RenderedPage};

/// How long the page gets after a scroll hint before capture, mirroring the
/// source site's lazy section loading.
const SCROLL_SETTLE: Duration = Duration::from_secs(2);

/// Headless-Chromium renderer.
///
/// Launches a fresh browser per call and tears it down on every exit path, so
/// a failed navigation can never leak a context. Resource cost scales with
/// concurrent calls; there is no pooling and no admission control.
pub struct ChromiumRenderer {
    nav_timeout: Duration,
}

impl ChromiumRenderer {
    pub fn new(nav_timeout: Duration) -> Self {
        ChromiumRenderer { nav_timeout }
    }

    /// Launch and close one browser, returning its product version.
    ///
    /// Run at startup so the process refuses to serve without a working
    /// browser binary.
    pub async fn probe(&self) -> Result<String> {
        let (browser, handle) = self.launch().await?;
        let version = browser
            .version()
            .await
            .map(|v| v.product)
            .context("failed to read browser version");
        Self::teardown(browser, handle).await;
        version
    }

    async fn launch(&self) -> Result<(Browser, JoinHandle<()>)> {
        let browser_cfg = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .build()
            .map_err(|e| anyhow!("browser config error: {e}"))?;

        let (browser, mut handler) = Browser::launch(browser_cfg)
            .await
            .context("failed to launch headless browser")?;

        // The handler stream drives all CDP traffic; drain it until the
        // browser goes away.
        let handle = tokio::spawn(async move { while handler.next().await.is_some() {} });

        Ok((browser, handle))
    }

    async fn teardown(mut browser: Browser, handle: JoinHandle<()>) {
        if let Err(e) = browser.close().await {
            warn!("browser close error: {}", e);
        }
        if let Err(e) = browser.wait().await {
            warn!("browser wait error: {}", e);
        }
        handle.abort();
    }

    async fn navigate(&self, browser: &Browser, url: &str, settle: Duration) -> Result<(Page, Option<u16>)> {
        let page = browser
            .new_page("about:blank")
            .await
            .context("failed to open page")?;

        tokio::time::timeout(self.nav_timeout, page.goto(url))
            .await
            .map_err(|_| anyhow!("navigation to {url} timed out after {:?}", self.nav_timeout))?
            .with_context(|| format!("navigation to {url} failed"))?;

        let status = match page.wait_for_navigation_response().await {
            Ok(Some(request)) => request.response.as_ref().map(|r| r.status as u16),
            _ => None,
        };

        // Fixed settle time so client-side rendering finishes.
        tokio::time::sleep(settle).await;

        Ok((page, status))
    }

    async fn drive_render(
        &self,
        browser: &Browser,
        url: &str,
        settle: Duration,
        scroll_hint: Option<&str>,
    ) -> Result<RenderedPage> {
        let (page, status) = self.navigate(browser, url, settle).await?;

        if let Some(hint) = scroll_hint {
            // Best effort: the full DOM is captured either way.
            if let Err(e) = page.evaluate_function(scroll_script(hint)).await {
                debug!("scroll hint '{}' failed: {}", hint, e);
            }
            tokio::time::sleep(SCROLL_SETTLE).await;
        }

        let text = page
            .evaluate("document.body.innerText")
            .await
            .context("failed to read page text")?
            .into_value::<String>()
            .unwrap_or_default();

        let html = page
            .content()
            .await
            .context("failed to read page content")?;

        Ok(RenderedPage { status, text, html })
    }

    async fn drive_evaluate(
        &self,
        browser: &Browser,
        url: &str,
        settle: Duration,
        function: &str,
    ) -> Result<serde_json::Value> {
        let (page, _status) = self.navigate(browser, url, settle).await?;

        let result = page
            .evaluate_function(function)
            .await
            .context("page script evaluation failed")?;

        Ok(result
            .into_value::<serde_json::Value>()
            .unwrap_or(serde_json::Value::Null))
    }
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    async fn render(
        &self,
        url: &str,
        settle: Duration,
        scroll_hint: Option<&str>,
    ) -> Result<RenderedPage> {
        debug!("rendering {} (settle {:?})", url, settle);
        let (browser, handle) = self.launch().await?;
        let result = self.drive_render(&browser, url, settle, scroll_hint).await;
        Self::teardown(browser, handle).await;
        result
    }

    async fn evaluate(
        &self,
        url: &str,
        settle: Duration,
        function: &str,
    ) -> Result<serde_json::Value> {
        debug!("evaluating script on {} (settle {:?})", url, settle);
        let (browser, handle) = self.launch().await?;
        let result = self.drive_evaluate(&browser, url, settle, function).await;
        Self::teardown(browser, handle).await;
        result
    }

    fn name(&self) -> &str {
        "chromium"
    }
}

fn scroll_script(hint: &str) -> String {
    let needle = hint.replace(['"', '\\'], "").to_lowercase();
    format!(
        r#"() => {{
            const headers = Array.from(document.querySelectorAll('h3, h4, .table-header'));
            const target = headers.find(h => h.textContent.toLowerCase().includes("{needle}"));
            if (target) {{
                target.scrollIntoView({{ behavior: 'smooth', block: 'center' }});
            }}
        }}"#
    )
}
