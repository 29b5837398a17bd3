//! Chrome CDP client wrapper for one-shot probe runs.
//!
//! One browser process, one page. The client owns both and is closed exactly
//! once per run.

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;

/// Upper bound on selector/text waits, matching the automation-library
/// default the probes were written against.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Quiet period after load before the page counts as settled.
const SETTLE_QUIET: Duration = Duration::from_millis(500);

/// Upper bound on the settle wait.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Poll interval for condition waits.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Headless Chromium driven over CDP.
pub struct BrowserClient {
    browser: Browser,
    page: Page,
}

impl BrowserClient {
    /// Launch a browser and open a blank page.
    pub async fn launch(headless: bool) -> Result<Self> {
        let chrome_path = find_chrome_executable()?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .viewport(None)
            .no_sandbox()
            .arg("--window-size=1280,800")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-timer-throttling")
            .arg("--mute-audio")
            .arg("--no-first-run");

        if !headless {
            builder = builder.with_head();
        }

        let config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build browser config: {}", e))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("Failed to launch browser")?;

        // Drain CDP events for the lifetime of the browser.
        tokio::spawn(async move { while handler.next().await.is_some() {} });

        let page = browser
            .new_page("about:blank")
            .await
            .context("Failed to create initial page")?;

        Ok(Self { browser, page })
    }

    /// Navigate to a URL and wait for the load event.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        self.page.goto(url).await.context("Navigation failed")?;
        self.page.wait_for_navigation().await.ok();
        Ok(())
    }

    /// Block until the document is complete and the page has stayed quiet
    /// for a short period. Approximates the network-idle load state.
    pub async fn wait_until_settled(&self) -> Result<()> {
        let start = Instant::now();
        loop {
            let ready = match self.page.evaluate("document.readyState").await {
                Ok(result) => matches!(
                    result.into_value::<String>().ok().as_deref(),
                    Some("interactive") | Some("complete")
                ),
                Err(_) => false,
            };
            if ready {
                break;
            }
            if start.elapsed() > SETTLE_TIMEOUT {
                anyhow::bail!("Timed out waiting for page to settle");
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
        tokio::time::sleep(SETTLE_QUIET).await;
        Ok(())
    }

    /// Block until an element matching `selector` is attached.
    pub async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        let script = selector_attached_script(selector)?;
        self.wait_for_condition(&script, timeout)
            .await
            .with_context(|| format!("Timed out waiting for selector: {}", selector))
    }

    /// Block until `text` is visible somewhere in the document body.
    pub async fn wait_for_text(&self, text: &str, timeout: Duration) -> Result<()> {
        let script = text_visible_script(text)?;
        self.wait_for_condition(&script, timeout)
            .await
            .with_context(|| format!("Timed out waiting for text: {}", text))
    }

    async fn wait_for_condition(&self, script: &str, timeout: Duration) -> Result<()> {
        let start = Instant::now();
        loop {
            // Evaluation fails transiently while a click-triggered navigation
            // swaps documents; treat that the same as "not yet".
            let holds = match self.page.evaluate(script).await {
                Ok(result) => result.into_value::<bool>().unwrap_or(false),
                Err(_) => false,
            };
            if holds {
                return Ok(());
            }
            if start.elapsed() > timeout {
                anyhow::bail!("condition not met within {:?}", timeout);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Fill an input field.
    pub async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .with_context(|| format!("Element not found: {}", selector))?;

        element.click().await?;
        element.type_str(value).await?;

        Ok(())
    }

    /// Click the first button whose visible text contains `label`.
    pub async fn click_button(&self, label: &str) -> Result<()> {
        let buttons = self
            .page
            .find_elements("button")
            .await
            .context("No button elements on page")?;

        for button in &buttons {
            let text = button.inner_text().await.ok().flatten().unwrap_or_default();
            if text.contains(label) {
                button.click().await?;
                return Ok(());
            }
        }

        anyhow::bail!("Button not found: {}", label)
    }

    /// Page title, if the document has one.
    pub async fn title(&self) -> Result<Option<String>> {
        Ok(self.page.get_title().await?)
    }

    /// Capture a PNG screenshot to `path`, creating the parent directory if
    /// needed. An existing file is overwritten.
    pub async fn screenshot(&self, path: &Path, full_page: bool) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .context("Failed to create screenshot directory")?;
            }
        }

        let data = self
            .page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(full_page)
                    .build(),
            )
            .await
            .context("Screenshot capture failed")?;

        tokio::fs::write(path, &data)
            .await
            .with_context(|| format!("Failed to write screenshot: {}", path.display()))?;

        tracing::debug!("Wrote screenshot to {}", path.display());
        Ok(())
    }

    /// Close the browser.
    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await?;
        Ok(())
    }
}

/// JS expression: element matching `selector` is attached.
fn selector_attached_script(selector: &str) -> Result<String> {
    let selector_json = serde_json::to_string(selector)?;
    Ok(format!(
        "document.querySelector({}) !== null",
        selector_json
    ))
}

/// JS expression: `text` appears in the rendered body text.
fn text_visible_script(text: &str) -> Result<String> {
    let text_json = serde_json::to_string(text)?;
    Ok(format!(
        "!!document.body && document.body.innerText.includes({})",
        text_json
    ))
}

/// Find a Chromium executable on the system.
fn find_chrome_executable() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("CHROME") {
        let p = PathBuf::from(path);
        if p.exists() {
            return Ok(p);
        }
    }

    let paths = [
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
    ];

    for path in &paths {
        let p = PathBuf::from(path);
        if p.exists() {
            tracing::info!("Found Chrome at: {}", path);
            return Ok(p);
        }
    }

    // Playwright's bundled headless shell works too, when present.
    if let Some(home) = dirs::home_dir() {
        for cache in [
            home.join(".cache/ms-playwright"),
            home.join("Library/Caches/ms-playwright"),
        ] {
            if let Ok(entries) = std::fs::read_dir(&cache) {
                let mut shells: Vec<_> = entries
                    .filter_map(|e| e.ok())
                    .filter(|e| {
                        e.file_name()
                            .to_string_lossy()
                            .starts_with("chromium_headless_shell")
                    })
                    .collect();
                shells.sort_by_key(|e| std::cmp::Reverse(e.file_name()));

                for shell in shells {
                    if let Ok(subdirs) = std::fs::read_dir(shell.path()) {
                        for subdir in subdirs.filter_map(|e| e.ok()) {
                            let binary = subdir.path().join("chrome-headless-shell");
                            if binary.exists() {
                                tracing::info!("Using chrome-headless-shell at: {:?}", binary);
                                return Ok(binary);
                            }
                        }
                    }
                }
            }
        }
    }

    anyhow::bail!(
        "Chrome/Chromium not found. Install a browser or point CHROME at an executable."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_script_escapes_quotes() {
        let script = selector_attached_script("input[placeholder='Your Name']").unwrap();
        assert_eq!(
            script,
            r#"document.querySelector("input[placeholder='Your Name']") !== null"#
        );
    }

    #[test]
    fn test_selector_script_escapes_double_quotes() {
        let script = selector_attached_script(r#"a[title="x"]"#).unwrap();
        assert!(script.contains(r#"\"x\""#));
    }

    #[test]
    fn test_text_script_embeds_marker() {
        let script = text_visible_script("Meeting Room:").unwrap();
        assert_eq!(
            script,
            r#"!!document.body && document.body.innerText.includes("Meeting Room:")"#
        );
    }

    #[test]
    fn test_text_script_escapes_backslashes() {
        let script = text_visible_script(r"C:\Users").unwrap();
        assert!(script.contains(r"C:\\Users"));
    }
}
