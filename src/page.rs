use std::path::Path;
use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::Page as CrPage;
use chromiumoxide::page::ScreenshotParams;
use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::error::{Error, Result};

/// The three text slots of the preview template, keyed by element id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewFields {
    pub time: String,
    pub title: String,
    pub subtitle: String,
}

/// Raster format of a saved screenshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
}

impl ImageFormat {
    /// Infer the format from a file extension. A path without one is PNG.
    pub fn from_path(path: &Path) -> Result<Self> {
        let Some(ext) = path.extension() else {
            return Ok(ImageFormat::Png);
        };
        match ext.to_string_lossy().to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            "webp" => Ok(ImageFormat::Webp),
            other => Err(Error::ScreenshotError(format!(
                "unsupported image extension `.{other}` for {}",
                path.display()
            ))),
        }
    }

    fn as_cdp(self) -> CaptureScreenshotFormat {
        match self {
            ImageFormat::Png => CaptureScreenshotFormat::Png,
            ImageFormat::Jpeg => CaptureScreenshotFormat::Jpeg,
            ImageFormat::Webp => CaptureScreenshotFormat::Webp,
        }
    }
}

/// Wrapper around a chromiumoxide Page exposing what the preview renderer needs.
pub struct Page {
    inner: CrPage,
    default_timeout: Duration,
}

impl Page {
    pub(crate) fn new(inner: CrPage, default_timeout: Duration) -> Self {
        Self { inner, default_timeout }
    }

    /// Navigate to the given URL and wait for the page to load.
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.inner
            .goto(url)
            .await
            .map_err(|e| Error::NavigationError(e.to_string()))?;
        Ok(())
    }

    /// Wait for an element matching the given CSS selector to appear in the DOM.
    /// Polls every 100ms up to the configured default timeout.
    pub async fn wait_for_selector(&self, selector: &str) -> Result<Element> {
        let timeout = self.default_timeout;
        let interval = Duration::from_millis(100);
        let start = std::time::Instant::now();

        loop {
            match self.find_element(selector).await {
                Ok(el) => return Ok(el),
                Err(_) if start.elapsed() < timeout => {
                    tokio::time::sleep(interval).await;
                }
                Err(_) => {
                    return Err(Error::Timeout(format!(
                        "selector `{selector}` after {}ms",
                        timeout.as_millis()
                    )));
                }
            }
        }
    }

    /// Overwrite the text content of `#time`, `#title` and `#subtitle`.
    ///
    /// Values are passed as JSON literals and assigned to `textContent`, so
    /// markup in them is shown as text.
    pub async fn fill_fields(&self, fields: &PreviewFields) -> Result<()> {
        self.evaluate_void(&fill_script(fields)?).await
    }

    /// Read back the current text of the three template slots.
    pub async fn read_fields(&self) -> Result<PreviewFields> {
        let js = r#"
            JSON.stringify((() => {
                const text = (id) => {
                    const el = document.getElementById(id);
                    if (!el) throw new Error('Element not found: #' + id);
                    return el.textContent;
                };
                return { time: text('time'), title: text('title'), subtitle: text('subtitle') };
            })())
        "#;
        let result = self
            .inner
            .evaluate(js)
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        let json_str: String = result
            .into_value()
            .map_err(|e| Error::JsError(e.to_string()))?;
        Ok(serde_json::from_str(&json_str)?)
    }

    /// Take a viewport screenshot and save it to a file in the given format.
    pub async fn screenshot_to_file(&self, path: &Path, format: ImageFormat) -> Result<()> {
        let params = ScreenshotParams::builder()
            .format(format.as_cdp())
            .full_page(false)
            .build();
        self.inner
            .save_screenshot(params, path)
            .await
            .map_err(|e| Error::ScreenshotError(format!("{}: {e}", path.display())))?;
        Ok(())
    }

    /// Get the text content of an element matching the given CSS selector.
    pub async fn text_content(&self, selector: &str) -> Result<String> {
        let el = self.find_element(selector).await?;
        el.text_content().await
    }

    /// Evaluate a JavaScript expression without caring about the return value.
    pub async fn evaluate_void(&self, expression: &str) -> Result<()> {
        self.inner
            .evaluate(expression)
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        Ok(())
    }

    /// Find an element matching the given CSS selector.
    pub async fn find_element(&self, selector: &str) -> Result<Element> {
        let el = self
            .inner
            .find_element(selector)
            .await
            .map_err(|e| Error::ElementNotFound(format!("{selector}: {e}")))?;
        Ok(Element::new(el))
    }
}

fn fill_script(fields: &PreviewFields) -> Result<String> {
    let fields_js = serde_json::to_string(fields)?;
    Ok(format!(
        r#"
        (({{ time, title, subtitle }}) => {{
            const set = (id, value) => {{
                const el = document.getElementById(id);
                if (!el) throw new Error('Element not found: #' + id);
                el.textContent = value;
            }};
            set('time', time);
            set('title', title);
            set('subtitle', subtitle);
        }})({fields_js})
        "#,
    ))
}
