use std::time::Duration;

use chromiumoxide::browser::{Browser as CrBrowser, BrowserConfig as CrBrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::{SessionBuilder, SessionConfig, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::error::{Error, Result};
use crate::page::Page;

/// Chrome flags that improve performance without affecting rendering.
const PERF_ARGS: &[&str] = &[
    "disable-gpu",
    "disable-extensions",
    "metrics-recording-only",
    "mute-audio",
    "no-default-browser-check",
    "no-first-run",
    "disable-background-networking",
    "disable-client-side-phishing-detection",
    "disable-popup-blocking",
    "disable-sync",
    "disable-translate",
];

/// One headless browser process with a fixed viewport.
///
/// The process lives until [`PreviewBrowser::close`] is awaited. Callers that
/// launch a session are expected to close it on every path, including errors.
pub struct PreviewBrowser {
    browser: CrBrowser,
    default_timeout: Duration,
    handler_task: JoinHandle<()>,
}

impl PreviewBrowser {
    /// Create a new SessionBuilder for configuring and launching a browser.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Launch a browser instance with the given configuration.
    pub async fn launch(config: SessionConfig) -> Result<Self> {
        let mut builder = CrBrowserConfig::builder().new_headless_mode().no_sandbox();

        // chromiumoxide adds the `--` prefix itself
        for arg in PERF_ARGS {
            builder = builder.arg(*arg);
        }

        if let Some(ref path) = config.chrome_path {
            builder = builder.chrome_executable(path);
        }

        builder = builder
            .window_size(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
            .viewport(preview_viewport());

        let cr_config = builder.build().map_err(Error::LaunchError)?;

        let (browser, mut handler) = CrBrowser::launch(cr_config)
            .await
            .map_err(|e| Error::LaunchError(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser handler error: {e}");
                }
            }
        });

        debug!(width = VIEWPORT_WIDTH, height = VIEWPORT_HEIGHT, "browser launched");

        Ok(Self {
            browser,
            default_timeout: config.default_timeout,
            handler_task,
        })
    }

    /// Open a new page (tab) navigated to the given URL.
    pub async fn new_page(&self, url: &str) -> Result<Page> {
        let cr_page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| Error::NavigationError(e.to_string()))?;

        Ok(Page::new(cr_page, self.default_timeout))
    }

    /// Close the browser and wait for its process to exit.
    ///
    /// If the browser does not acknowledge the close request its process is
    /// killed, so this never waits on a browser that was not told to exit.
    pub async fn close(mut self) -> Result<()> {
        let closed = self.browser.close().await;
        if let Err(ref e) = closed {
            warn!("browser did not close cleanly, killing it: {e}");
            if let Some(Err(e)) = self.browser.kill().await {
                warn!("failed to kill browser process: {e}");
            }
        }
        if let Err(e) = self.browser.wait().await {
            warn!("failed to reap browser process: {e}");
        }
        self.handler_task.abort();
        closed?;
        debug!("browser closed");
        Ok(())
    }
}

fn preview_viewport() -> Viewport {
    Viewport {
        width: VIEWPORT_WIDTH,
        height: VIEWPORT_HEIGHT,
        device_scale_factor: Some(1.0),
        emulating_mobile: false,
        is_landscape: true,
        has_touch: false,
    }
}
