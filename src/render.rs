//! The render pipeline: template in, screenshot out.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use url::Url;

use crate::browser::PreviewBrowser;
use crate::config::{RenderConfig, SessionConfig};
use crate::error::{Error, Result};
use crate::page::{ImageFormat, PreviewFields};

/// Template used when none is given, relative to the working directory.
pub const DEFAULT_TEMPLATE: &str = "template.html";

/// Selector whose presence means the template is ready to be filled.
pub const READY_SELECTOR: &str = "#title";

/// Build the `file://` URL of a template, resolving relative paths against
/// the current working directory.
pub fn template_url(template: &Path) -> Result<Url> {
    let absolute = std::path::absolute(template)?;
    Url::from_file_path(&absolute).map_err(|()| {
        Error::NavigationError(format!("cannot build file URL for {}", absolute.display()))
    })
}

/// Render `config` into `template` and save the screenshot to `config.output`.
///
/// Returns the text read back from the page at capture time. The browser is
/// closed before returning, whether or not rendering succeeded.
pub async fn render(
    config: &RenderConfig,
    template: &Path,
    session: SessionConfig,
) -> Result<PreviewFields> {
    let format = ImageFormat::from_path(&config.output)?;

    if !tokio::fs::try_exists(template).await? {
        return Err(Error::NavigationError(format!(
            "template not found: {}",
            template.display()
        )));
    }
    let url = template_url(template)?;

    let browser = PreviewBrowser::launch(session).await?;
    let outcome = capture(&browser, url.as_str(), config, format).await;
    let closed = browser.close().await;

    let rendered = outcome?;
    closed?;
    info!(output = %config.output.display(), "preview written");
    Ok(rendered)
}

async fn capture(
    browser: &PreviewBrowser,
    url: &str,
    config: &RenderConfig,
    format: ImageFormat,
) -> Result<PreviewFields> {
    let page = browser.new_page("about:blank").await?;
    page.goto(url).await?;
    debug!(%url, "template loaded");

    page.wait_for_selector(READY_SELECTOR).await?;

    page.fill_fields(&PreviewFields {
        time: config.time.clone(),
        title: config.title.clone(),
        subtitle: config.subtitle.clone(),
    })
    .await?;

    let rendered = page.read_fields().await?;
    debug!(?rendered, "fields substituted");

    page.screenshot_to_file(&config.output, format).await?;
    Ok(rendered)
}

/// Everything one invocation needs: the loaded config, the template location
/// and the browser settings.
pub struct RenderJob {
    pub config: RenderConfig,
    pub template: PathBuf,
    pub session: SessionConfig,
}

impl RenderJob {
    /// Load the config named by `config_name` and pair it with the default
    /// template and session settings.
    pub async fn load(config_name: impl AsRef<Path>) -> Result<Self> {
        let config = RenderConfig::load(config_name).await?;
        Ok(Self {
            config,
            template: PathBuf::from(DEFAULT_TEMPLATE),
            session: SessionConfig::default(),
        })
    }

    pub fn template(mut self, template: impl Into<PathBuf>) -> Self {
        self.template = template.into();
        self
    }

    pub fn session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    pub async fn run(self) -> Result<PreviewFields> {
        info!(config = ?self.config, "config loaded");
        render(&self.config, &self.template, self.session).await
    }
}
