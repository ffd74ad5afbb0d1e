use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::browser::PreviewBrowser;
use crate::error::{Error, Result};

/// Width of the rendered preview in CSS pixels.
pub const VIEWPORT_WIDTH: u32 = 940;
/// Height of the rendered preview in CSS pixels.
pub const VIEWPORT_HEIGHT: u32 = 550;

/// Extension tried when the config path is given without one.
const CONFIG_EXTENSION: &str = "json";

/// Text to inject into the template and where to write the screenshot.
///
/// Every field is required. A config missing one is rejected instead of
/// rendering placeholder text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    pub title: String,
    pub subtitle: String,
    /// Reading time, e.g. "6 minutes read".
    pub time: String,
    pub output: PathBuf,
}

impl RenderConfig {
    /// Parse a config from JSON text. `origin` only labels errors.
    pub fn from_json(origin: impl AsRef<Path>, text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::config(origin.as_ref(), e))
    }

    /// Resolve `name` to a config file and parse it.
    pub async fn load(name: impl AsRef<Path>) -> Result<Self> {
        let path = resolve_config_path(name.as_ref())?;
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::config(&path, e))?;
        Self::from_json(&path, &text)
    }
}

/// Find the file a config name refers to: the name itself if it is a file,
/// otherwise the name with `.json` appended.
pub fn resolve_config_path(name: &Path) -> Result<PathBuf> {
    if name.is_file() {
        return Ok(name.to_path_buf());
    }

    let mut with_ext = name.as_os_str().to_owned();
    with_ext.push(".");
    with_ext.push(CONFIG_EXTENSION);
    let with_ext = PathBuf::from(with_ext);
    if with_ext.is_file() {
        return Ok(with_ext);
    }

    Err(Error::config(name, "no such config file"))
}

/// Launch settings for a preview browser. The browser is always headless
/// with a `VIEWPORT_WIDTH`x`VIEWPORT_HEIGHT` landscape viewport.
pub struct SessionConfig {
    pub chrome_path: Option<PathBuf>,
    /// Default timeout for operations like `wait_for_selector` (default: 30s).
    pub default_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            default_timeout: Duration::from_secs(30),
        }
    }
}

pub struct SessionBuilder {
    config: SessionConfig,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
        }
    }

    pub fn chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    /// Set the default timeout for operations like `wait_for_selector`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.default_timeout = timeout;
        self
    }

    pub fn build_config(self) -> SessionConfig {
        self.config
    }

    pub async fn build(self) -> Result<PreviewBrowser> {
        PreviewBrowser::launch(self.build_config()).await
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
