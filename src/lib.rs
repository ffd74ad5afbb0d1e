pub mod browser;
pub mod config;
pub mod element;
pub mod error;
pub mod logging;
pub mod page;
pub mod render;

pub use browser::PreviewBrowser;
pub use config::{RenderConfig, SessionBuilder, SessionConfig};
pub use error::{Error, Result};
pub use page::{ImageFormat, Page, PreviewFields};
pub use render::{render, RenderJob};
