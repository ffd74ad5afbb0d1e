use chromiumoxide::element::Element as CrElement;

use crate::error::{Error, Result};

/// Wrapper around a chromiumoxide Element.
pub struct Element {
    inner: CrElement,
}

impl Element {
    pub(crate) fn new(inner: CrElement) -> Self {
        Self { inner }
    }

    /// Get the DOM `textContent` of this element, including hidden text.
    pub async fn text_content(&self) -> Result<String> {
        self.inner
            .string_property("textContent")
            .await?
            .ok_or_else(|| Error::ElementNotFound("element has no text content".into()))
    }
}
