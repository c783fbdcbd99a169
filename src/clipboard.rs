use crate::errors::QrError;
use std::sync::Arc;

/// Text clipboard capability
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), QrError>;
}

/// OS clipboard via arboard
///
/// A fresh handle is opened per copy; on Wayland/X11 the contents are served
/// by a background thread that arboard keeps alive after the handle drops.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), QrError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| QrError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text.to_owned())
            .map_err(|e| QrError::Clipboard(e.to_string()))
    }
}

/// Copy `text` without blocking the event loop
pub async fn copy_text(clipboard: Arc<dyn Clipboard>, text: String) -> Result<(), QrError> {
    tokio::task::spawn_blocking(move || clipboard.write_text(&text))
        .await
        .map_err(|e| QrError::Clipboard(e.to_string()))?
}
