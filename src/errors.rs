use std::path::PathBuf;
use thiserror::Error;

/// Recoverable failures surfaced to the user through the transient error slot.
#[derive(Debug, Error)]
pub enum QrError {
    #[error("Please enter some text or a link")]
    EmptyInput,

    #[error("Unable to access the camera ({0}). Please allow camera access.")]
    CameraUnavailable(String),

    #[error("No camera device available")]
    NoCamera,

    #[error("Failed to capture frame: {0}")]
    Frame(String),

    #[error("No QR code found in the image.")]
    NoSymbolFound,

    #[error("Failed to load image {path:?}: {reason}")]
    ImageLoad { path: PathBuf, reason: String },

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Scanner is not running")]
    ScannerGone,
}
