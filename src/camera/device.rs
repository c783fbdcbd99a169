use super::constraints::CaptureConstraints;
use super::frame::RasterFrame;
use crate::errors::QrError;
use async_trait::async_trait;

/// Platform capture API
///
/// Opening a device can wait on permission prompts or driver setup, so
/// implementations must not block the calling thread while it happens.
/// Streams are usually tied to the thread that owns them, hence `?Send`.
#[async_trait(?Send)]
pub trait CaptureDevice {
    async fn open(&self, constraints: &CaptureConstraints) -> Result<Box<dyn MediaStream>, QrError>;
}

/// A live video stream holding the camera open until stopped
#[async_trait(?Send)]
pub trait MediaStream {
    /// Copy the current video frame into an RGBA buffer at its native resolution.
    /// A zero-sized frame means the device has not produced an image yet.
    async fn grab_frame(&mut self) -> Result<RasterFrame, QrError>;

    /// Stop every track and release the device. Must be safe to call twice.
    fn stop(&mut self);
}
