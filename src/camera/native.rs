use super::{CaptureConstraints, CaptureDevice, FacingMode, MediaStream, RasterFrame};
use crate::errors::QrError;
use async_trait::async_trait;
use nokhwa::Camera;
use nokhwa::pixel_format::RgbAFormat;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
    Resolution,
};
use tokio::sync::{mpsc, oneshot};

const TARGET_FPS: u32 = 30;

enum CameraCommand {
    Grab(oneshot::Sender<Result<RasterFrame, QrError>>),
    Stop,
}

/// Camera backed by the OS capture API (V4L2, AVFoundation, Media Foundation)
///
/// nokhwa calls block until the driver answers, so each open stream gets a
/// dedicated thread that owns the `Camera`. Frames are requested over a channel.
pub struct NativeCamera {
    index: Option<u32>,
}

impl NativeCamera {
    /// `index` pins a specific device; otherwise one is chosen by facing mode.
    pub fn new(index: Option<u32>) -> Self {
        Self { index }
    }
}

#[async_trait(?Send)]
impl CaptureDevice for NativeCamera {
    async fn open(&self, constraints: &CaptureConstraints) -> Result<Box<dyn MediaStream>, QrError> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = oneshot::channel();
        let index = self.index;
        let constraints = *constraints;

        std::thread::spawn(move || {
            let mut camera = match open_camera(index, &constraints) {
                Ok(camera) => {
                    let _ = ready_tx.send(Ok(()));
                    camera
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };

            // Ends on Stop or when the stream handle is dropped
            while let Some(cmd) = rx.blocking_recv() {
                match cmd {
                    CameraCommand::Grab(reply) => {
                        let _ = reply.send(grab(&mut camera));
                    }
                    CameraCommand::Stop => break,
                }
            }

            if let Err(e) = camera.stop_stream() {
                tracing::warn!("Failed to stop camera stream: {}", e);
            }
            tracing::info!("Camera released");
        });

        ready_rx
            .await
            .map_err(|_| QrError::CameraUnavailable("camera thread exited".to_string()))??;

        Ok(Box::new(NativeStream { tx: Some(tx) }))
    }
}

fn select_device(index: Option<u32>, facing: FacingMode) -> Result<CameraIndex, QrError> {
    if let Some(index) = index {
        return Ok(CameraIndex::Index(index));
    }

    let devices = match nokhwa::query(ApiBackend::Auto) {
        Ok(devices) => devices,
        Err(e) => {
            tracing::warn!("Failed to enumerate cameras, trying the first one: {}", e);
            return Ok(CameraIndex::Index(0));
        }
    };

    let preferred = devices.iter().find(|info| {
        let name = info.human_name().to_lowercase();
        facing.name_hints().iter().any(|hint| name.contains(hint))
    });

    match preferred.or_else(|| devices.first()) {
        Some(info) => {
            tracing::debug!("Selected camera: {}", info.human_name());
            Ok(info.index().clone())
        }
        None => Err(QrError::NoCamera),
    }
}

fn open_camera(index: Option<u32>, constraints: &CaptureConstraints) -> Result<Camera, QrError> {
    let index = select_device(index, constraints.facing)?;

    let format = RequestedFormat::new::<RgbAFormat>(RequestedFormatType::Closest(
        CameraFormat::new(
            Resolution::new(constraints.ideal_width, constraints.ideal_height),
            FrameFormat::MJPEG,
            TARGET_FPS,
        ),
    ));

    let mut camera =
        Camera::new(index, format).map_err(|e| QrError::CameraUnavailable(e.to_string()))?;

    camera
        .open_stream()
        .map_err(|e| QrError::CameraUnavailable(e.to_string()))?;

    let resolution = camera.resolution();
    tracing::info!(
        "Camera stream opened at {}x{}",
        resolution.width(),
        resolution.height()
    );

    Ok(camera)
}

fn grab(camera: &mut Camera) -> Result<RasterFrame, QrError> {
    let buffer = camera.frame().map_err(|e| QrError::Frame(e.to_string()))?;
    let image = buffer
        .decode_image::<RgbAFormat>()
        .map_err(|e| QrError::Frame(e.to_string()))?;

    let (width, height) = (image.width(), image.height());
    Ok(RasterFrame::new(width, height, image.into_raw()))
}

/// Handle to the camera thread. A camera exposes a single video track.
struct NativeStream {
    tx: Option<mpsc::UnboundedSender<CameraCommand>>,
}

#[async_trait(?Send)]
impl MediaStream for NativeStream {
    async fn grab_frame(&mut self) -> Result<RasterFrame, QrError> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| QrError::Frame("stream already stopped".to_string()))?;

        let (reply, rx) = oneshot::channel();
        tx.send(CameraCommand::Grab(reply))
            .map_err(|_| QrError::Frame("camera thread exited".to_string()))?;

        rx.await
            .map_err(|_| QrError::Frame("camera thread exited".to_string()))?
    }

    fn stop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(CameraCommand::Stop);
        }
    }
}

impl Drop for NativeStream {
    fn drop(&mut self) {
        self.stop();
    }
}
