use crate::camera::{CaptureConstraints, CaptureDevice, MediaStream};
use crate::decoder::Decoder;
use crate::errors::QrError;
use crate::messages::{ScanEvent, ScanPhase, ScannerCommand};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Capture session. The stream and the sampling ticker only exist together.
enum Session {
    Idle,
    Requesting,
    Active {
        stream: Box<dyn MediaStream>,
        ticker: Interval,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct ScanSettings {
    pub interval: Duration,
    pub constraints: CaptureConstraints,
}

/// Owns the camera acquisition / sampling / teardown lifecycle
///
/// This service:
/// - Opens the capture device on Start
/// - Samples a frame every `interval` while active and hands it to the decoder
/// - Stops itself after the first successful decode
/// - Releases the camera on Stop, Shutdown, when all handles are gone, or on drop
///
/// Note: camera streams are usually !Send, so this must be spawned on a
/// LocalSet using tokio::task::spawn_local.
pub struct Scanner {
    device: Box<dyn CaptureDevice>,
    decoder: Arc<dyn Decoder>,
    settings: ScanSettings,
    cmd_rx: mpsc::Receiver<ScannerCommand>,
    events: mpsc::UnboundedSender<ScanEvent>,
    phase: watch::Sender<ScanPhase>,
    session: Session,
}

impl Scanner {
    pub fn new(
        device: Box<dyn CaptureDevice>,
        decoder: Arc<dyn Decoder>,
        settings: ScanSettings,
        cmd_rx: mpsc::Receiver<ScannerCommand>,
        events: mpsc::UnboundedSender<ScanEvent>,
        phase: watch::Sender<ScanPhase>,
    ) -> Self {
        Self {
            device,
            decoder,
            settings,
            cmd_rx,
            events,
            phase,
            session: Session::Idle,
        }
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(ScannerCommand::Start(reply)) => {
                        let result = self.start().await;
                        let _ = reply.send(result);
                    }
                    Some(ScannerCommand::Stop(reply)) => {
                        self.stop();
                        let _ = reply.send(());
                    }
                    Some(ScannerCommand::Shutdown(reply)) => {
                        self.stop();
                        let _ = reply.send(());
                        break;
                    }
                    None => {
                        tracing::debug!("All scanner handles dropped");
                        self.stop();
                        break;
                    }
                },

                // Only resolves while a session is active
                _ = next_tick(&mut self.session) => self.on_tick().await,
            }
        }

        tracing::info!("Scanner shut down");
    }

    async fn start(&mut self) -> Result<(), QrError> {
        if !matches!(self.session, Session::Idle) {
            tracing::debug!("Scan already in progress, ignoring start");
            return Ok(());
        }

        self.session = Session::Requesting;
        self.phase.send_replace(ScanPhase::Requesting);

        let stream = match self.device.open(&self.settings.constraints).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!("Camera error: {}", e);
                self.session = Session::Idle;
                self.phase.send_replace(ScanPhase::Idle);
                return Err(e);
            }
        };

        let period = self.settings.interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.session = Session::Active { stream, ticker };
        self.phase.send_replace(ScanPhase::Active);
        let _ = self.events.send(ScanEvent::Opened);

        tracing::info!("Scanning started (every {:?})", period);
        Ok(())
    }

    /// Release the stream and the ticker. No-op when idle.
    fn stop(&mut self) {
        match std::mem::replace(&mut self.session, Session::Idle) {
            Session::Idle => return,
            Session::Requesting => {}
            Session::Active { mut stream, ticker } => {
                stream.stop();
                drop(ticker);
                let _ = self.events.send(ScanEvent::Closed);
            }
        }

        self.phase.send_replace(ScanPhase::Idle);
        tracing::info!("Scanning stopped");
    }

    async fn on_tick(&mut self) {
        if let Some(payload) = self.sample().await {
            tracing::info!("QR code decoded: {} chars", payload.len());
            let _ = self.events.send(ScanEvent::Decoded(payload));
            self.stop();
        }
    }

    /// Grab one frame and try to decode it. Misses are expected and silent.
    async fn sample(&mut self) -> Option<String> {
        let Session::Active { stream, .. } = &mut self.session else {
            return None;
        };

        let frame = match stream.grab_frame().await {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Skipping sample: {}", e);
                return None;
            }
        };

        if frame.is_empty() {
            tracing::trace!("Camera not warmed up yet");
            return None;
        }

        if frame.pixels.len() != frame.expected_len() {
            tracing::warn!(
                "Dropping {}x{} frame with {} bytes",
                frame.width,
                frame.height,
                frame.pixels.len()
            );
            return None;
        }

        self.decoder.decode(&frame.pixels, frame.width, frame.height)
    }
}

impl Drop for Scanner {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn next_tick(session: &mut Session) {
    match session {
        Session::Active { ticker, .. } => {
            ticker.tick().await;
        }
        _ => std::future::pending().await,
    }
}

/// Handle for communicating with the Scanner
#[derive(Clone)]
pub struct ScannerHandle {
    tx: mpsc::Sender<ScannerCommand>,
    phase: watch::Receiver<ScanPhase>,
}

impl ScannerHandle {
    pub fn new(tx: mpsc::Sender<ScannerCommand>, phase: watch::Receiver<ScanPhase>) -> Self {
        Self { tx, phase }
    }

    pub fn phase(&self) -> ScanPhase {
        *self.phase.borrow()
    }

    pub async fn start(&self) -> Result<(), QrError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(ScannerCommand::Start(reply))
            .await
            .map_err(|_| QrError::ScannerGone)?;

        rx.await.map_err(|_| QrError::ScannerGone)?
    }

    pub async fn stop(&self) -> Result<(), QrError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(ScannerCommand::Stop(reply))
            .await
            .map_err(|_| QrError::ScannerGone)?;

        rx.await.map_err(|_| QrError::ScannerGone)
    }

    /// Stop any session and end the Scanner task
    pub async fn shutdown(&self) -> Result<(), QrError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(ScannerCommand::Shutdown(reply))
            .await
            .map_err(|_| QrError::ScannerGone)?;

        rx.await.map_err(|_| QrError::ScannerGone)
    }
}

/// Create a Scanner and spawn it on the current LocalSet
pub fn spawn_scanner(
    device: Box<dyn CaptureDevice>,
    decoder: Arc<dyn Decoder>,
    settings: ScanSettings,
) -> (ScannerHandle, mpsc::UnboundedReceiver<ScanEvent>) {
    let (cmd_tx, cmd_rx) = mpsc::channel(10);
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (phase_tx, phase_rx) = watch::channel(ScanPhase::Idle);

    let scanner = Scanner::new(device, decoder, settings, cmd_rx, events_tx, phase_tx);
    tokio::task::spawn_local(scanner.run());

    (ScannerHandle::new(cmd_tx, phase_rx), events_rx)
}
