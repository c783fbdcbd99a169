use crate::camera::{CaptureDevice, NativeCamera};
use crate::clipboard::{self, Clipboard, SystemClipboard};
use crate::config::Config;
use crate::decoder::{Decoder, RqrrDecoder};
use crate::download;
use crate::generator::{self, Encoder, QrServerEncoder};
use crate::messages::{Action, ScanEvent};
use crate::services::{ScanSettings, ScannerHandle, spawn_scanner};
use crate::still_image;
use crate::view::ViewState;

use anyhow::{Context, Result};
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Sleep;

/// External collaborators the app delegates to
pub struct Components {
    pub encoder: Box<dyn Encoder>,
    pub decoder: Arc<dyn Decoder>,
    pub clipboard: Arc<dyn Clipboard>,
    pub device: Box<dyn CaptureDevice>,
}

impl Components {
    pub fn native(config: &Config) -> Self {
        Self {
            encoder: Box::new(QrServerEncoder::new(
                config.generator_endpoint.clone(),
                config.image_size,
            )),
            decoder: Arc::new(RqrrDecoder),
            clipboard: Arc::new(SystemClipboard),
            device: Box::new(NativeCamera::new(config.camera_index)),
        }
    }
}

pub struct App {
    view: ViewState,
    config: Config,
    encoder: Box<dyn Encoder>,
    decoder: Arc<dyn Decoder>,
    clipboard: Arc<dyn Clipboard>,
    http: reqwest::Client,
    scanner: ScannerHandle,
    scan_events: mpsc::UnboundedReceiver<ScanEvent>,
    copied_reset: Option<Pin<Box<Sleep>>>,
}

impl App {
    /// Must be called inside a LocalSet: the scanner is spawned with spawn_local.
    pub fn new(config: Config) -> Result<Self> {
        let components = Components::native(&config);
        Self::with_components(config, components)
    }

    pub fn with_components(config: Config, components: Components) -> Result<Self> {
        let http = download::http_client().context("Failed to build HTTP client")?;

        let settings = ScanSettings {
            interval: config.scan_interval(),
            constraints: config.capture_constraints(),
        };
        let (scanner, scan_events) =
            spawn_scanner(components.device, components.decoder.clone(), settings);

        Ok(Self {
            view: ViewState::default(),
            config,
            encoder: components.encoder,
            decoder: components.decoder,
            clipboard: components.clipboard,
            http,
            scanner,
            scan_events,
            copied_reset: None,
        })
    }

    pub async fn run(mut self, mut actions: mpsc::Receiver<Action>) -> Result<()> {
        self.render();

        while self.step(&mut actions).await {
            self.render();
        }

        self.teardown().await;
        tracing::info!("qrdesk shutdown complete");
        Ok(())
    }

    /// Wait for the next input and apply it. Returns false once the app should quit.
    async fn step(&mut self, actions: &mut mpsc::Receiver<Action>) -> bool {
        tokio::select! {
            action = actions.recv() => match action {
                Some(action) => return self.handle_action(action).await,
                None => return false,
            },

            Some(event) = self.scan_events.recv() => self.handle_scan_event(event),

            _ = copied_expired(&mut self.copied_reset) => self.expire_copied(),

            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, shutting down");
                return false;
            }
        }

        true
    }

    fn render(&self) {
        println!("{}", self.view.render(self.scanner.phase()));
    }

    async fn handle_action(&mut self, action: Action) -> bool {
        tracing::debug!("handle_action: {:?}", action);

        match action {
            Action::SelectTab(mode) => self.view.mode = mode,
            Action::SetInput(text) => self.view.input_text = text,
            Action::Generate(text) => {
                if let Some(text) = text {
                    self.view.input_text = text;
                }
                self.generate();
            }
            Action::Download => self.download().await,
            Action::CopyInput => {
                let text = self.view.input_text.clone();
                self.copy(text).await;
            }
            Action::StartCamera => self.start_camera().await,
            Action::StopCamera => {
                if let Err(e) = self.scanner.stop().await {
                    tracing::warn!("Failed to stop scanner: {}", e);
                }
            }
            Action::Upload(path) => self.upload(&path).await,
            Action::CopyResult => {
                if let Some(result) = self.view.scanned_result.clone() {
                    self.copy(result).await;
                }
            }
            Action::ClearResult => self.view.scanned_result = None,
            Action::Quit => return false,
        }

        true
    }

    fn expire_copied(&mut self) {
        self.copied_reset = None;
        self.view.copied = false;
    }

    fn handle_scan_event(&mut self, event: ScanEvent) {
        match event {
            ScanEvent::Opened => self.view.overlay_open = true,
            ScanEvent::Decoded(payload) => self.view.scanned_result = Some(payload),
            ScanEvent::Closed => self.view.overlay_open = false,
        }
    }

    fn generate(&mut self) {
        match generator::generate(self.encoder.as_ref(), &self.view.input_text) {
            Ok(url) => {
                self.view.error = None;
                self.view.image_url = Some(url);
            }
            Err(e) => self.view.error = Some(e.to_string()),
        }
    }

    async fn download(&mut self) {
        let Some(url) = self.view.image_url.clone() else {
            return;
        };
        self.view.error = None;

        match download::save_image(&self.http, &url, &self.config.download_path()).await {
            Ok(path) => println!("Saved {}", path.display()),
            Err(e) => {
                tracing::error!("{}", e);
                self.view.error = Some(e.to_string());
            }
        }
    }

    /// Best effort: failures are logged, never shown
    async fn copy(&mut self, text: String) {
        match clipboard::copy_text(self.clipboard.clone(), text).await {
            Ok(()) => {
                self.view.copied = true;
                self.copied_reset = Some(Box::pin(tokio::time::sleep(
                    self.config.copied_feedback(),
                )));
            }
            Err(e) => tracing::error!("Failed to copy text: {}", e),
        }
    }

    async fn start_camera(&mut self) {
        self.view.error = None;
        if let Err(e) = self.scanner.start().await {
            self.view.error = Some(e.to_string());
        }
    }

    async fn upload(&mut self, path: &Path) {
        self.view.error = None;
        match still_image::decode_file(path, self.decoder.clone()).await {
            Ok(payload) => self.view.scanned_result = Some(payload),
            Err(e) => {
                tracing::info!("Upload decode failed: {}", e);
                self.view.error = Some(e.to_string());
            }
        }
    }

    /// Release the camera and stop the scanner task, whatever state it is in
    async fn teardown(&mut self) {
        if let Err(e) = self.scanner.shutdown().await {
            tracing::debug!("Scanner already gone: {}", e);
        }
        self.view.overlay_open = false;
    }
}

async fn copied_expired(reset: &mut Option<Pin<Box<Sleep>>>) {
    match reset {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}
