use crate::camera::{CaptureConstraints, FacingMode};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_generator_endpoint")]
    pub generator_endpoint: String,

    #[serde(default = "default_image_size")]
    pub image_size: u32,

    #[serde(default = "default_download_filename")]
    pub download_filename: String,

    #[serde(default)]
    pub download_dir: Option<PathBuf>,

    #[serde(default = "default_scan_interval_ms")]
    pub scan_interval_ms: u64,

    #[serde(default = "default_facing_mode")]
    pub facing_mode: String,

    #[serde(default = "default_ideal_width")]
    pub ideal_width: u32,

    #[serde(default = "default_ideal_height")]
    pub ideal_height: u32,

    #[serde(default)]
    pub camera_index: Option<u32>,

    #[serde(default = "default_copied_feedback_ms")]
    pub copied_feedback_ms: u64,
}

fn default_generator_endpoint() -> String {
    "https://api.qrserver.com/v1/create-qr-code/".to_string()
}

fn default_image_size() -> u32 {
    300
}

fn default_download_filename() -> String {
    "qrcode.png".to_string()
}

fn default_scan_interval_ms() -> u64 {
    500
}

fn default_facing_mode() -> String {
    "environment".to_string()
}

fn default_ideal_width() -> u32 {
    640
}

fn default_ideal_height() -> u32 {
    480
}

fn default_copied_feedback_ms() -> u64 {
    2000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generator_endpoint: default_generator_endpoint(),
            image_size: default_image_size(),
            download_filename: default_download_filename(),
            download_dir: None,
            scan_interval_ms: default_scan_interval_ms(),
            facing_mode: default_facing_mode(),
            ideal_width: default_ideal_width(),
            ideal_height: default_ideal_height(),
            camera_index: None,
            copied_feedback_ms: default_copied_feedback_ms(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.config/qrdesk/config.json)
    ///
    /// A missing file yields the defaults; nothing is written back.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!(
                "Config file not found at {:?}, using defaults",
                config_path
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config = Self::from_json(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        tracing::info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Invalid config JSON")
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(dir)
        } else {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            PathBuf::from(home).join(".config")
        };

        Ok(config_dir.join("qrdesk").join("config.json"))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.generator_endpoint.is_empty() {
            return Err(anyhow::anyhow!("generator_endpoint cannot be empty"));
        }

        if self.image_size == 0 {
            return Err(anyhow::anyhow!("image_size must be greater than zero"));
        }

        if self.download_filename.is_empty() {
            return Err(anyhow::anyhow!("download_filename cannot be empty"));
        }

        if self.scan_interval_ms == 0 {
            return Err(anyhow::anyhow!("scan_interval_ms must be greater than zero"));
        }

        if FacingMode::parse(&self.facing_mode).is_none() {
            return Err(anyhow::anyhow!(
                "facing_mode must be one of: environment, user"
            ));
        }

        Ok(())
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms)
    }

    pub fn copied_feedback(&self) -> Duration {
        Duration::from_millis(self.copied_feedback_ms)
    }

    pub fn capture_constraints(&self) -> CaptureConstraints {
        CaptureConstraints {
            facing: FacingMode::parse(&self.facing_mode).unwrap_or_default(),
            ideal_width: self.ideal_width,
            ideal_height: self.ideal_height,
        }
    }

    /// Where downloaded images are written
    pub fn download_path(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(&self.download_filename)
    }
}
