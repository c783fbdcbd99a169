use crate::errors::QrError;
use std::path::PathBuf;
use tokio::sync::oneshot;

/// Commands for the Scanner service
pub enum ScannerCommand {
    Start(oneshot::Sender<Result<(), QrError>>),
    Stop(oneshot::Sender<()>),
    Shutdown(oneshot::Sender<()>),
}

/// Notifications emitted by the Scanner
#[derive(Clone, Debug, PartialEq)]
pub enum ScanEvent {
    /// Camera is live and the overlay should be shown
    Opened,
    Decoded(String),
    /// Camera released and the overlay should be hidden
    Closed,
}

/// Capture lifecycle phase (observable via watch channel)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Requesting,
    Active,
}

/// Which tab is selected
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Generate,
    Scan,
}

/// User actions parsed from the input stream
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    SelectTab(Mode),
    SetInput(String),
    Generate(Option<String>),
    Download,
    CopyInput,
    StartCamera,
    StopCamera,
    Upload(PathBuf),
    CopyResult,
    ClearResult,
    Quit,
}
