use crate::messages::{Mode, ScanPhase};
use std::fmt::Write;

/// Everything the screen shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub mode: Mode,
    pub input_text: String,
    pub image_url: Option<String>,
    pub scanned_result: Option<String>,
    pub copied: bool,
    pub error: Option<String>,
    pub overlay_open: bool,
}

impl ViewState {
    pub fn render(&self, phase: ScanPhase) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== QR Code Generator & Scanner ===");
        let _ = match self.mode {
            Mode::Generate => writeln!(out, "[ Generate ]   Scan"),
            Mode::Scan => writeln!(out, "  Generate   [ Scan ]"),
        };

        match self.mode {
            Mode::Generate => {
                let _ = writeln!(out, "Text: {}", self.input_text);
                if let Some(url) = &self.image_url {
                    let _ = writeln!(out, "QR image: {}", url);
                    let _ = writeln!(out, "  > download | {}", self.copy_label("copy text"));
                }
            }
            Mode::Scan => {
                let camera = match phase {
                    ScanPhase::Idle => "start",
                    ScanPhase::Requesting => "(opening camera...)",
                    ScanPhase::Active => "stop",
                };
                let _ = writeln!(out, "  > {} | upload <path>", camera);
                if let Some(result) = &self.scanned_result {
                    let _ = writeln!(out, "Scan result: {}", result);
                    let _ = writeln!(out, "  > {} | clear", self.copy_label("copy-result"));
                }
            }
        }

        if let Some(error) = &self.error {
            let _ = writeln!(out, "! {}", error);
        }

        if self.overlay_open {
            let _ = writeln!(out, "--- Camera: hold the QR code inside the frame... (stop) ---");
        }

        out
    }

    fn copy_label(&self, idle: &'static str) -> &'static str {
        if self.copied { "copied!" } else { idle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_tab() {
        let view = ViewState {
            input_text: "hi".to_string(),
            image_url: Some("http://qr/?data=hi".to_string()),
            ..ViewState::default()
        };
        let screen = view.render(ScanPhase::Idle);

        assert!(screen.contains("[ Generate ]"));
        assert!(screen.contains("QR image: http://qr/?data=hi"));
        assert!(screen.contains("copy text"));
        assert!(!screen.contains("Scan result"));
    }

    #[test]
    fn test_scan_tab_with_overlay_and_error() {
        let view = ViewState {
            mode: Mode::Scan,
            scanned_result: Some("HELLO".to_string()),
            copied: true,
            error: Some("No QR code found in the image.".to_string()),
            overlay_open: true,
            ..ViewState::default()
        };
        let screen = view.render(ScanPhase::Active);

        assert!(screen.contains("[ Scan ]"));
        assert!(screen.contains("> stop"));
        assert!(screen.contains("Scan result: HELLO"));
        assert!(screen.contains("copied!"));
        assert!(screen.contains("! No QR code found"));
        assert!(screen.contains("--- Camera"));
    }
}
