pub mod scanner;

pub use scanner::{ScanSettings, ScannerHandle, spawn_scanner};
