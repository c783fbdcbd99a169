/// Which camera the capture request prefers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FacingMode {
    /// Rear camera, pointed away from the user
    #[default]
    Environment,
    User,
}

impl FacingMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "environment" => Some(Self::Environment),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    /// Substrings that identify a device with this facing in its human-readable name
    pub fn name_hints(&self) -> &'static [&'static str] {
        match self {
            Self::Environment => &["back", "rear", "environment"],
            Self::User => &["front", "user", "facetime"],
        }
    }
}

/// Capture request parameters. The resolution is advisory; devices pick the closest mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConstraints {
    pub facing: FacingMode,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            facing: FacingMode::Environment,
            ideal_width: 640,
            ideal_height: 480,
        }
    }
}
