// Frames are always tightly packed 8-bit RGBA, row-major, no padding.

#[derive(Debug, Clone, Default)]
pub struct RasterFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterFrame {
    pub const BYTES_PER_PIXEL: usize = 4;

    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// A device that is still warming up reports zero-sized frames
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Expected buffer length for the frame dimensions
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * Self::BYTES_PER_PIXEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_frames() {
        assert!(RasterFrame::default().is_empty());
        assert!(RasterFrame::new(640, 0, Vec::new()).is_empty());
        assert!(!RasterFrame::new(2, 2, vec![0; 16]).is_empty());
    }

    #[test]
    fn test_expected_len() {
        assert_eq!(RasterFrame::new(640, 480, Vec::new()).expected_len(), 1_228_800);
    }
}
