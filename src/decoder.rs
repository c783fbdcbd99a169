use image::{DynamicImage, RgbaImage};

/// Turns raw RGBA pixels into the text payload of a QR symbol
///
/// Pure and synchronous: identical pixels give identical results.
/// `None` means no symbol was recognised.
pub trait Decoder: Send + Sync {
    fn decode(&self, rgba: &[u8], width: u32, height: u32) -> Option<String>;
}

/// Decoder backed by the `rqrr` symbol reader
#[derive(Debug, Default, Clone, Copy)]
pub struct RqrrDecoder;

impl Decoder for RqrrDecoder {
    fn decode(&self, rgba: &[u8], width: u32, height: u32) -> Option<String> {
        let Some(image) = RgbaImage::from_raw(width, height, rgba.to_vec()) else {
            tracing::warn!(
                "Pixel buffer of {} bytes does not match {}x{} RGBA",
                rgba.len(),
                width,
                height
            );
            return None;
        };

        let luma = DynamicImage::ImageRgba8(image).to_luma8();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            width as usize,
            height as usize,
            |x, y| luma.get_pixel(x as u32, y as u32)[0],
        );

        // First grid that decodes wins
        for grid in prepared.detect_grids() {
            match grid.decode() {
                Ok((_meta, content)) => return Some(content),
                Err(e) => tracing::debug!("Found a grid but failed to decode it: {:?}", e),
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::render_symbol;

    #[test]
    fn test_decodes_rendered_symbol() {
        let image = render_symbol("https://example.com");
        let (width, height) = image.dimensions();

        let decoded = RqrrDecoder.decode(image.as_raw(), width, height);
        assert_eq!(decoded.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_blank_image_is_a_miss() {
        let blank = vec![255u8; 64 * 64 * 4];
        assert_eq!(RqrrDecoder.decode(&blank, 64, 64), None);
    }

    #[test]
    fn test_mismatched_buffer_is_a_miss() {
        assert_eq!(RqrrDecoder.decode(&[0u8; 10], 64, 64), None);
    }
}
