use crate::decoder::Decoder;
use crate::errors::QrError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One-shot decode of an image file
///
/// Loading and decoding run on the blocking pool so the event loop stays
/// responsive. A miss is terminal for that file.
pub async fn decode_file(path: &Path, decoder: Arc<dyn Decoder>) -> Result<String, QrError> {
    let path: PathBuf = path.to_path_buf();
    tracing::info!("Decoding image: {:?}", path);

    let job_path = path.clone();
    tokio::task::spawn_blocking(move || {
        let path = job_path;
        let image = image::open(&path)
            .map_err(|e| QrError::ImageLoad {
                path: path.clone(),
                reason: e.to_string(),
            })?
            .to_rgba8();

        let (width, height) = image.dimensions();
        decoder
            .decode(image.as_raw(), width, height)
            .ok_or(QrError::NoSymbolFound)
    })
    .await
    .map_err(|e| QrError::ImageLoad {
        path,
        reason: e.to_string(),
    })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::RqrrDecoder;
    use crate::test_support::render_symbol;
    use image::{Rgba, RgbaImage};

    #[tokio::test]
    async fn test_decodes_symbol_from_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code.png");
        render_symbol("HELLO").save(&path).unwrap();

        let payload = decode_file(&path, Arc::new(RqrrDecoder)).await.unwrap();
        assert_eq!(payload, "HELLO");
    }

    #[tokio::test]
    async fn test_blank_png_is_no_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");
        RgbaImage::from_pixel(120, 80, Rgba([255, 255, 255, 255]))
            .save(&path)
            .unwrap();

        let result = decode_file(&path, Arc::new(RqrrDecoder)).await;
        assert!(matches!(result, Err(QrError::NoSymbolFound)));
    }

    #[tokio::test]
    async fn test_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-image.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let result = decode_file(&path, Arc::new(RqrrDecoder)).await;
        assert!(matches!(result, Err(QrError::ImageLoad { .. })));
    }

    struct PanickingDecoder;

    impl Decoder for PanickingDecoder {
        fn decode(&self, _rgba: &[u8], _width: u32, _height: u32) -> Option<String> {
            panic!("decoder crashed");
        }
    }

    #[tokio::test]
    async fn test_crashed_decode_reports_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code.png");
        render_symbol("HELLO").save(&path).unwrap();

        let result = decode_file(&path, Arc::new(PanickingDecoder)).await;

        match result {
            Err(QrError::ImageLoad { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
