use crate::errors::QrError;

/// Builds the request for a rendered QR image
pub trait Encoder: Send + Sync {
    fn image_url(&self, text: &str) -> String;
}

/// GET endpoint of the goqr.me `create-qr-code` API
#[derive(Debug, Clone)]
pub struct QrServerEncoder {
    endpoint: String,
    size: u32,
}

impl QrServerEncoder {
    pub fn new(endpoint: impl Into<String>, size: u32) -> Self {
        Self {
            endpoint: endpoint.into(),
            size,
        }
    }
}

impl Encoder for QrServerEncoder {
    fn image_url(&self, text: &str) -> String {
        format!(
            "{}?size={}x{}&data={}",
            self.endpoint,
            self.size,
            self.size,
            urlencoding::encode(text)
        )
    }
}

/// Validate the input and build the image URL
///
/// Whitespace-only input is rejected. The text itself is encoded untrimmed.
pub fn generate(encoder: &dyn Encoder, text: &str) -> Result<String, QrError> {
    if text.trim().is_empty() {
        return Err(QrError::EmptyInput);
    }

    let url = encoder.image_url(text);
    tracing::debug!("Generated QR image URL: {}", url);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> QrServerEncoder {
        QrServerEncoder::new("https://api.qrserver.com/v1/create-qr-code/", 300)
    }

    #[test]
    fn test_example_url() {
        let url = generate(&encoder(), "https://example.com").unwrap();
        assert_eq!(
            url,
            "https://api.qrserver.com/v1/create-qr-code/?size=300x300&data=https%3A%2F%2Fexample.com"
        );
    }

    #[test]
    fn test_rejects_blank_input() {
        assert!(matches!(generate(&encoder(), ""), Err(QrError::EmptyInput)));
        assert!(matches!(generate(&encoder(), "  \n\t"), Err(QrError::EmptyInput)));
    }

    #[test]
    fn test_encodes_exact_text() {
        for text in ["hello world", " padded ", "a&b=c?d#e", "xin chào", "100%"] {
            let url = generate(&encoder(), text).unwrap();
            let (_, data) = url.split_once("&data=").unwrap();

            assert!(!data.contains(' '));
            assert!(!data.contains('&'));
            assert_eq!(urlencoding::decode(data).unwrap(), text);
        }
    }

    #[test]
    fn test_size_parameter() {
        let url = QrServerEncoder::new("http://localhost/qr", 512).image_url("x");
        assert_eq!(url, "http://localhost/qr?size=512x512&data=x");
    }
}
