use crate::errors::QrError;
use futures::StreamExt;
use std::io::Write;
use std::path::{Path, PathBuf};

const USER_AGENT: &str = concat!("qrdesk/", env!("CARGO_PKG_VERSION"));

/// HTTP client used for image downloads
pub fn http_client() -> Result<reqwest::Client, QrError> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| QrError::Download(e.to_string()))
}

/// Fetch the generated image and save it as `target`
///
/// The body is streamed into a temp file next to the target and renamed into
/// place once complete, so an interrupted download never leaves a partial file.
pub async fn save_image(
    client: &reqwest::Client,
    url: &str,
    target: &Path,
) -> Result<PathBuf, QrError> {
    tracing::info!("Downloading {} to {:?}", url, target);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| QrError::Download(e.to_string()))?;

    if !response.status().is_success() {
        return Err(QrError::Download(format!(
            "HTTP status: {}",
            response.status()
        )));
    }

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| QrError::Download(e.to_string()))?;

    let mut file =
        tempfile::NamedTempFile::new_in(&dir).map_err(|e| QrError::Download(e.to_string()))?;

    let mut written: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| QrError::Download(e.to_string()))?;
        file.write_all(&chunk)
            .map_err(|e| QrError::Download(e.to_string()))?;
        written += chunk.len() as u64;
    }

    if written == 0 {
        return Err(QrError::Download("empty response body".to_string()));
    }

    file.persist(target)
        .map_err(|e| QrError::Download(e.to_string()))?;

    tracing::info!("Saved {} bytes to {:?}", written, target);
    Ok(target.to_path_buf())
}
