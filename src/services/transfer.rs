use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_stream::StreamExt;
use uuid::Uuid;

use crate::errors::AssistantError;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Stream a remote resource to `dest`, resolving only after the write is
/// flushed. On any failure the partial file is removed before the error
/// surfaces; no partially-written file is ever left in place.
pub async fn download_to(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> Result<(), AssistantError> {
    match try_download(client, url, dest).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = fs::remove_file(dest).await;
            Err(e)
        }
    }
}

async fn try_download(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> Result<(), AssistantError> {
    let resp = client
        .get(url)
        .timeout(DOWNLOAD_TIMEOUT)
        .send()
        .await
        .map_err(|e| AssistantError::Download(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(AssistantError::Download(format!(
            "download of {url} returned {status}"
        )));
    }

    let mut file = fs::File::create(dest)
        .await
        .map_err(|e| AssistantError::Download(format!("failed to create {}: {e}", dest.display())))?;

    let mut stream = resp.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| AssistantError::Download(e.to_string()))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| AssistantError::Download(e.to_string()))?;
    }

    file.flush()
        .await
        .map_err(|e| AssistantError::Download(e.to_string()))?;

    Ok(())
}

/// Persist an in-memory payload, removing any partial file on failure.
pub async fn write_to(bytes: &[u8], dest: &Path) -> Result<(), AssistantError> {
    if let Err(e) = fs::write(dest, bytes).await {
        let _ = fs::remove_file(dest).await;
        return Err(AssistantError::Download(format!(
            "failed to write {}: {e}",
            dest.display()
        )));
    }
    Ok(())
}

/// Per-request media path keyed by a fresh id, so concurrent handlers never
/// share a file. The file (if created) is removed on drop, covering every
/// exit path of the owning handler.
pub struct MediaFile {
    path: PathBuf,
}

impl MediaFile {
    pub fn new(dir: &Path, extension: &str) -> Self {
        let path = dir.join(format!("attache-{}.{extension}", Uuid::new_v4()));
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for MediaFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
