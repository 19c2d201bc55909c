use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::{engine_debug, engine_info};
use bytes::BytesMut;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::persist::AtomicFileWriter;
use crate::{Artifact, FailureKind, StatusReport, TransportError, UploadAccepted};

const ZIP_MIME: &str = "application/zip";

#[derive(Debug, Clone)]
pub struct TransportSettings {
    /// Root of the merge service, e.g. `http://127.0.0.1:5000/`.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Timeout for `/process`, `/status` and downloads.
    pub request_timeout: Duration,
    /// Timeout for the multipart upload, which carries the whole archive.
    pub upload_timeout: Duration,
    pub max_download_bytes: u64,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            upload_timeout: Duration::from_secs(600),
            max_download_bytes: 500 * 1024 * 1024,
        }
    }
}

/// Outbound calls to the merge service. Implementations perform network I/O
/// only and report every failure as a typed [`TransportError`].
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// `POST /upload` with the archive as multipart field `file`.
    async fn submit(&self, archive: &Path) -> Result<UploadAccepted, TransportError>;

    /// `POST /process` with `{"zip_path": remote_id}`.
    async fn start_processing(&self, remote_id: &str) -> Result<(), TransportError>;

    /// `GET /status`. `Ok(None)` means the server has no status yet (404).
    async fn poll_status(&self) -> Result<Option<StatusReport>, TransportError>;

    /// `GET /download/{artifact}`, saved under `dest_dir`.
    async fn download(&self, artifact: Artifact, dest_dir: &Path)
        -> Result<PathBuf, TransportError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    zip_path: Option<String>,
    file_count: Option<u32>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProcessResponse {
    #[serde(default)]
    success: bool,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    settings: TransportSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(settings: TransportSettings) -> Result<Self, TransportError> {
        let mut base_url = settings.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base = Url::parse(&base_url)
            .map_err(|err| TransportError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| TransportError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base
            .join(path)
            .map_err(|err| TransportError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn submit(&self, archive: &Path) -> Result<UploadAccepted, TransportError> {
        let file_name = archive
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "archive.zip".to_string());
        let bytes = tokio::fs::read(archive).await.map_err(|err| {
            TransportError::new(
                FailureKind::Io,
                format!("cannot read {}: {err}", archive.display()),
            )
        })?;
        engine_info!("Uploading {} ({} bytes)", file_name, bytes.len());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(ZIP_MIME)
            .map_err(map_reqwest_error)?;
        let response = self
            .client
            .post(self.endpoint("upload")?)
            .timeout(self.settings.upload_timeout)
            .multipart(Form::new().part("file", part))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let body: UploadResponse = read_json(response).await?;
        if !body.success {
            return Err(TransportError::new(
                FailureKind::Rejected,
                body.error.unwrap_or_else(|| "Upload failed".to_string()),
            ));
        }
        let remote_id = body.zip_path.ok_or_else(|| {
            TransportError::new(FailureKind::Decode, "upload response without zip_path")
        })?;
        Ok(UploadAccepted {
            remote_id,
            file_count: body.file_count.unwrap_or(0),
        })
    }

    async fn start_processing(&self, remote_id: &str) -> Result<(), TransportError> {
        let payload = serde_json::json!({ "zip_path": remote_id });
        let response = self
            .client
            .post(self.endpoint("process")?)
            .header(CONTENT_TYPE, "application/json")
            .body(payload.to_string())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let body: ProcessResponse = read_json(response).await?;
        if body.success {
            Ok(())
        } else {
            Err(TransportError::new(
                FailureKind::Rejected,
                body.error
                    .unwrap_or_else(|| "Failed to start processing".to_string()),
            ))
        }
    }

    async fn poll_status(&self) -> Result<Option<StatusReport>, TransportError> {
        let response = self
            .client
            .get(self.endpoint("status")?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            engine_debug!("Status not available yet");
            return Ok(None);
        }
        read_json(response).await.map(Some)
    }

    async fn download(
        &self,
        artifact: Artifact,
        dest_dir: &Path,
    ) -> Result<PathBuf, TransportError> {
        let url = self.endpoint(&format!("download/{}", artifact.as_str()))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;

        // The service renders an HTML error page with 200 when no merged file exists.
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        if let Some(ct) = content_type.as_deref() {
            if ct.trim_start().to_ascii_lowercase().starts_with("text/html") {
                return Err(TransportError::new(
                    FailureKind::UnexpectedContent {
                        content_type: ct.to_string(),
                    },
                    format!("the {} file is not available on the server", artifact.as_str()),
                ));
            }
        }

        let max_bytes = self.settings.max_download_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(TransportError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "download too large",
                ));
            }
        }

        let mut bytes = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(TransportError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "download too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let writer = AtomicFileWriter::new(dest_dir.to_path_buf());
        let path = writer
            .write(artifact.file_name(), &bytes)
            .map_err(|err| TransportError::new(FailureKind::Io, err.to_string()))?;
        engine_info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// Non-2xx responses become errors carrying the server's `error` field when it sent one.
async fn ensure_success(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| status.to_string());
    Err(TransportError::new(
        FailureKind::HttpStatus(status.as_u16()),
        message,
    ))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    let response = ensure_success(response).await?;
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body)
        .map_err(|err| TransportError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(FailureKind::Timeout, err.to_string());
    }
    TransportError::new(FailureKind::Network, err.to_string())
}
