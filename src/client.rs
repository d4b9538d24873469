//! Google Drive API client for multipart uploads and folder listing.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, Stream};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, StatusCode};
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{DriveError, Result};
use crate::models::{
    ApiErrorResponse, DriveFolder, FileMetadata, FolderListResponse, UploadDescriptor,
    FOLDER_MIME_TYPE,
};
use crate::payload::Payload;
use crate::transport::{ProgressFn, ProgressTracker, Transport};

/// Base URL for Google Drive API v3.
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Upload URL for Google Drive API.
pub const UPLOAD_API_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

/// Size of the body chunks handed to the HTTP client; progress is reported per chunk.
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Client for uploading files to and listing folders in Google Drive.
///
/// The client holds no credentials; every call takes the bearer token to use.
#[derive(Debug, Clone)]
pub struct DriveClient {
    http: Client,
    api_base: String,
    upload_base: String,
}

impl Default for DriveClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DriveClient {
    /// Create a client against the public Google endpoints.
    pub fn new() -> Self {
        Self::with_base_urls(DRIVE_API_BASE, UPLOAD_API_BASE)
    }

    /// Create a client against custom endpoints.
    ///
    /// # Arguments
    /// * `api_base` - Replaces `https://www.googleapis.com/drive/v3`
    /// * `upload_base` - Replaces `https://www.googleapis.com/upload/drive/v3`
    pub fn with_base_urls(api_base: impl Into<String>, upload_base: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            upload_base: upload_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// List every folder visible to the token, following pagination.
    pub async fn list_folders(&self, access_token: &str) -> Result<Vec<DriveFolder>> {
        let query = format!("mimeType=\"{}\"", FOLDER_MIME_TYPE);
        let mut folders = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(format!("{}/files", self.api_base))
                .bearer_auth(access_token)
                .query(&[
                    ("q", query.as_str()),
                    ("fields", "nextPageToken, files(id, name)"),
                ]);

            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await?;
            let status = response.status();

            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                return Err(api_error(status, error_body));
            }

            let body = response.text().await?;
            let page: FolderListResponse = serde_json::from_str(&body)?;
            debug!(count = page.files.len(), "fetched folder page");
            folders.extend(page.files);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(folders)
    }

    /// Upload a payload into a folder with a single multipart request.
    ///
    /// # Arguments
    /// * `access_token` - Bearer token sent in the `Authorization` header
    /// * `folder_id` - ID of the destination folder
    /// * `payload` - File name, type and bytes
    /// * `on_progress` - Receives rounded percentages as the body is sent
    pub async fn upload_file(
        &self,
        access_token: &str,
        folder_id: &str,
        payload: &Payload,
        mut on_progress: Option<ProgressFn<'_>>,
    ) -> Result<FileMetadata> {
        let descriptor = UploadDescriptor {
            name: payload.name(),
            parents: [folder_id],
        };

        let metadata_part =
            Part::text(serde_json::to_string(&descriptor)?).mime_str("application/json")?;

        let (sent_tx, mut sent_rx) = mpsc::unbounded_channel();
        let body = Body::wrap_stream(chunked_body(payload.bytes().clone(), sent_tx));
        let file_part = Part::stream_with_length(body, payload.len())
            .file_name(payload.name().to_string())
            .mime_str(payload.mime_type())?;

        let form = Form::new()
            .part("metadata", metadata_part)
            .part("file", file_part);

        debug!(
            name = payload.name(),
            folder_id,
            bytes = payload.len(),
            "starting multipart upload"
        );

        let request = self
            .http
            .post(format!("{}/files", self.upload_base))
            .bearer_auth(access_token)
            .query(&[("uploadType", "multipart")])
            .multipart(form)
            .send();
        tokio::pin!(request);

        let mut tracker = ProgressTracker::new(payload.len());
        let mut report = |sent: u64| {
            if let Some(percent) = tracker.update(sent) {
                if let Some(callback) = on_progress.as_deref_mut() {
                    callback(percent);
                }
            }
        };

        let response = loop {
            tokio::select! {
                result = &mut request => break result?,
                Some(sent) = sent_rx.recv() => report(sent),
            }
        };
        while let Ok(sent) = sent_rx.try_recv() {
            report(sent);
        }

        let status = response.status();
        if status != StatusCode::OK {
            let error_body = response.text().await.unwrap_or_default();
            return Err(api_error(status, error_body));
        }

        let body = response.text().await?;
        let metadata: FileMetadata = serde_json::from_str(&body)?;
        debug!(id = %metadata.id, "upload finished");
        Ok(metadata)
    }
}

#[async_trait]
impl Transport for DriveClient {
    async fn upload_one(
        &self,
        access_token: &str,
        folder_id: &str,
        payload: &Payload,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<FileMetadata> {
        self.upload_file(access_token, folder_id, payload, on_progress)
            .await
    }
}

/// Split `bytes` into body chunks, announcing the running byte count as each is handed out.
fn chunked_body(
    bytes: Bytes,
    sent: mpsc::UnboundedSender<u64>,
) -> impl Stream<Item = std::io::Result<Bytes>> + Send + 'static {
    let total = bytes.len();
    stream::iter((0..total).step_by(UPLOAD_CHUNK_SIZE).map(move |start| {
        let end = (start + UPLOAD_CHUNK_SIZE).min(total);
        // The receiver is gone once the request settled; nothing to report then.
        let _ = sent.send(end as u64);
        Ok(bytes.slice(start..end))
    }))
}

/// Build a transport error from a non-success response, preferring Google's message.
fn api_error(status: StatusCode, body: String) -> DriveError {
    let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(api_error) => api_error.error.message,
        Err(_) => body,
    };
    DriveError::Transport {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_chunked_body_reports_running_total() {
        let bytes = Bytes::from(vec![7u8; UPLOAD_CHUNK_SIZE * 2 + 10]);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let chunks: Vec<_> = chunked_body(bytes, tx).collect().await;
        assert_eq!(chunks.len(), 3);

        let mut reported = Vec::new();
        while let Ok(sent) = rx.try_recv() {
            reported.push(sent);
        }
        assert_eq!(
            reported,
            vec![
                UPLOAD_CHUNK_SIZE as u64,
                UPLOAD_CHUNK_SIZE as u64 * 2,
                UPLOAD_CHUNK_SIZE as u64 * 2 + 10
            ]
        );
    }

    #[test]
    fn test_api_error_prefers_google_message() {
        let body = r#"{"error":{"code":403,"message":"Insufficient permissions"}}"#;
        let err = api_error(StatusCode::FORBIDDEN, body.to_string());
        assert_eq!(err.status_code(), Some(403));
        assert!(err.to_string().contains("Insufficient permissions"));

        let err = api_error(StatusCode::BAD_GATEWAY, "upstream down".to_string());
        assert_eq!(err.status_code(), Some(502));
        assert!(err.to_string().contains("upstream down"));
    }

    #[test]
    fn test_base_urls_trimmed() {
        let client = DriveClient::with_base_urls("http://localhost/api/", "http://localhost/up/");
        assert_eq!(client.api_base, "http://localhost/api");
        assert_eq!(client.upload_base, "http://localhost/up");
    }
}
