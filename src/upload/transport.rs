use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use std::sync::Arc;
use std::time::Duration;
use vidport_core::{Error, Result};

use super::progress::TransferProgress;
use super::request::UploadForm;
use crate::api::ApiEndpoints;
use crate::config::Config;

/// Raw answer from the ingestion endpoint.
#[derive(Debug, Clone)]
pub struct IngestResponse {
    pub status: u16,
    pub body: String,
}

impl IngestResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one multipart submission and reports bytes as they go out.
#[async_trait::async_trait]
pub trait IngestTransport: Send + Sync {
    async fn send(
        &self,
        form: UploadForm,
        progress: Arc<dyn TransferProgress>,
    ) -> Result<IngestResponse>;
}

/// reqwest-backed transport posting to `/api/v1/videos`.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    chunk_size: usize,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .connect_timeout(Duration::from_secs(config.api.connect_timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self::with_client(
            client,
            ApiEndpoints::from_config(&config.api).videos(),
            config.upload.chunk_size,
        )
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>, chunk_size: usize) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            chunk_size: chunk_size.max(1),
        }
    }
}

fn transfer_error(e: reqwest::Error) -> Error {
    Error::Transfer(e.to_string())
}

/// Split `data` into chunks, reporting the running byte count as each chunk
/// is pulled by the HTTP client.
fn progress_stream(
    data: Bytes,
    chunk_size: usize,
    progress: Arc<dyn TransferProgress>,
) -> impl Stream<Item = std::io::Result<Bytes>> + Send + Sync + 'static {
    let total = data.len() as u64;
    let chunks: Vec<Bytes> = (0..data.len())
        .step_by(chunk_size)
        .map(|start| data.slice(start..(start + chunk_size).min(data.len())))
        .collect();

    if chunks.is_empty() {
        progress.on_bytes_sent(0, 0);
    }

    let mut sent = 0u64;
    stream::iter(chunks).map(move |chunk| {
        sent += chunk.len() as u64;
        progress.on_bytes_sent(sent, total);
        Ok(chunk)
    })
}

#[async_trait::async_trait]
impl IngestTransport for HttpTransport {
    async fn send(
        &self,
        form: UploadForm,
        progress: Arc<dyn TransferProgress>,
    ) -> Result<IngestResponse> {
        let UploadForm {
            title,
            description,
            file,
        } = form;
        let total = file.len();

        let part = Part::stream_with_length(
            Body::wrap_stream(progress_stream(file.data, self.chunk_size, progress)),
            total,
        )
        .file_name(file.name)
        .mime_str(&file.mime_type)
        .map_err(|e| {
            Error::Serialization(format!("invalid MIME type {}: {}", file.mime_type, e))
        })?;

        let multipart = Form::new()
            .text("title", title)
            .text("description", description)
            .part("file", part);

        tracing::debug!("POST {} ({} bytes)", self.endpoint, total);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(multipart)
            .send()
            .await
            .map_err(transfer_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transfer_error)?;

        Ok(IngestResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(u64, u64)>>);

    impl TransferProgress for Recorder {
        fn on_bytes_sent(&self, sent: u64, total: u64) {
            self.0.lock().push((sent, total));
        }
    }

    #[tokio::test]
    async fn stream_reports_running_total() {
        let recorder = Arc::new(Recorder::default());
        let chunks: Vec<Bytes> = progress_stream(Bytes::from(vec![7u8; 10]), 4, recorder.clone())
            .map(|c| c.unwrap())
            .collect()
            .await;

        assert_eq!(
            chunks.iter().map(|c| c.len()).collect::<Vec<_>>(),
            vec![4, 4, 2]
        );
        assert_eq!(*recorder.0.lock(), vec![(4, 10), (8, 10), (10, 10)]);
    }

    #[tokio::test]
    async fn empty_body_reports_completion() {
        let recorder = Arc::new(Recorder::default());
        let chunks: Vec<_> = progress_stream(Bytes::new(), 4, recorder.clone())
            .collect()
            .await;

        assert!(chunks.is_empty());
        assert_eq!(*recorder.0.lock(), vec![(0, 0)]);
    }

    #[test]
    fn success_range() {
        let ok = IngestResponse {
            status: 201,
            body: String::new(),
        };
        let bad = IngestResponse {
            status: 500,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }
}
