use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use vidport_core::{Error, Notice, Result, UploadId};

use super::progress::{ProgressReporter, TransferProgress, UploadOutcome};
use super::request::{UploadForm, UploadRequest};
use super::transport::{IngestResponse, IngestTransport};
use crate::catalog::{server_reason, StoredVideo};
use crate::notifications::Notifier;

/// Turns an [`UploadRequest`] into one multipart POST with observable progress.
///
/// The pipeline keeps no per-submission state; concurrent calls each use
/// their own [`ProgressReporter`]. Mutual exclusion (disabling the submit
/// button) is the shell's job.
pub struct UploadPipeline {
    transport: Arc<dyn IngestTransport>,
    notifier: Arc<dyn Notifier>,
}

impl UploadPipeline {
    pub fn new(transport: Arc<dyn IngestTransport>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            transport,
            notifier,
        }
    }

    /// Submit a request and wait for its outcome.
    ///
    /// Returns `Err(Error::Validation)` without touching the network when no
    /// file is selected. Every other failure is reported as
    /// [`UploadOutcome::Failure`].
    pub async fn submit(
        &self,
        request: UploadRequest,
        reporter: &ProgressReporter,
    ) -> Result<UploadOutcome> {
        self.submit_with_cancel(request, reporter, &CancellationToken::new())
            .await
    }

    /// Like [`UploadPipeline::submit`], abandoning the transfer when `cancel`
    /// fires. A cancelled submission emits no outcome and returns
    /// `Err(Error::Cancelled)`.
    pub async fn submit_with_cancel(
        &self,
        request: UploadRequest,
        reporter: &ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<UploadOutcome> {
        let form = match UploadForm::try_from(request) {
            Ok(form) => form,
            Err(e) => {
                self.notifier.notify(Notice::error(e.user_message()));
                return Err(e);
            }
        };

        let upload_id = UploadId::new();
        tracing::info!(
            %upload_id,
            file = %form.file.name,
            bytes = form.file.len(),
            "Starting upload"
        );

        reporter.begin();
        let progress: Arc<dyn TransferProgress> = Arc::new(reporter.clone());

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                reporter.close();
                tracing::info!(%upload_id, "Upload cancelled");
                return Err(Error::Cancelled);
            }
            result = self.transport.send(form, progress) => result,
        };

        let outcome = match result.and_then(stored_video) {
            Ok(video) => {
                tracing::info!(%upload_id, video_id = %video.video_id, "Upload stored");
                UploadOutcome::Success(video.video_id)
            }
            Err(e) => {
                tracing::warn!(%upload_id, "Upload failed: {}", e);
                UploadOutcome::Failure(e.to_string())
            }
        };

        reporter.finish(&outcome);
        self.notifier.notify(match outcome {
            UploadOutcome::Success(_) => Notice::success(outcome.message()),
            UploadOutcome::Failure(_) => Notice::error(outcome.message()),
        });

        Ok(outcome)
    }
}

/// Interpret the ingestion response: 2xx with a decodable record.
fn stored_video(response: IngestResponse) -> Result<StoredVideo> {
    if !response.is_success() {
        return Err(Error::rejection(
            response.status,
            server_reason(&response.body),
        ));
    }

    serde_json::from_str(&response.body).map_err(|e| Error::Serialization(e.to_string()))
}
