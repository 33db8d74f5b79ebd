//! Video upload pipeline.
//!
//! A submission runs `Idle -> Uploading -> {Succeeded, Failed}`:
//!
//! - [`UploadRequest`] is validated into an [`UploadForm`] (a file is required)
//! - an [`IngestTransport`] sends it as `multipart/form-data` in one POST
//! - the [`ProgressReporter`] turns byte counts into percentages and emits
//!   exactly one outcome
//!
//! There is no retry or resumption; a new submission starts from byte 0.

mod pipeline;
mod progress;
mod request;
mod transport;

pub use pipeline::UploadPipeline;
pub use progress::{
    ProgressReporter, TransferProgress, UploadEvent, UploadOutcome, UploadProgress, UploadState,
};
pub use request::{UploadForm, UploadRequest, VideoFile};
pub use transport::{HttpTransport, IngestResponse, IngestTransport};
