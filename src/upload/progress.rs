//! Progress and outcome reporting for one upload submission.
//!
//! A [`ProgressReporter`] is created by the caller for each submission and
//! handed to the pipeline. Events arrive on the paired receiver in order:
//! zero or more [`UploadEvent::Progress`] with non-decreasing percentages,
//! then exactly one [`UploadEvent::Finished`] (none if cancelled).

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use vidport_core::VideoId;

/// Receives raw byte counts from the transport as the body is sent.
pub trait TransferProgress: Send + Sync {
    fn on_bytes_sent(&self, sent: u64, total: u64);
}

/// Percent of the file transferred, 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub struct UploadProgress {
    pub percent_complete: u8,
}

impl UploadProgress {
    /// `round(sent * 100 / total)`, clamped to 100. An empty body counts as done.
    pub fn from_bytes(sent: u64, total: u64) -> Self {
        let percent = if total == 0 {
            100
        } else {
            let sent = u128::from(sent.min(total));
            let total = u128::from(total);
            ((sent * 100 + total / 2) / total) as u8
        };
        Self {
            percent_complete: percent.min(100),
        }
    }
}

/// Terminal result of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UploadOutcome {
    Success(VideoId),
    Failure(String),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success(_))
    }

    /// One-line message for direct display.
    pub fn message(&self) -> &'static str {
        match self {
            UploadOutcome::Success(_) => "File uploaded successfully",
            UploadOutcome::Failure(_) => "File not uploaded",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadState {
    Idle,
    Uploading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    Progress(UploadProgress),
    Finished {
        outcome: UploadOutcome,
        message: String,
    },
}

struct Tracker {
    state: UploadState,
    percent: u8,
}

struct Inner {
    tx: UnboundedSender<UploadEvent>,
    tracker: Mutex<Tracker>,
}

/// Per-submission progress tracker and event emitter.
#[derive(Clone)]
pub struct ProgressReporter {
    inner: Arc<Inner>,
}

impl ProgressReporter {
    /// Create a reporter and the receiver its events are delivered on.
    pub fn new() -> (Self, UnboundedReceiver<UploadEvent>) {
        let (tx, rx) = unbounded_channel();
        let reporter = Self {
            inner: Arc::new(Inner {
                tx,
                tracker: Mutex::new(Tracker {
                    state: UploadState::Idle,
                    percent: 0,
                }),
            }),
        };
        (reporter, rx)
    }

    /// Current percent complete; 0 whenever no transfer is running.
    pub fn percent(&self) -> u8 {
        self.inner.tracker.lock().percent
    }

    pub fn state(&self) -> UploadState {
        self.inner.tracker.lock().state
    }

    /// Return a terminal state to `Idle` once the caller has seen the outcome.
    pub fn acknowledge(&self) {
        let mut tracker = self.inner.tracker.lock();
        if matches!(tracker.state, UploadState::Succeeded | UploadState::Failed) {
            tracker.state = UploadState::Idle;
        }
    }

    pub(crate) fn begin(&self) {
        let mut tracker = self.inner.tracker.lock();
        tracker.state = UploadState::Uploading;
        tracker.percent = 0;
    }

    /// Emit the terminal event. Only the first call per submission has effect.
    pub(crate) fn finish(&self, outcome: &UploadOutcome) {
        let mut tracker = self.inner.tracker.lock();
        if tracker.state != UploadState::Uploading {
            return;
        }
        tracker.state = if outcome.is_success() {
            UploadState::Succeeded
        } else {
            UploadState::Failed
        };
        tracker.percent = 0;
        let _ = self.inner.tx.send(UploadEvent::Finished {
            outcome: outcome.clone(),
            message: outcome.message().to_string(),
        });
    }

    /// Abandon the submission silently; later transport callbacks are dropped.
    pub(crate) fn close(&self) {
        let mut tracker = self.inner.tracker.lock();
        tracker.state = UploadState::Idle;
        tracker.percent = 0;
    }
}

impl TransferProgress for ProgressReporter {
    fn on_bytes_sent(&self, sent: u64, total: u64) {
        let mut tracker = self.inner.tracker.lock();
        if tracker.state != UploadState::Uploading {
            return;
        }
        let percent = UploadProgress::from_bytes(sent, total)
            .percent_complete
            .max(tracker.percent);
        tracker.percent = percent;
        // Sent under the lock so events keep the order of the updates.
        let _ = self.inner.tx.send(UploadEvent::Progress(UploadProgress {
            percent_complete: percent,
        }));
    }
}
