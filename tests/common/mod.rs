//! Shared test doubles for integration tests.
//!
//! Provides an in-memory [`IngestTransport`], a scriptable [`MediaSink`] and
//! a [`PlaybackEnvironment`] whose engines are driven by the test, plus a
//! [`RecordingNotifier`] to observe user notices.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::oneshot;

use vidport::notifications::Notifier;
use vidport::playback::{
    AdaptiveEngine, EngineKind, EngineSignal, MediaSink, PlaybackEnvironment,
};
use vidport::upload::{
    IngestResponse, IngestTransport, TransferProgress, UploadEvent, UploadForm, VideoFile,
};
use vidport_core::{Error, Notice, NoticeLevel, Result};

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices
            .lock()
            .iter()
            .filter(|n| n.level == NoticeLevel::Error)
            .map(|n| n.message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

/// What [`ChunkedTransport`] does once every chunk has been reported.
#[derive(Clone)]
pub enum Reply {
    Respond { status: u16, body: String },
    Fail(String),
    /// Never completes. For cancellation tests.
    Hang,
}

/// Reports progress in equal chunks, then replies as scripted.
pub struct ChunkedTransport {
    chunks: u64,
    reply: Reply,
    calls: AtomicUsize,
    last_form: Mutex<Option<(String, String, String)>>,
    progress: Mutex<Option<Arc<dyn TransferProgress>>>,
}

impl ChunkedTransport {
    pub fn new(chunks: u64, reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            chunks,
            reply,
            calls: AtomicUsize::new(0),
            last_form: Mutex::new(None),
            progress: Mutex::new(None),
        })
    }

    pub fn stored(chunks: u64, video_id: &str) -> Arc<Self> {
        Self::new(
            chunks,
            Reply::Respond {
                status: 201,
                body: format!(r#"{{"videoId":"{}","title":"Test"}}"#, video_id),
            },
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// (title, description, file name) of the last submitted form.
    pub fn last_form(&self) -> Option<(String, String, String)> {
        self.last_form.lock().clone()
    }

    /// Report bytes through the progress handle of the last submission,
    /// as a transfer that outlived its submission would.
    pub fn report_late(&self, sent: u64, total: u64) {
        if let Some(progress) = self.progress.lock().clone() {
            progress.on_bytes_sent(sent, total);
        }
    }
}

#[async_trait]
impl IngestTransport for ChunkedTransport {
    async fn send(
        &self,
        form: UploadForm,
        progress: Arc<dyn TransferProgress>,
    ) -> Result<IngestResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_form.lock() = Some((
            form.title.clone(),
            form.description.clone(),
            form.file.name.clone(),
        ));
        *self.progress.lock() = Some(progress.clone());

        let total = form.file.len();
        let chunk = total / self.chunks.max(1);
        for i in 1..=self.chunks {
            let sent = if i == self.chunks { total } else { i * chunk };
            progress.on_bytes_sent(sent, total);
            tokio::task::yield_now().await;
        }

        match &self.reply {
            Reply::Respond { status, body } => Ok(IngestResponse {
                status: *status,
                body: body.clone(),
            }),
            Reply::Fail(message) => Err(Error::Transfer(message.clone())),
            Reply::Hang => {
                std::future::pending::<()>().await;
                Err(Error::Internal("transfer never completes".into()))
            }
        }
    }
}

pub fn video_file(len: usize) -> VideoFile {
    VideoFile::new("clip.mp4", "video/mp4", vec![b'v'; len])
}

/// Drain every event already delivered on `rx`.
pub fn drain(rx: &mut UnboundedReceiver<UploadEvent>) -> Vec<UploadEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn percents(events: &[UploadEvent]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            UploadEvent::Progress(p) => Some(p.percent_complete),
            _ => None,
        })
        .collect()
}

pub fn finished_count(events: &[UploadEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, UploadEvent::Finished { .. }))
        .count()
}

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

/// A media element that records what it is asked to do.
#[derive(Default)]
pub struct MockSink {
    hls: bool,
    reject_play: bool,
    source: Mutex<Option<String>>,
    plays: AtomicUsize,
    probes: AtomicUsize,
    listeners: Mutex<Vec<oneshot::Sender<()>>>,
}

impl MockSink {
    pub fn new(hls: bool) -> Arc<Self> {
        Arc::new(Self {
            hls,
            ..Default::default()
        })
    }

    pub fn rejecting_play() -> Arc<Self> {
        Arc::new(Self {
            reject_play: true,
            ..Default::default()
        })
    }

    pub fn source(&self) -> Option<String> {
        self.source.lock().clone()
    }

    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn pending_listeners(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Fire every registered can-play-through listener. Returns how many
    /// were still registered.
    pub fn fire_can_play_through(&self) -> usize {
        let listeners: Vec<_> = self.listeners.lock().drain(..).collect();
        listeners
            .into_iter()
            .filter(|tx| !tx.is_closed())
            .map(|tx| tx.send(()))
            .filter(|r| r.is_ok())
            .count()
    }
}

impl MediaSink for MockSink {
    fn can_play_type(&self, mime: &str) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.hls && mime == vidport_hls::HLS_MIME_TYPE
    }

    fn set_source(&self, url: &str) {
        *self.source.lock() = Some(url.to_string());
    }

    fn on_can_play_through(&self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        self.listeners.lock().push(tx);
        rx
    }

    fn play(&self) -> Result<()> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        if self.reject_play {
            return Err(Error::Internal("autoplay blocked".into()));
        }
        Ok(())
    }
}

/// Observable state of one engine created by [`MockEnvironment`].
#[derive(Default)]
pub struct EngineProbe {
    pub kind: Mutex<Option<EngineKind>>,
    pub source: Mutex<Option<String>>,
    pub attached: AtomicBool,
    pub destroyed: AtomicBool,
    listener: Mutex<Option<oneshot::Sender<EngineSignal>>>,
}

impl EngineProbe {
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    pub fn is_listening(&self) -> bool {
        self.listener.lock().is_some()
    }

    /// Deliver `signal` to the manifest-parsed listener, if still registered.
    pub fn fire(&self, signal: EngineSignal) -> bool {
        match self.listener.lock().take() {
            Some(tx) => tx.send(signal).is_ok(),
            None => false,
        }
    }
}

struct MockEngine {
    probe: Arc<EngineProbe>,
}

impl AdaptiveEngine for MockEngine {
    fn on_manifest_parsed(&mut self) -> oneshot::Receiver<EngineSignal> {
        let (tx, rx) = oneshot::channel();
        *self.probe.listener.lock() = Some(tx);
        rx
    }

    fn load_source(&mut self, manifest_url: &str) {
        *self.probe.source.lock() = Some(manifest_url.to_string());
    }

    fn attach_media(&mut self, _sink: Arc<dyn MediaSink>) {
        self.probe.attached.store(true, Ordering::SeqCst);
    }

    fn destroy(&mut self) {
        self.probe.destroyed.store(true, Ordering::SeqCst);
        self.probe.listener.lock().take();
    }
}

/// An environment whose engines are inspected and driven by the test.
pub struct MockEnvironment {
    native: bool,
    plugin: bool,
    engines: Mutex<Vec<Arc<EngineProbe>>>,
}

impl MockEnvironment {
    pub fn new(native: bool, plugin: bool) -> Arc<Self> {
        Arc::new(Self {
            native,
            plugin,
            engines: Mutex::new(Vec::new()),
        })
    }

    pub fn engine_count(&self) -> usize {
        self.engines.lock().len()
    }

    pub fn engine(&self, index: usize) -> Arc<EngineProbe> {
        self.engines.lock()[index].clone()
    }
}

impl PlaybackEnvironment for MockEnvironment {
    fn has_native_engine(&self) -> bool {
        self.native
    }

    fn has_plugin_engine(&self) -> bool {
        self.plugin
    }

    fn create_engine(&self, kind: EngineKind) -> Result<Box<dyn AdaptiveEngine>> {
        let probe = Arc::new(EngineProbe::default());
        *probe.kind.lock() = Some(kind);
        self.engines.lock().push(probe.clone());
        Ok(Box::new(MockEngine { probe }))
    }
}

/// Yield to the runtime until `condition` holds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..10_000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
