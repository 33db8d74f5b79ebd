use std::sync::Arc;
use tokio::sync::oneshot;
use vidport_core::Result;

use super::capability::EngineKind;

/// A renderable media element (a `<video>` tag, a native player surface).
///
/// Listener registration returns a one-shot receiver; dropping the receiver
/// unregisters the listener.
pub trait MediaSink: Send + Sync {
    /// Whether the sink can resolve `mime` on its own. Must not have side effects.
    fn can_play_type(&self, mime: &str) -> bool;

    /// Point the sink directly at a URL.
    fn set_source(&self, url: &str);

    /// Fires once the sink has buffered enough to play through.
    fn on_can_play_through(&self) -> oneshot::Receiver<()>;

    fn play(&self) -> Result<()>;
}

/// Summary of a parsed manifest, as reported by an engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestInfo {
    pub variants: usize,
    pub selected_bandwidth: Option<u64>,
    pub segments: usize,
    pub duration_secs: f64,
}

/// One-shot signal from an adaptive engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineSignal {
    ManifestParsed(ManifestInfo),
    Error(String),
}

/// An adaptive-streaming engine that fetches and buffers segments itself.
pub trait AdaptiveEngine: Send {
    /// Register the manifest-parsed listener. Called before `load_source`.
    fn on_manifest_parsed(&mut self) -> oneshot::Receiver<EngineSignal>;

    fn load_source(&mut self, manifest_url: &str);

    fn attach_media(&mut self, sink: Arc<dyn MediaSink>);

    /// Stop all loading and release the sink. The engine is not reused.
    fn destroy(&mut self);
}

/// Read-only view of what the runtime offers, plus an engine factory.
pub trait PlaybackEnvironment: Send + Sync {
    fn has_native_engine(&self) -> bool;

    fn has_plugin_engine(&self) -> bool {
        false
    }

    fn create_engine(&self, kind: EngineKind) -> Result<Box<dyn AdaptiveEngine>>;
}
