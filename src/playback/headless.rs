//! A playback environment for running without a browser.
//!
//! [`HttpManifestEngine`] plays the part of an in-page adaptive engine: it
//! fetches the master playlist, picks a starting variant, loads that
//! variant's media playlist and then signals that the manifest is parsed.
//! [`ConsoleSink`] stands in for the media element.

use parking_lot::Mutex;
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use vidport_core::{Error, Result};
use vidport_hls::{parse_master_playlist, parse_media_playlist, resolve_uri, select_variant};

use super::capability::EngineKind;
use super::sink::{AdaptiveEngine, EngineSignal, ManifestInfo, MediaSink, PlaybackEnvironment};
use crate::config::Config;

/// Offers [`HttpManifestEngine`] as the native engine. No plugins.
pub struct HeadlessEnvironment {
    client: Client,
    max_bandwidth: Option<u64>,
}

impl HeadlessEnvironment {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.api.connect_timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            max_bandwidth: config.playback.max_bandwidth,
        }
    }
}

impl PlaybackEnvironment for HeadlessEnvironment {
    fn has_native_engine(&self) -> bool {
        true
    }

    fn create_engine(&self, kind: EngineKind) -> Result<Box<dyn AdaptiveEngine>> {
        match kind {
            EngineKind::Native => Ok(Box::new(HttpManifestEngine::new(
                self.client.clone(),
                self.max_bandwidth,
            ))),
            EngineKind::Plugin => Err(Error::UnsupportedFormat(
                "no plugin engine in headless mode".into(),
            )),
        }
    }
}

pub struct HttpManifestEngine {
    client: Client,
    max_bandwidth: Option<u64>,
    manifest_url: Option<String>,
    sink: Option<Arc<dyn MediaSink>>,
    listener: Option<oneshot::Sender<EngineSignal>>,
    task: Option<JoinHandle<()>>,
}

impl HttpManifestEngine {
    pub fn new(client: Client, max_bandwidth: Option<u64>) -> Self {
        Self {
            client,
            max_bandwidth,
            manifest_url: None,
            sink: None,
            listener: None,
            task: None,
        }
    }

    /// Loading begins once both a source and a sink are known.
    fn start_if_ready(&mut self) {
        if self.task.is_some() || self.sink.is_none() {
            return;
        }
        let Some(url) = self.manifest_url.clone() else {
            return;
        };

        let client = self.client.clone();
        let max_bandwidth = self.max_bandwidth;
        let listener = self.listener.take();

        self.task = Some(tokio::spawn(async move {
            let signal = match load_manifest(&client, &url, max_bandwidth).await {
                Ok(info) => {
                    tracing::info!(
                        "Manifest parsed: {} variant(s), starting at {} bps, {} segment(s) / {:.1}s",
                        info.variants,
                        info.selected_bandwidth
                            .map(|b| b.to_string())
                            .unwrap_or_else(|| "default".into()),
                        info.segments,
                        info.duration_secs
                    );
                    EngineSignal::ManifestParsed(info)
                }
                Err(message) => EngineSignal::Error(message),
            };
            if let Some(listener) = listener {
                let _ = listener.send(signal);
            }
        }));
    }
}

impl AdaptiveEngine for HttpManifestEngine {
    fn on_manifest_parsed(&mut self) -> oneshot::Receiver<EngineSignal> {
        let (tx, rx) = oneshot::channel();
        self.listener = Some(tx);
        rx
    }

    fn load_source(&mut self, manifest_url: &str) {
        self.manifest_url = Some(manifest_url.to_string());
        self.start_if_ready();
    }

    fn attach_media(&mut self, sink: Arc<dyn MediaSink>) {
        self.sink = Some(sink);
        self.start_if_ready();
    }

    fn destroy(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.listener = None;
        self.sink = None;
        self.manifest_url = None;
    }
}

impl Drop for HttpManifestEngine {
    fn drop(&mut self) {
        self.destroy();
    }
}

async fn fetch(client: &Client, url: &str) -> std::result::Result<String, String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| format!("GET {}: {}", url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("GET {}: {}", url, status));
    }

    response.text().await.map_err(|e| e.to_string())
}

async fn load_manifest(
    client: &Client,
    url: &str,
    max_bandwidth: Option<u64>,
) -> std::result::Result<ManifestInfo, String> {
    let text = fetch(client, url).await?;
    let master = parse_master_playlist(&text).map_err(|e| e.to_string())?;

    // A manifest without variants is itself the media playlist.
    let (media_text, selected_bandwidth) = match select_variant(&master, max_bandwidth) {
        Some(variant) => {
            let variant_url = resolve_uri(url, &variant.uri).map_err(|e| e.to_string())?;
            tracing::debug!("Selected variant {} ({} bps)", variant_url, variant.bandwidth);
            (fetch(client, &variant_url).await?, Some(variant.bandwidth))
        }
        None => (text, None),
    };

    let media = parse_media_playlist(&media_text).map_err(|e| e.to_string())?;
    if media.segments.is_empty() {
        return Err("media playlist lists no segments".into());
    }

    Ok(ManifestInfo {
        variants: master.variants.len(),
        selected_bandwidth,
        segments: media.segments.len(),
        duration_secs: media.duration_secs(),
    })
}

/// A sink that cannot decode HLS by itself and logs the play command.
#[derive(Default)]
pub struct ConsoleSink {
    source: Mutex<Option<String>>,
    plays: AtomicUsize,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> Option<String> {
        self.source.lock().clone()
    }

    pub fn play_count(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }
}

impl MediaSink for ConsoleSink {
    fn can_play_type(&self, _mime: &str) -> bool {
        false
    }

    fn set_source(&self, url: &str) {
        *self.source.lock() = Some(url.to_string());
    }

    fn on_can_play_through(&self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        if self.source.lock().is_some() {
            let _ = tx.send(());
        }
        rx
    }

    fn play(&self) -> Result<()> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        tracing::info!("Media sink playing");
        Ok(())
    }
}
