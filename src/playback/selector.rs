use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use vidport_core::{Error, Notice, PlaybackId, Result};

use super::capability::{detect, CapabilityProfile};
use super::sink::{AdaptiveEngine, EngineSignal, MediaSink, PlaybackEnvironment};
use crate::config::PlaybackConfig;
use crate::notifications::Notifier;

/// A sink and the manifest it should play. Only borrowed for one attach.
#[derive(Clone)]
pub struct PlaybackTarget {
    pub sink: Arc<dyn MediaSink>,
    pub manifest_url: String,
}

impl PlaybackTarget {
    pub fn new(sink: Arc<dyn MediaSink>, manifest_url: impl Into<String>) -> Self {
        Self {
            sink,
            manifest_url: manifest_url.into(),
        }
    }
}

/// Resources owned on behalf of the most recent attach.
struct ActiveStrategy {
    playback_id: PlaybackId,
    engine: Option<Box<dyn AdaptiveEngine>>,
    cancel: CancellationToken,
}

impl ActiveStrategy {
    fn release(mut self) {
        self.cancel.cancel();
        if let Some(mut engine) = self.engine.take() {
            engine.destroy();
        }
        tracing::debug!(playback_id = %self.playback_id, "Released playback strategy");
    }
}

enum ReadySignal {
    Manifest(oneshot::Receiver<EngineSignal>),
    CanPlay(oneshot::Receiver<()>),
}

/// Chooses and configures exactly one playback strategy per attach.
///
/// Each attach first tears down whatever the previous attach set up: its
/// engine is destroyed and its pending ready wait is cancelled, so a stale
/// signal can never start playback.
pub struct PlaybackSelector {
    environment: Arc<dyn PlaybackEnvironment>,
    notifier: Arc<dyn Notifier>,
    config: PlaybackConfig,
    active: Mutex<Option<ActiveStrategy>>,
}

impl PlaybackSelector {
    pub fn new(
        environment: Arc<dyn PlaybackEnvironment>,
        notifier: Arc<dyn Notifier>,
        config: PlaybackConfig,
    ) -> Self {
        Self {
            environment,
            notifier,
            config,
            active: Mutex::new(None),
        }
    }

    /// Configure `target` for playback and wait until it starts.
    ///
    /// Returns the chosen profile. `Unsupported` is an `Ok` result: a notice
    /// has been raised and the sink was left untouched. A manifest that never
    /// becomes ready is `Err(Error::Manifest)`; an attach superseded by a newer
    /// one (or by [`PlaybackSelector::detach`]) is `Err(Error::Cancelled)`.
    pub async fn attach(&self, target: PlaybackTarget) -> Result<CapabilityProfile> {
        self.detach();

        let playback_id = PlaybackId::new();
        let profile = detect(
            self.environment.as_ref(),
            target.sink.as_ref(),
            &self.config,
        );
        tracing::info!(
            %playback_id,
            %profile,
            manifest = %target.manifest_url,
            "Attaching playback"
        );

        let cancel = CancellationToken::new();
        let ready = match profile.engine_kind() {
            Some(kind) => {
                let mut engine = match self.environment.create_engine(kind) {
                    Ok(engine) => engine,
                    Err(e) => {
                        tracing::warn!(%playback_id, "Failed to create {:?} engine: {}", kind, e);
                        self.notifier.notify(Notice::error(e.user_message()));
                        return Err(e);
                    }
                };
                let parsed = engine.on_manifest_parsed();
                engine.load_source(&target.manifest_url);
                engine.attach_media(target.sink.clone());
                self.install(ActiveStrategy {
                    playback_id,
                    engine: Some(engine),
                    cancel: cancel.clone(),
                });
                ReadySignal::Manifest(parsed)
            }
            None if profile == CapabilityProfile::LegacyManual => {
                let can_play = target.sink.on_can_play_through();
                target.sink.set_source(&target.manifest_url);
                self.install(ActiveStrategy {
                    playback_id,
                    engine: None,
                    cancel: cancel.clone(),
                });
                ReadySignal::CanPlay(can_play)
            }
            None => {
                let err = Error::UnsupportedFormat(self.config.manifest_mime.clone());
                tracing::warn!(%playback_id, "{}", err);
                self.notifier.notify(Notice::error(err.user_message()));
                return Ok(CapabilityProfile::Unsupported);
            }
        };

        match self
            .wait_ready(ready, &cancel, &target.manifest_url)
            .await
        {
            Ok(()) => {}
            Err(Error::Cancelled) => {
                tracing::debug!(%playback_id, "Attach superseded before playback started");
                return Err(Error::Cancelled);
            }
            Err(e) => {
                tracing::warn!(%playback_id, "{}", e);
                self.notifier.notify(Notice::error(e.user_message()));
                self.release_if_current(playback_id);
                return Err(e);
            }
        }

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        if let Err(e) = target.sink.play() {
            tracing::warn!(%playback_id, "Play request rejected: {}", e);
            self.notifier.notify(Notice::error("Playback could not start"));
        } else {
            tracing::info!(%playback_id, "Playback started");
        }

        Ok(profile)
    }

    /// Release whatever the last attach set up, without attaching anything new.
    pub fn detach(&self) {
        let previous = self.active.lock().take();
        if let Some(previous) = previous {
            previous.release();
        }
    }

    /// Whether a strategy is currently held for a sink.
    pub fn is_attached(&self) -> bool {
        self.active.lock().is_some()
    }

    fn install(&self, strategy: ActiveStrategy) {
        let previous = self.active.lock().replace(strategy);
        if let Some(previous) = previous {
            previous.release();
        }
    }

    fn release_if_current(&self, playback_id: PlaybackId) {
        let current = {
            let mut active = self.active.lock();
            match active.as_ref() {
                Some(strategy) if strategy.playback_id == playback_id => active.take(),
                _ => None,
            }
        };
        if let Some(current) = current {
            current.release();
        }
    }

    async fn wait_ready(
        &self,
        ready: ReadySignal,
        cancel: &CancellationToken,
        manifest_url: &str,
    ) -> Result<()> {
        let signal = async {
            match ready {
                ReadySignal::Manifest(rx) => match rx.await {
                    Ok(EngineSignal::ManifestParsed(info)) => {
                        tracing::debug!(
                            variants = info.variants,
                            segments = info.segments,
                            "Manifest parsed"
                        );
                        Ok(())
                    }
                    Ok(EngineSignal::Error(message)) => Err(Error::manifest(manifest_url, message)),
                    Err(_) => Err(Error::manifest(
                        manifest_url,
                        "engine stopped before the manifest was parsed",
                    )),
                },
                ReadySignal::CanPlay(rx) => rx.await.map_err(|_| {
                    Error::manifest(manifest_url, "media element released before it could play")
                }),
            }
        };

        let bounded = async {
            match self.config.ready_timeout_secs {
                Some(secs) => tokio::time::timeout(Duration::from_secs(secs), signal)
                    .await
                    .unwrap_or_else(|_| {
                        Err(Error::manifest(
                            manifest_url,
                            format!("not ready after {}s", secs),
                        ))
                    }),
                None => signal.await,
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            result = bounded => result,
        }
    }
}

impl Drop for PlaybackSelector {
    fn drop(&mut self) {
        if let Some(active) = self.active.get_mut().take() {
            active.release();
        }
    }
}
