//! Adaptive playback selection.
//!
//! [`PlaybackSelector::attach`] inspects the environment once and sets up
//! exactly one path for a media sink, in priority order:
//!
//! 1. **NativeAdaptive**: an in-runtime adaptive engine loads the manifest;
//!    play starts on the manifest-parsed signal
//! 2. **PluginAdaptive**: the same, through a player plugin's engine
//! 3. **LegacyManual**: the sink plays the manifest URL itself; play starts
//!    on its can-play-through signal
//! 4. **Unsupported**: nothing is attempted; the user is told
//!
//! Nothing is retried; a failed attach is retried by attaching again.

mod capability;
mod headless;
mod selector;
mod sink;

pub use capability::{detect, CapabilityProfile, EngineKind};
pub use headless::{ConsoleSink, HeadlessEnvironment, HttpManifestEngine};
pub use selector::{PlaybackSelector, PlaybackTarget};
pub use sink::{AdaptiveEngine, EngineSignal, ManifestInfo, MediaSink, PlaybackEnvironment};
