use serde::Serialize;
use std::fmt;

use super::sink::{MediaSink, PlaybackEnvironment};
use crate::config::PlaybackConfig;

/// Which playback path an attach call chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapabilityProfile {
    NativeAdaptive,
    PluginAdaptive,
    LegacyManual,
    Unsupported,
}

impl CapabilityProfile {
    /// The engine to create for this profile, if it uses one.
    pub fn engine_kind(self) -> Option<EngineKind> {
        match self {
            CapabilityProfile::NativeAdaptive => Some(EngineKind::Native),
            CapabilityProfile::PluginAdaptive => Some(EngineKind::Plugin),
            CapabilityProfile::LegacyManual | CapabilityProfile::Unsupported => None,
        }
    }
}

impl fmt::Display for CapabilityProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CapabilityProfile::NativeAdaptive => "native-adaptive",
            CapabilityProfile::PluginAdaptive => "plugin-adaptive",
            CapabilityProfile::LegacyManual => "legacy-manual",
            CapabilityProfile::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Native,
    Plugin,
}

/// Decide the playback path, in fixed priority order:
/// native engine, plugin engine (when allowed), sink-native MIME, nothing.
pub fn detect(
    environment: &dyn PlaybackEnvironment,
    sink: &dyn MediaSink,
    config: &PlaybackConfig,
) -> CapabilityProfile {
    if environment.has_native_engine() {
        CapabilityProfile::NativeAdaptive
    } else if config.allow_plugin && environment.has_plugin_engine() {
        CapabilityProfile::PluginAdaptive
    } else if sink.can_play_type(&config.manifest_mime) {
        CapabilityProfile::LegacyManual
    } else {
        CapabilityProfile::Unsupported
    }
}
