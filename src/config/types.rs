use serde::{Deserialize, Serialize};
use vidport_hls::HLS_MIME_TYPE;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the video service, without the `/api/v1` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout in seconds (uploads of large files need headroom)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_timeout() -> u64 {
    600
}
fn default_connect_timeout() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// Size in bytes of each body chunk handed to the HTTP client.
    /// Progress is reported once per chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_chunk_size() -> usize {
    256 * 1024
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackConfig {
    /// MIME type probed on the sink for the manual fallback path
    #[serde(default = "default_manifest_mime")]
    pub manifest_mime: String,

    /// Consider plugin-provided adaptive engines (default: true)
    #[serde(default = "default_allow_plugin")]
    pub allow_plugin: bool,

    /// Upper bound in bits/s for the initial variant, if any
    #[serde(default)]
    pub max_bandwidth: Option<u64>,

    /// Give up waiting for the ready signal after this many seconds.
    /// Unset waits indefinitely.
    #[serde(default = "default_ready_timeout")]
    pub ready_timeout_secs: Option<u64>,
}

fn default_manifest_mime() -> String {
    HLS_MIME_TYPE.to_string()
}
fn default_allow_plugin() -> bool {
    true
}
fn default_ready_timeout() -> Option<u64> {
    Some(30)
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            manifest_mime: default_manifest_mime(),
            allow_plugin: default_allow_plugin(),
            max_bandwidth: None,
            ready_timeout_secs: default_ready_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationsConfig {
    /// Mirror notices into the log
    #[serde(default = "default_log")]
    pub log: bool,

    /// Number of recent notices kept for late subscribers
    #[serde(default = "default_history")]
    pub history: usize,
}

fn default_log() -> bool {
    true
}
fn default_history() -> usize {
    vidport_core::events::DEFAULT_HISTORY
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            log: default_log(),
            history: default_history(),
        }
    }
}
