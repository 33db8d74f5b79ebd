//! URL layout of the remote video service.

use crate::config::ApiConfig;
use vidport_core::VideoId;

/// Builds the service URLs from a configured base URL.
#[derive(Debug, Clone)]
pub struct ApiEndpoints {
    base_url: String,
}

impl ApiEndpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(&config.base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    /// `POST` target for multipart submissions; `GET` on the same URL lists videos.
    pub fn videos(&self) -> String {
        self.url("/videos")
    }

    /// Adaptive-streaming master playlist for a stored video.
    pub fn manifest(&self, id: &VideoId) -> String {
        self.url(&format!("/videos/{}/master.m3u8", id))
    }
}
