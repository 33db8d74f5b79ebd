//! Stored-video records and the listing client.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use vidport_core::{Error, Result, VideoId};

use crate::api::ApiEndpoints;
use crate::config::Config;

/// A video as recorded by the ingestion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredVideo {
    #[serde(alias = "id")]
    pub video_id: VideoId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
}

/// Error body the service sends alongside a non-success status.
#[derive(Debug, Deserialize)]
struct ServerMessage {
    message: String,
}

/// Longest server-provided reason kept in an error.
const MAX_REASON_LEN: usize = 200;

/// Best human-readable reason from an error response body.
pub(crate) fn server_reason(body: &str) -> String {
    if let Ok(msg) = serde_json::from_str::<ServerMessage>(body) {
        return msg.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(MAX_REASON_LEN).collect()
}

/// Read-only client for the service's video listing.
pub struct VideoCatalog {
    client: Client,
    endpoints: ApiEndpoints,
}

impl VideoCatalog {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.api.connect_timeout_secs))
            .timeout(Duration::from_secs(config.api.connect_timeout_secs * 3))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            endpoints: ApiEndpoints::from_config(&config.api),
        }
    }

    /// Fetch every stored video.
    pub async fn list_videos(&self) -> Result<Vec<StoredVideo>> {
        let url = self.endpoints.videos();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Transfer(format!("GET {}: {}", url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transfer(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::rejection(status.as_u16(), server_reason(&body)));
        }

        serde_json::from_str(&body).map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_service_record() {
        let json = r#"{
            "videoId": "7fedb551-3921-41f7-b4f3-225b47d83df8",
            "title": "Test",
            "description": "Desc",
            "contentType": "video/mp4",
            "filePath": "videos/clip.mp4"
        }"#;
        let video: StoredVideo = serde_json::from_str(json).unwrap();
        assert_eq!(video.video_id.as_str(), "7fedb551-3921-41f7-b4f3-225b47d83df8");
        assert_eq!(video.content_type.as_deref(), Some("video/mp4"));
    }

    #[test]
    fn accepts_minimal_record_with_id_alias() {
        let video: StoredVideo = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        assert_eq!(video.video_id, VideoId::new("abc"));
        assert!(video.title.is_empty());
    }

    #[test]
    fn reason_prefers_message_field() {
        assert_eq!(
            server_reason(r#"{"message":"Video not uploaded","success":false}"#),
            "Video not uploaded"
        );
        assert_eq!(server_reason("  Bad Gateway \n"), "Bad Gateway");
        assert_eq!(server_reason(""), "empty response body");
        assert_eq!(server_reason(&"x".repeat(500)).len(), MAX_REASON_LEN);
    }
}
