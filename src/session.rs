//! Shell-side player state.
//!
//! The shell owns which video is current; the core components only see
//! the manifest URL passed to each attach.

use vidport_core::VideoId;

use crate::api::ApiEndpoints;

#[derive(Debug, Clone)]
pub struct PlayerSession {
    endpoints: ApiEndpoints,
    current: Option<VideoId>,
}

impl PlayerSession {
    pub fn new(endpoints: ApiEndpoints) -> Self {
        Self {
            endpoints,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&VideoId> {
        self.current.as_ref()
    }

    /// Make `id` the current video.
    ///
    /// Returns the manifest URL to attach when the id changed, `None` when it
    /// is already current (no re-attach needed).
    pub fn select(&mut self, id: VideoId) -> Option<String> {
        if self.current.as_ref() == Some(&id) {
            return None;
        }
        let url = self.endpoints.manifest(&id);
        self.current = Some(id);
        Some(url)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
