use bytes::Bytes;
use std::fmt;
use std::path::Path;
use vidport_core::{Error, Result};

/// A file chosen for upload: name, MIME type and contents.
#[derive(Clone)]
pub struct VideoFile {
    pub name: String,
    pub mime_type: String,
    pub data: Bytes,
}

impl VideoFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub async fn open(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| Error::Validation(format!("not a file path: {:?}", path)))?;

        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        if !mime_type.starts_with("video/") {
            tracing::warn!("{} does not look like a video ({})", name, mime_type);
        }

        let data = tokio::fs::read(path).await?;
        Ok(Self::new(name, mime_type, data))
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for VideoFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// What the user filled in: an optional file plus metadata.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub file: Option<VideoFile>,
    pub title: String,
    pub description: String,
}

impl UploadRequest {
    pub fn new(file: Option<VideoFile>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            file,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// A validated request, ready to be encoded as `multipart/form-data`.
#[derive(Debug, Clone)]
pub struct UploadForm {
    pub title: String,
    pub description: String,
    pub file: VideoFile,
}

impl TryFrom<UploadRequest> for UploadForm {
    type Error = Error;

    fn try_from(request: UploadRequest) -> Result<Self> {
        let file = request
            .file
            .ok_or_else(|| Error::Validation("no file selected".into()))?;

        Ok(Self {
            title: request.title,
            description: request.description,
            file,
        })
    }
}
