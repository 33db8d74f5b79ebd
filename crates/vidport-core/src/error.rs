//! Unified error type for vidport.
//!
//! Every failure in the upload and playback paths funnels into [`Error`].
//! None of them are fatal: each is recovered where it occurs and surfaced to
//! the user as a single line via [`Error::user_message`].

/// Unified error type covering all failure modes in vidport.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller-side input failed validation (e.g. no file selected).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The network transfer failed before a response arrived.
    #[error("Transfer error: {0}")]
    Transfer(String),

    /// The server answered with a non-success status.
    #[error("Server rejected request ({status}): {message}")]
    ServerRejection {
        /// HTTP status code returned by the server.
        status: u16,
        /// Server-provided reason, or the raw body.
        message: String,
    },

    /// A request or response body could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// No playback strategy applies to the current environment.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The adaptive-streaming manifest could not be loaded.
    #[error("Manifest error [{url}]: {message}")]
    Manifest {
        /// Manifest URL that was being loaded.
        url: String,
        /// Human-readable error description.
        message: String,
    },

    /// The operation was cancelled or superseded before it finished.
    #[error("Operation cancelled")]
    Cancelled,

    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// One-line message suitable for showing directly to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::Validation(_) => "Select a video file first",
            Error::Transfer(_) | Error::ServerRejection { .. } | Error::Serialization(_) => {
                "File not uploaded"
            }
            Error::UnsupportedFormat(_) => "Video format not supported",
            Error::Manifest { .. } => "Video could not be loaded",
            Error::Cancelled => "Operation cancelled",
            Error::Config(_) => "Invalid configuration",
            Error::Io { .. } => "File could not be read",
            Error::Internal(_) => "Something went wrong",
        }
    }

    /// Convenience constructor for [`Error::ServerRejection`].
    pub fn rejection(status: u16, message: impl Into<String>) -> Self {
        Error::ServerRejection {
            status,
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Manifest`].
    pub fn manifest(url: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Manifest {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
