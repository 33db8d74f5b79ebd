//! vidport-hls: HLS playlist types, parsing, generation, and variant selection.
//!
//! The playback side of vidport never interprets a manifest itself; the
//! adaptive engine does. This crate is what the headless engine uses for
//! that, and what tests use to serve realistic manifests.
//!
//! # Modules
//!
//! - [`parser`] - M3U8 master and media playlist parsing
//! - [`generator`] - M3U8 rendering
//! - [`select`] - Initial variant choice under a bandwidth cap

pub mod generator;
pub mod parser;
pub mod select;
mod types;

pub use generator::{generate_master_playlist, generate_media_playlist};
pub use parser::{parse_master_playlist, parse_media_playlist, resolve_uri, ParseError};
pub use select::select_variant;
pub use types::{MasterPlaylist, MediaPlaylist, Segment, Variant};

/// MIME type of an HLS playlist.
pub const HLS_MIME_TYPE: &str = "application/vnd.apple.mpegurl";
