//! M3U8 rendering.
//!
//! Used by test fixtures and mock servers; the client itself only reads
//! playlists.

use super::types::{MasterPlaylist, MediaPlaylist};

/// Render an HLS master playlist.
///
/// Emits `#EXTM3U` followed by one `#EXT-X-STREAM-INF` line and URI per
/// variant, in the order given.
pub fn generate_master_playlist(playlist: &MasterPlaylist) -> String {
    let mut out = String::from("#EXTM3U\n");

    for variant in &playlist.variants {
        let mut inf = format!("#EXT-X-STREAM-INF:BANDWIDTH={}", variant.bandwidth);
        if let Some((w, h)) = variant.resolution {
            inf.push_str(&format!(",RESOLUTION={w}x{h}"));
        }
        if !variant.codecs.is_empty() {
            inf.push_str(&format!(",CODECS=\"{}\"", variant.codecs));
        }
        out.push_str(&inf);
        out.push('\n');
        out.push_str(&variant.uri);
        out.push('\n');
    }

    out
}

/// Render an HLS media playlist.
pub fn generate_media_playlist(playlist: &MediaPlaylist) -> String {
    let mut lines = vec![
        "#EXTM3U".to_string(),
        "#EXT-X-VERSION:7".to_string(),
        format!("#EXT-X-TARGETDURATION:{}", playlist.target_duration),
        format!("#EXT-X-MEDIA-SEQUENCE:{}", playlist.media_sequence),
    ];

    if let Some(ref init_uri) = playlist.init_segment_uri {
        lines.push(format!("#EXT-X-MAP:URI=\"{init_uri}\""));
    }

    for segment in &playlist.segments {
        let title = segment.title.as_deref().unwrap_or("");
        lines.push(format!("#EXTINF:{:.6},{}", segment.duration, title));
        lines.push(segment.uri.clone());
    }

    if playlist.ended {
        lines.push("#EXT-X-ENDLIST".to_string());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
