//! Initial variant choice.

use super::types::{MasterPlaylist, Variant};

/// Pick the variant to start playback with.
///
/// Returns the highest-bandwidth variant not above `max_bandwidth`. When
/// every variant exceeds the cap, the lowest-bandwidth one is returned so
/// that playback can still begin. `None` only for an empty playlist.
pub fn select_variant(playlist: &MasterPlaylist, max_bandwidth: Option<u64>) -> Option<&Variant> {
    let cap = max_bandwidth.unwrap_or(u64::MAX);

    playlist
        .variants
        .iter()
        .filter(|v| v.bandwidth <= cap)
        .max_by_key(|v| v.bandwidth)
        .or_else(|| playlist.variants.iter().min_by_key(|v| v.bandwidth))
}
