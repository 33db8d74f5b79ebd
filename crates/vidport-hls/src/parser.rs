//! M3U8 parsing.
//!
//! Only the tags needed to pick a variant and enumerate its segments are
//! understood; everything else is skipped.

use super::types::{MasterPlaylist, MediaPlaylist, Segment, Variant};

/// Errors produced while reading a playlist.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParseError {
    #[error("playlist does not start with #EXTM3U")]
    MissingHeader,

    #[error("line {line}: missing attribute {name}")]
    MissingAttribute { line: usize, name: &'static str },

    #[error("line {line}: invalid value for {name}: {value}")]
    InvalidAttribute {
        line: usize,
        name: &'static str,
        value: String,
    },

    #[error("line {line}: tag is not followed by a URI")]
    MissingUri { line: usize },

    #[error("invalid URI: {0}")]
    InvalidUri(String),
}

/// Non-empty, trimmed lines paired with their 1-based line numbers.
fn lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
}

fn check_header(text: &str) -> Result<(), ParseError> {
    match lines(text).next() {
        Some((_, "#EXTM3U")) => Ok(()),
        _ => Err(ParseError::MissingHeader),
    }
}

/// Split an attribute list on commas that are not inside double quotes.
fn attributes(list: &str) -> Vec<(&str, &str)> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut quoted = false;

    for (i, c) in list.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => {
                out.extend(split_pair(&list[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    out.extend(split_pair(&list[start..]));
    out
}

fn split_pair(pair: &str) -> Option<(&str, &str)> {
    let (key, value) = pair.split_once('=')?;
    Some((key.trim(), value.trim().trim_matches('"')))
}

fn parse_resolution(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.split_once(|c: char| c == 'x' || c == 'X')?;
    Some((w.parse().ok()?, h.parse().ok()?))
}

/// Parse a master playlist.
///
/// A playlist without any `#EXT-X-STREAM-INF` yields an empty variant list;
/// callers may then treat the document as a media playlist.
pub fn parse_master_playlist(text: &str) -> Result<MasterPlaylist, ParseError> {
    check_header(text)?;

    let mut variants = Vec::new();
    let mut iter = lines(text);

    while let Some((line, content)) = iter.next() {
        let Some(attrs) = content.strip_prefix("#EXT-X-STREAM-INF:") else {
            continue;
        };

        let mut bandwidth = None;
        let mut resolution = None;
        let mut codecs = String::new();

        for (key, value) in attributes(attrs) {
            match key {
                "BANDWIDTH" => {
                    bandwidth = Some(value.parse::<u64>().map_err(|_| {
                        ParseError::InvalidAttribute {
                            line,
                            name: "BANDWIDTH",
                            value: value.to_string(),
                        }
                    })?);
                }
                "RESOLUTION" => {
                    resolution = Some(parse_resolution(value).ok_or_else(|| {
                        ParseError::InvalidAttribute {
                            line,
                            name: "RESOLUTION",
                            value: value.to_string(),
                        }
                    })?);
                }
                "CODECS" => codecs = value.to_string(),
                _ => {}
            }
        }

        let bandwidth = bandwidth.ok_or(ParseError::MissingAttribute {
            line,
            name: "BANDWIDTH",
        })?;

        let uri = iter
            .by_ref()
            .find(|(_, l)| !l.starts_with('#'))
            .map(|(_, l)| l.to_string())
            .ok_or(ParseError::MissingUri { line })?;

        variants.push(Variant {
            bandwidth,
            resolution,
            codecs,
            uri,
        });
    }

    Ok(MasterPlaylist { variants })
}

/// Parse a media playlist.
pub fn parse_media_playlist(text: &str) -> Result<MediaPlaylist, ParseError> {
    check_header(text)?;

    let mut playlist = MediaPlaylist {
        target_duration: 0,
        media_sequence: 0,
        segments: Vec::new(),
        ended: false,
        init_segment_uri: None,
    };
    let mut iter = lines(text);

    while let Some((line, content)) = iter.next() {
        if let Some(value) = content.strip_prefix("#EXT-X-TARGETDURATION:") {
            playlist.target_duration =
                value.parse().map_err(|_| ParseError::InvalidAttribute {
                    line,
                    name: "EXT-X-TARGETDURATION",
                    value: value.to_string(),
                })?;
        } else if let Some(value) = content.strip_prefix("#EXT-X-MEDIA-SEQUENCE:") {
            playlist.media_sequence =
                value.parse().map_err(|_| ParseError::InvalidAttribute {
                    line,
                    name: "EXT-X-MEDIA-SEQUENCE",
                    value: value.to_string(),
                })?;
        } else if let Some(attrs) = content.strip_prefix("#EXT-X-MAP:") {
            playlist.init_segment_uri = attributes(attrs)
                .into_iter()
                .find(|(k, _)| *k == "URI")
                .map(|(_, v)| v.to_string());
        } else if let Some(info) = content.strip_prefix("#EXTINF:") {
            let (duration, title) = info.split_once(',').unwrap_or((info, ""));
            let duration = duration
                .trim()
                .parse::<f64>()
                .map_err(|_| ParseError::InvalidAttribute {
                    line,
                    name: "EXTINF",
                    value: duration.to_string(),
                })?;
            let uri = iter
                .by_ref()
                .find(|(_, l)| !l.starts_with('#'))
                .map(|(_, l)| l.to_string())
                .ok_or(ParseError::MissingUri { line })?;
            let title = title.trim();
            playlist.segments.push(Segment {
                duration,
                uri,
                title: (!title.is_empty()).then(|| title.to_string()),
            });
        } else if content == "#EXT-X-ENDLIST" {
            playlist.ended = true;
        }
    }

    Ok(playlist)
}

/// Resolve a playlist URI against the URL of the playlist that referenced it.
pub fn resolve_uri(base: &str, uri: &str) -> Result<String, ParseError> {
    let base = url::Url::parse(base).map_err(|e| ParseError::InvalidUri(format!("{base}: {e}")))?;
    base.join(uri)
        .map(String::from)
        .map_err(|e| ParseError::InvalidUri(format!("{uri}: {e}")))
}
