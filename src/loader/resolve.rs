use crate::foundation::encoding::decode_base64;
use crate::foundation::error::{NinError, NinResult};
use crate::foundation::paths::extension_of;

/// Query parameter appended to network media URLs.
pub const CACHE_BUST_PARAM: &str = "_";

/// Broad kind of a media asset, from its extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    /// Raster or vector image.
    Image,
    /// Audio clip.
    Audio,
    /// Video clip.
    Video,
}

impl MediaKind {
    /// Kind of the asset at `path`, `None` for unknown extensions.
    pub fn from_path(path: &str) -> Option<Self> {
        match extension_of(path)?.as_str() {
            "png" | "jpg" | "jpeg" | "svg" | "gif" => Some(Self::Image),
            "mp3" | "ogg" | "wav" => Some(Self::Audio),
            "mp4" | "webm" => Some(Self::Video),
            _ => None,
        }
    }

    /// Event a browser element of this kind fires once it can be used.
    pub fn ready_event(self) -> &'static str {
        match self {
            Self::Image => "load",
            Self::Audio | Self::Video => "canplaythrough",
        }
    }
}

/// MIME type embedded media is announced with. Unknown extensions map to `None`.
pub fn mime_for(path: &str) -> Option<&'static str> {
    match extension_of(path)?.as_str() {
        "jpg" | "jpeg" => Some("image/jpg"),
        "png" => Some("image/png"),
        "mp3" => Some("audio/mp3"),
        "mp4" => Some("video/mp4"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// `data:<mime>;base64,<encoded>`; the MIME part is left empty when unknown.
pub fn data_uri(path: &str, encoded: &str) -> String {
    format!("data:{};base64,{encoded}", mime_for(path).unwrap_or(""))
}

/// Decode the payload of a base64 data URI.
pub fn decode_data_uri(uri: &str) -> NinResult<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| NinError::load(format!("not a data URI: '{}'", preview(uri))))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| NinError::load("data URI without payload"))?;
    if !header.ends_with(";base64") {
        return Err(NinError::load(format!(
            "data URI is not base64 encoded: '{header}'"
        )));
    }
    decode_base64(payload)
}

/// `root + path`, the URL raw text is fetched from.
pub fn network_url(root: &str, path: &str) -> String {
    format!("{root}{path}")
}

/// `root + path + "?_=" + nonce`, the URL network media is pointed at.
pub fn cache_busted_url(root: &str, path: &str, nonce: u64) -> String {
    format!("{root}{path}?{CACHE_BUST_PARAM}={nonce}")
}

/// Drop the query string of `url`.
pub fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}

fn preview(s: &str) -> &str {
    match s.char_indices().nth(32) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/loader/resolve.rs"]
mod tests;
