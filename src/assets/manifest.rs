use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::foundation::encoding::{decode_base64, encode_base64, js_string_literal};
use crate::foundation::error::{NinError, NinResult};
use crate::foundation::paths::{normalize_rel_key, normalize_rel_path};

/// Global the generated asset module assigns into.
pub const FILES_GLOBAL: &str = "FILES";

/// Mapping from root-relative asset path to base64 content.
///
/// Keys are kept sorted so the generated module is byte-identical for identical inputs, whatever
/// order the filesystem walk produced them in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest {
    entries: BTreeMap<String, String>,
}

impl AssetManifest {
    /// Empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `bytes` and store them under the normalized form of `key`.
    ///
    /// Returns the previous encoded value when the key was already present.
    pub fn insert_bytes(&mut self, key: &str, bytes: &[u8]) -> NinResult<Option<String>> {
        self.insert_encoded(key, encode_base64(bytes))
    }

    /// Store already encoded content under the normalized form of `key`.
    pub fn insert_encoded(&mut self, key: &str, encoded: String) -> NinResult<Option<String>> {
        let key = normalize_rel_path(key)?;
        Ok(self.entries.insert(key, encoded))
    }

    /// Store encoded content under a key produced by the collector walk.
    ///
    /// The key is validated but backslashes are not rewritten, since on Unix they are part of
    /// the file name.
    pub fn insert_collected(&mut self, key: &str, encoded: String) -> NinResult<Option<String>> {
        let key = normalize_rel_key(key)?;
        Ok(self.entries.insert(key, encoded))
    }

    /// Encoded content for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Decoded bytes for `key`.
    pub fn decode(&self, key: &str) -> NinResult<Vec<u8>> {
        let encoded = self
            .get(key)
            .ok_or_else(|| NinError::load(format!("asset '{key}' is not in the manifest")))?;
        decode_base64(encoded)
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(key, encoded)` pairs in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of assets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no assets were collected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total length of all encoded payloads.
    pub fn encoded_len(&self) -> usize {
        self.entries.values().map(String::len).sum()
    }

    /// Render the manifest as a script module:
    ///
    /// ```text
    /// FILES={};FILES["img/logo.png"]='iVBORw0...';
    /// ```
    pub fn to_module(&self) -> String {
        let mut out = String::with_capacity(self.encoded_len() + 16 * self.len() + 16);
        out.push_str(FILES_GLOBAL);
        out.push_str("={};");
        for (key, encoded) in &self.entries {
            out.push_str(FILES_GLOBAL);
            out.push('[');
            out.push_str(&js_string_literal(key));
            out.push_str("]='");
            // base64 never needs escaping.
            out.push_str(encoded);
            out.push_str("';");
        }
        out
    }
}

impl FromIterator<(String, String)> for AssetManifest {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/manifest.rs"]
mod tests;
