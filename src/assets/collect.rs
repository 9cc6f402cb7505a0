use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::assets::manifest::AssetManifest;
use crate::assets::optimize::ImageOptimizer;
use crate::foundation::encoding::encode_base64;
use crate::foundation::error::{NinError, NinResult};
use crate::foundation::paths::{extension_of, to_rel_key};

/// Extensions routed through the lossless image optimizer.
pub const LOSSLESS_IMAGE_EXTENSIONS: &[&str] = &["png"];

/// Options for [`collect_assets`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CollectOptions {
    /// Run PNG assets through the optimizer before encoding.
    pub optimize_images: bool,
}

/// Size change of one optimized asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptimizedAsset {
    /// Manifest key.
    pub key: String,
    /// Bytes before optimization.
    pub before: usize,
    /// Bytes after optimization.
    pub after: usize,
}

/// What happened while collecting.
#[derive(Clone, Debug, Default)]
pub struct CollectReport {
    /// Number of files packed.
    pub files: usize,
    /// Raw bytes read from disk.
    pub raw_bytes: usize,
    /// Assets that went through the optimizer successfully.
    pub optimized: Vec<OptimizedAsset>,
    /// Assets whose optimization failed and were packed unoptimized.
    pub fallbacks: Vec<String>,
}

impl CollectReport {
    /// Bytes saved by optimization across all assets.
    pub fn bytes_saved(&self) -> usize {
        self.optimized
            .iter()
            .map(|o| o.before.saturating_sub(o.after))
            .sum()
    }
}

/// Manifest plus report produced by [`collect_assets`].
#[derive(Clone, Debug)]
pub struct Collected {
    /// Encoded assets.
    pub manifest: AssetManifest,
    /// Collection statistics.
    pub report: CollectReport,
}

struct EncodedFile {
    key: String,
    encoded: String,
    raw_len: usize,
    optimized: Option<OptimizedAsset>,
    fell_back: bool,
}

/// Walk `asset_root`, encode every file and return the finished manifest.
///
/// Every file is read, optionally optimized and encoded on the rayon pool. The manifest is only
/// assembled after all of those tasks have returned, so the key set always equals the set of
/// files under the root. A missing root yields an empty manifest.
///
/// An optimizer failure does not abort collection: the file is packed with its original bytes
/// and listed in [`CollectReport::fallbacks`]. Read or traversal errors are fatal.
#[tracing::instrument(level = "debug", skip(optimizer), fields(optimizer = optimizer.name()))]
pub fn collect_assets(
    asset_root: &Path,
    opts: &CollectOptions,
    optimizer: &dyn ImageOptimizer,
) -> NinResult<Collected> {
    if !asset_root.is_dir() {
        tracing::warn!(root = %asset_root.display(), "asset directory missing; packing no assets");
        return Ok(Collected {
            manifest: AssetManifest::new(),
            report: CollectReport::default(),
        });
    }

    let files = list_files(asset_root)?;
    tracing::debug!(count = files.len(), "collected asset paths");

    let encoded = files
        .par_iter()
        .map(|(key, path)| encode_file(key, path, opts, optimizer))
        .collect::<NinResult<Vec<_>>>()?;

    let mut manifest = AssetManifest::new();
    let mut report = CollectReport::default();
    for file in encoded {
        if manifest.insert_collected(&file.key, file.encoded)?.is_some() {
            return Err(NinError::validation(format!(
                "asset key '{}' produced twice",
                file.key
            )));
        }
        report.files += 1;
        report.raw_bytes += file.raw_len;
        if let Some(o) = file.optimized {
            report.optimized.push(o);
        }
        if file.fell_back {
            report.fallbacks.push(file.key);
        }
    }

    tracing::info!(
        files = report.files,
        saved_bytes = report.bytes_saved(),
        fallbacks = report.fallbacks.len(),
        "merged assimilated files"
    );
    Ok(Collected { manifest, report })
}

fn list_files(asset_root: &Path) -> NinResult<Vec<(String, PathBuf)>> {
    let mut out = Vec::new();
    for entry in WalkDir::new(asset_root).follow_links(false) {
        let entry = entry
            .with_context(|| format!("walk asset directory '{}'", asset_root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let key = to_rel_key(asset_root, entry.path())?;
        out.push((key, entry.into_path()));
    }
    Ok(out)
}

fn encode_file(
    key: &str,
    path: &Path,
    opts: &CollectOptions,
    optimizer: &dyn ImageOptimizer,
) -> NinResult<EncodedFile> {
    let raw = std::fs::read(path).with_context(|| format!("read asset '{}'", path.display()))?;
    let raw_len = raw.len();
    tracing::debug!(key, bytes = raw_len, "assimilating");

    let mut optimized = None;
    let mut fell_back = false;
    let bytes = if opts.optimize_images && is_lossless_image(key) {
        match optimizer.optimize(&raw) {
            Ok(better) => {
                tracing::info!(
                    key,
                    optimizer = optimizer.name(),
                    saved_kb = raw_len.saturating_sub(better.len()) / 1024,
                    "optimized image"
                );
                optimized = Some(OptimizedAsset {
                    key: key.to_string(),
                    before: raw_len,
                    after: better.len(),
                });
                better
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "image optimization failed; packing original bytes");
                fell_back = true;
                raw
            }
        }
    } else {
        raw
    };

    Ok(EncodedFile {
        key: key.to_string(),
        encoded: encode_base64(&bytes),
        raw_len,
        optimized,
        fell_back,
    })
}

fn is_lossless_image(key: &str) -> bool {
    extension_of(key).is_some_and(|ext| LOSSLESS_IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/collect.rs"]
mod tests;
