use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::NinResult;
use crate::pack::compress::ArtifactCompressor;
use crate::pack::html::{Metadata, build_html, runtime_script};

/// File name of the uncompressed artifact.
pub const HTML_ARTIFACT: &str = "demo.html";
/// File name of the compressed hybrid artifact.
pub const COMPRESSED_ARTIFACT: &str = "demo.png.html";

/// Inputs of [`pack_artifacts`].
#[derive(Clone, Copy, Debug)]
pub struct PackInput<'a> {
    /// Compiled project code.
    pub compiled_code: &'a str,
    /// HTML template with markers already substituted.
    pub preamble: &'a str,
    /// Descriptive metadata.
    pub metadata: &'a Metadata,
    /// Manifest key of the graph asset.
    pub graph_key: &'a str,
}

/// Paths and sizes of the written artifacts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedArtifacts {
    /// `demo.html`
    pub html_path: PathBuf,
    /// Size of `demo.html`.
    pub html_bytes: usize,
    /// `demo.png.html`
    pub compressed_path: PathBuf,
    /// Size of `demo.png.html`.
    pub compressed_bytes: usize,
}

/// Build both artifacts and write them into `out_dir`, creating it if needed.
pub fn pack_artifacts(
    out_dir: &Path,
    input: PackInput<'_>,
    compressor: &dyn ArtifactCompressor,
) -> NinResult<PackedArtifacts> {
    let script = runtime_script(input.compiled_code, input.graph_key);
    let html = build_html(input.preamble, &script);
    let compressed = compressor.compress(&script, input.preamble, input.metadata)?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory '{}'", out_dir.display()))?;

    let html_path = out_dir.join(HTML_ARTIFACT);
    std::fs::write(&html_path, html.as_bytes())
        .with_context(|| format!("write '{}'", html_path.display()))?;
    let compressed_path = out_dir.join(COMPRESSED_ARTIFACT);
    std::fs::write(&compressed_path, &compressed)
        .with_context(|| format!("write '{}'", compressed_path.display()))?;

    tracing::info!(
        html = %html_path.display(),
        compressed = %compressed_path.display(),
        compressor = compressor.name(),
        "wrote artifacts"
    );

    Ok(PackedArtifacts {
        html_path,
        html_bytes: html.len(),
        compressed_path,
        compressed_bytes: compressed.len(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/pack/artifact.rs"]
mod tests;
