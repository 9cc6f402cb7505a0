use std::io::Cursor;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::Context as _;
use image::ImageEncoder as _;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};

use crate::foundation::error::{NinError, NinResult};

/// Lossless image optimizer applied to PNG assets before encoding.
///
/// Implementations must keep the decoded pixels and dimensions identical. They are called
/// concurrently from the collector's worker pool.
pub trait ImageOptimizer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;
    /// Return optimized bytes for one encoded PNG.
    fn optimize(&self, png: &[u8]) -> NinResult<Vec<u8>>;
}

/// Optimizer that returns its input unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopOptimizer;

impl ImageOptimizer for NoopOptimizer {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn optimize(&self, png: &[u8]) -> NinResult<Vec<u8>> {
        Ok(png.to_vec())
    }
}

/// Pure Rust optimizer: decodes the PNG and re-encodes it at the best deflate level with
/// adaptive filtering. Keeps the original when the re-encode is not smaller.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecompressOptimizer;

impl ImageOptimizer for RecompressOptimizer {
    fn name(&self) -> &'static str {
        "recompress"
    }

    fn optimize(&self, png: &[u8]) -> NinResult<Vec<u8>> {
        let img = image::load_from_memory_with_format(png, image::ImageFormat::Png)
            .map_err(|e| NinError::optimize(format!("decode png: {e}")))?;

        let mut out = Vec::with_capacity(png.len());
        PngEncoder::new_with_quality(
            Cursor::new(&mut out),
            CompressionType::Best,
            FilterType::Adaptive,
        )
        .write_image(img.as_bytes(), img.width(), img.height(), img.color().into())
        .map_err(|e| NinError::optimize(format!("encode png: {e}")))?;

        if out.len() < png.len() {
            Ok(out)
        } else {
            Ok(png.to_vec())
        }
    }
}

/// Optimizer backed by the system `optipng` binary.
#[derive(Clone, Debug)]
pub struct OptipngOptimizer {
    /// Executable to spawn.
    pub program: PathBuf,
    /// Optimization level passed as `-o<level>`.
    pub level: u8,
}

impl Default for OptipngOptimizer {
    fn default() -> Self {
        Self {
            program: PathBuf::from("optipng"),
            level: 7,
        }
    }
}

impl ImageOptimizer for OptipngOptimizer {
    fn name(&self) -> &'static str {
        "optipng"
    }

    fn optimize(&self, png: &[u8]) -> NinResult<Vec<u8>> {
        // optipng only works on files, so round-trip through a scratch directory.
        let scratch = tempfile::Builder::new()
            .prefix("nin_optipng")
            .tempdir()
            .context("create optipng scratch directory")?;
        let input = scratch.path().join("in.png");
        let out_path = scratch.path().join("out.png");
        std::fs::write(&input, png).with_context(|| format!("write '{}'", input.display()))?;

        let output = Command::new(&self.program)
            .arg(format!("-o{}", self.level))
            .args(["-quiet", "-clobber", "-out"])
            .arg(&out_path)
            .arg(&input)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                NinError::optimize(format!(
                    "failed to spawn {} (is it installed and on PATH?): {e}",
                    self.program.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NinError::optimize(format!(
                "optipng exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let optimized = std::fs::read(&out_path)
            .with_context(|| format!("read '{}'", out_path.display()))?;
        scratch
            .close()
            .context("remove optipng scratch directory")?;
        Ok(optimized)
    }
}

/// Return `true` when `optipng` can be invoked from `PATH`.
pub fn is_optipng_on_path() -> bool {
    Command::new("optipng")
        .arg("-v")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Pick the best optimizer available on this machine.
pub fn default_optimizer() -> Box<dyn ImageOptimizer> {
    if is_optipng_on_path() {
        Box::new(OptipngOptimizer::default())
    } else {
        Box::new(RecompressOptimizer)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/optimize.rs"]
mod tests;
