use std::io::Cursor;

use image::ImageEncoder as _;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};

use crate::foundation::error::{NinError, NinResult};
use crate::pack::html::Metadata;

/// Produces the compressed single-file hybrid artifact.
///
/// `script` is the complete runtime script (see [`crate::pack::html::runtime_script`]); the
/// output must run it after `preamble` when opened as HTML.
pub trait ArtifactCompressor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;
    /// Build the artifact bytes.
    fn compress(&self, script: &str, preamble: &str, metadata: &Metadata) -> NinResult<Vec<u8>>;
}

/// Packs the script into the pixels of a grayscale PNG and appends an HTML tail that loads the
/// file as an image, reads the pixels back through a canvas and evaluates them.
///
/// Layout: `<png bytes><html tail>`. PNG decoders stop at `IEND` and ignore the tail; browsers
/// opening the file as HTML see the tail.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngPayloadCompressor;

impl ArtifactCompressor for PngPayloadCompressor {
    fn name(&self) -> &'static str {
        "png-payload"
    }

    fn compress(&self, script: &str, preamble: &str, metadata: &Metadata) -> NinResult<Vec<u8>> {
        let payload = script.as_bytes();
        if payload.contains(&0) {
            return Err(NinError::compress(
                "script contains NUL bytes, which terminate the pixel payload",
            ));
        }

        let png = encode_payload_png(payload)?;
        let mut out = png;
        out.extend_from_slice(b"\n");
        out.extend_from_slice(metadata.as_html_comments().as_bytes());
        out.extend_from_slice(b"\n");
        out.extend_from_slice(preamble.as_bytes());
        out.extend_from_slice(PAYLOAD_LOADER.as_bytes());

        tracing::debug!(
            script_bytes = payload.len(),
            artifact_bytes = out.len(),
            "compressed artifact"
        );
        Ok(out)
    }
}

const PAYLOAD_LOADER: &str = concat!(
    "<canvas id=nin_c style=display:none></canvas>",
    "<img src=# style=display:none onload=\"",
    "var i=this,c=document.getElementById('nin_c'),x,d,b=[],k;",
    "c.width=i.width;c.height=i.height;x=c.getContext('2d');x.drawImage(i,0,0);",
    "d=x.getImageData(0,0,i.width,i.height).data;",
    "for(k=0;k<d.length&&d[k];k+=4)b.push(d[k]);",
    "(0,eval)(new TextDecoder().decode(new Uint8Array(b)))\">",
);

/// Square-ish grayscale PNG holding `payload` row-major, zero padded.
pub fn encode_payload_png(payload: &[u8]) -> NinResult<Vec<u8>> {
    let (width, height) = payload_dimensions(payload.len());
    let mut pixels = payload.to_vec();
    pixels.resize(width as usize * height as usize, 0);

    let mut out = Vec::new();
    PngEncoder::new_with_quality(
        Cursor::new(&mut out),
        CompressionType::Best,
        FilterType::Adaptive,
    )
    .write_image(&pixels, width, height, image::ExtendedColorType::L8)
    .map_err(|e| NinError::compress(format!("encode payload png: {e}")))?;
    Ok(out)
}

/// Recover the payload from a PNG produced by [`encode_payload_png`].
pub fn decode_payload_png(png: &[u8]) -> NinResult<Vec<u8>> {
    let img = image::load_from_memory_with_format(png, image::ImageFormat::Png)
        .map_err(|e| NinError::compress(format!("decode payload png: {e}")))?;
    let mut bytes = img.to_luma8().into_raw();
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    bytes.truncate(end);
    Ok(bytes)
}

fn payload_dimensions(len: usize) -> (u32, u32) {
    let len = len.max(1);
    let mut width = (len as f64).sqrt().ceil() as usize;
    width = width.max(1);
    let height = len.div_ceil(width);
    (width as u32, height as u32)
}

#[cfg(test)]
#[path = "../../tests/unit/pack/compress.rs"]
mod tests;
