use std::sync::{Arc, OnceLock};

use crate::foundation::error::{NinError, NinResult};
use crate::loader::batch::{MediaConsumer, MediaSource};
use crate::loader::fetch::Fetcher;
use crate::loader::resolve::decode_data_uri;

/// Image handle returned by [`crate::loader::batch::LoadBatch::load_texture`].
///
/// Cloning shares the slot. The image is present once the owning batch has resolved the request.
#[derive(Clone, Debug)]
pub struct Texture {
    source_file: String,
    image: Arc<OnceLock<image::DynamicImage>>,
}

impl Texture {
    pub(crate) fn pending(source_file: &str) -> Self {
        Self {
            source_file: source_file.to_string(),
            image: Arc::new(OnceLock::new()),
        }
    }

    /// Asset path the texture was requested with.
    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    /// `true` once the image has been decoded.
    pub fn is_ready(&self) -> bool {
        self.image.get().is_some()
    }

    /// The decoded image, if ready.
    pub fn image(&self) -> Option<&image::DynamicImage> {
        self.image.get()
    }

    /// `(width, height)`, if ready.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.image().map(|img| (img.width(), img.height()))
    }

    fn fill(&self, img: image::DynamicImage) {
        if self.image.set(img).is_err() {
            tracing::debug!(source = %self.source_file, "texture already filled");
        }
    }
}

/// Decodes whatever a batch points it at into a [`Texture`].
pub(crate) struct TextureConsumer {
    texture: Texture,
    fetcher: Arc<dyn Fetcher>,
}

impl TextureConsumer {
    pub(crate) fn new(texture: Texture, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { texture, fetcher }
    }
}

impl MediaConsumer for TextureConsumer {
    fn load(&mut self, source: &MediaSource) -> NinResult<()> {
        let bytes = if source.uri.starts_with("data:") {
            decode_data_uri(&source.uri)?
        } else {
            self.fetcher.get_bytes(&source.uri)?
        };
        let img = image::load_from_memory(&bytes).map_err(|e| {
            NinError::load(format!(
                "decode texture '{}': {e}",
                self.texture.source_file()
            ))
        })?;
        self.texture.fill(img);
        Ok(())
    }
}
