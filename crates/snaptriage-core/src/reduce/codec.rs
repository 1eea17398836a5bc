use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::error::{Result, TriageError};
use crate::payload::ImagePayload;

use super::schedule::OutputKind;

/// Decode/render/encode capability used by the reducer.
///
/// The raster is owned by the caller for the duration of one reduction and
/// dropped when it ends.
pub trait RasterCodec {
    type Raster;

    /// Decode a payload. `None` means the bytes are not a decodable image.
    fn decode(&self, payload: &ImagePayload) -> Option<Self::Raster>;

    fn dimensions(&self, raster: &Self::Raster) -> (u32, u32);

    /// Render `raster` at `width` x `height` and encode it.
    fn encode(
        &self,
        raster: &Self::Raster,
        width: u32,
        height: u32,
        kind: OutputKind,
        quality: u8,
    ) -> Result<Vec<u8>>;
}

/// Codec backed by the `image` crate, with lossy WEBP output from `webp`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCodec;

impl RasterCodec for ImageCodec {
    type Raster = DynamicImage;

    fn decode(&self, payload: &ImagePayload) -> Option<DynamicImage> {
        image::load_from_memory(payload.bytes()).ok()
    }

    fn dimensions(&self, raster: &DynamicImage) -> (u32, u32) {
        raster.dimensions()
    }

    fn encode(
        &self,
        raster: &DynamicImage,
        width: u32,
        height: u32,
        kind: OutputKind,
        quality: u8,
    ) -> Result<Vec<u8>> {
        let rendered = if raster.dimensions() == (width, height) {
            None
        } else {
            Some(raster.resize_exact(width, height, FilterType::Triangle))
        };
        let rendered = rendered.as_ref().unwrap_or(raster);

        match kind {
            OutputKind::Jpeg => {
                let mut buf = Vec::new();
                DynamicImage::ImageRgb8(rendered.to_rgb8())
                    .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)))
                    .map_err(|e| TriageError::Encode {
                        media_type: kind.media_type().to_string(),
                        reason: e.to_string(),
                    })?;
                Ok(buf)
            }
            OutputKind::Webp => Ok(encode_webp(rendered, quality)),
        }
    }
}

/// Lossy WEBP at `quality` percent.
fn encode_webp(image: &DynamicImage, quality: u8) -> Vec<u8> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let encoder = webp::Encoder::from_rgba(rgba.as_raw(), width, height);
    encoder.encode(quality.clamp(1, 100) as f32).to_vec()
}
