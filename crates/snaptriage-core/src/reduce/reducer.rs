use async_trait::async_trait;
use tracing::debug;

use crate::error::{Result, TriageError};
use crate::payload::ImagePayload;

use super::codec::{ImageCodec, RasterCodec};
use super::schedule::{EncodeStep, OutputKind, ReduceParams};

/// Outcome of one byte-budget reduction.
#[derive(Clone, Debug)]
pub struct Reduction {
    pub image: ImagePayload,
    /// Re-encodes performed after the first encode.
    pub attempts: u32,
    /// Final scale/quality, or `None` when the input was passed through.
    pub step: Option<EncodeStep>,
    pub within_budget: bool,
}

impl Reduction {
    fn passthrough(image: &ImagePayload, params: &ReduceParams) -> Self {
        Self {
            image: image.clone(),
            attempts: 0,
            step: None,
            within_budget: image.len() <= params.byte_budget,
        }
    }

    pub fn was_reencoded(&self) -> bool {
        self.step.is_some()
    }
}

/// Re-encode `image` until it fits `params.byte_budget` or the attempts run out.
///
/// Non-image payloads and undecodable bytes come back unchanged. Encoder
/// failures are returned as [`TriageError::Encode`].
pub fn reduce_with<C: RasterCodec>(
    codec: &C,
    image: &ImagePayload,
    params: &ReduceParams,
) -> Result<Reduction> {
    if !image.is_image() {
        return Ok(Reduction::passthrough(image, params));
    }
    let Some(raster) = codec.decode(image) else {
        debug!(name = image.name(), "Undecodable image, keeping original");
        return Ok(Reduction::passthrough(image, params));
    };

    let kind = OutputKind::for_media_type(image.media_type());
    let (width, height) = codec.dimensions(&raster);
    let encode = |step: EncodeStep| {
        let (w, h) = step.target_dimensions(width, height);
        codec.encode(&raster, w, h, kind, step.quality)
    };

    let mut step = EncodeStep::initial(kind, params.initial_scale);
    let mut encoded = encode(step)?;
    let mut attempts = 0;

    while encoded.len() > params.byte_budget && attempts < params.max_attempts {
        attempts += 1;
        step = step.next();
        encoded = encode(step)?;
        debug!(
            name = image.name(),
            attempt = attempts,
            scale = step.scale,
            quality = step.quality,
            bytes = encoded.len(),
            "Re-encoded"
        );
    }

    let within_budget = encoded.len() <= params.byte_budget;
    debug!(
        name = image.name(),
        source_bytes = image.len(),
        bytes = encoded.len(),
        attempts,
        within_budget,
        "Reduction finished"
    );

    let mut reduced = ImagePayload::new(image.name(), kind.media_type(), encoded);
    if let Some(modified) = image.modified() {
        reduced = reduced.with_modified(modified);
    }

    Ok(Reduction {
        image: reduced,
        attempts,
        step: Some(step),
        within_budget,
    })
}

/// [`reduce_with`] using the `image` crate codec.
pub fn reduce(image: &ImagePayload, params: &ReduceParams) -> Result<Reduction> {
    reduce_with(&ImageCodec, image, params)
}

/// Reduce and return only the resulting payload.
pub fn reduce_image(image: &ImagePayload, params: &ReduceParams) -> Result<ImagePayload> {
    reduce(image, params).map(|r| r.image)
}

/// Run [`reduce_image`] on the blocking thread pool.
pub async fn reduce_image_async(image: ImagePayload, params: ReduceParams) -> Result<ImagePayload> {
    tokio::task::spawn_blocking(move || reduce_image(&image, &params))
        .await
        .map_err(|e| TriageError::Encode {
            media_type: "image".into(),
            reason: format!("reduce task failed: {e}"),
        })?
}

/// Asynchronous reduction step used by the batch pipeline.
#[async_trait]
pub trait Reducer: Send + Sync {
    async fn reduce(&self, image: ImagePayload) -> Result<ImagePayload>;
}

/// [`Reducer`] running the `image` crate codec on the blocking pool.
#[derive(Clone, Debug, Default)]
pub struct BudgetReducer {
    params: ReduceParams,
}

impl BudgetReducer {
    pub fn new(params: ReduceParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ReduceParams {
        &self.params
    }
}

#[async_trait]
impl Reducer for BudgetReducer {
    async fn reduce(&self, image: ImagePayload) -> Result<ImagePayload> {
        reduce_image_async(image, self.params.clone()).await
    }
}
