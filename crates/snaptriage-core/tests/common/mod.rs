#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, RgbImage};
use snaptriage_core::analyze::{AnalysisResponse, Analyzer, ScoreEntry};
use snaptriage_core::batch::{Batch, BatchObserver, ItemStatus, Progress};
use snaptriage_core::payload::ImagePayload;
use snaptriage_core::reduce::Reducer;
use snaptriage_core::{Result, TriageError};

/// Deterministic RGB noise; compresses poorly, so encoded sizes stay large.
pub fn noise_image(width: u32, height: u32, seed: u32) -> DynamicImage {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    let img = RgbImage::from_fn(width, height, |_, _| {
        let mut next = || {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8
        };
        image::Rgb([next(), next(), next()])
    });
    DynamicImage::ImageRgb8(img)
}

/// Smooth gradient; compresses well.
pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    });
    DynamicImage::ImageRgb8(img)
}

pub fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    match format {
        ImageFormat::WebP => DynamicImage::ImageRgba8(img.to_rgba8())
            .write_to(&mut buf, format)
            .unwrap(),
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8())
            .write_to(&mut buf, format)
            .unwrap(),
        _ => img.write_to(&mut buf, format).unwrap(),
    }
    buf.into_inner()
}

pub fn png_payload(name: &str, width: u32, height: u32) -> ImagePayload {
    ImagePayload::new(name, "image/png", encode(&noise_image(width, height, 7), ImageFormat::Png))
}

pub fn jpeg_payload(name: &str, width: u32, height: u32) -> ImagePayload {
    ImagePayload::new(name, "image/jpeg", encode(&noise_image(width, height, 11), ImageFormat::Jpeg))
}

pub fn webp_payload(name: &str, width: u32, height: u32) -> ImagePayload {
    ImagePayload::new(name, "image/webp", encode(&noise_image(width, height, 13), ImageFormat::WebP))
}

/// Image-typed payload whose bytes are not decodable.
pub fn opaque_image(name: &str) -> ImagePayload {
    ImagePayload::new(name, "image/jpeg", format!("bytes of {name}").into_bytes())
}

pub fn text_payload(name: &str) -> ImagePayload {
    ImagePayload::new(name, "text/plain", b"not an image".to_vec())
}

pub fn people(score: f32) -> Vec<ScoreEntry> {
    vec![ScoreEntry::new("people", score), ScoreEntry::new("landscape", 1.0 - score)]
}

// ---------------------------------------------------------------------------
// Fake analyzer
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub enum Scripted {
    Scores(Vec<ScoreEntry>),
    Body(serde_json::Value),
    Fail(String),
}

/// Analyzer answering from a per-name script and logging every call.
#[derive(Default)]
pub struct FakeAnalyzer {
    script: HashMap<String, Scripted>,
    calls: Mutex<Vec<AnalyzeCall>>,
}

#[derive(Clone, Debug)]
pub struct AnalyzeCall {
    pub name: String,
    pub uploaded_reduced: bool,
}

impl FakeAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, response: Scripted) -> Self {
        self.script.insert(name.to_string(), response);
        self
    }

    pub fn calls(&self) -> Vec<AnalyzeCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Analyzer for FakeAnalyzer {
    async fn analyze(
        &self,
        original: &ImagePayload,
        reduced: Option<&ImagePayload>,
    ) -> Result<AnalysisResponse> {
        self.calls.lock().unwrap().push(AnalyzeCall {
            name: original.name().to_string(),
            uploaded_reduced: reduced.is_some(),
        });
        match self.script.get(original.name()) {
            Some(Scripted::Scores(scores)) => Ok(AnalysisResponse::from_scores(scores.clone())),
            Some(Scripted::Body(body)) => Ok(AnalysisResponse::new(body.clone())),
            Some(Scripted::Fail(message)) => Err(TriageError::AnalysisFailed(message.clone())),
            None => Ok(AnalysisResponse::from_scores(Vec::new())),
        }
    }
}

/// Analyzer that parks every call until released.
pub struct GatedAnalyzer {
    pub started: tokio::sync::Notify,
    pub release: tokio::sync::Notify,
    calls: Mutex<Vec<String>>,
}

impl GatedAnalyzer {
    pub fn new() -> Self {
        Self {
            started: tokio::sync::Notify::new(),
            release: tokio::sync::Notify::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Analyzer for GatedAnalyzer {
    async fn analyze(
        &self,
        original: &ImagePayload,
        _reduced: Option<&ImagePayload>,
    ) -> Result<AnalysisResponse> {
        self.calls.lock().unwrap().push(original.name().to_string());
        self.started.notify_one();
        self.release.notified().await;
        Ok(AnalysisResponse::from_scores(people(0.9)))
    }
}

// ---------------------------------------------------------------------------
// Fake reducers
// ---------------------------------------------------------------------------

/// Returns a small JPEG-typed copy tagged with the source name.
pub struct TaggingReducer;

#[async_trait]
impl Reducer for TaggingReducer {
    async fn reduce(&self, image: ImagePayload) -> Result<ImagePayload> {
        Ok(ImagePayload::new(
            image.name(),
            "image/jpeg",
            format!("reduced {}", image.name()).into_bytes(),
        ))
    }
}

/// Fails for every name in `failing`, tags everything else.
pub struct FailingReducer {
    pub failing: Vec<String>,
}

#[async_trait]
impl Reducer for FailingReducer {
    async fn reduce(&self, image: ImagePayload) -> Result<ImagePayload> {
        if self.failing.iter().any(|n| n == image.name()) {
            return Err(TriageError::Encode {
                media_type: "image/jpeg".into(),
                reason: "encoder unavailable".into(),
            });
        }
        TaggingReducer.reduce(image).await
    }
}

// ---------------------------------------------------------------------------
// Recording observer
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Started { generation: u64, items: usize },
    ItemChanged { index: usize, status: ItemStatus },
    Progress(Progress),
    Finished { generation: u64 },
    Rejected(String),
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
    completed: Mutex<Vec<Vec<String>>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn progress(&self) -> Vec<Progress> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Progress(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    /// `completed_ids` as seen each time an item reached `Done`.
    pub fn completed_snapshots(&self) -> Vec<Vec<String>> {
        self.completed.lock().unwrap().clone()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl BatchObserver for RecordingObserver {
    fn batch_started(&self, batch: &Batch) {
        self.push(Event::Started {
            generation: batch.generation(),
            items: batch.len(),
        });
    }

    fn item_changed(&self, batch: &Batch, index: usize) {
        if let Some(item) = batch.item(index) {
            if item.is_done() {
                let ids = batch.completed_ids().iter().map(|id| id.to_string()).collect();
                self.completed.lock().unwrap().push(ids);
            }
            self.push(Event::ItemChanged {
                index,
                status: item.status(),
            });
        }
    }

    fn progress(&self, progress: Progress) {
        self.push(Event::Progress(progress));
    }

    fn batch_finished(&self, batch: &Batch) {
        self.push(Event::Finished {
            generation: batch.generation(),
        });
    }

    fn selection_rejected(&self, message: &str) {
        self.push(Event::Rejected(message.to_string()));
    }
}
