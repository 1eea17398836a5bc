use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BYTE_BUDGET, DEFAULT_INITIAL_SCALE, JPEG_INITIAL_QUALITY, MAX_REDUCE_ATTEMPTS,
    MIN_QUALITY, MIN_SCALE, QUALITY_STEP, SCALE_DECAY, WEBP_INITIAL_QUALITY,
};
use crate::error::{Result, TriageError};

/// Encoding used for a reduced image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    Jpeg,
    Webp,
}

impl OutputKind {
    /// JPEG and WEBP keep their kind; everything else is coerced to JPEG.
    pub fn for_media_type(media_type: &str) -> Self {
        match media_type {
            "image/webp" => Self::Webp,
            _ => Self::Jpeg,
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    pub fn initial_quality(self) -> u8 {
        match self {
            Self::Jpeg => JPEG_INITIAL_QUALITY,
            Self::Webp => WEBP_INITIAL_QUALITY,
        }
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jpeg => write!(f, "JPEG"),
            Self::Webp => write!(f, "WEBP"),
        }
    }
}

/// Scale and quality of one encode attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EncodeStep {
    /// Fraction of the source dimensions.
    pub scale: f32,
    /// Encoder quality in percent.
    pub quality: u8,
}

impl EncodeStep {
    pub fn initial(kind: OutputKind, scale: f32) -> Self {
        Self {
            scale,
            quality: kind.initial_quality(),
        }
    }

    /// The step tried after this one overshoots the budget.
    ///
    /// Quality drops first; once it reaches the floor only the scale shrinks.
    pub fn next(self) -> Self {
        if self.quality > MIN_QUALITY {
            Self {
                quality: self.quality.saturating_sub(QUALITY_STEP).max(MIN_QUALITY),
                ..self
            }
        } else {
            Self {
                // A caller-supplied scale already under the floor must not grow.
                scale: (self.scale * SCALE_DECAY).max(MIN_SCALE.min(self.scale)),
                ..self
            }
        }
    }

    /// Rendered size for a source of `width` x `height`, never below 1x1.
    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let scaled = |dim: u32| ((dim as f64 * self.scale as f64).round() as u32).max(1);
        (scaled(width), scaled(height))
    }
}

/// Tuning for the byte-budget reducer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReduceParams {
    /// Target upper bound on the encoded size, in bytes.
    #[serde(default = "default_byte_budget")]
    pub byte_budget: usize,
    /// Scale of the first encode (0.0..=1.0).
    #[serde(default = "default_initial_scale")]
    pub initial_scale: f32,
    /// Re-encodes allowed after the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_byte_budget() -> usize {
    DEFAULT_BYTE_BUDGET
}

fn default_initial_scale() -> f32 {
    DEFAULT_INITIAL_SCALE
}

fn default_max_attempts() -> u32 {
    MAX_REDUCE_ATTEMPTS
}

impl Default for ReduceParams {
    fn default() -> Self {
        Self {
            byte_budget: DEFAULT_BYTE_BUDGET,
            initial_scale: DEFAULT_INITIAL_SCALE,
            max_attempts: MAX_REDUCE_ATTEMPTS,
        }
    }
}

impl ReduceParams {
    pub fn with_budget(byte_budget: usize) -> Self {
        Self {
            byte_budget,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.byte_budget == 0 {
            return Err(TriageError::Config("byte budget must be positive".into()));
        }
        if !(self.initial_scale > 0.0 && self.initial_scale <= 1.0) {
            return Err(TriageError::Config(format!(
                "initial scale must be in (0, 1], got {}",
                self.initial_scale
            )));
        }
        Ok(())
    }
}
