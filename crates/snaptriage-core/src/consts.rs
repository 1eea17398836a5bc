use std::time::Duration;

/// Default byte budget for a reduced upload/preview image: 200 KiB.
pub const DEFAULT_BYTE_BUDGET: usize = 200 * 1024;

/// Default fraction of the source dimensions used for the first encode.
pub const DEFAULT_INITIAL_SCALE: f32 = 0.5;

/// Maximum number of re-encodes after the initial one.
pub const MAX_REDUCE_ATTEMPTS: u32 = 8;

/// Starting JPEG quality (percent).
pub const JPEG_INITIAL_QUALITY: u8 = 90;

/// Starting WEBP quality (percent).
pub const WEBP_INITIAL_QUALITY: u8 = 92;

/// Quality is never lowered below this (percent).
pub const MIN_QUALITY: u8 = 50;

/// Quality decrement per attempt (percent).
pub const QUALITY_STEP: u8 = 10;

/// Scale multiplier applied once quality has bottomed out.
pub const SCALE_DECAY: f32 = 0.85;

/// Scale is never lowered below this fraction.
pub const MIN_SCALE: f32 = 0.2;

/// Default classification service base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default maximum number of images per selection.
pub const DEFAULT_MAX_FILES: usize = 5;

/// Default recommended "people" threshold (percent).
pub const DEFAULT_RECOMMENDED_THRESHOLD: u8 = 68;

/// Label whose score drives the export filter.
pub const PEOPLE_LABEL: &str = "people";

/// File name of the exported archive.
pub const EXPORT_ARCHIVE_NAME: &str = "people_threshold.zip";

/// Deadline for the health check.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Message used when the analyze endpoint fails with an empty body.
pub const ANALYSIS_FALLBACK_MESSAGE: &str = "Failed to analyze image.";
