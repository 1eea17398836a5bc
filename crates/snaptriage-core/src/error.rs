use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("No valid images selected")]
    UnsupportedInput,

    #[error("Failed to encode {media_type}: {reason}")]
    Encode { media_type: String, reason: String },

    /// Carries the server's response text, or a transport/parse message.
    #[error("{0}")]
    AnalysisFailed(String),

    #[error("Could not create archive: {0}")]
    ArchiveFailed(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Preview store error: {0}")]
    Preview(String),
}

pub type Result<T> = std::result::Result<T, TriageError>;

impl From<zip::result::ZipError> for TriageError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::ArchiveFailed(err.to_string())
    }
}
