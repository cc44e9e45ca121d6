//! Error types for the diagnosis pipeline.

use thiserror::Error;

/// Every way a diagnosis request (or startup) can fail.
///
/// A request either yields a complete `DiagnosisResult` or one of these;
/// there is no partial-success state.
#[derive(Error, Debug)]
pub enum Error {
    /// The upload is not a decodable jpg/jpeg/png image.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The model call failed or returned malformed output.
    #[error("Inference error: {0}")]
    Inference(String),

    /// Startup-time problem: model artifact missing or inconsistent with the label set.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Decode(err.to_string())
    }
}

/// Specialized Result type for leafscan operations.
pub type Result<T> = std::result::Result<T, Error>;
