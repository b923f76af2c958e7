//! Image-to-text recognition for prescriptions and medicine boxes.
//!
//! Provides the [`TextRecognizer`] trait and a Tesseract implementation that
//! drives the `tesseract` executable. The recognizer is created via
//! [`create_recognizer`] from configuration.

pub mod tesseract;

use std::path::Path;
use std::sync::atomic::AtomicBool;

/// Why a recognition run produced no text.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecognitionError {
    /// The engine could not be started or exited with an error.
    #[error("recognition engine failed: {0}")]
    Engine(String),
    /// The input is not an image the engine can read.
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),
    #[error("recognition cancelled")]
    Cancelled,
}

/// Turns an image into plain text.
///
/// Implementations are synchronous; callers in async contexts should use
/// `tokio::task::spawn_blocking`.
pub trait TextRecognizer: Send + Sync {
    /// Recognize all text in `image`.
    ///
    /// `progress` is called repeatedly with a percentage in `0..=100` and with
    /// `100` exactly once on success. Setting `cancel` aborts the run with
    /// [`RecognitionError::Cancelled`].
    fn recognize(
        &self,
        image: &Path,
        progress: &mut dyn FnMut(u8),
        cancel: &AtomicBool,
    ) -> Result<String, RecognitionError>;
}

/// Create the recognizer described by `config`.
pub fn create_recognizer(config: &crate::config::OcrConfig) -> Box<dyn TextRecognizer> {
    Box::new(tesseract::TesseractRecognizer::new(
        &config.command,
        &config.language,
    ))
}

/// Check that `bytes` start with the signature of a supported raster format.
pub fn detect_image_format(bytes: &[u8]) -> Result<image::ImageFormat, RecognitionError> {
    if bytes.is_empty() {
        return Err(RecognitionError::UnsupportedImage("file is empty".into()));
    }
    image::guess_format(bytes)
        .map_err(|e| RecognitionError::UnsupportedImage(e.to_string()))
}
