use thiserror::Error;

/// Failure while processing a single dropped file. None of these abort the
/// watcher; the file is moved to quarantine and the loop continues.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Font error: {0}")]
    Font(String),

    #[error("EXIF segment too large to re-embed ({0} bytes)")]
    ExifSegmentTooLarge(usize),

    #[error("Invalid JPEG data")]
    InvalidJpeg,

    #[error("Invalid path")]
    InvalidPath,
}
