//! Error types for qrstash operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using qrstash's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for qrstash operations
#[derive(Error, Debug)]
pub enum Error {
    /// Payload was empty or whitespace only
    #[error("Input cannot be empty")]
    EmptyPayload,

    /// Input stream closed before a valid payload was read
    #[error("Input closed before any QR data was entered")]
    InputClosed,

    /// Output folder could not be created because access was refused
    #[error("Permission denied: unable to create folder {}", path.display())]
    PermissionDenied {
        /// Folder that could not be created
        path: PathBuf,
    },

    /// Output folder could not be created for any other reason
    #[error("Failed to create folder {}: {source}", path.display())]
    FolderCreate {
        /// Folder that could not be created
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Encoded image could not be persisted
    #[error("Failed to save QR code to {}: {message}", path.display())]
    ImageSave {
        /// Destination that was being written
        path: PathBuf,
        /// Underlying cause
        message: String,
    },

    /// QR code encoding failed
    #[error("Failed to encode QR code: {0}")]
    QrEncode(String),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// Launching the platform file browser failed
    #[error("Failed to open folder {}: {message}", path.display())]
    OpenDirectory {
        /// Folder that was being opened
        path: PathBuf,
        /// Underlying cause
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Other(format!("JSON error: {}", e))
    }
}
