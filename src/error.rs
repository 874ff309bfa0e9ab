//! Error types for mdocx operations.

use thiserror::Error;

/// Errors that can occur while resolving image sources.
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot determine image extension from filename {filename:?} or MIME type {mime:?}")]
    ExtensionUndeterminable {
        filename: String,
        mime: Option<String>,
    },

    #[error("image extension {0:?} is not supported")]
    UnsupportedExtension(String),

    #[error("invalid data URL: {0:?}")]
    InvalidDataUrl(String),

    #[error("base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),
}

pub type Result<T> = std::result::Result<T, Error>;
