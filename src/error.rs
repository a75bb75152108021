//! Unified error types for the segmentation viewer.

use std::fmt;

/// Application-specific errors.
#[derive(Debug)]
pub enum AppError {
    /// Server replied with a non-2xx status code
    Request(u16),
    /// Response was well-formed HTTP but violated the API contract
    Protocol(String),
    /// Network failure or unparsable response body
    Transport(String),
    /// Error reading or decoding the local image file
    ImageLoad(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Request(status) => write!(f, "Server responded {}", status),
            AppError::Protocol(msg) => write!(f, "{}", msg),
            AppError::Transport(msg) => write!(f, "Failed to process image: {}", msg),
            AppError::ImageLoad(msg) => write!(f, "Failed to load image: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::ImageLoad(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::ImageLoad(err.to_string())
    }
}

/// Type alias for Results in this application.
pub type Result<T> = std::result::Result<T, AppError>;
