//! Error types for volumed
//!
//! Defines service-specific error types using thiserror for clear error
//! propagation. Audio-server failures are recovered into readings or boolean
//! results by the controller; only startup errors (configuration, bind) may
//! end the process.

use thiserror::Error;

/// Main error type for the volumed service
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading or validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Audio server unreachable or connection handle invalid
    #[error("Audio server connection error: {0}")]
    Connection(String),

    /// A query or control command rejected by the audio server
    #[error("Audio command failed: {0}")]
    Command(String),

    /// HTTP server errors
    #[error("HTTP server error: {0}")]
    Http(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using the volumed Error
pub type Result<T> = std::result::Result<T, Error>;
