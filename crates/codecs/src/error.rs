//! Error types for errsim Codecs

use thiserror::Error;

/// Codec error types
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Received word too short for {method}: need at least {min} bits, got {actual}")]
    WordTooShort {
        method: &'static str,
        min: usize,
        actual: usize,
    },
    
    #[error("Unknown method: {name}")]
    UnknownMethod { name: String },
    
    #[error("Serialization failed: {msg}")]
    Serialization { msg: String },
    
    #[error("Core error: {0}")]
    Core(#[from] errsim_core::CoreError),
}

/// Result type for errsim Codec operations
pub type Result<T> = std::result::Result<T, CodecError>;
