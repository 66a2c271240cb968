//! Error types for errsim Core

use thiserror::Error;

/// Core error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid bit string: {msg}")]
    InvalidBitString { msg: String },
    
    #[error("Bit index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result type for errsim Core operations
pub type Result<T> = std::result::Result<T, CoreError>;
