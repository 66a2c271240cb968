//! Error types for errsim Sim

use thiserror::Error;

/// Simulation error types
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid input: {msg}")]
    InvalidInput { msg: String },
    
    #[error("Invalid configuration: {msg}")]
    InvalidConfig { msg: String },
    
    #[error("Codec error: {0}")]
    Codec(#[from] errsim_codecs::CodecError),
}

/// Result type for errsim Sim operations
pub type Result<T> = std::result::Result<T, SimError>;
