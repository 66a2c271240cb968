//! errsim Core - Bit string primitives
//!
//! This crate provides the validated bit string type shared by the codecs
//! and the simulation engine, together with the slicing, padding and
//! comparison helpers the error-control codes are built from.

pub mod bits;
pub mod error;

pub use bits::{block_value, BitString};
pub use error::{CoreError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        bits::BitString,
        error::{CoreError, Result},
    };
}
