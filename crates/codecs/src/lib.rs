//! errsim Codecs - Error-control codes over bit strings
//!
//! This crate provides the five error-control methods the simulator can
//! protect a message with: a single even-parity bit, an 8-bit one's
//! complement checksum, a Hamming code, a CRC with generator `1011`, and a
//! rate-1/3 repetition code. Every method implements [`ErrorControlCode`]
//! and is selected through the closed [`Method`] enum.

pub mod code;
pub mod parity;
pub mod checksum;
pub mod hamming;
pub mod crc;
pub mod repetition;
pub mod registry;
pub mod error;

#[cfg(test)]
pub(crate) mod testing;

pub use code::{Correction, Detection, DetectionDetails, ErrorControlCode, Method};
pub use error::{CodecError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        code::{Correction, Detection, DetectionDetails, ErrorControlCode, Method},
        parity::ParityCode,
        checksum::ChecksumCode,
        hamming::HammingCode,
        crc::CrcCode,
        repetition::RepetitionCode,
        registry::{MethodInfo, MethodRegistry},
        error::{CodecError, Result},
    };
}
