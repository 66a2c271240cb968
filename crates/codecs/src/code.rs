//! Common error-control traits and the method selector

use crate::{
    checksum::ChecksumCode, crc::CrcCode, hamming::HammingCode, parity::ParityCode,
    repetition::RepetitionCode, CodecError, Result,
};
use errsim_core::BitString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Generic error-control code
pub trait ErrorControlCode {
    /// Method this code implements
    fn method(&self) -> Method;

    /// Encode a message into a code word
    fn encode(&self, message: &BitString) -> BitString;

    /// Inspect a received word for errors
    fn detect(&self, received: &BitString) -> Result<Detection>;

    /// Attempt to repair a received word.
    ///
    /// Detection-only codes report [`Correction::Unsupported`].
    fn correct(&self, _received: &BitString) -> Result<Correction> {
        Ok(Correction::Unsupported)
    }

    /// Recover the message bits carried by a (possibly corrected) word
    fn extract_data(&self, word: &BitString) -> Result<BitString>;

    /// Code word length for a message of `message_len` bits
    fn encoded_len(&self, message_len: usize) -> usize;

    /// Whether [`ErrorControlCode::correct`] can repair anything
    fn can_correct(&self) -> bool {
        false
    }

    /// Get the code rate (k/n where k is data bits, n is total bits)
    fn code_rate(&self, message_len: usize) -> f64 {
        let total = self.encoded_len(message_len);
        if total == 0 {
            return 0.0;
        }
        message_len as f64 / total as f64
    }
}

/// Error-control method selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Parity,
    Checksum,
    Hamming,
    Crc,
    Repetition,
}

impl Method {
    /// Every method, in presentation order
    pub const ALL: [Method; 5] = [
        Method::Parity,
        Method::Checksum,
        Method::Hamming,
        Method::Crc,
        Method::Repetition,
    ];

    /// Stable lowercase identifier
    pub fn id(&self) -> &'static str {
        match self {
            Method::Parity => "parity",
            Method::Checksum => "checksum",
            Method::Hamming => "hamming",
            Method::Crc => "crc",
            Method::Repetition => "repetition",
        }
    }

    /// Human readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Method::Parity => "Parity Bit",
            Method::Checksum => "Checksum",
            Method::Hamming => "Hamming Code",
            Method::Crc => "CRC",
            Method::Repetition => "Repetition Code",
        }
    }

    /// Concrete code for this method
    pub fn code(&self) -> Box<dyn ErrorControlCode> {
        match self {
            Method::Parity => Box::new(ParityCode::new()),
            Method::Checksum => Box::new(ChecksumCode::new()),
            Method::Hamming => Box::new(HammingCode::new()),
            Method::Crc => Box::new(CrcCode::new()),
            Method::Repetition => Box::new(RepetitionCode::new()),
        }
    }

    /// Whether the method can repair errors rather than only flag them
    pub fn can_correct(&self) -> bool {
        matches!(self, Method::Hamming | Method::Repetition)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Method {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        Method::ALL
            .into_iter()
            .find(|m| m.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CodecError::UnknownMethod {
                name: s.to_string(),
            })
    }
}

/// Outcome of inspecting a received word
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub error_found: bool,
    pub details: DetectionDetails,
}

/// Method-specific evidence gathered during detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum DetectionDetails {
    Parity {
        received: u8,
        computed: u8,
    },
    Checksum {
        received: BitString,
        computed: BitString,
    },
    Hamming {
        /// 1-indexed position of a single flipped bit, 0 when clean
        syndrome: usize,
        parity_bits: usize,
    },
    Crc {
        received: BitString,
        computed: BitString,
        /// Whole received word divides evenly by the generator
        divisible: bool,
    },
    Repetition {
        /// Indices of groups whose bits disagree
        corrupted_groups: Vec<usize>,
    },
}

/// Outcome of a correction attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Correction {
    /// Method only detects; the sender must retransmit
    Unsupported,
    /// Repaired output of the code and the message bits it carries
    Corrected { output: BitString, data: BitString },
    /// Error detected but its position lies outside the word
    Unlocatable { syndrome: usize },
}

impl Correction {
    /// Corrected output, if any was produced
    pub fn output(&self) -> Option<&BitString> {
        match self {
            Correction::Corrected { output, .. } => Some(output),
            _ => None,
        }
    }

    /// Recovered message bits, if any were produced
    pub fn data(&self) -> Option<&BitString> {
        match self {
            Correction::Corrected { data, .. } => Some(data),
            _ => None,
        }
    }
}
