//! Rate-1/3 repetition code with majority decoding

use crate::{Correction, Detection, DetectionDetails, ErrorControlCode, Method, Result};
use errsim_core::BitString;

/// Copies transmitted per message bit
pub const REPETITION_FACTOR: usize = 3;

/// Each bit is sent three times and decoded by majority vote.
///
/// One flip per group is always repaired. Two flips in the same group
/// outvote the surviving copy and decode to the wrong bit without any
/// indication that something went wrong.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepetitionCode;

impl RepetitionCode {
    /// Create a new repetition code
    pub fn new() -> Self {
        Self
    }

    /// Majority bit of a group: 1 when at least two copies are 1
    pub fn majority(group: &[u8]) -> u8 {
        let ones = group.iter().filter(|&&b| b == 1).count();
        u8::from(ones >= 2)
    }

    fn decode(received: &BitString) -> BitString {
        let mut decoded = BitString::new();
        for group in received.chunks(REPETITION_FACTOR) {
            decoded.push(Self::majority(group));
        }
        decoded
    }
}

impl ErrorControlCode for RepetitionCode {
    fn method(&self) -> Method {
        Method::Repetition
    }

    fn encode(&self, message: &BitString) -> BitString {
        let mut encoded = BitString::new();
        for &bit in message.bits() {
            for _ in 0..REPETITION_FACTOR {
                encoded.push(bit);
            }
        }
        encoded
    }

    fn detect(&self, received: &BitString) -> Result<Detection> {
        let corrupted_groups: Vec<usize> = received
            .chunks(REPETITION_FACTOR)
            .enumerate()
            .filter(|(_, group)| {
                let majority = Self::majority(group);
                group.iter().any(|&b| b != majority)
            })
            .map(|(i, _)| i)
            .collect();

        Ok(Detection {
            error_found: !corrupted_groups.is_empty(),
            details: DetectionDetails::Repetition { corrupted_groups },
        })
    }

    fn correct(&self, received: &BitString) -> Result<Correction> {
        let decoded = Self::decode(received);
        Ok(Correction::Corrected {
            output: decoded.clone(),
            data: decoded,
        })
    }

    // Majority decode; expects a received word, not corrected output.
    fn extract_data(&self, word: &BitString) -> Result<BitString> {
        Ok(Self::decode(word))
    }

    fn encoded_len(&self, message_len: usize) -> usize {
        message_len * REPETITION_FACTOR
    }

    fn can_correct(&self) -> bool {
        true
    }
}
