//! Cyclic redundancy check with a fixed degree-3 generator

use crate::{CodecError, Detection, DetectionDetails, ErrorControlCode, Method, Result};
use errsim_core::BitString;

/// Generator polynomial `x^3 + x + 1`, most significant coefficient first
pub const GENERATOR: [u8; 4] = [1, 0, 1, 1];

/// Width of the remainder field
pub const CRC_BITS: usize = GENERATOR.len() - 1;

/// CRC-3 over the generator `1011`.
///
/// The message is extended with three zero bits and divided by the
/// generator using XOR long division; the 3-bit remainder is appended.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrcCode;

impl CrcCode {
    /// Create a new CRC code
    pub fn new() -> Self {
        Self
    }

    /// Remainder of `data` followed by three zero bits, divided by the generator
    pub fn remainder(data: &BitString) -> BitString {
        let mut dividend = data.bits().to_vec();
        dividend.extend_from_slice(&[0; CRC_BITS]);
        Self::divide(dividend)
    }

    /// Remainder of the whole received word divided by the generator.
    ///
    /// Zero for every untouched code word.
    pub fn word_remainder(word: &BitString) -> BitString {
        Self::divide(word.bits().to_vec())
    }

    // Long division: whenever the leading bit is set, XOR the generator in
    // at that offset, then move one bit right.
    fn divide(mut work: Vec<u8>) -> BitString {
        if work.len() < GENERATOR.len() {
            let mut padded = vec![0; GENERATOR.len() - work.len()];
            padded.append(&mut work);
            work = padded;
        }

        let steps = work.len() - CRC_BITS;
        for i in 0..steps {
            if work[i] == 1 {
                for (j, &g) in GENERATOR.iter().enumerate() {
                    work[i + j] ^= g;
                }
            }
        }

        let mut remainder = BitString::new();
        for &bit in &work[steps..] {
            remainder.push(bit);
        }
        remainder
    }

    fn split(received: &BitString) -> Result<(BitString, BitString)> {
        if received.len() < CRC_BITS {
            return Err(CodecError::WordTooShort {
                method: "crc",
                min: CRC_BITS,
                actual: received.len(),
            });
        }

        Ok(received.split_at(received.len() - CRC_BITS)?)
    }
}

impl ErrorControlCode for CrcCode {
    fn method(&self) -> Method {
        Method::Crc
    }

    fn encode(&self, message: &BitString) -> BitString {
        message.concat(&Self::remainder(message))
    }

    fn detect(&self, received: &BitString) -> Result<Detection> {
        let (data, received_crc) = Self::split(received)?;
        let computed = Self::remainder(&data);
        let divisible = Self::word_remainder(received).count_ones() == 0;
        let error_found = computed != received_crc;
        debug_assert_eq!(error_found, !divisible, "CRC checks disagree");

        Ok(Detection {
            error_found,
            details: DetectionDetails::Crc {
                received: received_crc,
                computed,
                divisible,
            },
        })
    }

    fn extract_data(&self, word: &BitString) -> Result<BitString> {
        let (data, _) = Self::split(word)?;
        Ok(data)
    }

    fn encoded_len(&self, message_len: usize) -> usize {
        message_len + CRC_BITS
    }
}
