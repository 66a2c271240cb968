//! Single even-parity bit

use crate::{CodecError, Detection, DetectionDetails, ErrorControlCode, Method, Result};
use errsim_core::BitString;

/// Even parity: one trailing bit makes the count of `1`s even.
///
/// Any odd number of flipped bits is detected. An even number of flips
/// leaves the parity unchanged and passes unnoticed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParityCode;

impl ParityCode {
    /// Create a new parity code
    pub fn new() -> Self {
        Self
    }

    /// Calculate the even-parity bit for `data`
    pub fn parity_bit(data: &[u8]) -> u8 {
        data.iter().fold(0u8, |acc, &bit| acc ^ (bit & 1))
    }

    fn split(received: &BitString) -> Result<(&[u8], u8)> {
        match received.bits().split_last() {
            Some((&last, data)) => Ok((data, last)),
            None => Err(CodecError::WordTooShort {
                method: "parity",
                min: 1,
                actual: 0,
            }),
        }
    }
}

impl ErrorControlCode for ParityCode {
    fn method(&self) -> Method {
        Method::Parity
    }

    fn encode(&self, message: &BitString) -> BitString {
        let mut encoded = message.clone();
        encoded.push(Self::parity_bit(message.bits()));
        encoded
    }

    fn detect(&self, received: &BitString) -> Result<Detection> {
        let (data, received_bit) = Self::split(received)?;
        let computed = Self::parity_bit(data);

        Ok(Detection {
            error_found: computed != received_bit,
            details: DetectionDetails::Parity {
                received: received_bit,
                computed,
            },
        })
    }

    fn extract_data(&self, word: &BitString) -> Result<BitString> {
        let (data, _) = Self::split(word)?;
        Ok(BitString::from_bits(data.to_vec())?)
    }

    fn encoded_len(&self, message_len: usize) -> usize {
        message_len + 1
    }
}
