//! 8-bit one's complement checksum

use crate::{CodecError, Detection, DetectionDetails, ErrorControlCode, Method, Result};
use errsim_core::{block_value, BitString};

/// Width of the checksum field and of each summed block
pub const CHECKSUM_BITS: usize = 8;

/// Additive checksum over 8-bit blocks.
///
/// The message is left-padded with zeros to a whole number of blocks for
/// the sum only; the padding is never transmitted. The blocks are added
/// modulo 256 and the one's complement of the sum is appended.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChecksumCode;

impl ChecksumCode {
    /// Create a new checksum code
    pub fn new() -> Self {
        Self
    }

    /// Compute the 8-bit checksum field for `data`
    pub fn checksum(data: &BitString) -> BitString {
        let padded = data.pad_left_to_multiple(CHECKSUM_BITS);
        let sum = padded
            .chunks(CHECKSUM_BITS)
            .fold(0u32, |acc, block| (acc + block_value(block)) % 256);

        BitString::from_value(255 - sum, CHECKSUM_BITS)
    }

    fn split(received: &BitString) -> Result<(BitString, BitString)> {
        if received.len() < CHECKSUM_BITS {
            return Err(CodecError::WordTooShort {
                method: "checksum",
                min: CHECKSUM_BITS,
                actual: received.len(),
            });
        }

        Ok(received.split_at(received.len() - CHECKSUM_BITS)?)
    }
}

impl ErrorControlCode for ChecksumCode {
    fn method(&self) -> Method {
        Method::Checksum
    }

    fn encode(&self, message: &BitString) -> BitString {
        message.concat(&Self::checksum(message))
    }

    fn detect(&self, received: &BitString) -> Result<Detection> {
        let (data, received_sum) = Self::split(received)?;
        let computed = Self::checksum(&data);

        Ok(Detection {
            error_found: computed != received_sum,
            details: DetectionDetails::Checksum {
                received: received_sum,
                computed,
            },
        })
    }

    fn extract_data(&self, word: &BitString) -> Result<BitString> {
        let (data, _) = Self::split(word)?;
        Ok(data)
    }

    fn encoded_len(&self, message_len: usize) -> usize {
        message_len + CHECKSUM_BITS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bits, Message};
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_checksum_single_block() {
        // 0b00000101 = 5, 255 - 5 = 250
        assert_eq!(ChecksumCode::checksum(&bits("101")).to_string(), "11111010");
    }

    #[test]
    fn test_checksum_multiple_blocks() {
        // 2 + 255 = 257 = 1 mod 256, 255 - 1 = 254
        let data = bits("0000001011111111");
        assert_eq!(ChecksumCode::checksum(&data).to_string(), "11111110");
    }

    #[test]
    fn test_checksum_padding_is_not_transmitted() {
        let code = ChecksumCode::new();
        let encoded = code.encode(&bits("1011"));
        assert_eq!(encoded.len(), 12);
        assert_eq!(encoded.to_string(), "101111110100");
    }

    #[test]
    fn test_checksum_error_detection() {
        let code = ChecksumCode::new();
        let encoded = code.encode(&bits("11010011"));
        assert!(!code.detect(&encoded).unwrap().error_found);

        let corrupted = encoded.flipped(2).unwrap();
        let detection = code.detect(&corrupted).unwrap();
        assert!(detection.error_found);
        match detection.details {
            DetectionDetails::Checksum { received, computed } => assert_ne!(received, computed),
            other => panic!("unexpected details {:?}", other),
        }
    }

    #[test]
    fn test_checksum_cancelling_flips_missed() {
        let code = ChecksumCode::new();
        // blocks 00000000 and 00000001; moving the low bit between blocks
        // keeps the modular sum unchanged
        let encoded = code.encode(&bits("0000000000000001"));
        let corrupted = encoded.flipped(7).unwrap().flipped(15).unwrap();
        assert_ne!(corrupted, encoded);
        assert!(!code.detect(&corrupted).unwrap().error_found);
    }

    #[test]
    fn test_checksum_short_word() {
        let code = ChecksumCode::new();
        assert!(matches!(
            code.detect(&bits("1010101")),
            Err(CodecError::WordTooShort { min: 8, actual: 7, .. })
        ));
    }

    #[quickcheck]
    fn prop_clean_word_passes(message: Message) -> bool {
        let code = ChecksumCode::new();
        !code.detect(&code.encode(&message.0)).unwrap().error_found
    }

    #[quickcheck]
    fn prop_single_flip_detected(message: Message, pos: usize) -> bool {
        let code = ChecksumCode::new();
        let encoded = code.encode(&message.0);
        let corrupted = encoded.flipped(pos % encoded.len()).unwrap();
        code.detect(&corrupted).unwrap().error_found
    }
}
