//! Hamming single-error-correcting code
//!
//! Positions are 1-indexed. Every power-of-two position (1, 2, 4, 8, ...)
//! holds a parity bit; the remaining positions carry the message bits in
//! order. Parity bit `i` covers every position whose index has bit `i` set,
//! so recomputing all parity checks over a received word yields a syndrome
//! equal to the position of a single flipped bit.
//!
//! Two or more flips produce a syndrome that points at the wrong position,
//! or past the end of the word. Neither case is distinguishable from a
//! genuine single error by the code itself.

use crate::{Correction, Detection, DetectionDetails, ErrorControlCode, Method, Result};
use errsim_core::BitString;
use tracing::debug;

/// Hamming code with as many parity bits as the message length requires
#[derive(Debug, Clone, Copy, Default)]
pub struct HammingCode;

impl HammingCode {
    /// Create a new Hamming code
    pub fn new() -> Self {
        Self
    }

    /// Smallest `p` with `2^p >= message_len + p + 1`
    pub fn parity_bits_for(message_len: usize) -> usize {
        let mut p = 0;
        while (1usize << p) < message_len + p + 1 {
            p += 1;
        }
        p
    }

    /// Parity bit count of a code word of `word_len` bits.
    ///
    /// For every valid code word this agrees with [`Self::parity_bits_for`]
    /// applied to the message length.
    pub fn parity_bits_in(word_len: usize) -> usize {
        let mut p = 0;
        while (1usize << p) < word_len + 1 {
            p += 1;
        }
        p
    }

    fn is_parity_position(position: usize) -> bool {
        position.is_power_of_two()
    }

    /// Compute the syndrome of `word`
    pub fn syndrome(word: &[u8]) -> usize {
        let parity_bits = Self::parity_bits_in(word.len());
        (0..parity_bits)
            .filter(|&i| Self::check(word, i) == 1)
            .fold(0, |syndrome, i| syndrome | (1 << i))
    }

    // XOR of every bit whose 1-indexed position has bit `i` set.
    fn check(word: &[u8], i: usize) -> u8 {
        word.iter()
            .enumerate()
            .filter(|(idx, _)| (idx + 1) & (1 << i) != 0)
            .fold(0, |acc, (_, &bit)| acc ^ bit)
    }
}

impl ErrorControlCode for HammingCode {
    fn method(&self) -> Method {
        Method::Hamming
    }

    fn encode(&self, message: &BitString) -> BitString {
        let parity_bits = Self::parity_bits_for(message.len());
        let total = message.len() + parity_bits;

        let mut word = vec![0u8; total];
        let mut data = message.bits().iter();
        for position in 1..=total {
            if !Self::is_parity_position(position) {
                // total - parity_bits data slots, exactly one per message bit
                word[position - 1] = data.next().copied().unwrap_or(0);
            }
        }

        // Parity slots are still zero here, so each check over the whole
        // word equals the parity of the bits that slot covers.
        for i in 0..parity_bits {
            word[(1 << i) - 1] = Self::check(&word, i);
        }

        debug!(message_len = message.len(), parity_bits, "hamming encode");

        let mut encoded = BitString::new();
        for bit in word {
            encoded.push(bit);
        }
        encoded
    }

    fn detect(&self, received: &BitString) -> Result<Detection> {
        let syndrome = Self::syndrome(received.bits());

        Ok(Detection {
            error_found: syndrome != 0,
            details: DetectionDetails::Hamming {
                syndrome,
                parity_bits: Self::parity_bits_in(received.len()),
            },
        })
    }

    fn correct(&self, received: &BitString) -> Result<Correction> {
        let syndrome = Self::syndrome(received.bits());

        if syndrome > received.len() {
            debug!(syndrome, len = received.len(), "hamming syndrome outside word");
            return Ok(Correction::Unlocatable { syndrome });
        }

        let output = if syndrome == 0 {
            received.clone()
        } else {
            received.flipped(syndrome - 1)?
        };
        let data = self.extract_data(&output)?;

        Ok(Correction::Corrected { output, data })
    }

    fn extract_data(&self, word: &BitString) -> Result<BitString> {
        let data = word
            .bits()
            .iter()
            .enumerate()
            .filter(|(idx, _)| !Self::is_parity_position(idx + 1))
            .map(|(_, &bit)| bit)
            .collect();

        Ok(BitString::from_bits(data)?)
    }

    fn encoded_len(&self, message_len: usize) -> usize {
        message_len + Self::parity_bits_for(message_len)
    }

    fn can_correct(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bits, Message};
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_parity_bit_count() {
        assert_eq!(HammingCode::parity_bits_for(1), 2);
        assert_eq!(HammingCode::parity_bits_for(4), 3);
        assert_eq!(HammingCode::parity_bits_for(5), 4);
        assert_eq!(HammingCode::parity_bits_for(11), 4);
        assert_eq!(HammingCode::parity_bits_for(12), 5);
        assert_eq!(HammingCode::parity_bits_for(16), 5);
    }

    #[test]
    fn test_hamming_7_4() {
        let code = HammingCode::new();
        // d1..d4 = 1011 at positions 3, 5, 6, 7
        // p1 = d1^d2^d4 = 0, p2 = d1^d3^d4 = 1, p4 = d2^d3^d4 = 0
        assert_eq!(code.encode(&bits("1011")).to_string(), "0110011");
    }

    #[test]
    fn test_hamming_single_error_location() {
        let code = HammingCode::new();
        let encoded = bits("0110011");
        let corrupted = encoded.flipped(4).unwrap();

        let detection = code.detect(&corrupted).unwrap();
        assert!(detection.error_found);
        assert_eq!(
            detection.details,
            DetectionDetails::Hamming {
                syndrome: 5,
                parity_bits: 3
            }
        );
        assert_eq!(
            code.correct(&corrupted).unwrap(),
            Correction::Corrected {
                output: encoded,
                data: bits("1011")
            }
        );
    }

    #[test]
    fn test_hamming_syndrome_past_end() {
        let code = HammingCode::new();
        // 5 data bits, 4 parity bits, 9 positions; flipping 2 and 8 gives
        // syndrome 10
        let encoded = code.encode(&bits("10110"));
        assert_eq!(encoded.len(), 9);
        let corrupted = encoded.flipped(1).unwrap().flipped(7).unwrap();

        assert!(code.detect(&corrupted).unwrap().error_found);
        assert_eq!(
            code.correct(&corrupted).unwrap(),
            Correction::Unlocatable { syndrome: 10 }
        );
    }

    #[test]
    fn test_hamming_double_error_miscorrects() {
        let code = HammingCode::new();
        let encoded = code.encode(&bits("1011"));
        // positions 1 and 2 combine to syndrome 3
        let corrupted = encoded.flipped(0).unwrap().flipped(1).unwrap();
        let corrected = code.correct(&corrupted).unwrap();
        let output = corrected.output().unwrap();
        assert_ne!(output, &encoded);
    }

    #[test]
    fn test_hamming_extract_data() {
        let code = HammingCode::new();
        assert_eq!(code.extract_data(&bits("0110011")).unwrap(), bits("1011"));
    }

    #[quickcheck]
    fn prop_clean_word_passes(message: Message) -> bool {
        let code = HammingCode::new();
        !code.detect(&code.encode(&message.0)).unwrap().error_found
    }

    #[quickcheck]
    fn prop_single_flip_located_and_corrected(message: Message, pos: usize) -> TestResult {
        let code = HammingCode::new();
        let encoded = code.encode(&message.0);
        let index = pos % encoded.len();
        let corrupted = encoded.flipped(index).unwrap();

        let detection = code.detect(&corrupted).unwrap();
        let located = match detection.details {
            DetectionDetails::Hamming { syndrome, .. } => syndrome == index + 1,
            _ => false,
        };
        if !located {
            return TestResult::failed();
        }

        let corrected = code.correct(&corrupted).unwrap();
        TestResult::from_bool(
            corrected.output() == Some(&encoded) && corrected.data() == Some(&message.0),
        )
    }
}
