//! Validated bit strings and bit-level helpers

use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Ordered sequence of bits, stored one bit per byte (`0` or `1`).
///
/// Index 0 is the leftmost (first transmitted) bit. The textual form is the
/// usual `"0110..."` notation, which is also the serde representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BitString {
    bits: Vec<u8>,
}

impl BitString {
    /// Create an empty bit string
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    /// Parse a non-empty message made only of `0` and `1` characters
    pub fn parse(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(CoreError::InvalidBitString {
                msg: "message must not be empty".to_string(),
            });
        }

        Self::from_text(text)
    }

    /// Build from raw bit values, each of which must be 0 or 1
    pub fn from_bits(bits: Vec<u8>) -> Result<Self> {
        if let Some(pos) = bits.iter().position(|&b| b > 1) {
            return Err(CoreError::InvalidBitString {
                msg: format!("value {} at index {} is not a bit", bits[pos], pos),
            });
        }

        Ok(Self { bits })
    }

    /// Render the low `width` bits of `value`, most significant bit first
    pub fn from_value(value: u32, width: usize) -> Self {
        let bits = (0..width)
            .rev()
            .map(|shift| if shift < 32 { ((value >> shift) & 1) as u8 } else { 0 })
            .collect();
        Self { bits }
    }

    fn from_text(text: &str) -> Result<Self> {
        let bits = text
            .chars()
            .enumerate()
            .map(|(i, c)| match c {
                '0' => Ok(0),
                '1' => Ok(1),
                other => Err(CoreError::InvalidBitString {
                    msg: format!("character {:?} at index {} is not 0 or 1", other, i),
                }),
            })
            .collect::<Result<Vec<u8>>>()?;

        Ok(Self { bits })
    }

    /// Number of bits
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check if the string holds no bits
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Raw bit values
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// Count of `1` bits
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b == 1).count()
    }

    /// Invert the bit at `index` in place
    pub fn flip(&mut self, index: usize) -> Result<()> {
        let len = self.bits.len();
        let bit = self
            .bits
            .get_mut(index)
            .ok_or(CoreError::IndexOutOfRange { index, len })?;
        *bit ^= 1;
        Ok(())
    }

    /// Copy with the bit at `index` inverted
    pub fn flipped(&self, index: usize) -> Result<Self> {
        let mut copy = self.clone();
        copy.flip(index)?;
        Ok(copy)
    }

    /// Append one bit
    pub fn push(&mut self, bit: u8) {
        debug_assert!(bit <= 1, "pushed value {} is not a bit", bit);
        self.bits.push(bit & 1);
    }

    /// Append every bit of `other`
    pub fn extend_from(&mut self, other: &BitString) {
        self.bits.extend_from_slice(&other.bits);
    }

    /// `self` followed by `other`
    pub fn concat(&self, other: &BitString) -> Self {
        let mut joined = self.clone();
        joined.extend_from(other);
        joined
    }

    /// Copy of the bits in `range`
    pub fn slice(&self, range: Range<usize>) -> Result<Self> {
        if range.start > range.end || range.end > self.bits.len() {
            return Err(CoreError::IndexOutOfRange {
                index: range.end,
                len: self.bits.len(),
            });
        }

        Ok(Self {
            bits: self.bits[range].to_vec(),
        })
    }

    /// Split into `[0, mid)` and `[mid, len)`
    pub fn split_at(&self, mid: usize) -> Result<(Self, Self)> {
        if mid > self.bits.len() {
            return Err(CoreError::IndexOutOfRange {
                index: mid,
                len: self.bits.len(),
            });
        }

        let (head, tail) = self.bits.split_at(mid);
        Ok((Self { bits: head.to_vec() }, Self { bits: tail.to_vec() }))
    }

    /// Left-pad with zeros until the length is a multiple of `block`
    pub fn pad_left_to_multiple(&self, block: usize) -> Self {
        if block == 0 {
            return self.clone();
        }

        let padded_len = (self.bits.len() + block - 1) / block * block;
        let mut bits = vec![0; padded_len - self.bits.len()];
        bits.extend_from_slice(&self.bits);
        Self { bits }
    }

    /// Consecutive groups of `size` bits; the last group may be shorter
    pub fn chunks(&self, size: usize) -> std::slice::Chunks<'_, u8> {
        self.bits.chunks(size.max(1))
    }

    /// Bitwise XOR of two equal-length strings
    pub fn xor(&self, other: &BitString) -> Result<Self> {
        if self.bits.len() != other.bits.len() {
            return Err(CoreError::InvalidBitString {
                msg: format!(
                    "cannot compare strings of length {} and {}",
                    self.bits.len(),
                    other.bits.len()
                ),
            });
        }

        let bits = self
            .bits
            .iter()
            .zip(&other.bits)
            .map(|(a, b)| a ^ b)
            .collect();
        Ok(Self { bits })
    }

    /// Indices at which two equal-length strings differ
    pub fn diff_positions(&self, other: &BitString) -> Result<Vec<usize>> {
        let diff = self.xor(other)?;
        Ok(diff
            .bits
            .iter()
            .enumerate()
            .filter(|(_, &b)| b == 1)
            .map(|(i, _)| i)
            .collect())
    }
}

/// Unsigned value of a block of bits, most significant bit first.
///
/// Blocks wider than 32 bits keep only the low 32 bits.
pub fn block_value(block: &[u8]) -> u32 {
    block
        .iter()
        .fold(0u32, |acc, &bit| acc.wrapping_shl(1) | u32::from(bit & 1))
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit == 1 { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for BitString {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BitString {
    type Error = CoreError;

    // Empty is allowed here so that cleared simulation fields round-trip.
    fn try_from(value: String) -> Result<Self> {
        Self::from_text(&value)
    }
}

impl From<BitString> for String {
    fn from(value: BitString) -> Self {
        value.to_string()
    }
}
