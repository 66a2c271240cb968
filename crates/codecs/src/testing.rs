//! Shared helpers for codec tests

use errsim_core::BitString;
use quickcheck::{Arbitrary, Gen};

pub fn bits(s: &str) -> BitString {
    BitString::parse(s).unwrap()
}

/// Arbitrary binary message of 1 to 16 bits
#[derive(Debug, Clone)]
pub struct Message(pub BitString);

impl Arbitrary for Message {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 16 + 1;
        let raw = (0..len).map(|_| u8::from(bool::arbitrary(g))).collect();
        Message(BitString::from_bits(raw).unwrap())
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let raw = self.0.bits().to_vec();
        Box::new(
            (1..raw.len())
                .rev()
                .map(move |len| Message(BitString::from_bits(raw[..len].to_vec()).unwrap())),
        )
    }
}
