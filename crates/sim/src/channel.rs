//! Noisy transmission channel
//!
//! A channel takes an encoded word and returns what the receiver sees plus
//! the list of flip events it applied. The production channel draws from a
//! random source; the scripted channel replays explicit flip positions so
//! tests can force exact corruption patterns.
//!
//! Flip events are recorded as they happen. The same index may appear twice
//! when it was drawn twice, in which case the bit ends up unchanged.

use errsim_core::BitString;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Probability that a transmission suffers any corruption
pub const CORRUPTION_PROBABILITY: f64 = 0.8;

/// Upper bound on flip events per transmission
pub const MAX_FLIPS: usize = 2;

/// A received word and the flips that produced it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transmission {
    pub received: BitString,
    /// Flip events in the order they were applied, duplicates included
    pub error_positions: Vec<usize>,
}

impl Transmission {
    /// Uncorrupted delivery
    pub fn clean(encoded: &BitString) -> Self {
        Self {
            received: encoded.clone(),
            error_positions: Vec::new(),
        }
    }

    /// Apply `positions` as flip events; indices past the end are dropped
    pub fn with_flips(encoded: &BitString, positions: &[usize]) -> Self {
        let mut transmission = Self::clean(encoded);
        for &pos in positions {
            transmission.flip(pos);
        }
        transmission
    }

    fn flip(&mut self, pos: usize) {
        match self.received.flip(pos) {
            Ok(()) => self.error_positions.push(pos),
            Err(e) => warn!("ignoring flip: {}", e),
        }
    }

    /// Whether any flip event occurred
    pub fn is_corrupted(&self) -> bool {
        !self.error_positions.is_empty()
    }

    /// Indices whose bit actually differs from `encoded`
    pub fn net_error_positions(&self, encoded: &BitString) -> Vec<usize> {
        self.received.diff_positions(encoded).unwrap_or_default()
    }
}

/// Generic transmission channel
pub trait Channel {
    /// Deliver an encoded word, possibly corrupting it
    fn transmit(&mut self, encoded: &BitString) -> Transmission;
}

/// Random channel: with probability 0.8 flips one or two uniformly chosen
/// positions, otherwise delivers the word intact.
pub struct NoisyChannel {
    rng: StdRng,
}

impl NoisyChannel {
    /// Channel seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible channel
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Channel for NoisyChannel {
    fn transmit(&mut self, encoded: &BitString) -> Transmission {
        if encoded.is_empty() || !self.rng.gen_bool(CORRUPTION_PROBABILITY) {
            debug!(len = encoded.len(), "clean transmission");
            return Transmission::clean(encoded);
        }

        let count = self.rng.gen_range(1..=MAX_FLIPS);
        let positions: Vec<usize> = (0..count)
            .map(|_| self.rng.gen_range(0..encoded.len()))
            .collect();
        debug!(?positions, "corrupting transmission");

        Transmission::with_flips(encoded, &positions)
    }
}

/// Replays pre-planned flip positions, one entry per transmission.
///
/// Once the script runs out every transmission is clean.
#[derive(Debug, Clone, Default)]
pub struct ScriptedChannel {
    script: VecDeque<Vec<usize>>,
}

impl ScriptedChannel {
    /// Create a channel from a list of per-transmission flip positions
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = Vec<usize>>,
    {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Number of scripted transmissions left
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Channel for ScriptedChannel {
    fn transmit(&mut self, encoded: &BitString) -> Transmission {
        let flips = self.script.pop_front().unwrap_or_default();
        Transmission::with_flips(encoded, &flips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> BitString {
        BitString::parse(s).unwrap()
    }

    #[test]
    fn test_scripted_channel() {
        let mut channel = ScriptedChannel::new(vec![vec![0, 3], vec![]]);
        let encoded = bits("10110");

        let first = channel.transmit(&encoded);
        assert_eq!(first.received.to_string(), "00100");
        assert_eq!(first.error_positions, vec![0, 3]);

        let second = channel.transmit(&encoded);
        assert!(!second.is_corrupted());
        assert_eq!(second.received, encoded);

        // exhausted script delivers clean words
        assert_eq!(channel.remaining(), 0);
        assert!(!channel.transmit(&encoded).is_corrupted());
    }

    #[test]
    fn test_duplicate_flip_recorded_twice() {
        let encoded = bits("1100");
        let transmission = Transmission::with_flips(&encoded, &[2, 2]);
        assert_eq!(transmission.received, encoded);
        assert_eq!(transmission.error_positions, vec![2, 2]);
        assert!(transmission.is_corrupted());
        assert!(transmission.net_error_positions(&encoded).is_empty());
    }

    #[test]
    fn test_out_of_range_flip_dropped() {
        let encoded = bits("11");
        let transmission = Transmission::with_flips(&encoded, &[1, 5]);
        assert_eq!(transmission.error_positions, vec![1]);
        assert_eq!(transmission.received.to_string(), "10");
    }

    #[test]
    fn test_noisy_channel_is_reproducible() {
        let encoded = bits("1011001110");
        let mut a = NoisyChannel::with_seed(7);
        let mut b = NoisyChannel::with_seed(7);
        for _ in 0..20 {
            assert_eq!(a.transmit(&encoded), b.transmit(&encoded));
        }
    }

    #[test]
    fn test_noisy_channel_bounds() {
        let encoded = bits("10110011");
        let mut channel = NoisyChannel::with_seed(42);
        let mut clean = 0;
        let runs = 2000;

        for _ in 0..runs {
            let t = channel.transmit(&encoded);
            assert_eq!(t.received.len(), encoded.len());
            assert!(t.error_positions.len() <= MAX_FLIPS);
            assert!(t.error_positions.iter().all(|&p| p < encoded.len()));
            // duplicate draws can only shrink the net difference
            let net = t.net_error_positions(&encoded);
            assert!(net.len() <= t.error_positions.len());
            if !t.is_corrupted() {
                clean += 1;
            }
        }

        // about 20% clean; allow a wide margin
        let ratio = clean as f64 / runs as f64;
        assert!(ratio > 0.12 && ratio < 0.28, "clean ratio {}", ratio);
    }

    #[test]
    fn test_noisy_channel_flip_distribution() {
        let encoded = bits("1011001110001101");
        let mut channel = NoisyChannel::with_seed(9);
        let mut counts = [0usize; MAX_FLIPS + 1];
        let mut hits = vec![0usize; encoded.len()];

        for _ in 0..4000 {
            let t = channel.transmit(&encoded);
            counts[t.error_positions.len()] += 1;
            for &pos in &t.error_positions {
                hits[pos] += 1;
            }
        }

        // one and two flips are equally likely among corrupted runs
        let corrupted = counts[1] + counts[2];
        let single = counts[1] as f64 / corrupted as f64;
        assert!(single > 0.4 && single < 0.6, "single flip ratio {}", single);

        // every index gets drawn, none dominates
        let draws: usize = hits.iter().sum();
        let expected = draws as f64 / encoded.len() as f64;
        for (pos, &n) in hits.iter().enumerate() {
            assert!(n > 0, "index {} never flipped", pos);
            let ratio = n as f64 / expected;
            assert!(ratio > 0.7 && ratio < 1.3, "index {} drawn {} times", pos, n);
        }
    }

    #[test]
    fn test_noisy_channel_empty_word() {
        let mut channel = NoisyChannel::with_seed(1);
        let t = channel.transmit(&BitString::new());
        assert!(!t.is_corrupted());
    }
}
