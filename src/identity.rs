//! Composite identities for ordered ID sequences
//!
//! A `CompositeIdentity` is a SHA-256 digest over an ordered sequence of
//! element IDs. Equal sequences always produce equal identities; order is
//! significant. Identities are an equality and debugging surrogate only;
//! anything that needs correctness compares the real ID sequences.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::hash::{Hash, Hasher};

const ADJECTIVES: &[&str] = &[
    "abrupt", "adorable", "alert", "aloof", "bored", "brave", "bright", "colossal", "confused",
    "corny", "courageous", "determined", "dizzy", "excited", "frothy", "funny", "fuzzy", "gaudy",
    "graceful", "greasy", "grumpy", "happy", "hollow", "hungry", "icy", "immense", "irate",
    "lazy", "lonely", "lucky", "mysterious", "nasty", "panicky", "perplexed", "quizzical",
    "teeny", "tender", "tricky", "wicked", "zany", "zealous", "zippy",
];

const CITIES: &[&str] = &[
    "Paris", "London", "Bangkok", "Singapore", "Dubai", "Istanbul", "Rome", "Shanghai", "Miami",
    "Toronto", "Barcelona", "Dublin", "Amsterdam", "Cairo", "Prague", "Vienna", "Madrid",
    "Vancouver", "Budapest", "Berlin", "Tokyo", "Seoul", "Athens", "Seattle", "Delhi", "Sydney",
    "Munich", "Venice", "Florence", "Montreal", "Boston", "Chicago", "Stockholm", "Warsaw", "Oslo",
    "Lisbon", "Taipei", "Brussels", "Copenhagen", "Auckland", "Edinburgh", "Wellington", "Lima",
];

/// Deterministic identity over an ordered sequence of IDs
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompositeIdentity([u8; 32]);

impl CompositeIdentity {
    /// Compute the identity of an ordered ID sequence
    pub fn new<'a, I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = &'a T>,
        T: Hash + 'a + ?Sized,
    {
        let mut hasher = DigestHasher::default();
        let mut count: u64 = 0;
        for id in ids {
            id.hash(&mut hasher);
            count += 1;
        }
        // Trailing count keeps [] and prefix-collisions of nested Hash impls apart
        hasher.write_u64(count);
        Self(hasher.0.finalize().into())
    }

    /// Identity of the empty sequence
    pub fn empty() -> Self {
        Self::new(std::iter::empty::<&u8>())
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First 8 hex characters, for log lines
    pub fn short(&self) -> String {
        self.0[..4].iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Human-readable label such as `lucky-Oslo-7`
    pub fn fun_name(&self) -> String {
        let adjective = ADJECTIVES[usize::from(self.0[0]) % ADJECTIVES.len()];
        let city = CITIES[usize::from(self.0[1]) % CITIES.len()];
        let number = self.0[2] % 10 + 1;
        format!("{adjective}-{city}-{number}")
    }
}

impl fmt::Display for CompositeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for CompositeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompositeIdentity({})", self.short())
    }
}

/// `Hasher` adapter feeding everything into a SHA-256 digest
#[derive(Default)]
struct DigestHasher(Sha256);

impl Hasher for DigestHasher {
    fn finish(&self) -> u64 {
        let digest = self.0.clone().finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(head)
    }

    fn write(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }
}
