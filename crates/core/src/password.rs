//! Password-derived keystream for header obfuscation.
//!
//! The password is hashed with SHA-256 and the digest seeds a ChaCha8
//! generator. Every call to `next_bit` draws one `u32` from the generator
//! and XORs its low bit into the caller's bit. A fresh stream built from
//! the same password reproduces the same sequence, so applying it twice
//! with two fresh streams restores the original bits.
//!
//! This is obfuscation, not encryption: there is no authentication and
//! the keystream is only as strong as the password.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Deterministic bit stream seeded purely from a password.
#[derive(Debug, Clone)]
pub struct PasswordStream {
    rng: ChaCha8Rng,
}

impl PasswordStream {
    pub fn new(password: &str) -> Self {
        let digest = Sha256::digest(password.as_bytes());
        let mut seed = <ChaCha8Rng as SeedableRng>::Seed::default();
        seed.copy_from_slice(&digest);

        Self {
            rng: ChaCha8Rng::from_seed(seed),
        }
    }

    /// Advance the stream and return `original XOR keystream bit`.
    pub fn next_bit(&mut self, original: bool) -> bool {
        original ^ self.keystream_bit()
    }

    fn keystream_bit(&mut self) -> bool {
        self.rng.next_u32() & 1 == 1
    }
}
