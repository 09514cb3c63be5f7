//! Random short key generation.
//!
//! Keys are 6 characters drawn uniformly from a 62-symbol alphanumeric
//! alphabet, giving a keyspace of 62^6 (about 5.68 * 10^10).

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Length of every generated short key.
pub const KEY_LENGTH: usize = 6;

/// Symbols a short key is drawn from.
pub const KEY_ALPHABET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generates candidate short keys.
///
/// Backed by [`StdRng`], a cryptographically secure generator. Production code
/// seeds it from the operating system; tests can pass a fixed seed to get a
/// reproducible key sequence.
pub struct KeyGenerator {
    rng: Mutex<StdRng>,
}

impl KeyGenerator {
    /// Creates a generator seeded from operating system entropy.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Creates a deterministic generator for tests and reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Produces one candidate key.
    ///
    /// Every character is sampled independently; `random_range` rejects
    /// out-of-range draws so no symbol is favored.
    pub fn generate(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        (0..KEY_LENGTH)
            .map(|_| KEY_ALPHABET[rng.random_range(0..KEY_ALPHABET.len())] as char)
            .collect()
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Well-formed keys that collide with fixed top-level routes.
pub const RESERVED_KEYS: &[&str] = &["health"];

/// Returns true if `key` would be shadowed by a fixed route.
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Returns true if `key` has the shape of a generated short key.
pub fn is_well_formed_key(key: &str) -> bool {
    key.len() == KEY_LENGTH && key.bytes().all(|b| KEY_ALPHABET.contains(&b))
}
