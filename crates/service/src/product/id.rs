//! Six-digit product id generation.

use std::sync::Mutex;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Smallest id handed out.
pub const ID_MIN: i32 = 100_000;
/// Upper bound (exclusive); 999999 itself is never drawn.
pub const ID_MAX_EXCLUSIVE: i32 = 999_999;

/// Owned pseudo-random source for candidate ids, seeded once at construction.
pub struct IdGenerator {
    rng: Mutex<StdRng>,
}

impl IdGenerator {
    pub fn from_entropy() -> Self { Self::with_rng(StdRng::from_entropy()) }

    pub fn seeded(seed: u64) -> Self { Self::with_rng(StdRng::seed_from_u64(seed)) }

    pub fn with_rng(rng: StdRng) -> Self { Self { rng: Mutex::new(rng) } }

    /// Draw the next candidate uniformly from `[ID_MIN, ID_MAX_EXCLUSIVE)`.
    pub fn next_candidate(&self) -> i32 {
        // a poisoned lock still holds a usable rng
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(ID_MIN..ID_MAX_EXCLUSIVE)
    }
}

impl Default for IdGenerator {
    fn default() -> Self { Self::from_entropy() }
}
