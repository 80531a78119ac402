//! Seeded xorshift64* generator
//!
//! All randomness in a run flows through one `RngManager` owned by the
//! orchestrator: loan sizing, term selection, and counterparty choice each
//! consume draws from the same stream, so a single seed pins down the entire
//! simulation. The banking core itself never holds an RNG; it takes one by
//! `&mut` where an operation needs a draw.

use serde::{Deserialize, Serialize};

/// Deterministic random number source for the simulation
///
/// xorshift64\*: 64 bits of state, a final odd-constant multiply to scramble
/// the low bits. Cheap enough to draw from inside the day loop.
///
/// # Example
/// ```
/// use banking_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let term_months = rng.range(6, 36); // [6, 36)
/// assert!((6..36).contains(&term_months));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    state: u64,
}

impl RngManager {
    /// Create a generator from a seed
    ///
    /// A zero seed would trap xorshift in the all-zero state, so it is
    /// remapped to 1.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Draw the next 64-bit value and advance the state
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Draw a value uniformly from `[min, max)`
    ///
    /// The modulo bias is negligible for the narrow ranges this simulation
    /// draws from (loan sizes, term months).
    ///
    /// # Panics
    /// Panics if `min >= max`.
    pub fn range(&mut self, min: u64, max: u64) -> u64 {
        assert!(min < max, "min must be less than max");
        min + self.next_u64() % (max - min)
    }

    /// Pick an index in `[0, len)`, for counterparty selection
    ///
    /// # Panics
    /// Panics if `len` is zero.
    pub fn index(&mut self, len: usize) -> usize {
        assert!(len > 0, "len must be positive");
        (self.next_u64() % len as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_still_produces_output() {
        let mut rng = RngManager::new(0);
        // A raw zero state would emit zeros forever.
        assert_ne!(rng.next_u64(), rng.next_u64());
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut rng1 = RngManager::new(99_999);
        let mut rng2 = RngManager::new(99_999);

        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64(), "sequences diverged");
        }
    }

    #[test]
    fn test_range_stays_in_bounds() {
        let mut rng = RngManager::new(7);
        for _ in 0..1_000 {
            let v = rng.range(6, 36);
            assert!((6..36).contains(&v));
        }
    }

    #[test]
    #[should_panic(expected = "min must be less than max")]
    fn test_range_rejects_inverted_bounds() {
        let mut rng = RngManager::new(12345);
        rng.range(100, 50);
    }

    #[test]
    fn test_index_within_bounds() {
        let mut rng = RngManager::new(7);
        for _ in 0..1_000 {
            assert!(rng.index(5) < 5);
        }
    }
}
