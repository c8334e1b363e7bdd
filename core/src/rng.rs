//! Deterministic random number generation.
//!
//! RULE: Nothing in the engine may call any platform RNG.
//! All randomness flows through a DeskRng seeded explicitly by the
//! caller, so a seeded mock portfolio is fully reproducible.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A seeded, deterministic RNG for mock data generation.
pub struct DeskRng {
    inner: Pcg64Mcg,
}

impl DeskRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll a float in [lo, hi).
    pub fn in_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = DeskRng::new(42);
        let mut b = DeskRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64_below(1000), b.next_u64_below(1000));
        }
    }

    #[test]
    fn in_range_stays_in_range() {
        let mut rng = DeskRng::new(7);
        for _ in 0..1000 {
            let x = rng.in_range(5_000.0, 50_000.0);
            assert!((5_000.0..50_000.0).contains(&x), "out of range: {x}");
        }
    }
}
