//! Layer assignment for newly inserted nodes.
//!
//! Levels follow an exponential-like distribution: most nodes land on the
//! bottom layer, a geometrically shrinking fraction reaches each layer above.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded per-instance level sampler.
///
/// Each index owns its own sampler; two indices built from the same non-zero
/// seed with the same insert sequence draw identical level sequences. Seed 0
/// selects a non-deterministic OS-entropy source.
#[derive(Debug)]
pub struct LevelSampler {
    rng: StdRng,
    multiplier: f64,
    max_level: usize,
}

impl LevelSampler {
    pub fn new(max_level: usize, multiplier: f64, seed: u64) -> Self {
        let rng = if seed == 0 {
            StdRng::from_os_rng()
        } else {
            StdRng::seed_from_u64(seed)
        };
        Self {
            rng,
            multiplier,
            max_level,
        }
    }

    /// Draw an insertion level in `[0, max_level]`, where 0 is the bottom
    /// layer. Computed as `floor(-ln(u) * multiplier)` for u in (0, 1].
    pub fn sample(&mut self) -> usize {
        // random::<f64>() is [0, 1); shift to (0, 1] so ln never sees zero
        let u: f64 = 1.0 - self.rng.random::<f64>();
        let level = (-u.ln() * self.multiplier).floor() as usize;
        level.min(self.max_level)
    }
}
