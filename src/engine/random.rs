//! Seedable pseudo-random number generation.
//!
//! This module provides a lightweight xorshift64\* generator used by
//! simulation systems that need randomness, most notably squad spawning.
//!
//! # Design
//!
//! The generator is a plain struct holding 64 bits of state:
//!
//! - Seeds are injectable, so tests can pin a seed and get a reproducible
//!   sequence.
//! - The production default derives its seed from the system clock.
//! - No global state, locks, or atomics are used; an owner that needs
//!   sharing wraps the generator itself.
//!
//! # Non-goals
//!
//! - This generator is **not cryptographically secure**.
//! - Output quality is sufficient for simulation and sampling, not for
//!   security-sensitive contexts.

use std::time::{SystemTime, UNIX_EPOCH};

use glam::{IVec2, Vec2};


const SEED_SCRAMBLE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seedable xorshift64\* generator.
#[derive(Clone, Debug)]
pub struct SimRng {
    state: u64,
}

impl SimRng {
    /// Creates a generator from an explicit seed.
    ///
    /// A zero seed is remapped to a fixed non-zero constant; xorshift state
    /// must never be zero.
    pub fn from_seed(seed: u64) -> Self {
        let state = if seed == 0 { SEED_SCRAMBLE } else { seed };
        Self { state }
    }

    /// Creates a generator seeded from the system clock.
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(SEED_SCRAMBLE);
        Self::from_seed(nanos ^ SEED_SCRAMBLE)
    }

    /// Returns the next pseudo-random `u64`.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Returns a uniform `f32` in `[0, 1)`.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        // 24 high bits give full f32 mantissa precision.
        ((self.next_u64() >> 40) as f32) * (1.0 / (1u64 << 24) as f32)
    }

    /// Returns a uniform `f32` in `[low, high)`.
    ///
    /// Returns `low` when the range is empty.
    #[inline]
    pub fn range_f32(&mut self, low: f32, high: f32) -> f32 {
        if high <= low { return low; }
        low + self.next_f32() * (high - low)
    }

    /// Returns a uniform `i32` in `[low, high)`.
    ///
    /// The lower bound is inclusive and the upper bound is exclusive.
    /// Returns `low` when the range is empty.
    #[inline]
    pub fn range_i32(&mut self, low: i32, high: i32) -> i32 {
        if high <= low { return low; }
        let span = (high as i64 - low as i64) as u64;
        low + (self.next_u64() % span) as i32
    }

    /// Returns a uniform point inside the rectangle `[min, max)`.
    #[inline]
    pub fn vec2_in(&mut self, min: Vec2, max: Vec2) -> Vec2 {
        Vec2::new(self.range_f32(min.x, max.x), self.range_f32(min.y, max.y))
    }

    /// Returns a componentwise-uniform integer pair in `[min, max)`.
    #[inline]
    pub fn ivec2_in(&mut self, min: IVec2, max: IVec2) -> IVec2 {
        IVec2::new(self.range_i32(min.x, max.x), self.range_i32(min.y, max.y))
    }
}
