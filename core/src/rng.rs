//! Deterministic random number generation.
//!
//! RULE: Nothing in the referee may call any platform RNG.
//! All randomness flows through RefereeRng instances derived
//! from the single master seed given in the match config.
//!
//! Each decision slot gets its own stream per tick, seeded from
//! (master_seed, slot, tick). Two referees with the same seed and
//! the same world make the same choices.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::types::Tick;

/// A named, deterministic RNG for a single decision slot.
pub struct RefereeRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl RefereeRng {
    pub fn new(master_seed: u64, slot_index: u64, tick: Tick) -> Self {
        let derived_seed = master_seed
            ^ slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15)
            ^ tick.wrapping_mul(0xbf58_476d_1ce4_e5b9);
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Roll a usize in [0, n).
    pub fn next_index_below(&mut self, n: usize) -> usize {
        assert!(n > 0, "n must be > 0");
        self.inner.gen_range(0..n)
    }

    /// Uniform float in [low, high).
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    /// Fair coin flip.
    pub fn coin(&mut self) -> bool {
        self.next_f64() < 0.5
    }
}

/// All decision RNGs for a single match, indexed by stable slot.
#[derive(Debug, Clone)]
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn for_slot_at_tick(&self, slot: RngSlot, tick: Tick) -> RefereeRng {
        RefereeRng::new(self.master_seed, slot as u64, tick).with_name(slot.name())
    }
}

/// Stable slot assignments.
/// NEVER reorder or remove entries; only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum RngSlot {
    Kickoff = 0,
    NeutralSpot = 1,
    PositionNoise = 2,
}

impl RngSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Kickoff => "kickoff",
            Self::NeutralSpot => "neutral_spot",
            Self::PositionNoise => "position_noise",
        }
    }
}
