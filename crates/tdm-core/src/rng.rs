//! Deterministic per-person RNG.
//!
//! # Determinism strategy
//!
//! Each person gets an independent `SmallRng` seeded from the run seed, the
//! household id and the member number:
//!
//!   seed = global_seed XOR (household * MIXING_CONSTANT)
//!                      XOR rotl(member * MIXING_CONSTANT, 32)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive ids uniformly across the seed space.  Because the
//! seed depends only on who the person is, a person's draws are identical no
//! matter which worker thread processes them or in which order persons run.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{HouseholdId, PersonAttributes};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-person deterministic RNG.
///
/// Create one per person at the start of their day; never share across
/// threads.
pub struct PersonRng(SmallRng);

impl PersonRng {
    /// Seed deterministically from the run seed, household and member number.
    pub fn new(global_seed: u64, household: HouseholdId, member: u8) -> Self {
        let hh = (household.0 as u64).wrapping_mul(MIXING_CONSTANT);
        let mem = (member as u64 + 1).wrapping_mul(MIXING_CONSTANT).rotate_left(32);
        PersonRng(SmallRng::seed_from_u64(global_seed ^ hh ^ mem))
    }

    /// Shorthand for `PersonRng::new(seed, person.household, person.member)`.
    pub fn for_person(global_seed: u64, person: &PersonAttributes) -> Self {
        Self::new(global_seed, person.household, person.member)
    }

    /// A uniform draw in `[0, 1)`: the Monte Carlo variate handed to
    /// choice models.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}
