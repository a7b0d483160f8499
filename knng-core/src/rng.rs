//! Reproducible random streams for partitioned work.
//!
//! Every partition of every phase draws from its own [`SmallRng`], seeded by
//! mixing the run seed with the phase, iteration and partition index through
//! SplitMix64. No RNG is shared between workers.

use rand::{SeedableRng, rngs::SmallRng};

use crate::termination::Phase;

/// SplitMix64 increment (the 64-bit golden ratio) used for stream derivation.
const STREAM_SEED_SPACING: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX_MULT_A: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX_MULT_B: u64 = 0x94D0_49BB_1331_11EB;

#[inline]
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(STREAM_SEED_SPACING);
    state = (state ^ (state >> 30)).wrapping_mul(SPLITMIX_MULT_A);
    state = (state ^ (state >> 27)).wrapping_mul(SPLITMIX_MULT_B);
    state ^ (state >> 31)
}

/// Derives per-partition random streams from a single run seed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct StreamSeeds {
    base_seed: u64,
}

impl StreamSeeds {
    pub(crate) const fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    /// Seeds from the configured value, or from OS entropy when absent.
    pub(crate) fn from_option(seed: Option<u64>) -> Self {
        Self::new(seed.unwrap_or_else(rand::random))
    }

    pub(crate) const fn base_seed(self) -> u64 {
        self.base_seed
    }

    pub(crate) fn stream_seed(self, phase: Phase, iteration: usize, partition: usize) -> u64 {
        let phase_mix = phase.stream_tag().wrapping_mul(STREAM_SEED_SPACING);
        let mut state = splitmix64(self.base_seed ^ phase_mix);
        state = splitmix64(state ^ (iteration as u64).wrapping_add(1));
        let partition_mix = (partition as u64)
            .wrapping_add(1)
            .wrapping_mul(STREAM_SEED_SPACING);
        splitmix64(state ^ partition_mix)
    }

    pub(crate) fn stream(self, phase: Phase, iteration: usize, partition: usize) -> SmallRng {
        SmallRng::seed_from_u64(self.stream_seed(phase, iteration, partition))
    }
}
