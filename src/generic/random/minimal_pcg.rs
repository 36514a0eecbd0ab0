//! A small pseudorandom number generator.
//!
//! Specifically, the PCG32 generator of <https://www.pcg-random.org/>, following the minimal C implementation with a fixed stream, made available through [RngCore] and [SeedableRng].
//!
//! Each [context](crate::context) holds its own source of randomness, used only when a decision picks a random value (see [random_decision_bias](crate::config::Config::random_decision_bias)).
//! Seeding is fixed by [Context::from_config](crate::context::Context::from_config), so solves are reproducible.

use rand::SeedableRng;
use rand_core::{impls, Error, RngCore};

/// The stream selector of the reference demonstration.
const STREAM: u64 = 54;

const MULTIPLIER: u64 = 6364136223846793005;

/// State and (odd) increment.
#[derive(Default)]
pub struct MinimalPCG32 {
    state: u64,
    inc: u64,
}

impl MinimalPCG32 {
    fn step(&mut self) -> u32 {
        let old_state = self.state;
        self.state = old_state.wrapping_mul(MULTIPLIER).wrapping_add(self.inc);

        let xorshifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngCore for MinimalPCG32 {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for MinimalPCG32 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        let mut rng = MinimalPCG32 {
            state: 0,
            inc: (STREAM << 1) | 1,
        };
        rng.step();
        rng.state = rng.state.wrapping_add(u64::from_le_bytes(seed));
        rng.step();
        rng
    }
}

#[cfg(test)]
mod pcg_tests {
    use super::*;

    #[test]
    fn reference_demo() {
        let mut rng = MinimalPCG32::from_seed(42u64.to_le_bytes());
        assert_eq!(rng.next_u32(), 0xa15c02b7);
        assert_eq!(rng.next_u32(), 0x7b47f409);
        assert_eq!(rng.next_u32(), 0xba1d3330);
    }

    #[test]
    fn zero_seed() {
        let mut rng = MinimalPCG32::from_seed(0u64.to_le_bytes());
        assert_eq!(rng.next_u64(), 13371022535626492819);
        assert_eq!(rng.next_u32(), 2101201694);
    }
}
