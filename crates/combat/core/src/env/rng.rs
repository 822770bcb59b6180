//! Deterministic randomness for dice rolls.
//!
//! Rolls are pure functions of a derived seed, so replaying the same action
//! stream against the same session seed reproduces every initiative roll.

use sha2::{Digest, Sha256};

use crate::state::TokenId;

/// Oracle providing deterministic random values from explicit seeds.
pub trait RngOracle: Send + Sync {
    /// Generates the next 32-bit value for the given seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Rolls a die with the given number of sides, yielding `1..=sides`.
    fn roll_die(&self, seed: u64, sides: u32) -> u32 {
        (self.next_u32(seed) % sides) + 1
    }

    /// Rolls the initiative d20.
    fn roll_d20(&self, seed: u64) -> u32 {
        self.roll_die(seed, 20)
    }
}

/// Stateless PCG-XSH-RR generator.
///
/// Keeping the generator stateless means every roll is fully determined by
/// its seed; sequencing lives in the seed derivation, not in here.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    pub fn new() -> Self {
        Self
    }
}

const MULTIPLIER: u64 = 6364136223846793005;
const INCREMENT: u64 = 1442695040888963407;

fn pcg_step(state: u64) -> u64 {
    state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT)
}

fn pcg_output(state: u64) -> u32 {
    let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
    let rot = (state >> 59) as u32;
    xorshifted.rotate_right(rot)
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        pcg_output(pcg_step(seed))
    }
}

/// Derives a roll seed from the session seed, the action nonce, the acting
/// token's entropy, and a context discriminator for multiple rolls within
/// one action.
pub fn compute_seed(session_seed: u64, nonce: u64, actor: u64, context: u32) -> u64 {
    let mut hash = session_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= actor.wrapping_mul(0x517cc1b727220a95);
    hash ^= u64::from(context).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}

/// Stable 64-bit entropy derived from a token identifier, so string ids can
/// participate in seed derivation.
pub fn token_entropy(token_id: &TokenId) -> u64 {
    let digest = Sha256::digest(token_id.as_str().as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
