//! Commit-hash outcome derivation, version 1
//!
//! The engine never rolls its own dice: the outcome of an attempt is a pure
//! function of the committed hash and the attempt's identity.
//!
//! ```text
//! seed    = keccak256("rocker.mine.v1" || commit_hash || planet_id:u64be
//!                     || mission_kind:u32be || miner:20 bytes)
//! roll    = U256(seed, big-endian) mod 10000
//! won     = roll < odds_bps
//! granted = won ? min(claimed_blocks, un_mined_blocks) : 0
//! ```
//!
//! Any change to this derivation breaks agreement with other
//! implementations and must come with a new version and domain tag.

use crate::attempt::MiningAttempt;
use primitive_types::U256;
use rocker_core::constants::{BPS_DENOMINATOR, OUTCOME_DOMAIN_TAG, OUTCOME_VERSION};
use rocker_core::{Hash, KeccakWriter};
use serde::{Deserialize, Serialize};

/// Result of evaluating an attempt against its odds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub seed: Hash,
    /// Uniform value in `0..10000`
    pub roll: u32,
    pub odds_bps: u32,
    pub won: bool,
    pub granted_blocks: u64,
}

/// Outcome derivation handler
pub struct OutcomeDeriver;

impl OutcomeDeriver {
    pub const VERSION: u8 = OUTCOME_VERSION;

    /// Computes the seed hash of an attempt
    pub fn seed(attempt: &MiningAttempt) -> Hash {
        let mut writer = KeccakWriter::new();
        writer
            .update(OUTCOME_DOMAIN_TAG)
            .update(attempt.commit_hash.as_bytes())
            .update(&attempt.planet_id.to_be_bytes())
            .update(&attempt.mission_kind.to_be_bytes())
            .update(attempt.miner.as_bytes());
        writer.finalize()
    }

    /// Maps a seed to a roll in `0..10000`
    pub fn roll(seed: &Hash) -> u32 {
        let value = U256::from_big_endian(seed.as_bytes());
        (value % U256::from(BPS_DENOMINATOR)).low_u32()
    }

    /// Evaluates an attempt.
    ///
    /// # Arguments
    /// * `attempt` - The mining attempt
    /// * `odds_bps` - Success threshold in basis points
    /// * `un_mined_blocks` - Blocks the miner may still extract
    ///
    /// # Returns
    /// The outcome; `granted_blocks` never exceeds the claim or the remainder
    pub fn derive(attempt: &MiningAttempt, odds_bps: u32, un_mined_blocks: u64) -> Outcome {
        let seed = Self::seed(attempt);
        let roll = Self::roll(&seed);
        let won = roll < odds_bps;
        let granted_blocks = if won { attempt.claimed_blocks.min(un_mined_blocks) } else { 0 };

        Outcome { seed, roll, odds_bps, won, granted_blocks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocker_core::Address;

    fn attempt(commit: &[u8]) -> MiningAttempt {
        MiningAttempt {
            planet_id: 0,
            claimed_blocks: 100,
            fuel_used: 1000,
            time_spent_secs: 1200,
            mission_kind: 1,
            miner: Address::derive(b"outcome"),
            commit_hash: Hash::digest(commit),
        }
    }

    #[test]
    fn test_seed_matches_documented_preimage() {
        let a = attempt(b"words");
        let mut preimage = Vec::new();
        preimage.extend_from_slice(b"rocker.mine.v1");
        preimage.extend_from_slice(a.commit_hash.as_bytes());
        preimage.extend_from_slice(&0u64.to_be_bytes());
        preimage.extend_from_slice(&1u32.to_be_bytes());
        preimage.extend_from_slice(a.miner.as_bytes());
        assert_eq!(preimage.len(), 14 + 32 + 8 + 4 + 20);
        assert_eq!(OutcomeDeriver::seed(&a), Hash::digest(&preimage));
    }

    #[test]
    fn test_roll_is_low_digits_of_big_endian_value() {
        let mut bytes = [0u8; 32];
        bytes[30] = 0x30;
        bytes[31] = 0x39; // 12345
        assert_eq!(OutcomeDeriver::roll(&Hash::from_bytes(bytes)), 2345);
        assert_eq!(OutcomeDeriver::roll(&Hash::from_bytes([0xff; 32])), {
            // 2^256 - 1 mod 10000
            let v = U256::MAX % U256::from(10_000u32);
            v.low_u32()
        });
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = attempt(b"same");
        assert_eq!(OutcomeDeriver::derive(&a, 5_000, 1_000), OutcomeDeriver::derive(&a, 5_000, 1_000));
    }

    #[test]
    fn test_seed_binds_every_field() {
        let base = attempt(b"bind");
        let seed = OutcomeDeriver::seed(&base);

        let mut other = base.clone();
        other.planet_id = 1;
        assert_ne!(OutcomeDeriver::seed(&other), seed);

        let mut other = base.clone();
        other.mission_kind = 2;
        assert_ne!(OutcomeDeriver::seed(&other), seed);

        let mut other = base.clone();
        other.miner = Address::derive(b"someone else");
        assert_ne!(OutcomeDeriver::seed(&other), seed);

        // accounting inputs do not move the roll
        let mut other = base.clone();
        other.fuel_used = 1;
        other.claimed_blocks = 7;
        assert_eq!(OutcomeDeriver::seed(&other), seed);
    }

    #[test]
    fn test_certain_and_impossible_odds() {
        let a = attempt(b"odds");
        let always = OutcomeDeriver::derive(&a, 10_000, 1_000);
        assert!(always.won);
        assert_eq!(always.granted_blocks, 100);

        let never = OutcomeDeriver::derive(&a, 0, 1_000);
        assert!(!never.won);
        assert_eq!(never.granted_blocks, 0);
    }

    #[test]
    fn test_grant_clamped_to_remaining() {
        let a = attempt(b"clamp");
        let outcome = OutcomeDeriver::derive(&a, 10_000, 40);
        assert_eq!(outcome.granted_blocks, 40);
    }

    #[test]
    fn test_rolls_spread_across_range() {
        let rolls: Vec<u32> = (0u32..400)
            .map(|i| OutcomeDeriver::derive(&attempt(&i.to_be_bytes()), 0, 0).roll)
            .collect();
        assert!(rolls.iter().all(|&r| r < 10_000));
        let low = rolls.iter().filter(|&&r| r < 5_000).count();
        // loose bound, 400 samples of a fair coin
        assert!((120..=280).contains(&low));
    }
}
