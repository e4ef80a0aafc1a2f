//! Mining attempt definitions
//!
//! A [`MiningAttempt`] carries everything one call to the engine needs. It
//! lives for a single transaction and is never stored.

use rocker_core::{Address, GameError, GameResult, Hash, PlanetId};
use serde::{Deserialize, Serialize};

/// A request to extract blocks from a planet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningAttempt {
    pub planet_id: PlanetId,
    /// Blocks the miner reports having dug; an upper bound on the grant
    pub claimed_blocks: u64,
    /// Fuel units burned, charged at the configured fuel price
    pub fuel_used: u64,
    pub time_spent_secs: u64,
    pub mission_kind: u32,
    pub miner: Address,
    /// Hash committed before the attempt; the outcome is derived from it
    pub commit_hash: Hash,
}

impl MiningAttempt {
    /// Rejects malformed arguments.
    ///
    /// # Arguments
    /// * `max_time_spent_secs` - Upper bound on the reported time
    pub fn validate(&self, max_time_spent_secs: u64) -> GameResult<()> {
        if self.claimed_blocks == 0 {
            return Err(GameError::InvalidInput("claimed blocks must be positive".into()));
        }
        if self.fuel_used == 0 {
            return Err(GameError::InvalidInput("fuel used must be positive".into()));
        }
        if self.time_spent_secs == 0 {
            return Err(GameError::InvalidInput("time spent must be positive".into()));
        }
        if self.time_spent_secs > max_time_spent_secs {
            return Err(GameError::InvalidInput(format!(
                "time spent {}s exceeds the {}s limit",
                self.time_spent_secs, max_time_spent_secs
            )));
        }
        Ok(())
    }

    /// Fuel cost in ledger units at `fuel_price` per fuel unit
    pub fn fuel_cost(&self, fuel_price: u64) -> u128 {
        self.fuel_used as u128 * fuel_price as u128
    }
}

/// Builds a commit hash the way game clients do: keccak256 over the
/// concatenation of the secret words.
pub fn commit_words<S: AsRef<str>>(words: &[S]) -> Hash {
    let joined: String = words.iter().map(|w| w.as_ref()).collect();
    Hash::digest(joined.as_bytes())
}
