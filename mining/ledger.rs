//! Per-miner mining ledger
//!
//! Every entry keeps `mined_blocks + un_mined_blocks` equal to the planet
//! capacity it was created with. Mutations are staged first and committed
//! separately, so the engine can run fallible side effects (fuel debit)
//! between the two without ever leaving a half-applied entry.

use rocker_core::{Address, GameError, GameResult, PlanetId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cumulative mining state of one miner on one planet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerState {
    pub address: Address,
    pub planet_id: PlanetId,
    pub mined_blocks: u64,
    pub un_mined_blocks: u64,
    /// Goes false once and stays false
    pub can_mine: bool,
}

impl MinerState {
    pub fn fresh(address: Address, planet_id: PlanetId, capacity: u64) -> Self {
        Self { address, planet_id, mined_blocks: 0, un_mined_blocks: capacity, can_mine: true }
    }

    pub fn capacity(&self) -> u64 {
        self.mined_blocks + self.un_mined_blocks
    }

    /// State after extracting `delta` more blocks
    pub fn with_delta(&self, delta: u64) -> GameResult<Self> {
        if delta > self.un_mined_blocks {
            return Err(GameError::ExceedsCapacity {
                requested: delta,
                remaining: self.un_mined_blocks,
            });
        }
        let un_mined_blocks = self.un_mined_blocks - delta;
        Ok(Self {
            mined_blocks: self.mined_blocks + delta,
            un_mined_blocks,
            can_mine: self.can_mine && un_mined_blocks > 0,
            ..*self
        })
    }
}

#[derive(Debug, Default)]
pub struct MiningLedger {
    entries: HashMap<(Address, PlanetId), MinerState>,
}

impl MiningLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state, or a fresh one when the pair has never mined. The fresh
    /// state is not stored.
    pub fn get(&self, miner: &Address, planet_id: PlanetId, capacity: u64) -> MinerState {
        self.entries
            .get(&(*miner, planet_id))
            .copied()
            .unwrap_or_else(|| MinerState::fresh(*miner, planet_id, capacity))
    }

    pub fn contains(&self, miner: &Address, planet_id: PlanetId) -> bool {
        self.entries.contains_key(&(*miner, planet_id))
    }

    /// Computes the state `apply` would store, without storing it.
    pub fn stage(
        &self,
        miner: &Address,
        planet_id: PlanetId,
        capacity: u64,
        delta: u64,
    ) -> GameResult<MinerState> {
        self.get(miner, planet_id, capacity).with_delta(delta)
    }

    /// Stores a staged state, returning the previous entry if there was one.
    pub fn commit(&mut self, state: MinerState) -> Option<MinerState> {
        self.entries.insert((state.address, state.planet_id), state)
    }

    pub fn apply(
        &mut self,
        miner: &Address,
        planet_id: PlanetId,
        capacity: u64,
        delta: u64,
    ) -> GameResult<MinerState> {
        let staged = self.stage(miner, planet_id, capacity, delta)?;
        self.commit(staged);
        Ok(staged)
    }

    /// Disables an existing entry. Returns true if the entry flipped; pairs
    /// without an entry are left alone.
    pub fn revoke(&mut self, miner: &Address, planet_id: PlanetId) -> bool {
        match self.entries.get_mut(&(*miner, planet_id)) {
            Some(state) if state.can_mine => {
                state.can_mine = false;
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &MinerState> {
        self.entries.values()
    }
}
