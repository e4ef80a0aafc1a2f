//! Planet registry
//!
//! Planets are registered once and never resized. Besides the immutable
//! configuration the registry keeps per-planet usage counters that the
//! engine bumps when a mining attempt commits.

use rocker_core::constants::BPS_DENOMINATOR;
use rocker_core::{GameError, GameResult, PlanetId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration of a resource pool
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planet {
    pub id: PlanetId,
    pub total_blocks: u64,
    /// Share of `total_blocks` a single miner may extract, in basis points
    pub yield_rate_bps: u32,
}

impl Planet {
    pub fn new(id: PlanetId, total_blocks: u64, yield_rate_bps: u32) -> GameResult<Self> {
        if yield_rate_bps > BPS_DENOMINATOR {
            return Err(GameError::InvalidYield(yield_rate_bps));
        }
        Ok(Self { id, total_blocks, yield_rate_bps })
    }

    /// Maximum cumulative blocks one miner may extract from this planet.
    pub fn capacity(&self) -> u64 {
        capacity_of(self.total_blocks, self.yield_rate_bps)
    }
}

/// `floor(total_blocks * yield_rate_bps / 10000)`, computed without overflow.
pub fn capacity_of(total_blocks: u64, yield_rate_bps: u32) -> u64 {
    let scaled = total_blocks as u128 * yield_rate_bps as u128 / BPS_DENOMINATOR as u128;
    // yield_rate_bps <= 10000 keeps the quotient within u64
    scaled.min(u64::MAX as u128) as u64
}

/// Usage counters of a planet, updated on every committed attempt
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetUsage {
    /// Blocks granted across all miners
    pub mined_blocks: u64,
    /// Miners with a ledger entry on this planet
    pub miners: u64,
    /// Miners whose entry can no longer mine
    pub disabled_miners: u64,
}

#[derive(Debug, Default)]
pub struct PlanetRegistry {
    planets: BTreeMap<PlanetId, (Planet, PlanetUsage)>,
}

impl PlanetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        id: PlanetId,
        total_blocks: u64,
        yield_rate_bps: u32,
    ) -> GameResult<Planet> {
        if self.planets.contains_key(&id) {
            return Err(GameError::DuplicatePlanet(id));
        }
        let planet = Planet::new(id, total_blocks, yield_rate_bps)?;
        self.planets.insert(id, (planet, PlanetUsage::default()));
        Ok(planet)
    }

    /// Checks that `register` would succeed without registering anything.
    pub fn check_registrable(&self, id: PlanetId, yield_rate_bps: u32) -> GameResult<()> {
        if self.planets.contains_key(&id) {
            return Err(GameError::DuplicatePlanet(id));
        }
        if yield_rate_bps > BPS_DENOMINATOR {
            return Err(GameError::InvalidYield(yield_rate_bps));
        }
        Ok(())
    }

    pub fn get(&self, id: PlanetId) -> GameResult<Planet> {
        self.planets.get(&id).map(|(p, _)| *p).ok_or(GameError::UnknownPlanet(id))
    }

    pub fn capacity(&self, id: PlanetId) -> GameResult<u64> {
        self.get(id).map(|p| p.capacity())
    }

    pub fn usage(&self, id: PlanetId) -> GameResult<PlanetUsage> {
        self.planets.get(&id).map(|(_, u)| *u).ok_or(GameError::UnknownPlanet(id))
    }

    pub(crate) fn usage_mut(&mut self, id: PlanetId) -> GameResult<&mut PlanetUsage> {
        self.planets.get_mut(&id).map(|(_, u)| u).ok_or(GameError::UnknownPlanet(id))
    }

    pub fn contains(&self, id: PlanetId) -> bool {
        self.planets.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.planets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planets.is_empty()
    }

    /// Planets in id order
    pub fn planets(&self) -> impl Iterator<Item = &Planet> {
        self.planets.values().map(|(p, _)| p)
    }
}
