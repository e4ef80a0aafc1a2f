//! Per-planet occupancy tables behind independent locks

use crate::location::{LocationResolver, OccupancyTable};
use crate::sphere::SphereBlockGenerator;
use parking_lot::{Mutex, RwLock};
use rocker_core::{BlockId, GameError, GameResult, PlanetId};
use std::collections::HashMap;
use std::sync::Arc;

/// Holds the occupancy table of every shaped planet. Each table has its own
/// mutex so resolutions on one planet never wait on another planet.
pub struct SpatialStore {
    generator: SphereBlockGenerator,
    tables: RwLock<HashMap<PlanetId, Arc<Mutex<OccupancyTable>>>>,
}

impl SpatialStore {
    pub fn new(generator: SphereBlockGenerator) -> Self {
        Self { generator, tables: RwLock::new(HashMap::new()) }
    }

    pub fn generator(&self) -> &SphereBlockGenerator {
        &self.generator
    }

    /// Generates the block table of a planet. A planet is shaped once; a
    /// second call fails with [`GameError::DuplicatePlanet`] and keeps the
    /// existing occupancy.
    pub fn generate_planet(&self, planet_id: PlanetId, radius: i64) -> GameResult<usize> {
        if self.tables.read().contains_key(&planet_id) {
            return Err(GameError::DuplicatePlanet(planet_id));
        }

        // generation runs outside the map lock, it is the expensive part
        let table = OccupancyTable::from_sphere(&self.generator, planet_id, radius)?;
        let blocks = table.len();

        let mut tables = self.tables.write();
        if tables.contains_key(&planet_id) {
            return Err(GameError::DuplicatePlanet(planet_id));
        }
        tables.insert(planet_id, Arc::new(Mutex::new(table)));
        tracing::info!(planet_id, radius, blocks, "planet shape generated");
        Ok(blocks)
    }

    /// Drops a planet's table. Used to undo a shape whose planet failed to
    /// register; returns whether a table was removed.
    pub fn discard_planet(&self, planet_id: PlanetId) -> bool {
        let removed = self.tables.write().remove(&planet_id).is_some();
        if removed {
            tracing::debug!(planet_id, "planet shape discarded");
        }
        removed
    }

    /// Resolves `count` free locations on a planet, see [`LocationResolver::find_location`].
    pub fn find_location(
        &self,
        planet_id: PlanetId,
        candidates: &[BlockId],
        count: usize,
    ) -> GameResult<Vec<BlockId>> {
        let table = self.table(planet_id)?;
        let mut guard = table.lock();
        LocationResolver::find_location(&mut guard, candidates, count)
    }

    pub fn block_count(&self, planet_id: PlanetId) -> GameResult<usize> {
        Ok(self.table(planet_id)?.lock().len())
    }

    pub fn occupied_count(&self, planet_id: PlanetId) -> GameResult<usize> {
        Ok(self.table(planet_id)?.lock().occupied_count())
    }

    pub fn is_occupied(&self, planet_id: PlanetId, block: BlockId) -> GameResult<bool> {
        self.table(planet_id)?.lock().is_occupied(block)
    }

    pub fn has_planet(&self, planet_id: PlanetId) -> bool {
        self.tables.read().contains_key(&planet_id)
    }

    fn table(&self, planet_id: PlanetId) -> GameResult<Arc<Mutex<OccupancyTable>>> {
        self.tables
            .read()
            .get(&planet_id)
            .cloned()
            .ok_or(GameError::UnknownPlanet(planet_id))
    }
}

impl Default for SpatialStore {
    fn default() -> Self {
        Self::new(SphereBlockGenerator::default())
    }
}
