//! Occupancy tracking and location resolution
//!
//! An [`OccupancyTable`] owns the blocks of one planet. The
//! [`LocationResolver`] picks free blocks out of a caller-supplied candidate
//! list and commits the whole selection or nothing.

use crate::sphere::{SpatialBlock, SphereBlockGenerator};
use rocker_core::{BlockId, GameError, GameResult, PlanetId};
use std::collections::HashSet;

/// Blocks of a single planet, indexed by block id
#[derive(Clone, Debug)]
pub struct OccupancyTable {
    planet_id: PlanetId,
    radius: i64,
    blocks: Vec<SpatialBlock>,
    occupied: usize,
}

impl OccupancyTable {
    /// Builds an all-free table for a planet shaped as a sphere of `radius`.
    pub fn from_sphere(
        generator: &SphereBlockGenerator,
        planet_id: PlanetId,
        radius: i64,
    ) -> GameResult<Self> {
        let blocks = generator.generate(radius)?;
        Ok(Self { planet_id, radius, blocks, occupied: 0 })
    }

    pub fn planet_id(&self) -> PlanetId {
        self.planet_id
    }

    pub fn radius(&self) -> i64 {
        self.radius
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    pub fn get(&self, id: BlockId) -> Option<&SpatialBlock> {
        usize::try_from(id).ok().and_then(|idx| self.blocks.get(idx))
    }

    pub fn is_occupied(&self, id: BlockId) -> GameResult<bool> {
        self.get(id).map(|b| b.occupied).ok_or(GameError::UnknownBlock(id))
    }

    fn mark_occupied(&mut self, ids: &[BlockId]) {
        for &id in ids {
            // ids were validated while staging
            if let Some(block) = usize::try_from(id).ok().and_then(|idx| self.blocks.get_mut(idx)) {
                if !block.occupied {
                    block.occupied = true;
                    self.occupied += 1;
                }
            }
        }
    }
}

/// Selects free blocks for placement
pub struct LocationResolver;

impl LocationResolver {
    /// Returns the first `count` candidates that are unoccupied, in candidate
    /// order, and marks them occupied.
    ///
    /// Fails with [`GameError::InsufficientCapacity`] when the candidates hold
    /// fewer than `count` free blocks; no flag changes in that case, so a retry
    /// with the same candidates sees the same table. A candidate repeated in
    /// the list is selected at most once.
    pub fn find_location(
        table: &mut OccupancyTable,
        candidates: &[BlockId],
        count: usize,
    ) -> GameResult<Vec<BlockId>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut selected = Vec::with_capacity(count);
        let mut seen = HashSet::with_capacity(count);

        for &id in candidates {
            if selected.len() == count {
                break;
            }
            if !table.is_occupied(id)? && seen.insert(id) {
                selected.push(id);
            }
        }

        if selected.len() < count {
            tracing::warn!(
                planet_id = table.planet_id,
                requested = count,
                available = selected.len(),
                "location request exceeds free candidates"
            );
            return Err(GameError::InsufficientCapacity {
                requested: count,
                available: selected.len(),
            });
        }

        table.mark_occupied(&selected);
        tracing::debug!(planet_id = table.planet_id, reserved = selected.len(), "locations reserved");
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(radius: i64) -> OccupancyTable {
        OccupancyTable::from_sphere(&SphereBlockGenerator::default(), 7, radius).unwrap()
    }

    fn flags(t: &OccupancyTable) -> Vec<bool> {
        (0..t.len() as u64).map(|id| t.is_occupied(id).unwrap()).collect()
    }

    #[test]
    fn test_exact_capacity_succeeds_and_marks_all() {
        let mut t = table(2);
        let candidates: Vec<BlockId> = (0..10).collect();
        let picked = LocationResolver::find_location(&mut t, &candidates, 10).unwrap();
        assert_eq!(picked, candidates);
        assert_eq!(t.occupied_count(), 10);
        assert!(candidates.iter().all(|&id| t.is_occupied(id).unwrap()));
    }

    #[test]
    fn test_one_short_fails_without_side_effects() {
        let mut t = table(2);
        LocationResolver::find_location(&mut t, &[3], 1).unwrap();
        let before = flags(&t);

        // ten candidates, one already taken: nine free for a request of ten
        let candidates: Vec<BlockId> = (0..10).collect();
        let err = LocationResolver::find_location(&mut t, &candidates, 10).unwrap_err();
        assert_eq!(err, GameError::InsufficientCapacity { requested: 10, available: 9 });
        assert_eq!(flags(&t), before);

        // the retry sees the same table
        let err = LocationResolver::find_location(&mut t, &candidates, 10).unwrap_err();
        assert_eq!(err, GameError::InsufficientCapacity { requested: 10, available: 9 });
        assert_eq!(t.occupied_count(), 1);
    }

    #[test]
    fn test_skips_occupied_and_keeps_candidate_order() {
        let mut t = table(2);
        LocationResolver::find_location(&mut t, &[5, 1], 2).unwrap();
        let picked = LocationResolver::find_location(&mut t, &[5, 9, 1, 4, 2], 2).unwrap();
        assert_eq!(picked, vec![9, 4]);
        assert!(!t.is_occupied(2).unwrap());
    }

    #[test]
    fn test_duplicate_candidates_selected_once() {
        let mut t = table(1);
        let err = LocationResolver::find_location(&mut t, &[2, 2, 2], 2).unwrap_err();
        assert_eq!(err, GameError::InsufficientCapacity { requested: 2, available: 1 });
        assert_eq!(LocationResolver::find_location(&mut t, &[2, 2, 3], 2).unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_unknown_candidate_rejected() {
        let mut t = table(1);
        let err = LocationResolver::find_location(&mut t, &[0, 99], 2).unwrap_err();
        assert_eq!(err, GameError::UnknownBlock(99));
        assert_eq!(t.occupied_count(), 0);
    }

    #[test]
    fn test_zero_request_is_empty() {
        let mut t = table(1);
        assert!(LocationResolver::find_location(&mut t, &[], 0).unwrap().is_empty());
    }

    #[test]
    fn test_candidate_list_shorter_than_request() {
        // request of 4000 against 3850 candidates
        let mut t = table(10);
        let candidates: Vec<BlockId> = (0..3850).collect();
        let err = LocationResolver::find_location(&mut t, &candidates, 4000).unwrap_err();
        assert_eq!(err, GameError::InsufficientCapacity { requested: 4000, available: 3850 });
        assert_eq!(t.occupied_count(), 0);
    }
}
