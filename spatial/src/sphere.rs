//! Sphere block enumeration
//!
//! A planet's shape is the set of integer coordinates `(x, y, z)` with
//! `x² + y² + z² <= r²`. Blocks are produced in lexicographic `(x, y, z)`
//! order and each block's identifier is its rank in that order, so the same
//! radius always yields the same identifiers.

use rocker_core::constants::{DEFAULT_MAX_SPHERE_RADIUS, SPHERE_RADIUS_LIMIT};
use rocker_core::{BlockId, GameError, GameResult};
use serde::{Deserialize, Serialize};

/// Integer lattice coordinate of a block
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Coordinate {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    pub fn norm_squared(&self) -> i64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
}

/// A block of the spatial universe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialBlock {
    pub id: BlockId,
    pub coordinate: Coordinate,
    pub occupied: bool,
}

/// Stateless generator bounded by a maximum radius
#[derive(Clone, Copy, Debug)]
pub struct SphereBlockGenerator {
    max_radius: i64,
}

impl Default for SphereBlockGenerator {
    fn default() -> Self {
        Self { max_radius: DEFAULT_MAX_SPHERE_RADIUS }
    }
}

impl SphereBlockGenerator {
    /// Creates a generator accepting radii up to `max_radius`, clamped to
    /// `0..=SPHERE_RADIUS_LIMIT`.
    pub fn new(max_radius: i64) -> Self {
        let clamped = max_radius.clamp(0, SPHERE_RADIUS_LIMIT);
        if clamped != max_radius {
            tracing::warn!(requested = max_radius, max_radius = clamped, "sphere radius bound clamped");
        }
        Self { max_radius: clamped }
    }

    pub fn max_radius(&self) -> i64 {
        self.max_radius
    }

    /// Enumerates every block of the sphere, all unoccupied.
    ///
    /// Output size grows with `r³`, which is why `r` is bounded by
    /// `max_radius`.
    pub fn generate(&self, radius: i64) -> GameResult<Vec<SpatialBlock>> {
        self.check_radius(radius)?;
        let mut blocks = Vec::with_capacity(Self::count_unbounded(radius) as usize);
        let r2 = radius * radius;
        let mut next_id: BlockId = 0;

        for x in -radius..=radius {
            for y in -radius..=radius {
                let rest = r2 - x * x - y * y;
                if rest < 0 {
                    continue;
                }
                let z_max = isqrt(rest as u64) as i64;
                for z in -z_max..=z_max {
                    blocks.push(SpatialBlock {
                        id: next_id,
                        coordinate: Coordinate::new(x, y, z),
                        occupied: false,
                    });
                    next_id += 1;
                }
            }
        }

        tracing::debug!(radius, blocks = blocks.len(), "generated sphere blocks");
        Ok(blocks)
    }

    /// Number of blocks `generate(radius)` would produce, without allocating them.
    pub fn count(&self, radius: i64) -> GameResult<u64> {
        self.check_radius(radius)?;
        Ok(Self::count_unbounded(radius))
    }

    fn check_radius(&self, radius: i64) -> GameResult<()> {
        if radius < 0 {
            return Err(GameError::InvalidRadius(radius));
        }
        if radius > self.max_radius {
            return Err(GameError::RadiusTooLarge { radius, max: self.max_radius });
        }
        Ok(())
    }

    fn count_unbounded(radius: i64) -> u64 {
        let r2 = radius * radius;
        let mut total = 0u64;
        for x in -radius..=radius {
            for y in -radius..=radius {
                let rest = r2 - x * x - y * y;
                if rest >= 0 {
                    total += 2 * isqrt(rest as u64) + 1;
                }
            }
        }
        total
    }
}

/// Floor of the square root of `n`.
fn isqrt(n: u64) -> u64 {
    if n < 2 {
        return n;
    }
    // float estimate, then correct the off-by-one errors of large inputs
    let n = n as u128;
    let mut root = (n as f64).sqrt() as u128;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root as u64
}
