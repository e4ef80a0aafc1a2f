//! Spatial block universe of a planet
//!
//! - [`sphere`]: enumerates the integer lattice points inside a sphere
//! - [`location`]: per-planet occupancy table and the all-or-nothing location resolver
//! - [`store`]: concurrent registry of occupancy tables, one lock per planet

pub mod location;
pub mod sphere;
pub mod store;

pub use location::{LocationResolver, OccupancyTable};
pub use sphere::{Coordinate, SpatialBlock, SphereBlockGenerator};
pub use store::SpatialStore;
