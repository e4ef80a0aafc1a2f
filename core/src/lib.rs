//! Shared primitives for the planet mining engine.
//!
//! Everything the spatial and mining crates agree on lives here: the
//! fixed-size [`Hash`] and [`Address`] wrappers, identifiers, roles, the
//! basis-point constants and the [`GameError`] taxonomy.

pub mod address;
pub mod constants;
pub mod errors;
pub mod hash;
pub mod types;

pub use address::{Address, ADDRESS_SIZE};
pub use errors::{GameError, GameResult};
pub use hash::{keccak256, Hash, KeccakWriter, HASH_SIZE};
pub use types::{BlockId, PlanetId, Role};
