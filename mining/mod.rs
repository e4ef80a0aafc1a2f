//! Planet mining engine
//!
//! This crate implements the mining/allocation core: planet registration,
//! whitelist gating, per-miner ledgers, commit-hash outcome derivation and
//! the engine that ties them into one atomic mining transaction.
//!
//! ## Module Organization
//!
//! - [`registry`]: planet configuration, capacity and usage counters
//! - [`whitelist`]: per-(address, planet) eligibility
//! - [`ledger`]: per-(address, planet) mining state with staged commits
//! - [`attempt`]: the mining attempt request
//! - [`outcome`]: versioned derivation of the outcome from the commit hash
//! - [`engine`]: the single-writer engine coordinating everything above
//! - [`fuel`], [`authority`], [`events`]: external collaborator interfaces

pub mod attempt;
pub mod authority;
pub mod engine;
pub mod events;
pub mod fuel;
pub mod ledger;
pub mod outcome;
pub mod registry;
pub mod whitelist;


// Re-export main types for easier access
pub use attempt::{commit_words, MiningAttempt};
pub use authority::{Authority, RoleTable};
pub use engine::{EngineConfig, EngineStats, MiningEngine, MiningOutcome, MissionCurve};
pub use events::{EventSink, GameEvent, JsonLinesSink, MemorySink, MiningRecord, TracingSink};
pub use fuel::{FuelError, FuelLedger, InMemoryFuelLedger};
pub use ledger::{MinerState, MiningLedger};
pub use outcome::{Outcome, OutcomeDeriver};
pub use registry::{capacity_of, Planet, PlanetRegistry, PlanetUsage};
pub use whitelist::WhitelistGate;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::attempt::{commit_words, MiningAttempt};
    pub use crate::authority::{Authority, RoleTable};
    pub use crate::engine::{EngineConfig, EngineStats, MiningEngine, MiningOutcome, MissionCurve};
    pub use crate::events::{EventSink, GameEvent, MemorySink, TracingSink};
    pub use crate::fuel::{FuelLedger, InMemoryFuelLedger};
    pub use crate::ledger::MinerState;
    pub use crate::registry::{Planet, PlanetUsage};
    pub use rocker_core::{Address, GameError, GameResult, Hash, PlanetId, Role};
}
