use crate::address::Address;
use crate::types::{BlockId, PlanetId, Role};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Miner {miner} is not whitelisted on planet {planet_id}")]
    NotWhitelisted { miner: Address, planet_id: PlanetId },

    #[error("Mining is disabled for {miner} on planet {planet_id}")]
    MiningDisabled { miner: Address, planet_id: PlanetId },

    #[error("Insufficient fuel: required {required}, available {available}")]
    InsufficientFuel { required: u128, available: u128 },

    #[error("Delta {requested} exceeds remaining capacity {remaining}")]
    ExceedsCapacity { requested: u64, remaining: u64 },

    #[error("Planet {0} is already registered")]
    DuplicatePlanet(PlanetId),

    #[error("Invalid yield rate {0} bps (max 10000)")]
    InvalidYield(u32),

    #[error("Invalid sphere radius {0}")]
    InvalidRadius(i64),

    #[error("Sphere radius {radius} exceeds the configured maximum {max}")]
    RadiusTooLarge { radius: i64, max: i64 },

    #[error("Insufficient capacity: requested {requested}, only {available} unoccupied")]
    InsufficientCapacity { requested: usize, available: usize },

    #[error("Unknown planet {0}")]
    UnknownPlanet(PlanetId),

    #[error("Unknown block {0}")]
    UnknownBlock(BlockId),

    #[error("Caller {caller} lacks the {role} role")]
    Unauthorized { caller: Address, role: Role },
}

impl GameError {
    /// Whether the same attempt may succeed later without an administrative
    /// change. Only a fuel shortfall clears by itself (the caller tops up).
    pub fn is_retryable(&self) -> bool {
        matches!(self, GameError::InsufficientFuel { .. })
    }

    /// Short stable name of the failure kind, used in logs and replay output.
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::InvalidInput(_) => "invalid_input",
            GameError::NotWhitelisted { .. } => "not_whitelisted",
            GameError::MiningDisabled { .. } => "mining_disabled",
            GameError::InsufficientFuel { .. } => "insufficient_fuel",
            GameError::ExceedsCapacity { .. } => "exceeds_capacity",
            GameError::DuplicatePlanet(_) => "duplicate_planet",
            GameError::InvalidYield(_) => "invalid_yield",
            GameError::InvalidRadius(_) => "invalid_radius",
            GameError::RadiusTooLarge { .. } => "radius_too_large",
            GameError::InsufficientCapacity { .. } => "insufficient_capacity",
            GameError::UnknownPlanet(_) => "unknown_planet",
            GameError::UnknownBlock(_) => "unknown_block",
            GameError::Unauthorized { .. } => "unauthorized",
        }
    }
}

pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_fuel_shortfall_is_retryable() {
        assert!(GameError::InsufficientFuel { required: 10, available: 1 }.is_retryable());
        assert!(!GameError::InvalidInput("x".into()).is_retryable());
        assert!(!GameError::MiningDisabled { miner: Address::default(), planet_id: 0 }.is_retryable());
    }

    #[test]
    fn messages_carry_context() {
        let err = GameError::InsufficientCapacity { requested: 4000, available: 3850 };
        assert_eq!(err.to_string(), "Insufficient capacity: requested 4000, only 3850 unoccupied");
        assert_eq!(err.kind(), "insufficient_capacity");
    }
}
