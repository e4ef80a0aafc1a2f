use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a registered planet.
pub type PlanetId = u64;

/// Identifier of a spatial block: its rank in the sphere enumeration order.
pub type BlockId = u64;

/// Capabilities checked against the access authority before privileged calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Shapes the spatial universe: sphere generation and location resolution.
    Admin,
    /// Off-chain operator submitting mining attempts and planet/whitelist updates.
    Script,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Script => write!(f, "script"),
        }
    }
}
