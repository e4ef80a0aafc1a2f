//! Per-(address, planet) mining eligibility

use rocker_core::{Address, PlanetId};
use std::collections::HashSet;

/// Stores the allowed pairs only; every other pair reads as `false`.
#[derive(Debug, Default)]
pub struct WhitelistGate {
    allowed: HashSet<(Address, PlanetId)>,
}

impl WhitelistGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag and returns whether the stored value changed.
    pub fn set_whitelist(&mut self, miner: Address, planet_id: PlanetId, allowed: bool) -> bool {
        if allowed {
            self.allowed.insert((miner, planet_id))
        } else {
            self.allowed.remove(&(miner, planet_id))
        }
    }

    pub fn is_whitelisted(&self, miner: &Address, planet_id: PlanetId) -> bool {
        self.allowed.contains(&(*miner, planet_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_not_whitelisted() {
        let gate = WhitelistGate::new();
        assert!(!gate.is_whitelisted(&Address::derive(b"a"), 0));
    }

    #[test]
    fn test_set_is_idempotent() {
        let mut gate = WhitelistGate::new();
        let a = Address::derive(b"a");
        assert!(gate.set_whitelist(a, 0, true));
        assert!(!gate.set_whitelist(a, 0, true));
        assert!(gate.is_whitelisted(&a, 0));
        assert!(!gate.is_whitelisted(&a, 1));

        assert!(gate.set_whitelist(a, 0, false));
        assert!(!gate.set_whitelist(a, 0, false));
        assert!(!gate.is_whitelisted(&a, 0));
    }
}
