//! Access authority collaborator
//!
//! Role semantics belong to an external authority; the engine asks a yes/no
//! question before every privileged call.

use parking_lot::RwLock;
use rocker_core::{Address, Role};
use std::collections::HashSet;

pub trait Authority: Send + Sync {
    fn is_authorized(&self, caller: &Address, role: Role) -> bool;
}

/// Static grant table
#[derive(Debug, Default)]
pub struct RoleTable {
    grants: RwLock<HashSet<(Address, Role)>>,
}

impl RoleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, account: Address, role: Role) {
        self.grants.write().insert((account, role));
    }

    pub fn revoke(&self, account: &Address, role: Role) {
        self.grants.write().remove(&(*account, role));
    }
}

impl Authority for RoleTable {
    fn is_authorized(&self, caller: &Address, role: Role) -> bool {
        self.grants.read().contains(&(*caller, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_and_revoke() {
        let table = RoleTable::new();
        let script = Address::derive(b"script");
        assert!(!table.is_authorized(&script, Role::Script));
        table.grant(script, Role::Script);
        assert!(table.is_authorized(&script, Role::Script));
        assert!(!table.is_authorized(&script, Role::Admin));
        table.revoke(&script, Role::Script);
        assert!(!table.is_authorized(&script, Role::Script));
    }
}
