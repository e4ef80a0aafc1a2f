//! Engine seeding and action execution
//!
//! A [`Service`] owns one engine seeded from a [`Config`]. Actions are
//! executed one by one and turned into JSON results; a replay keeps going
//! past failed actions and reports each of them.

use crate::config::Config;
use crate::error::{RockerdError, RockerdResult};
use mining::{
    EventSink, FuelLedger, InMemoryFuelLedger, JsonLinesSink, MiningAttempt, MiningEngine, RoleTable, TracingSink,
};
use rocker_core::{Address, BlockId, PlanetId, Role};
use rocker_spatial::{SpatialStore, SphereBlockGenerator};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// One step of a replay script
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    RegisterPlanet {
        #[serde(default)]
        caller: Option<Address>,
        planet_id: PlanetId,
        total_blocks: u64,
        yield_rate_bps: u32,
    },
    RegisterSpherePlanet {
        #[serde(default)]
        caller: Option<Address>,
        planet_id: PlanetId,
        radius: i64,
        yield_rate_bps: u32,
    },
    SetWhitelist {
        #[serde(default)]
        caller: Option<Address>,
        miner: Address,
        planet_id: PlanetId,
        allowed: bool,
    },
    GenerateSphere {
        #[serde(default)]
        caller: Option<Address>,
        planet_id: PlanetId,
        radius: i64,
    },
    FindLocation {
        #[serde(default)]
        caller: Option<Address>,
        planet_id: PlanetId,
        candidates: Vec<BlockId>,
        count: usize,
    },
    CreditFuel {
        account: Address,
        amount: u64,
    },
    Mine {
        #[serde(default)]
        caller: Option<Address>,
        attempt: MiningAttempt,
    },
    MinerState {
        miner: Address,
        planet_id: PlanetId,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::RegisterPlanet { .. } => "register_planet",
            Action::RegisterSpherePlanet { .. } => "register_sphere_planet",
            Action::SetWhitelist { .. } => "set_whitelist",
            Action::GenerateSphere { .. } => "generate_sphere",
            Action::FindLocation { .. } => "find_location",
            Action::CreditFuel { .. } => "credit_fuel",
            Action::Mine { .. } => "mine",
            Action::MinerState { .. } => "miner_state",
        }
    }
}

/// Result line of a replayed action
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionReport {
    pub index: usize,
    pub action: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

/// Engine plus the in-memory collaborators it was seeded with
pub struct Service {
    engine: MiningEngine,
    fuel: Arc<InMemoryFuelLedger>,
    operator: Address,
}

impl Service {
    /// Builds a service whose events go to the configured JSON-lines file,
    /// or to the tracing log when none is set.
    pub fn from_config(config: &Config) -> RockerdResult<Self> {
        let sink: Arc<dyn EventSink> = match &config.events.path {
            Some(path) => Arc::new(
                JsonLinesSink::open(path)
                    .map_err(|source| RockerdError::Io { path: path.clone(), source })?,
            ),
            None => Arc::new(TracingSink),
        };
        Self::with_sink(config, sink)
    }

    pub fn with_sink(config: &Config, sink: Arc<dyn EventSink>) -> RockerdResult<Self> {
        config.validate()?;

        let operator = config.roles.operator.unwrap_or_else(|| Address::derive(b"rockerd-operator"));
        let roles = Arc::new(RoleTable::new());
        roles.grant(operator, Role::Admin);
        roles.grant(operator, Role::Script);
        for admin in &config.roles.admins {
            roles.grant(*admin, Role::Admin);
        }
        for script in &config.roles.scripts {
            roles.grant(*script, Role::Script);
        }

        let fuel = Arc::new(InMemoryFuelLedger::new());
        let spatial = SpatialStore::new(SphereBlockGenerator::new(config.spatial.max_radius));
        let engine = MiningEngine::new(config.engine.clone(), spatial, fuel.clone(), roles, sink)?;

        let service = Self { engine, fuel, operator };
        service.seed(config)?;
        Ok(service)
    }

    fn seed(&self, config: &Config) -> RockerdResult<()> {
        let op = &self.operator;
        for planet in &config.planets {
            match (planet.total_blocks, planet.sphere_radius) {
                (None, Some(radius)) => {
                    self.engine.register_sphere_planet(op, planet.id, radius, planet.yield_rate_bps)?;
                }
                (Some(total), Some(radius)) => {
                    self.engine.generate_sphere(op, planet.id, radius)?;
                    self.engine.register_planet(op, planet.id, total, planet.yield_rate_bps)?;
                }
                (Some(total), None) => {
                    self.engine.register_planet(op, planet.id, total, planet.yield_rate_bps)?;
                }
                (None, None) => {
                    return Err(RockerdError::Config(format!(
                        "planet {} needs total_blocks or sphere_radius",
                        planet.id
                    )));
                }
            }
        }
        for entry in &config.whitelist {
            self.engine.set_whitelist(op, entry.address, entry.planet_id, entry.allowed)?;
        }
        for entry in &config.fuel {
            self.fuel.credit(entry.address, entry.balance as u128);
        }

        tracing::info!(
            planets = config.planets.len(),
            whitelist = config.whitelist.len(),
            fuel_accounts = config.fuel.len(),
            operator = %self.operator,
            "engine seeded from config"
        );
        Ok(())
    }

    pub fn engine(&self) -> &MiningEngine {
        &self.engine
    }

    pub fn fuel(&self) -> &InMemoryFuelLedger {
        &self.fuel
    }

    pub fn operator(&self) -> Address {
        self.operator
    }

    /// Executes a single action and returns its JSON result
    pub fn execute(&self, action: &Action) -> RockerdResult<Value> {
        let caller = |c: &Option<Address>| c.unwrap_or(self.operator);
        let value = match action {
            Action::RegisterPlanet { caller: c, planet_id, total_blocks, yield_rate_bps } => {
                let planet =
                    self.engine.register_planet(&caller(c), *planet_id, *total_blocks, *yield_rate_bps)?;
                json!({ "planet": planet, "capacity": planet.capacity() })
            }
            Action::RegisterSpherePlanet { caller: c, planet_id, radius, yield_rate_bps } => {
                let planet =
                    self.engine.register_sphere_planet(&caller(c), *planet_id, *radius, *yield_rate_bps)?;
                json!({ "planet": planet, "capacity": planet.capacity() })
            }
            Action::SetWhitelist { caller: c, miner, planet_id, allowed } => {
                let changed = self.engine.set_whitelist(&caller(c), *miner, *planet_id, *allowed)?;
                json!({ "changed": changed })
            }
            Action::GenerateSphere { caller: c, planet_id, radius } => {
                let blocks = self.engine.generate_sphere(&caller(c), *planet_id, *radius)?;
                json!({ "blocks": blocks })
            }
            Action::FindLocation { caller: c, planet_id, candidates, count } => {
                let selected = self.engine.find_location(&caller(c), *planet_id, candidates, *count)?;
                json!({ "selected": selected })
            }
            Action::CreditFuel { account, amount } => {
                self.fuel.credit(*account, *amount as u128);
                json!({ "balance": self.fuel.balance_of(account).to_string() })
            }
            Action::Mine { caller: c, attempt } => {
                let outcome = self.engine.mine(&caller(c), attempt)?;
                serde_json::to_value(outcome)?
            }
            Action::MinerState { miner, planet_id } => {
                serde_json::to_value(self.engine.miner_state(miner, *planet_id)?)?
            }
        };
        Ok(value)
    }

    /// Executes every action in order; failures are reported, not fatal
    pub fn replay(&self, actions: &[Action]) -> Vec<ActionReport> {
        actions
            .iter()
            .enumerate()
            .map(|(index, action)| match self.execute(action) {
                Ok(result) => ActionReport {
                    index,
                    action: action.name().to_string(),
                    ok: true,
                    result: Some(result),
                    error: None,
                    error_kind: None,
                },
                Err(e) => {
                    tracing::warn!(index, action = action.name(), "action failed: {}", e);
                    ActionReport {
                        index,
                        action: action.name().to_string(),
                        ok: false,
                        result: None,
                        error: Some(e.to_string()),
                        error_kind: Some(e.kind().to_string()),
                    }
                }
            })
            .collect()
    }
}
