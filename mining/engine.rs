//! Mining engine that coordinates eligibility, fuel and the ledger
//!
//! All mining state (registry, whitelist, ledger) sits behind one lock and
//! every mutation holds the write guard for its whole duration. Attempts are
//! therefore applied one at a time in a total order, and each attempt reads a
//! whitelist and registry that cannot change under it. Spatial operations go
//! through the [`SpatialStore`], which locks per planet and never touches the
//! mining lock.

use crate::attempt::MiningAttempt;
use crate::authority::Authority;
use crate::events::{EventSink, GameEvent, MiningRecord};
use crate::fuel::{FuelError, FuelLedger};
use crate::ledger::{MinerState, MiningLedger};
use crate::outcome::{Outcome, OutcomeDeriver};
use crate::registry::{Planet, PlanetRegistry, PlanetUsage};
use crate::whitelist::WhitelistGate;
use parking_lot::RwLock;
use rocker_core::constants::{BPS_DENOMINATOR, DEFAULT_MAX_TIME_SPENT_SECS};
use rocker_core::{Address, BlockId, GameError, GameResult, PlanetId, Role};
use rocker_spatial::SpatialStore;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Success odds for one mission kind, overriding the planet yield rate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionCurve {
    pub kind: u32,
    pub success_bps: u32,
}

/// Configuration for the mining engine
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ledger units charged per fuel unit
    pub fuel_price: u64,
    /// Longest accepted `time_spent_secs`
    pub max_time_spent_secs: u64,
    pub mission_curves: Vec<MissionCurve>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fuel_price: 1,
            max_time_spent_secs: DEFAULT_MAX_TIME_SPENT_SECS,
            mission_curves: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> GameResult<()> {
        if self.fuel_price == 0 {
            return Err(GameError::InvalidInput("fuel price must be positive".into()));
        }
        if self.max_time_spent_secs == 0 {
            return Err(GameError::InvalidInput("max time spent must be positive".into()));
        }
        let mut kinds = HashSet::new();
        for curve in &self.mission_curves {
            if curve.success_bps > BPS_DENOMINATOR {
                return Err(GameError::InvalidYield(curve.success_bps));
            }
            if !kinds.insert(curve.kind) {
                return Err(GameError::InvalidInput(format!(
                    "mission kind {} configured twice",
                    curve.kind
                )));
            }
        }
        Ok(())
    }
}

/// Result of a committed mining attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningOutcome {
    pub granted_blocks: u64,
    pub won: bool,
    pub roll: u32,
    pub odds_bps: u32,
    pub fuel_charged: u128,
    /// Ledger entry after the attempt
    pub state: MinerState,
}

/// Counters over the engine's lifetime
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    pub attempts: u64,
    pub wins: u64,
    pub losses: u64,
    pub rejected: u64,
    pub blocks_granted: u64,
    pub fuel_burned: u128,
}

impl EngineStats {
    /// Formats engine stats as a readable string
    pub fn format_summary(&self) -> String {
        format!(
            "Mining Engine Stats:\n  Attempts: {}\n  Wins: {}\n  Losses: {}\n  Rejected: {}\n  \
             Blocks Granted: {}\n  Fuel Burned: {}",
            self.attempts, self.wins, self.losses, self.rejected, self.blocks_granted, self.fuel_burned
        )
    }
}

#[derive(Default)]
struct EngineState {
    registry: PlanetRegistry,
    whitelist: WhitelistGate,
    ledger: MiningLedger,
    stats: EngineStats,
}

/// Single-writer authority over planets, whitelists and miner ledgers
pub struct MiningEngine {
    state: RwLock<EngineState>,
    mission_odds: HashMap<u32, u32>,
    config: EngineConfig,
    spatial: SpatialStore,
    fuel: Arc<dyn FuelLedger>,
    authority: Arc<dyn Authority>,
    events: Arc<dyn EventSink>,
}

impl MiningEngine {
    /// Creates a new engine
    pub fn new(
        config: EngineConfig,
        spatial: SpatialStore,
        fuel: Arc<dyn FuelLedger>,
        authority: Arc<dyn Authority>,
        events: Arc<dyn EventSink>,
    ) -> GameResult<Self> {
        config.validate()?;
        let mission_odds = config.mission_curves.iter().map(|c| (c.kind, c.success_bps)).collect();
        tracing::info!(
            fuel_price = config.fuel_price,
            mission_curves = config.mission_curves.len(),
            max_radius = spatial.generator().max_radius(),
            "mining engine created"
        );
        Ok(Self {
            state: RwLock::new(EngineState::default()),
            mission_odds,
            config,
            spatial,
            fuel,
            authority,
            events,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn spatial(&self) -> &SpatialStore {
        &self.spatial
    }

    // ==================== Administration ====================

    /// Registers a planet. Requires the script or admin role.
    pub fn register_planet(
        &self,
        caller: &Address,
        planet_id: PlanetId,
        total_blocks: u64,
        yield_rate_bps: u32,
    ) -> GameResult<Planet> {
        self.require_any(caller, &[Role::Script, Role::Admin])?;
        let planet = self.state.write().registry.register(planet_id, total_blocks, yield_rate_bps)?;
        self.emit_registered(&planet);
        Ok(planet)
    }

    /// Shapes a planet as a sphere and registers it with the sphere's block
    /// count as its total. Nothing is registered or shaped if either step
    /// would fail; a shape whose registration loses a race is discarded.
    /// Shaping is an admin operation, so this requires the admin role.
    pub fn register_sphere_planet(
        &self,
        caller: &Address,
        planet_id: PlanetId,
        radius: i64,
        yield_rate_bps: u32,
    ) -> GameResult<Planet> {
        self.require_any(caller, &[Role::Admin])?;

        let total_blocks = self.spatial.generator().count(radius)?;
        self.state.read().registry.check_registrable(planet_id, yield_rate_bps)?;

        // generation runs outside the mining lock; registration re-checks under it
        let blocks = self.spatial.generate_planet(planet_id, radius)?;
        let registered = self.state.write().registry.register(planet_id, total_blocks, yield_rate_bps);
        let planet = match registered {
            Ok(planet) => planet,
            Err(e) => {
                self.spatial.discard_planet(planet_id);
                return Err(e);
            }
        };

        self.events.emit(&GameEvent::PlanetShaped { planet_id, radius, blocks });
        self.emit_registered(&planet);
        Ok(planet)
    }

    /// Sets a whitelist flag. Revoking a miner that already has a ledger
    /// entry disables that entry for good.
    pub fn set_whitelist(
        &self,
        caller: &Address,
        miner: Address,
        planet_id: PlanetId,
        allowed: bool,
    ) -> GameResult<bool> {
        self.require_any(caller, &[Role::Script, Role::Admin])?;

        let mut state = self.state.write();
        if !state.registry.contains(planet_id) {
            return Err(GameError::UnknownPlanet(planet_id));
        }
        let changed = state.whitelist.set_whitelist(miner, planet_id, allowed);
        let revoked = !allowed && state.ledger.revoke(&miner, planet_id);
        if revoked {
            state.registry.usage_mut(planet_id)?.disabled_miners += 1;
        }
        drop(state);

        tracing::debug!(%miner, planet_id, allowed, changed, "whitelist updated");
        self.events.emit(&GameEvent::WhitelistUpdated { miner, planet_id, allowed, changed });
        if revoked {
            self.events.emit(&GameEvent::MiningRevoked { miner, planet_id });
        }
        Ok(changed)
    }

    /// Generates the block table of a planet's sphere. Requires the admin role.
    pub fn generate_sphere(&self, caller: &Address, planet_id: PlanetId, radius: i64) -> GameResult<usize> {
        self.require_any(caller, &[Role::Admin])?;
        let blocks = self.spatial.generate_planet(planet_id, radius)?;
        self.events.emit(&GameEvent::PlanetShaped { planet_id, radius, blocks });
        Ok(blocks)
    }

    /// Reserves `count` free blocks among `candidates`. Requires the admin role.
    pub fn find_location(
        &self,
        caller: &Address,
        planet_id: PlanetId,
        candidates: &[BlockId],
        count: usize,
    ) -> GameResult<Vec<BlockId>> {
        self.require_any(caller, &[Role::Admin])?;
        let blocks = self.spatial.find_location(planet_id, candidates, count)?;
        self.events.emit(&GameEvent::LocationsReserved { planet_id, blocks: blocks.clone() });
        Ok(blocks)
    }

    // ==================== Mining ====================

    /// Runs one mining attempt as a single transaction.
    ///
    /// Checks run in order: caller role, planet, whitelist, ledger
    /// eligibility, argument validation. The outcome is derived from the
    /// commit hash, the ledger delta is staged, fuel is debited, and only then
    /// is the staged state committed. Any failure leaves ledger and fuel
    /// untouched.
    pub fn mine(&self, caller: &Address, attempt: &MiningAttempt) -> GameResult<MiningOutcome> {
        self.require_any(caller, &[Role::Script])?;

        let mut state = self.state.write();
        let result = self.mine_locked(&mut state, attempt);
        match &result {
            Ok(outcome) => {
                state.stats.attempts += 1;
                if outcome.won {
                    state.stats.wins += 1;
                } else {
                    state.stats.losses += 1;
                }
                state.stats.blocks_granted = state.stats.blocks_granted.saturating_add(outcome.granted_blocks);
                state.stats.fuel_burned = state.stats.fuel_burned.saturating_add(outcome.fuel_charged);
            }
            Err(e) => {
                state.stats.rejected += 1;
                tracing::warn!(
                    miner = %attempt.miner,
                    planet_id = attempt.planet_id,
                    kind = e.kind(),
                    "mining attempt rejected: {}",
                    e
                );
            }
        }
        drop(state);

        if let Ok(outcome) = &result {
            self.events.emit(&GameEvent::BlocksMined(MiningRecord {
                miner: attempt.miner,
                planet_id: attempt.planet_id,
                granted_blocks: outcome.granted_blocks,
                claimed_blocks: attempt.claimed_blocks,
                fuel_used: attempt.fuel_used,
                time_spent_secs: attempt.time_spent_secs,
                mission_kind: attempt.mission_kind,
                won: outcome.won,
                roll: outcome.roll,
            }));
        }
        result
    }

    fn mine_locked(&self, state: &mut EngineState, attempt: &MiningAttempt) -> GameResult<MiningOutcome> {
        let miner = attempt.miner;
        let planet = state.registry.get(attempt.planet_id)?;
        let capacity = planet.capacity();

        if !state.whitelist.is_whitelisted(&miner, planet.id) {
            return Err(GameError::NotWhitelisted { miner, planet_id: planet.id });
        }

        let current = state.ledger.get(&miner, planet.id, capacity);
        if !current.can_mine {
            return Err(GameError::MiningDisabled { miner, planet_id: planet.id });
        }

        attempt.validate(self.config.max_time_spent_secs)?;

        let odds_bps = self.odds_for(&planet, attempt.mission_kind);
        let Outcome { roll, won, granted_blocks, .. } =
            OutcomeDeriver::derive(attempt, odds_bps, current.un_mined_blocks);

        let staged = state
            .ledger
            .stage(&miner, planet.id, capacity, granted_blocks)
            .map_err(|e| {
                tracing::error!(
                    %miner,
                    planet_id = planet.id,
                    granted_blocks,
                    un_mined = current.un_mined_blocks,
                    "outcome exceeded remaining capacity: {}",
                    e
                );
                e
            })?;

        let fuel_charged = attempt.fuel_cost(self.config.fuel_price);
        let available = self.fuel.balance_of(&miner);
        if available < fuel_charged {
            return Err(GameError::InsufficientFuel { required: fuel_charged, available });
        }
        self.fuel.debit(&miner, fuel_charged).map_err(|e| match e {
            FuelError::Insufficient { required, available } => {
                GameError::InsufficientFuel { required, available }
            }
        })?;

        let first_entry = state.ledger.commit(staged).is_none();
        // planet existence was checked above; the usage entry shares its key
        if let Ok(usage) = state.registry.usage_mut(planet.id) {
            usage.mined_blocks = usage.mined_blocks.saturating_add(granted_blocks);
            if first_entry {
                usage.miners += 1;
            }
            if current.can_mine && !staged.can_mine {
                usage.disabled_miners += 1;
            }
        }

        tracing::debug!(
            %miner,
            planet_id = planet.id,
            roll,
            odds_bps,
            won,
            granted_blocks,
            un_mined = staged.un_mined_blocks,
            "mining attempt committed"
        );

        Ok(MiningOutcome { granted_blocks, won, roll, odds_bps, fuel_charged, state: staged })
    }

    fn odds_for(&self, planet: &Planet, mission_kind: u32) -> u32 {
        self.mission_odds.get(&mission_kind).copied().unwrap_or(planet.yield_rate_bps)
    }

    // ==================== Queries ====================

    pub fn planet(&self, planet_id: PlanetId) -> GameResult<Planet> {
        self.state.read().registry.get(planet_id)
    }

    pub fn capacity(&self, planet_id: PlanetId) -> GameResult<u64> {
        self.state.read().registry.capacity(planet_id)
    }

    pub fn planet_usage(&self, planet_id: PlanetId) -> GameResult<PlanetUsage> {
        self.state.read().registry.usage(planet_id)
    }

    pub fn planets(&self) -> Vec<Planet> {
        self.state.read().registry.planets().copied().collect()
    }

    pub fn is_whitelisted(&self, miner: &Address, planet_id: PlanetId) -> bool {
        self.state.read().whitelist.is_whitelisted(miner, planet_id)
    }

    /// Ledger state of a miner, synthesized if the miner never mined there.
    pub fn miner_state(&self, miner: &Address, planet_id: PlanetId) -> GameResult<MinerState> {
        let state = self.state.read();
        let capacity = state.registry.capacity(planet_id)?;
        Ok(state.ledger.get(miner, planet_id, capacity))
    }

    /// Every stored ledger entry, ordered by planet then address
    pub fn miner_states(&self) -> Vec<MinerState> {
        let state = self.state.read();
        let mut entries: Vec<MinerState> = state.ledger.entries().copied().collect();
        entries.sort_by_key(|s| (s.planet_id, s.address));
        entries
    }

    pub fn stats(&self) -> EngineStats {
        self.state.read().stats
    }

    // ==================== Helpers ====================

    fn require_any(&self, caller: &Address, roles: &[Role]) -> GameResult<()> {
        if roles.iter().any(|role| self.authority.is_authorized(caller, *role)) {
            return Ok(());
        }
        // report the first role in the list as the one that was missing
        let role = roles.first().copied().unwrap_or(Role::Admin);
        tracing::warn!(%caller, %role, "unauthorized call");
        Err(GameError::Unauthorized { caller: *caller, role })
    }

    fn emit_registered(&self, planet: &Planet) {
        tracing::info!(
            planet_id = planet.id,
            total_blocks = planet.total_blocks,
            yield_rate_bps = planet.yield_rate_bps,
            capacity = planet.capacity(),
            "planet registered"
        );
        self.events.emit(&GameEvent::PlanetRegistered {
            planet_id: planet.id,
            total_blocks: planet.total_blocks,
            yield_rate_bps: planet.yield_rate_bps,
            capacity: planet.capacity(),
        });
    }
}
