use crate::error::{RockerdError, RockerdResult};
use mining::EngineConfig;
use rocker_core::constants::{DEFAULT_MAX_SPHERE_RADIUS, SPHERE_RADIUS_LIMIT};
use rocker_core::{Address, PlanetId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub spatial: SpatialConfig,
    pub roles: RolesConfig,
    pub events: EventsConfig,
    pub planets: Vec<PlanetConfig>,
    pub whitelist: Vec<WhitelistConfig>,
    pub fuel: Vec<FuelConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    pub max_radius: i64,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self { max_radius: DEFAULT_MAX_SPHERE_RADIUS }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolesConfig {
    /// Identity the daemon acts as; holds both roles
    pub operator: Option<Address>,
    pub admins: Vec<Address>,
    pub scripts: Vec<Address>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetConfig {
    pub id: PlanetId,
    pub total_blocks: Option<u64>,
    pub yield_rate_bps: u32,
    /// Shape the planet as a sphere of this radius
    pub sphere_radius: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhitelistConfig {
    pub address: Address,
    pub planet_id: PlanetId,
    #[serde(default = "default_allowed")]
    pub allowed: bool,
}

fn default_allowed() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelConfig {
    pub address: Address,
    pub balance: u64,
}

impl Config {
    /// Load configuration from file if it exists, otherwise use defaults
    pub fn load(path: &Path) -> RockerdResult<Self> {
        if !path.exists() {
            tracing::warn!("config file {} not found, using defaults", path.display());
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|source| RockerdError::Io { path: path.to_path_buf(), source })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks what the engine cannot check by itself
    pub fn validate(&self) -> RockerdResult<()> {
        self.engine.validate()?;
        if !(0..=SPHERE_RADIUS_LIMIT).contains(&self.spatial.max_radius) {
            return Err(RockerdError::Config(format!(
                "spatial.max_radius must be within 0..={}, got {}",
                SPHERE_RADIUS_LIMIT, self.spatial.max_radius
            )));
        }
        for planet in &self.planets {
            if planet.total_blocks.is_none() && planet.sphere_radius.is_none() {
                return Err(RockerdError::Config(format!(
                    "planet {} needs total_blocks or sphere_radius",
                    planet.id
                )));
            }
        }
        Ok(())
    }

    /// Override config with CLI arguments
    pub fn apply_cli_overrides(&mut self, args: &crate::cli::Args) {
        if let Some(max_radius) = args.max_radius {
            self.spatial.max_radius = max_radius;
        }

        if let Some(fuel_price) = args.fuel_price {
            self.engine.fuel_price = fuel_price;
        }

        if let Some(path) = &args.events_path {
            self.events.path = Some(path.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[engine]
fuel_price = 2
mission_curves = [{ kind = 3, success_bps = 2500 }]

[spatial]
max_radius = 40

[roles]
scripts = ["0x00000000000000000000000000000000000000aa"]

[[planets]]
id = 0
total_blocks = 113097
yield_rate_bps = 565

[[planets]]
id = 1
yield_rate_bps = 1131
sphere_radius = 10

[[whitelist]]
address = "0x00000000000000000000000000000000000000bb"
planet_id = 0

[[fuel]]
address = "0x00000000000000000000000000000000000000bb"
balance = 5000
"#;

    #[test]
    fn test_parse_sample() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        config.validate().unwrap();
        assert_eq!(config.engine.fuel_price, 2);
        assert_eq!(config.engine.max_time_spent_secs, 86_400);
        assert_eq!(config.engine.mission_curves[0].success_bps, 2_500);
        assert_eq!(config.spatial.max_radius, 40);
        assert_eq!(config.planets.len(), 2);
        assert_eq!(config.planets[1].sphere_radius, Some(10));
        assert!(config.whitelist[0].allowed);
        assert_eq!(config.fuel[0].balance, 5_000);
        assert!(config.roles.operator.is_none());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("rockerd.toml");
        fs::write(&path, SAMPLE).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.planets[0].total_blocks, Some(113_097));
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let shapeless = "[[planets]]\nid = 4\nyield_rate_bps = 10\n";
        let config: Config = toml::from_str(shapeless).unwrap();
        assert!(matches!(config.validate(), Err(RockerdError::Config(_))));

        let bad_curve = "[engine]\nmission_curves = [{ kind = 1, success_bps = 20000 }]\n";
        let config: Config = toml::from_str(bad_curve).unwrap();
        assert!(matches!(config.validate(), Err(RockerdError::Game(_))));

        assert!(toml::from_str::<Config>("[roles]\nadmins = [\"0x12\"]\n").is_err());

        let huge = "[spatial]\nmax_radius = 4000000000\n";
        let config: Config = toml::from_str(huge).unwrap();
        assert!(matches!(config.validate(), Err(RockerdError::Config(_))));
    }

    #[test]
    fn test_cli_overrides_are_validated() {
        use clap::Parser;

        let mut config = Config::default();
        let args = crate::cli::Args::parse_from(["rockerd", "--max-radius", "9999999999", "sphere", "--radius", "3"]);
        config.apply_cli_overrides(&args);
        assert!(matches!(config.validate(), Err(RockerdError::Config(_))));

        let args = crate::cli::Args::parse_from(["rockerd", "--max-radius", "40", "--fuel-price", "0", "sphere", "--radius", "3"]);
        let mut config = Config::default();
        config.apply_cli_overrides(&args);
        assert_eq!(config.spatial.max_radius, 40);
        assert!(matches!(config.validate(), Err(RockerdError::Game(_))));
    }
}
