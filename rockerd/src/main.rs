use mining::MiningAttempt;
use rocker_spatial::SphereBlockGenerator;
use rockerd::cli::{self, Args, Command};
use rockerd::{Action, Config, RockerdError, RockerdResult, Service};
use std::fs;
use std::process;
use tracing::{error, info};

fn main() {
    // Parse command line arguments
    let args = cli::parse_args();

    // Initialize logging
    init_logging(&args);

    // Load configuration (use defaults unless config file is provided)
    let mut config = match &args.config_path {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!(kind = e.kind(), "Failed to load config: {}", e);
                process::exit(1);
            }
        },
        None => Config::default(),
    };

    // Apply CLI overrides, then check the merged result
    config.apply_cli_overrides(&args);
    if let Err(e) = config.validate() {
        error!(kind = e.kind(), "Invalid configuration: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(&args, &config) {
        error!(kind = e.kind(), "rockerd failed: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args, config: &Config) -> RockerdResult<()> {
    match &args.command {
        Command::Sphere { radius, list } => {
            let generator = SphereBlockGenerator::new(config.spatial.max_radius);
            if *list {
                for block in generator.generate(*radius)? {
                    println!("{}", serde_json::to_string(&block)?);
                }
            } else {
                println!("{}", generator.count(*radius)?);
            }
        }
        Command::Mine { planet, claimed, fuel, time, mission, miner, hash, caller } => {
            let service = Service::from_config(config)?;
            let attempt = MiningAttempt {
                planet_id: *planet,
                claimed_blocks: *claimed,
                fuel_used: *fuel,
                time_spent_secs: *time,
                mission_kind: *mission,
                miner: *miner,
                commit_hash: *hash,
            };
            let result = service.execute(&Action::Mine { caller: *caller, attempt })?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Replay { script } => {
            let content = fs::read_to_string(script)
                .map_err(|source| RockerdError::Io { path: script.clone(), source })?;
            let actions: Vec<Action> = serde_json::from_str(&content)?;
            let service = Service::from_config(config)?;

            let reports = service.replay(&actions);
            for report in &reports {
                println!("{}", serde_json::to_string(report)?);
            }
            let failed = reports.iter().filter(|r| !r.ok).count();
            info!(
                actions = reports.len(),
                failed,
                fuel_remaining = %service.fuel().total_supply(),
                "replay finished"
            );
            info!("{}", service.engine().stats().format_summary());
        }
    }
    Ok(())
}

fn init_logging(args: &Args) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // stdout carries results, logs go to stderr
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
