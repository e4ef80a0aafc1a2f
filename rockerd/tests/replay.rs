use mining::{MemorySink, MiningAttempt};
use rocker_core::{Address, Hash};
use rockerd::{Action, Config, Service};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const CONFIG: &str = r#"
[engine]
fuel_price = 2
mission_curves = [
    { kind = 7, success_bps = 10000 },
    { kind = 8, success_bps = 0 },
]

[spatial]
max_radius = 16

[[planets]]
id = 0
total_blocks = 113097
yield_rate_bps = 565

[[planets]]
id = 1
yield_rate_bps = 10000
sphere_radius = 1

[[whitelist]]
address = "0x00000000000000000000000000000000000000bb"
planet_id = 0

[[whitelist]]
address = "0x00000000000000000000000000000000000000bb"
planet_id = 1

[[fuel]]
address = "0x00000000000000000000000000000000000000bb"
balance = 10000
"#;

fn miner() -> Address {
    "0x00000000000000000000000000000000000000bb".parse().unwrap()
}

fn attempt(planet_id: u64, claimed: u64, fuel: u64, mission: u32, nonce: u8) -> MiningAttempt {
    MiningAttempt {
        planet_id,
        claimed_blocks: claimed,
        fuel_used: fuel,
        time_spent_secs: 1200,
        mission_kind: mission,
        miner: miner(),
        commit_hash: Hash::digest(&[nonce]),
    }
}

fn load(dir: &TempDir) -> Config {
    let path = dir.path().join("rockerd.toml");
    fs::write(&path, CONFIG).unwrap();
    Config::load(&path).unwrap()
}

#[test]
fn test_service_seeds_from_config() {
    let tmp = TempDir::new().unwrap();
    let config = load(&tmp);
    let service = Service::with_sink(&config, Arc::new(MemorySink::new())).unwrap();

    let engine = service.engine();
    assert_eq!(engine.capacity(0).unwrap(), 6_389);
    // radius 1 sphere: the origin plus six unit neighbours
    assert_eq!(engine.planet(1).unwrap().total_blocks, 7);
    assert_eq!(engine.spatial().block_count(1).unwrap(), 7);
    assert!(engine.is_whitelisted(&miner(), 0));
    assert_eq!(service.fuel().total_supply(), 10_000);
}

#[test]
fn test_replay_reports_each_action() {
    let tmp = TempDir::new().unwrap();
    let config = load(&tmp);
    let sink = Arc::new(MemorySink::new());
    let service = Service::with_sink(&config, sink.clone()).unwrap();
    let stranger = Address::derive(b"stranger");

    let actions = vec![
        Action::Mine { caller: None, attempt: attempt(1, 5, 10, 7, 1) },
        Action::Mine { caller: None, attempt: attempt(1, 5, 10, 7, 2) },
        Action::Mine { caller: None, attempt: attempt(1, 5, 10, 7, 3) },
        Action::Mine { caller: Some(stranger), attempt: attempt(0, 5, 10, 7, 4) },
        Action::FindLocation { caller: None, planet_id: 1, candidates: vec![0, 1, 2], count: 2 },
        Action::FindLocation { caller: None, planet_id: 1, candidates: vec![0, 1, 2], count: 2 },
        Action::MinerState { miner: miner(), planet_id: 1 },
    ];
    let reports = service.replay(&actions);

    assert_eq!(reports.len(), actions.len());
    assert!(reports[0].ok);
    assert_eq!(reports[0].result.as_ref().unwrap()["granted_blocks"], 5);
    assert_eq!(reports[1].result.as_ref().unwrap()["granted_blocks"], 2);
    assert_eq!(reports[2].error_kind.as_deref(), Some("mining_disabled"));
    assert_eq!(reports[3].error_kind.as_deref(), Some("unauthorized"));
    assert_eq!(reports[4].result.as_ref().unwrap()["selected"], serde_json::json!([0, 1]));
    assert_eq!(reports[5].error_kind.as_deref(), Some("insufficient_capacity"));

    let state = reports[6].result.as_ref().unwrap();
    assert_eq!(state["mined_blocks"], 7);
    assert_eq!(state["un_mined_blocks"], 0);
    assert_eq!(state["can_mine"], false);

    // two committed attempts at 10 fuel each, price 2
    assert_eq!(service.fuel().total_supply(), 10_000 - 40);
    assert_eq!(sink.mined_records().len(), 2);
}

#[test]
fn test_losing_attempt_burns_fuel() {
    let tmp = TempDir::new().unwrap();
    let config = load(&tmp);
    let service = Service::with_sink(&config, Arc::new(MemorySink::new())).unwrap();

    let result = service.execute(&Action::Mine { caller: None, attempt: attempt(0, 100, 1000, 8, 9) }).unwrap();
    assert_eq!(result["won"], false);
    assert_eq!(result["granted_blocks"], 0);
    assert_eq!(service.fuel().total_supply(), 8_000);

    let state = service.engine().miner_state(&miner(), 0).unwrap();
    assert_eq!(state.mined_blocks, 0);
    assert_eq!(state.un_mined_blocks, 6_389);
    assert!(state.can_mine);
}

#[test]
fn test_insufficient_fuel_leaves_state_untouched() {
    let tmp = TempDir::new().unwrap();
    let config = load(&tmp);
    let service = Service::with_sink(&config, Arc::new(MemorySink::new())).unwrap();

    let err = service
        .execute(&Action::Mine { caller: None, attempt: attempt(0, 100, 6_000, 7, 3) })
        .unwrap_err();
    assert_eq!(err.kind(), "insufficient_fuel");
    assert_eq!(service.fuel().total_supply(), 10_000);
    assert!(service.engine().miner_states().is_empty());
}

#[test]
fn test_replay_script_parses_from_json() {
    let script = r#"[
        { "action": "credit_fuel", "account": "0x00000000000000000000000000000000000000cc", "amount": 50 },
        { "action": "set_whitelist", "miner": "0x00000000000000000000000000000000000000cc",
          "planet_id": 0, "allowed": true },
        { "action": "register_planet", "planet_id": 0, "total_blocks": 10, "yield_rate_bps": 100 },
        { "action": "mine", "attempt": {
            "planet_id": 0, "claimed_blocks": 3, "fuel_used": 5, "time_spent_secs": 60,
            "mission_kind": 7, "miner": "0x00000000000000000000000000000000000000cc",
            "commit_hash": "0x0000000000000000000000000000000000000000000000000000000000000001" } }
    ]"#;
    let actions: Vec<Action> = serde_json::from_str(script).unwrap();
    assert_eq!(actions.len(), 4);
    assert_eq!(actions[2].name(), "register_planet");

    let tmp = TempDir::new().unwrap();
    let config = load(&tmp);
    let service = Service::with_sink(&config, Arc::new(MemorySink::new())).unwrap();
    let reports = service.replay(&actions);

    assert!(reports[0].ok);
    assert_eq!(reports[1].result.as_ref().unwrap()["changed"], true);
    assert_eq!(reports[2].error_kind.as_deref(), Some("duplicate_planet"));
    assert!(reports[3].ok);
    assert_eq!(reports[3].result.as_ref().unwrap()["granted_blocks"], 3);
    assert_eq!(reports[3].result.as_ref().unwrap()["fuel_charged"], 10);
}

#[test]
fn test_events_written_as_json_lines() {
    let tmp = TempDir::new().unwrap();
    let mut config = load(&tmp);
    let events_path = tmp.path().join("events.jsonl");
    config.events.path = Some(events_path.clone());

    let service = Service::from_config(&config).unwrap();
    service.execute(&Action::Mine { caller: None, attempt: attempt(0, 1, 1, 7, 5) }).unwrap();
    drop(service);

    let content = fs::read_to_string(&events_path).unwrap();
    let events: Vec<serde_json::Value> =
        content.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(events.first().unwrap()["event"], "planet_registered");
    assert_eq!(events.last().unwrap()["event"], "blocks_mined");
}
