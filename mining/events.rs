//! Audit events and sinks
//!
//! The engine emits one [`GameEvent`] per committed mutation. Storage of the
//! log is the sink's business.

use parking_lot::Mutex;
use rocker_core::{Address, BlockId, PlanetId};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Record of a committed mining attempt
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningRecord {
    pub miner: Address,
    pub planet_id: PlanetId,
    pub granted_blocks: u64,
    pub claimed_blocks: u64,
    pub fuel_used: u64,
    pub time_spent_secs: u64,
    pub mission_kind: u32,
    pub won: bool,
    pub roll: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    PlanetRegistered {
        planet_id: PlanetId,
        total_blocks: u64,
        yield_rate_bps: u32,
        capacity: u64,
    },
    WhitelistUpdated {
        miner: Address,
        planet_id: PlanetId,
        allowed: bool,
        changed: bool,
    },
    MiningRevoked {
        miner: Address,
        planet_id: PlanetId,
    },
    BlocksMined(MiningRecord),
    PlanetShaped {
        planet_id: PlanetId,
        radius: i64,
        blocks: usize,
    },
    LocationsReserved {
        planet_id: PlanetId,
        blocks: Vec<BlockId>,
    },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: &GameEvent);
}

/// Keeps events in memory, for tests and replays
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<GameEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn mined_records(&self) -> Vec<MiningRecord> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                GameEvent::BlocksMined(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &GameEvent) {
        self.events.lock().push(event.clone());
    }
}

/// Writes events to the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &GameEvent) {
        match serde_json::to_string(event) {
            Ok(json) => tracing::info!(target: "rocker::events", "{}", json),
            Err(e) => tracing::error!(target: "rocker::events", "unserializable event {:?}: {}", event, e),
        }
    }
}

/// Append-only JSON-lines file, one event per line
pub struct JsonLinesSink {
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesSink {
    pub fn open<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { writer: Mutex::new(BufWriter::new(file)) })
    }
}

impl EventSink for JsonLinesSink {
    fn emit(&self, event: &GameEvent) {
        let mut writer = self.writer.lock();
        let written = serde_json::to_writer(&mut *writer, event)
            .map_err(std::io::Error::from)
            .and_then(|_| writer.write_all(b"\n"))
            .and_then(|_| writer.flush());
        if let Err(e) = written {
            tracing::error!(target: "rocker::events", "failed to append event {:?}: {}", event, e);
        }
    }
}
