//! rockerd - operator tool for the planet mining engine
//!
//! Seeds an engine from a TOML config, then runs a single mining attempt,
//! a sphere query, or a replay of a JSON action log against it.

pub mod cli;
pub mod config;
pub mod error;
pub mod service;

pub use cli::Args;
pub use config::Config;
pub use error::{RockerdError, RockerdResult};
pub use service::{Action, ActionReport, Service};
