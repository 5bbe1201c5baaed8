//! fin-elite-sim: a turn-based finance career simulator.
//!
//! The [`career`] module is the engine. [`ui`], [`input`], [`widgets`] and
//! [`time`] make up the terminal front-end driven by the binary.

pub mod career;
pub mod config;
pub mod error;
pub mod input;
pub mod time;
pub mod ui;
pub mod widgets;

pub use career::{ActionId, CareerEngine, EventId, Notification, Outcome, Snapshot};
pub use config::EngineConfig;
pub use error::{ConfigError, EngineError};
