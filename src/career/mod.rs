//! Finance career simulation engine.
//!
//! Climb from junior analyst to partner one month at a time. Each month
//! allows a single action; random events interrupt twice a year and
//! sometimes at the quarter. [`CareerEngine`] is the entry point.

pub mod actions;
pub mod clock;
pub mod engine;
pub mod events;
pub mod format;
pub mod outcome;
pub mod schedule;
pub mod state;

#[cfg(test)]
mod simulator;

pub use actions::ActionId;
pub use engine::{CareerEngine, Ending, EndingKind, EventPresentation, MonthAdvance, Notification, Snapshot};
pub use events::EventId;
pub use outcome::Outcome;
