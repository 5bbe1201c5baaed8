//! Error types for the career engine and its configuration layer.

use std::fmt;

use thiserror::Error;

use crate::career::actions::ActionId;
use crate::career::events::EventId;

/// Why an action request was turned down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unavailable {
    /// This month's action slot has already been spent.
    SlotUsed,
    /// The action is hidden at the player's current tier.
    TierTooLow { required: usize, current: usize },
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::SlotUsed => write!(f, "this month's action slot is already used"),
            Unavailable::TierTooLow { required, current } => write!(
                f,
                "requires career tier {required} (current tier {current})"
            ),
        }
    }
}

/// Rejections from the engine's inbound commands.
///
/// Every variant is raised before any stat changes, so a failed command
/// leaves the session exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("action `{action}` is unavailable: {reason}")]
    ActionUnavailable { action: ActionId, reason: Unavailable },

    #[error("unknown action `{0}`")]
    UnknownAction(String),

    #[error("unknown event `{0}`")]
    UnknownEvent(String),

    #[error("choice {index} is out of range for event `{event}` ({available} choices)")]
    InvalidEventChoice {
        event: EventId,
        index: usize,
        available: usize,
    },

    #[error("event `{0}` is not waiting for a choice")]
    EventNotPending(EventId),

    #[error("event `{0}` must be resolved first")]
    AwaitingEventChoice(EventId),

    #[error("the game is over; only a restart is accepted")]
    InvalidTransitionAfterGameOver,
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Failures while loading or validating an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
