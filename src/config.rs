//! Balance configuration.
//!
//! Every knob has a default matching the shipped game, so a TOML file only
//! needs the values it wants to change:
//!
//! ```toml
//! start_year = 2024
//!
//! [initial]
//! money = 120000
//!
//! [events]
//! random_chance = 0.5
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::career::state::{Stats, TIER_COUNT};
use crate::error::ConfigError;

/// Upper bounds applied by the clamp pass. Lower bounds are always 0, except
/// performance which has none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatLimits {
    /// Ceiling for energy, reputation, executive, network, ability and team morale.
    pub max_stat: f64,
    pub max_performance: f64,
    pub max_risk: f64,
}

impl Default for StatLimits {
    fn default() -> Self {
        Self {
            max_stat: 100.0,
            max_performance: 200.0,
            max_risk: 100.0,
        }
    }
}

/// Parameters of the `risk_trading` gamble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GambleConfig {
    pub base_success: f64,
    /// Added to the success chance per point of ability.
    pub success_per_ability: f64,
    pub win_amount: f64,
    pub loss_amount: f64,
    /// Ability gained on a win and lost on a loss.
    pub ability_swing: f64,
}

impl Default for GambleConfig {
    fn default() -> Self {
        Self {
            base_success: 0.5,
            success_per_ability: 0.003,
            win_amount: 150_000.0,
            loss_amount: 80_000.0,
            ability_swing: 5.0,
        }
    }
}

/// When random events are rolled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventSchedule {
    /// Months in which an event is always attempted.
    pub guaranteed_months: Vec<u32>,
    /// Months in which an event is attempted with `random_chance`.
    pub random_months: Vec<u32>,
    pub random_chance: f64,
}

impl Default for EventSchedule {
    fn default() -> Self {
        Self {
            guaranteed_months: vec![6, 12],
            random_months: vec![3, 9],
            random_chance: 0.3,
        }
    }
}

/// Thresholds for the ending conditions and annual bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Goals {
    /// Money strictly below this is bankruptcy.
    pub bankruptcy_floor: i64,
    pub wealth_target: i64,
    /// Reputation and ability both at or above this win the game.
    pub legend_threshold: f64,
    /// All six core stats at or above this make a year count as stable.
    pub stable_threshold: f64,
    pub stable_years_to_win: u32,
    /// Money paid per point of performance at the annual settlement.
    pub bonus_per_performance: f64,
    /// Share of performance carried into the next year.
    pub performance_carry: f64,
    pub annual_energy_bonus: f64,
    pub january_morale_bonus: f64,
    /// Ability stops decaying once it reaches this level.
    pub ability_plateau: f64,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            bankruptcy_floor: -5_000_000,
            wealth_target: 50_000_000,
            legend_threshold: 90.0,
            stable_threshold: 80.0,
            stable_years_to_win: 5,
            bonus_per_performance: 1000.0,
            performance_carry: 0.3,
            annual_energy_bonus: 20.0,
            january_morale_bonus: 5.0,
            ability_plateau: 80.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Entries retained; the oldest are dropped first.
    pub capacity: usize,
    /// Entries included in a snapshot for display.
    pub display: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            capacity: 50,
            display: 10,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub start_year: i32,
    pub initial: Stats,
    pub limits: StatLimits,
    /// Monthly salary per career tier.
    pub salaries: [i64; TIER_COUNT],
    pub gamble: GambleConfig,
    pub events: EventSchedule,
    pub goals: Goals,
    pub log: LogConfig,
    /// Ticks between an auto-advancing action and the month-end it schedules.
    pub auto_advance_delay_ticks: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            start_year: 2020,
            initial: Stats::default(),
            limits: StatLimits::default(),
            salaries: [15_000, 25_000, 40_000, 60_000, 80_000, 120_000],
            gamble: GambleConfig::default(),
            events: EventSchedule::default(),
            goals: Goals::default(),
            log: LogConfig::default(),
            auto_advance_delay_ticks: 5,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let months = self
            .events
            .guaranteed_months
            .iter()
            .chain(&self.events.random_months);
        for &m in months {
            if !(1..=12).contains(&m) {
                return Err(ConfigError::Invalid(format!(
                    "event month {m} is outside 1..=12"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.events.random_chance) {
            return Err(ConfigError::Invalid(format!(
                "events.random_chance {} is outside [0, 1]",
                self.events.random_chance
            )));
        }
        if self.log.capacity == 0 {
            return Err(ConfigError::Invalid("log.capacity must be positive".into()));
        }
        if self.log.display > self.log.capacity {
            return Err(ConfigError::Invalid(format!(
                "log.display ({}) exceeds log.capacity ({})",
                self.log.display, self.log.capacity
            )));
        }
        let limits = &self.limits;
        if limits.max_stat <= 0.0 || limits.max_performance <= 0.0 || limits.max_risk <= 0.0 {
            return Err(ConfigError::Invalid("stat ceilings must be positive".into()));
        }
        let g = &self.gamble;
        for (name, value) in [
            ("base_success", g.base_success),
            ("success_per_ability", g.success_per_ability),
            ("win_amount", g.win_amount),
            ("loss_amount", g.loss_amount),
            ("ability_swing", g.ability_swing),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("gamble.{name} must be finite")));
            }
        }
        if !(0.0..=1.0).contains(&g.base_success) {
            return Err(ConfigError::Invalid(format!(
                "gamble.base_success {} is outside [0, 1]",
                g.base_success
            )));
        }
        // Ability tops out at 100, so this bounds its whole contribution.
        if !(0.0..=1.0).contains(&(g.success_per_ability * 100.0)) {
            return Err(ConfigError::Invalid(format!(
                "gamble.success_per_ability {} is outside [0, 0.01]",
                g.success_per_ability
            )));
        }
        if !(0.0..=1.0).contains(&self.goals.performance_carry) {
            return Err(ConfigError::Invalid(format!(
                "goals.performance_carry {} is outside [0, 1]",
                self.goals.performance_carry
            )));
        }
        Ok(())
    }
}
