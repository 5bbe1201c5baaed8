//! Career state: the stat model, career tiers, promotion rules and the rolling log.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::actions::ActionId;
use crate::config::{EngineConfig, StatLimits};

/// Number of career tiers.
pub const TIER_COUNT: usize = 6;

/// A rung on the career ladder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CareerTier {
    pub name: &'static str,
    pub display_name: &'static str,
    pub ordinal: usize,
}

/// All tiers in promotion order. The last one is terminal.
pub const TIERS: [CareerTier; TIER_COUNT] = [
    CareerTier {
        name: "Analyst",
        display_name: "Junior Analyst",
        ordinal: 0,
    },
    CareerTier {
        name: "Associate",
        display_name: "Senior Analyst",
        ordinal: 1,
    },
    CareerTier {
        name: "VP",
        display_name: "Vice President",
        ordinal: 2,
    },
    CareerTier {
        name: "Director",
        display_name: "Director",
        ordinal: 3,
    },
    CareerTier {
        name: "MD",
        display_name: "Managing Director",
        ordinal: 4,
    },
    CareerTier {
        name: "Partner",
        display_name: "Partner",
        ordinal: 5,
    },
];

/// Thresholds that must all be met at year-end to leave a tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PromotionRule {
    pub min_ability: f64,
    pub min_performance: f64,
    pub min_executive: f64,
    pub next_tier: usize,
}

/// Promotion thresholds for `tier`; `None` for the terminal tier.
pub fn promotion_rule(tier: usize) -> Option<PromotionRule> {
    let (min_ability, min_performance, min_executive) = match tier {
        0 => (50.0, 120.0, 40.0),
        1 => (70.0, 150.0, 60.0),
        2 => (80.0, 180.0, 70.0),
        3 => (90.0, 200.0, 80.0),
        // Performance is capped at 200, so this rung is out of reach under
        // the default limits.
        4 => (85.0, 250.0, 90.0),
        _ => return None,
    };
    Some(PromotionRule {
        min_ability,
        min_performance,
        min_executive,
        next_tier: tier + 1,
    })
}

// ── Stats ──────────────────────────────────────────────────────────────

/// The nine player attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Energy,
    Reputation,
    Executive,
    Network,
    Ability,
    Performance,
    Risk,
    Money,
    TeamMorale,
}

impl Stat {
    pub const ALL: [Stat; 9] = [
        Stat::Energy,
        Stat::Reputation,
        Stat::Executive,
        Stat::Network,
        Stat::Ability,
        Stat::Performance,
        Stat::Risk,
        Stat::Money,
        Stat::TeamMorale,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stat::Energy => "Energy",
            Stat::Reputation => "Reputation",
            Stat::Executive => "Executive ties",
            Stat::Network => "Network",
            Stat::Ability => "Ability",
            Stat::Performance => "Performance",
            Stat::Risk => "Risk",
            Stat::Money => "Money",
            Stat::TeamMorale => "Team morale",
        }
    }
}

/// A signed change to some subset of stats. Zero fields are "not touched".
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct StatDelta {
    pub energy: f64,
    pub reputation: f64,
    pub executive: f64,
    pub network: f64,
    pub ability: f64,
    pub performance: f64,
    pub risk: f64,
    pub money: f64,
    pub team_morale: f64,
}

impl StatDelta {
    pub const ZERO: StatDelta = StatDelta {
        energy: 0.0,
        reputation: 0.0,
        executive: 0.0,
        network: 0.0,
        ability: 0.0,
        performance: 0.0,
        risk: 0.0,
        money: 0.0,
        team_morale: 0.0,
    };

    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Energy => self.energy,
            Stat::Reputation => self.reputation,
            Stat::Executive => self.executive,
            Stat::Network => self.network,
            Stat::Ability => self.ability,
            Stat::Performance => self.performance,
            Stat::Risk => self.risk,
            Stat::Money => self.money,
            Stat::TeamMorale => self.team_morale,
        }
    }

    /// The non-zero entries, in [`Stat::ALL`] order.
    pub fn entries(&self) -> impl Iterator<Item = (Stat, f64)> + '_ {
        Stat::ALL
            .into_iter()
            .map(move |s| (s, self.get(s)))
            .filter(|(_, v)| *v != 0.0)
    }
}

/// Current values of all stats.
///
/// Mutations may push values outside their range; [`Stats::clamp`] pulls
/// them back in a single pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Stats {
    pub energy: f64,
    pub reputation: f64,
    pub executive: f64,
    pub network: f64,
    pub ability: f64,
    /// No lower bound: a non-positive value is itself a failure condition.
    pub performance: f64,
    pub risk: f64,
    pub money: i64,
    pub team_morale: f64,
}

impl Default for Stats {
    /// The opening line-up of a new career.
    fn default() -> Self {
        Self {
            energy: 90.0,
            reputation: 70.0,
            executive: 30.0,
            network: 25.0,
            ability: 50.0,
            performance: 10.0,
            risk: 5.0,
            money: 50_000,
            team_morale: 50.0,
        }
    }
}

impl Stats {
    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Energy => self.energy,
            Stat::Reputation => self.reputation,
            Stat::Executive => self.executive,
            Stat::Network => self.network,
            Stat::Ability => self.ability,
            Stat::Performance => self.performance,
            Stat::Risk => self.risk,
            Stat::Money => self.money as f64,
            Stat::TeamMorale => self.team_morale,
        }
    }

    /// Add `amount` to one stat. Money is rounded to whole currency units.
    pub(crate) fn add(&mut self, stat: Stat, amount: f64) {
        match stat {
            Stat::Energy => self.energy += amount,
            Stat::Reputation => self.reputation += amount,
            Stat::Executive => self.executive += amount,
            Stat::Network => self.network += amount,
            Stat::Ability => self.ability += amount,
            Stat::Performance => self.performance += amount,
            Stat::Risk => self.risk += amount,
            Stat::Money => self.money += amount.round() as i64,
            Stat::TeamMorale => self.team_morale += amount,
        }
    }

    /// Apply every entry of `delta` additively, without any scaling.
    pub(crate) fn apply(&mut self, delta: &StatDelta) {
        for (stat, amount) in delta.entries() {
            self.add(stat, amount);
        }
    }

    /// Pull every bounded stat back into its range. Idempotent.
    pub fn clamp(&mut self, limits: &StatLimits) {
        self.energy = self.energy.clamp(0.0, limits.max_stat);
        self.reputation = self.reputation.clamp(0.0, limits.max_stat);
        self.executive = self.executive.clamp(0.0, limits.max_stat);
        self.network = self.network.clamp(0.0, limits.max_stat);
        self.ability = self.ability.clamp(0.0, limits.max_stat);
        self.team_morale = self.team_morale.clamp(0.0, limits.max_stat);
        self.performance = self.performance.min(limits.max_performance);
        self.risk = self.risk.clamp(0.0, limits.max_risk);
    }
}

// ── Consecutive use ────────────────────────────────────────────────────

/// Run length of the most recently used action.
///
/// Only the last action has a non-zero count; using another one restarts
/// the run at 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConsecutiveUse {
    last: Option<ActionId>,
    run: u32,
}

impl ConsecutiveUse {
    pub fn count(&self, id: ActionId) -> u32 {
        if self.last == Some(id) {
            self.run
        } else {
            0
        }
    }

    /// Record one use of `id` and return the new run length.
    pub fn record(&mut self, id: ActionId) -> u32 {
        if self.last == Some(id) {
            self.run += 1;
        } else {
            self.last = Some(id);
            self.run = 1;
        }
        self.run
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn current(&self) -> Option<(ActionId, u32)> {
        self.last.map(|id| (id, self.run))
    }
}

// ── Log ────────────────────────────────────────────────────────────────

/// One line of the narrative log.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LogEntry {
    pub text: String,
    pub important: bool,
}

// ── Player state ───────────────────────────────────────────────────────

/// Everything that changes during one game session.
#[derive(Clone, Debug)]
pub struct PlayerState {
    pub stats: Stats,
    /// Index into [`TIERS`]. Only ever grows, one step at a time.
    pub career_level: usize,
    pub start_year: i32,
    pub year: i32,
    /// 1..=12
    pub month: u32,
    /// One action per month.
    pub has_monthly_action: bool,
    /// Consecutive settlements where all six core stats were at or above the
    /// stability threshold.
    pub stable_years: u32,
    pub consecutive_use: ConsecutiveUse,
    pub is_game_over: bool,
    log: VecDeque<LogEntry>,
    log_capacity: usize,
}

impl PlayerState {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            stats: config.initial.clone(),
            career_level: 0,
            start_year: config.start_year,
            year: config.start_year,
            month: 1,
            has_monthly_action: true,
            stable_years: 0,
            consecutive_use: ConsecutiveUse::default(),
            is_game_over: false,
            log: VecDeque::with_capacity(config.log.capacity),
            log_capacity: config.log.capacity,
        }
    }

    pub fn clamp(&mut self, limits: &StatLimits) {
        self.stats.clamp(limits);
    }

    pub fn current_tier(&self) -> &'static CareerTier {
        &TIERS[self.career_level.min(TIER_COUNT - 1)]
    }

    pub fn is_terminal_tier(&self) -> bool {
        self.career_level + 1 >= TIER_COUNT
    }

    /// Whole years and leftover months since January of the start year.
    pub fn career_length(&self) -> (u32, u32) {
        let total = (self.year - self.start_year) * 12 + (self.month as i32 - 1);
        let total = total.max(0) as u32;
        (total / 12, total % 12)
    }

    pub fn add_log(&mut self, text: impl Into<String>) {
        self.push_log(text.into(), false);
    }

    /// Add a line the front-end should highlight.
    pub fn add_important(&mut self, text: impl Into<String>) {
        self.push_log(text.into(), true);
    }

    fn push_log(&mut self, text: String, important: bool) {
        self.log.push_back(LogEntry { text, important });
        while self.log.len() > self.log_capacity {
            self.log.pop_front();
        }
    }

    pub fn log(&self) -> impl Iterator<Item = &LogEntry> {
        self.log.iter()
    }

    /// The newest `n` entries, oldest first.
    pub fn recent_log(&self, n: usize) -> Vec<LogEntry> {
        let skip = self.log.len().saturating_sub(n);
        self.log.iter().skip(skip).cloned().collect()
    }
}
