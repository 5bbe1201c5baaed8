//! Random events: the catalog, when they are rolled, and choice resolution.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::state::{PlayerState, StatDelta, Stats};
use crate::config::{EngineConfig, EventSchedule};
use crate::error::{EngineError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventId {
    RegulatoryStorm,
    ClientCrisis,
    InternalCompetition,
    MarketOpportunity,
    NobleHelp,
    TeamConflict,
    BurnoutCrisis,
    BossDissatisfaction,
    AbilityQuestioned,
}

impl EventId {
    pub fn as_str(self) -> &'static str {
        match self {
            EventId::RegulatoryStorm => "regulatory_storm",
            EventId::ClientCrisis => "client_crisis",
            EventId::InternalCompetition => "internal_competition",
            EventId::MarketOpportunity => "market_opportunity",
            EventId::NobleHelp => "noble_help",
            EventId::TeamConflict => "team_conflict",
            EventId::BurnoutCrisis => "burnout_crisis",
            EventId::BossDissatisfaction => "boss_dissatisfaction",
            EventId::AbilityQuestioned => "ability_questioned",
        }
    }

    pub fn definition(self) -> &'static EventDefinition {
        let index = match self {
            EventId::RegulatoryStorm => 0,
            EventId::ClientCrisis => 1,
            EventId::InternalCompetition => 2,
            EventId::MarketOpportunity => 3,
            EventId::NobleHelp => 4,
            EventId::TeamConflict => 5,
            EventId::BurnoutCrisis => 6,
            EventId::BossDissatisfaction => 7,
            EventId::AbilityQuestioned => 8,
        };
        &EVENTS[index]
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        EVENTS
            .iter()
            .map(|e| e.id)
            .find(|id| id.as_str() == s)
            .ok_or_else(|| EngineError::UnknownEvent(s.to_string()))
    }
}

#[derive(Debug)]
pub struct EventChoice {
    pub label: &'static str,
    pub effect: StatDelta,
    pub narrative: &'static str,
}

#[derive(Debug)]
pub struct EventDefinition {
    pub id: EventId,
    pub title: &'static str,
    pub description: &'static str,
    pub trigger: fn(&Stats) -> bool,
    pub choices: [EventChoice; 3],
}

impl EventDefinition {
    pub fn is_eligible(&self, stats: &Stats) -> bool {
        (self.trigger)(stats)
    }
}

fn risk_is_showing(s: &Stats) -> bool {
    s.risk > 30.0
}

fn has_performance(s: &Stats) -> bool {
    s.performance > 50.0
}

fn thin_network(s: &Stats) -> bool {
    s.network < 60.0
}

fn has_capital(s: &Stats) -> bool {
    s.money > 300_000
}

fn well_connected(s: &Stats) -> bool {
    s.network >= 70.0
}

fn team_on_edge(s: &Stats) -> bool {
    s.team_morale > 20.0 && s.team_morale < 60.0
}

fn team_exhausted(s: &Stats) -> bool {
    s.team_morale <= 40.0
}

fn boss_lukewarm(s: &Stats) -> bool {
    s.executive > 20.0 && s.executive < 50.0
}

fn skills_shaky(s: &Stats) -> bool {
    s.ability > 20.0 && s.ability < 45.0
}

pub const EVENTS: [EventDefinition; 9] = [
    EventDefinition {
        id: EventId::RegulatoryStorm,
        title: "Regulatory storm",
        description: "The regulator shows up unannounced and your \"creative\" trades are about to surface.",
        trigger: risk_is_showing,
        choices: [
            EventChoice {
                label: "Confess at once and ask for leniency",
                effect: StatDelta { reputation: 10.0, risk: -15.0, performance: -30.0, ..StatDelta::ZERO },
                narrative: "A textbook kneel. The numbers look awful but you live to work another day.",
            },
            EventChoice {
                label: "Pay someone to make it go away",
                effect: StatDelta { executive: -10.0, money: -50_000.0, risk: -5.0, ..StatDelta::ZERO },
                narrative: "Connections are hard currency, and favors have to be repaid. Another sleepless night.",
            },
            EventChoice {
                label: "Deny everything and roll the dice",
                effect: StatDelta { risk: 30.0, performance: 20.0, reputation: -25.0, ..StatDelta::ZERO },
                narrative: "Head firmly in the sand. The timer is ticking. Good luck.",
            },
        ],
    },
    EventDefinition {
        id: EventId::ClientCrisis,
        title: "Client crisis",
        description: "A major client lost their shirt and threatens to go public with a banner outside the office.",
        trigger: has_performance,
        choices: [
            EventChoice {
                label: "Cover the loss out of your own pocket",
                effect: StatDelta { money: -100_000.0, reputation: 15.0, ..StatDelta::ZERO },
                narrative: "Your savings fill the hole. The client leaves happy, you keep smiling through the pain.",
            },
            EventChoice {
                label: "Blame the market",
                effect: StatDelta { risk: 10.0, executive: 5.0, reputation: -5.0, ..StatDelta::ZERO },
                narrative: "\"Macro headwinds\" take the fall. The client curses you quietly but has nothing to say.",
            },
            EventChoice {
                label: "Offer free advice to buy time",
                effect: StatDelta { energy: -20.0, network: 10.0, reputation: 5.0, ..StatDelta::ZERO },
                narrative: "Your evenings go to soothing the client. Cheap sincerity buys cheap trust.",
            },
        ],
    },
    EventDefinition {
        id: EventId::InternalCompetition,
        title: "Office politics",
        description: "A colleague just poached your biggest client. The office is a battlefield.",
        trigger: thin_network,
        choices: [
            EventChoice {
                label: "Report them to the boss",
                effect: StatDelta { executive: 10.0, network: -15.0, ..StatDelta::ZERO },
                narrative: "The boss nods along and files you under \"snitch\". Lunch invitations dry up.",
            },
            EventChoice {
                label: "Poach their clients back",
                effect: StatDelta { risk: 15.0, performance: 20.0, reputation: -10.0, ..StatDelta::ZERO },
                narrative: "Mutually assured destruction. Elevator rides are now unbearably awkward.",
            },
            EventChoice {
                label: "Propose a \"win-win partnership\"",
                effect: StatDelta { performance: 10.0, network: 5.0, ..StatDelta::ZERO },
                narrative: "Smiles on the outside, daggers on the inside. Adult collaboration at its finest.",
            },
        ],
    },
    EventDefinition {
        id: EventId::MarketOpportunity,
        title: "Riding the wave",
        description: "The market offers an \"opportunity\". Could be financial freedom, could be a haircut.",
        trigger: has_capital,
        choices: [
            EventChoice {
                label: "All in, fortune favors the bold",
                effect: StatDelta { money: 150_000.0, risk: 20.0, performance: 80.0, ..StatDelta::ZERO },
                narrative: "Bold and lucky, for now. When the wind stops, even flying pigs come down.",
            },
            EventChoice {
                label: "Take a measured position",
                effect: StatDelta { money: 50_000.0, risk: 5.0, performance: 30.0, ..StatDelta::ZERO },
                narrative: "Steady progress. Mediocre, but safe.",
            },
            EventChoice {
                label: "Watch from the sidelines",
                effect: StatDelta { reputation: -5.0, ..StatDelta::ZERO },
                narrative: "You stay safe and watch everyone else get rich. Admirable, and infuriating.",
            },
        ],
    },
    EventDefinition {
        id: EventId::NobleHelp,
        title: "A mentor appears",
        description: "An industry heavyweight has taken an interest in you and offers a helping hand.",
        trigger: well_connected,
        choices: [
            EventChoice {
                label: "Accept gratefully",
                effect: StatDelta { ability: 10.0, reputation: 5.0, network: 5.0, ..StatDelta::ZERO },
                narrative: "A few words from the master and a new world opens up. That is what a network is for.",
            },
            EventChoice {
                label: "Politely decline and go it alone",
                effect: StatDelta { reputation: 10.0, network: -5.0, ..StatDelta::ZERO },
                narrative: "You earn their respect. The missed chance stings a little.",
            },
            EventChoice {
                label: "Ask for cash directly",
                effect: StatDelta { money: 100_000.0, reputation: -5.0, network: 10.0, ..StatDelta::ZERO },
                narrative: "A pause, a raised eyebrow, a transfer. Network monetized, dignity slightly dented.",
            },
        ],
    },
    EventDefinition {
        id: EventId::TeamConflict,
        title: "Team conflict",
        description: "Two of your key people fell out over a project and the whole team has gone cold.",
        trigger: team_on_edge,
        choices: [
            EventChoice {
                label: "Punish both and order a truce",
                effect: StatDelta { team_morale: -5.0, reputation: 5.0, ..StatDelta::ZERO },
                narrative: "Authority wins. Calm on the surface, grumbling underneath.",
            },
            EventChoice {
                label: "Mediate in the open",
                effect: StatDelta { team_morale: 5.0, energy: -10.0, reputation: 5.0, ..StatDelta::ZERO },
                narrative: "A full day of mediation ends in a compromise. Exhausting, but the team is better for it.",
            },
            EventChoice {
                label: "Fire the troublemaker",
                effect: StatDelta { team_morale: -15.0, reputation: -5.0, ability: -5.0, ..StatDelta::ZERO },
                narrative: "One key player gone and everyone else terrified. Quiet, and miserable.",
            },
        ],
    },
    EventDefinition {
        id: EventId::BurnoutCrisis,
        title: "Collective burnout",
        description: "After months of overtime the team is running on fumes. Output is collapsing.",
        trigger: team_exhausted,
        choices: [
            EventChoice {
                label: "Mandatory team outing, money buys smiles",
                effect: StatDelta { team_morale: 15.0, money: -30_000.0, reputation: 5.0, ..StatDelta::ZERO },
                narrative: "Thirty grand on an outing. Everyone has fun, and you know it is only an anesthetic.",
            },
            EventChoice {
                label: "Paint a glorious future",
                effect: StatDelta { team_morale: -5.0, reputation: -10.0, ..StatDelta::ZERO },
                narrative: "They have heard this speech before. Morale drops and the silence is awkward.",
            },
            EventChoice {
                label: "Give everyone a few days off",
                effect: StatDelta { team_morale: 10.0, performance: -20.0, reputation: 10.0, ..StatDelta::ZERO },
                narrative: "Numbers take a hit, but the team comes back in much better shape.",
            },
        ],
    },
    EventDefinition {
        id: EventId::BossDissatisfaction,
        title: "The boss is unhappy",
        description: "Your manager hints that your seat is getting warm.",
        trigger: boss_lukewarm,
        choices: [
            EventChoice {
                label: "Apologize and promise to do better",
                effect: StatDelta { executive: 5.0, reputation: -5.0, ..StatDelta::ZERO },
                narrative: "The boss softens a little. Your team saw you grovel, though.",
            },
            EventChoice {
                label: "Present your results",
                effect: StatDelta { executive: 8.0, energy: -10.0, performance: 5.0, ..StatDelta::ZERO },
                narrative: "An all-nighter on the slide deck buys you a nod. Safe, for now.",
            },
            EventChoice {
                label: "Go over their head",
                effect: StatDelta { executive: -10.0, reputation: -15.0, risk: 5.0, ..StatDelta::ZERO },
                narrative: "Your manager hates you and the people upstairs think you don't know the rules.",
            },
        ],
    },
    EventDefinition {
        id: EventId::AbilityQuestioned,
        title: "Competence questioned",
        description: "In a big meeting, your professional judgment is challenged in front of everyone.",
        trigger: skills_shaky,
        choices: [
            EventChoice {
                label: "Accept the criticism and promise to improve",
                effect: StatDelta { ability: 5.0, reputation: -5.0, ..StatDelta::ZERO },
                narrative: "You lose face but keep your professional image. Shame as motivation?",
            },
            EventChoice {
                label: "Argue back on the spot",
                effect: StatDelta { ability: -5.0, reputation: 5.0, executive: -5.0, ..StatDelta::ZERO },
                narrative: "You win the argument and alienate half the room.",
            },
            EventChoice {
                label: "Ask for advice privately afterwards",
                effect: StatDelta { ability: 10.0, energy: -5.0, network: 5.0, ..StatDelta::ZERO },
                narrative: "Face saved, lesson learned, contact made. Smooth.",
            },
        ],
    },
];

/// Why an event roll happened this month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    HalfYear,
    Quarterly,
}

impl TriggerKind {
    pub fn label(self) -> &'static str {
        match self {
            TriggerKind::HalfYear => "Half-year event",
            TriggerKind::Quarterly => "Quarterly event",
        }
    }
}

/// Result of [`try_trigger`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventRoll {
    /// No roll this month.
    NotScheduled,
    /// A roll happened but nothing was eligible.
    Quiet(TriggerKind),
    Triggered(TriggerKind, EventId),
}

/// Decide whether `month` rolls for an event. Consumes randomness only in
/// the probabilistic months.
pub fn should_attempt<R: Rng + ?Sized>(
    month: u32,
    schedule: &EventSchedule,
    rng: &mut R,
) -> Option<TriggerKind> {
    if schedule.guaranteed_months.contains(&month) {
        Some(TriggerKind::HalfYear)
    } else if schedule.random_months.contains(&month) && rng.gen_bool(schedule.random_chance) {
        Some(TriggerKind::Quarterly)
    } else {
        None
    }
}

pub fn eligible_events(stats: &Stats) -> Vec<&'static EventDefinition> {
    EVENTS.iter().filter(|e| e.is_eligible(stats)).collect()
}

/// Roll for this month's event and pick one uniformly among the eligible.
pub fn try_trigger<R: Rng + ?Sized>(
    state: &mut PlayerState,
    config: &EngineConfig,
    rng: &mut R,
) -> EventRoll {
    let Some(kind) = should_attempt(state.month, &config.events, rng) else {
        return EventRoll::NotScheduled;
    };
    let eligible = eligible_events(&state.stats);
    debug!(month = state.month, eligible = eligible.len(), "event roll");

    match eligible.choose(rng) {
        Some(event) => {
            state.add_important(format!(
                "[{}-{:02}] {}: {}",
                state.year,
                state.month,
                kind.label(),
                event.title
            ));
            info!(event = %event.id, "event triggered");
            EventRoll::Triggered(kind, event.id)
        }
        None => {
            state.add_log(format!(
                "[{}-{:02}] {}: a quiet month.",
                state.year,
                state.month,
                kind.label()
            ));
            EventRoll::Quiet(kind)
        }
    }
}

/// Apply choice `index` of `event` additively and clamp.
pub fn apply_choice(
    state: &mut PlayerState,
    event: &'static EventDefinition,
    index: usize,
    config: &EngineConfig,
) -> Result<&'static EventChoice> {
    let choice = event
        .choices
        .get(index)
        .ok_or(EngineError::InvalidEventChoice {
            event: event.id,
            index,
            available: event.choices.len(),
        })?;

    state.stats.apply(&choice.effect);
    state.add_log(format!("You chose: {}", choice.label));
    state.add_log(choice.narrative);
    state.clamp(&config.limits);
    debug!(event = %event.id, choice = index, "event choice applied");
    Ok(choice)
}
