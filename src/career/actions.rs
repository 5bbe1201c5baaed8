//! Action catalog and execution: eligibility, fatigue multipliers and effects.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::format::format_money_signed;
use super::state::{PlayerState, Stat, StatDelta, Stats};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result, Unavailable};

/// Identifier of a monthly action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    PushProject,
    ConnectResources,
    Rest,
    Training,
    Networking,
    RiskTrading,
    TeamBuilding,
    BusinessTrip,
}

impl ActionId {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionId::PushProject => "push_project",
            ActionId::ConnectResources => "connect_resources",
            ActionId::Rest => "rest",
            ActionId::Training => "training",
            ActionId::Networking => "networking",
            ActionId::RiskTrading => "risk_trading",
            ActionId::TeamBuilding => "team_building",
            ActionId::BusinessTrip => "business_trip",
        }
    }

    fn index(self) -> usize {
        match self {
            ActionId::PushProject => 0,
            ActionId::ConnectResources => 1,
            ActionId::Rest => 2,
            ActionId::Training => 3,
            ActionId::Networking => 4,
            ActionId::RiskTrading => 5,
            ActionId::TeamBuilding => 6,
            ActionId::BusinessTrip => 7,
        }
    }

    pub fn definition(self) -> &'static ActionDefinition {
        &ACTIONS[self.index()]
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        ACTIONS
            .iter()
            .map(|a| a.id)
            .find(|id| id.as_str() == s)
            .ok_or_else(|| EngineError::UnknownAction(s.to_string()))
    }
}

/// Static description of an action.
#[derive(Debug)]
pub struct ActionDefinition {
    pub id: ActionId,
    pub name: &'static str,
    pub description: &'static str,
    /// Monthly slots consumed. Every action costs the single slot.
    pub ap_cost: u32,
    /// Lowest career tier at which the action is offered.
    pub min_tier: usize,
    /// Ends the month shortly after the action resolves.
    pub auto_advance: bool,
    pub effect: StatDelta,
    /// Log line written after the effect is applied.
    pub summary: &'static str,
}

/// Every action, in display order.
pub const ACTIONS: [ActionDefinition; 8] = [
    ActionDefinition {
        id: ActionId::PushProject,
        name: "Push the deal through",
        description: "Sell your soul for the quarter's numbers",
        ap_cost: 1,
        min_tier: 0,
        auto_advance: true,
        effect: StatDelta {
            performance: 50.0,
            ability: 3.0,
            energy: -10.0,
            risk: 5.0,
            money: 30_000.0,
            ..StatDelta::ZERO
        },
        summary: "Deal closed. The commission has landed.",
    },
    ActionDefinition {
        id: ActionId::ConnectResources,
        name: "Line up resources",
        description: "Dinners and favors, also known as resource integration",
        ap_cost: 1,
        min_tier: 2,
        auto_advance: false,
        effect: StatDelta {
            executive: 10.0,
            network: 5.0,
            money: -5_000.0,
            energy: -5.0,
            ..StatDelta::ZERO
        },
        summary: "Resources lined up over a long dinner.",
    },
    ActionDefinition {
        id: ActionId::Rest,
        name: "Slack off to recover",
        description: "Paid breaks, the last defiance of the office worker",
        ap_cost: 1,
        min_tier: 0,
        auto_advance: true,
        effect: StatDelta {
            energy: 15.0,
            performance: -10.0,
            ability: -2.0,
            team_morale: -5.0,
            money: 8_000.0,
            ..StatDelta::ZERO
        },
        summary: "Slacked off successfully. Energy back, skills a little rusty.",
    },
    ActionDefinition {
        id: ActionId::Training,
        name: "Attend association training",
        description: "Pay for a course and pretend to improve",
        ap_cost: 1,
        min_tier: 0,
        auto_advance: true,
        effect: StatDelta {
            ability: 8.0,
            energy: -5.0,
            money: 5_000.0,
            ..StatDelta::ZERO
        },
        summary: "Course finished. The firm covered the fee and paid a stipend.",
    },
    ActionDefinition {
        id: ActionId::Networking,
        name: "Industry networking",
        description: "Swap business cards and act like old friends",
        ap_cost: 1,
        min_tier: 1,
        auto_advance: false,
        effect: StatDelta {
            network: 15.0,
            executive: 5.0,
            energy: -5.0,
            money: -15_000.0,
            ..StatDelta::ZERO
        },
        summary: "A pocket full of business cards.",
    },
    ActionDefinition {
        id: ActionId::RiskTrading,
        name: "Risky trade",
        description: "Heads you win, tails the firm loses",
        ap_cost: 1,
        min_tier: 2,
        auto_advance: false,
        effect: StatDelta {
            risk: 15.0,
            ..StatDelta::ZERO
        },
        summary: "Position closed.",
    },
    ActionDefinition {
        id: ActionId::TeamBuilding,
        name: "Team building",
        description: "Buy smiles for a night of forced unity",
        ap_cost: 1,
        min_tier: 2,
        auto_advance: false,
        effect: StatDelta {
            team_morale: 10.0,
            performance: 10.0,
            money: -20_000.0,
            ..StatDelta::ZERO
        },
        summary: "The team is smiling, at least tonight.",
    },
    ActionDefinition {
        id: ActionId::BusinessTrip,
        name: "Client road trip",
        description: "Flights and hotels on expenses, meals on the client",
        ap_cost: 1,
        min_tier: 0,
        auto_advance: true,
        effect: StatDelta {
            network: 20.0,
            executive: 5.0,
            energy: -10.0,
            money: -20_000.0,
            ..StatDelta::ZERO
        },
        summary: "Back from the road. Travel costs fronted, reimbursement pending.",
    },
];

/// Per-action override of the generic effect rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EffectHook {
    Generic,
    /// Money and ability ride on a success roll.
    Gamble,
    /// Performance is replaced by the computed gain instead of added to.
    PerformanceReset,
}

fn effect_hook(id: ActionId) -> EffectHook {
    match id {
        ActionId::RiskTrading => EffectHook::Gamble,
        ActionId::PushProject => EffectHook::PerformanceReset,
        _ => EffectHook::Generic,
    }
}

// ── Multipliers ───────────────────────────────────────────────────────

/// Fatigue factor for the `run_length`-th consecutive use of an action.
pub fn cost_multiplier(run_length: u32) -> f64 {
    match run_length {
        0..=2 => 1.0,
        3..=4 => 1.8,
        5..=6 => 2.5,
        _ => 3.5,
    }
}

/// Scale applied to energy gains under fatigue.
pub fn energy_recovery_multiplier(cost_multiplier: f64) -> f64 {
    (2.0 - cost_multiplier).max(0.5)
}

/// Scale applied to money gains under fatigue.
pub fn income_multiplier(cost_multiplier: f64) -> f64 {
    (1.5 - cost_multiplier * 0.25).max(0.5)
}

/// Apply `delta` with the asymmetric fatigue rule: energy and money costs
/// grow with `cost_multiplier`, their gains shrink; other stats are added
/// unchanged.
pub fn apply_scaled(stats: &mut Stats, delta: &StatDelta, cost_multiplier: f64) {
    for (stat, amount) in delta.entries() {
        let scaled = match stat {
            Stat::Energy | Stat::Money if amount < 0.0 => amount * cost_multiplier,
            Stat::Energy => amount * energy_recovery_multiplier(cost_multiplier),
            Stat::Money => amount * income_multiplier(cost_multiplier),
            _ => amount,
        };
        stats.add(stat, scaled);
    }
}

// ── Availability ──────────────────────────────────────────────────────

/// Actions visible at the player's tier, whether or not the slot is free.
pub fn list_available(state: &PlayerState) -> Vec<&'static ActionDefinition> {
    ACTIONS
        .iter()
        .filter(|a| state.career_level >= a.min_tier)
        .collect()
}

pub fn check_available(state: &PlayerState, action: &ActionDefinition) -> Result<()> {
    if state.career_level < action.min_tier {
        return Err(EngineError::ActionUnavailable {
            action: action.id,
            reason: Unavailable::TierTooLow {
                required: action.min_tier,
                current: state.career_level,
            },
        });
    }
    if !state.has_monthly_action {
        return Err(EngineError::ActionUnavailable {
            action: action.id,
            reason: Unavailable::SlotUsed,
        });
    }
    Ok(())
}

// ── Execution ─────────────────────────────────────────────────────────

/// Result of the `risk_trading` roll.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GambleResult {
    pub success_chance: f64,
    pub won: bool,
    /// Money gained on a win or lost on a loss (always non-negative).
    pub amount: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ActionReport {
    pub action: ActionId,
    pub run_length: u32,
    pub cost_multiplier: f64,
    pub gamble: Option<GambleResult>,
    /// The value performance was reset to, for `push_project`.
    pub performance_gain: Option<f64>,
    pub auto_advance: bool,
}

/// Spend this month's slot on `action` and apply its effects.
///
/// On error nothing is changed. The caller evaluates the outcome and
/// schedules the month-end for auto-advancing actions.
pub fn execute<R: Rng + ?Sized>(
    state: &mut PlayerState,
    action: &ActionDefinition,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<ActionReport> {
    check_available(state, action)?;

    let run_length = state.consecutive_use.record(action.id);
    let cost = cost_multiplier(run_length);
    if run_length > 2 {
        warn_fatigue(state, action, run_length, cost);
    }
    state.has_monthly_action = false;

    let mut report = ActionReport {
        action: action.id,
        run_length,
        cost_multiplier: cost,
        gamble: None,
        performance_gain: None,
        auto_advance: action.auto_advance,
    };

    match effect_hook(action.id) {
        EffectHook::Gamble => {
            report.gamble = Some(resolve_gamble(state, action, cost, config, rng));
        }
        EffectHook::PerformanceReset => {
            report.performance_gain = Some(resolve_push(state, action, cost));
        }
        EffectHook::Generic => {
            apply_scaled(&mut state.stats, &action.effect, cost);
            state.add_log(action.summary);
        }
    }
    if !action.auto_advance {
        state.add_log("(The month stays open until you end it.)");
    }

    state.clamp(&config.limits);
    debug!(
        action = %action.id,
        run_length,
        cost_multiplier = cost,
        "action executed"
    );
    Ok(report)
}

fn warn_fatigue(state: &mut PlayerState, action: &ActionDefinition, run_length: u32, cost: f64) {
    let line = match run_length {
        3 => format!(
            "\"{}\" {} times in a row: costs are now x{:.1}",
            action.name, run_length, cost
        ),
        4 => format!(
            "Repeating \"{}\" wears you down: costs x{:.1}",
            action.name, cost
        ),
        _ => format!(
            "Your body protests: \"{}\" costs x{:.1}, try something else",
            action.name, cost
        ),
    };
    state.add_important(line);
    if run_length >= 6 {
        state.add_log("(Keep this up and you will end up in the ICU.)");
    }
}

fn resolve_gamble<R: Rng + ?Sized>(
    state: &mut PlayerState,
    action: &ActionDefinition,
    cost: f64,
    config: &EngineConfig,
    rng: &mut R,
) -> GambleResult {
    let g = &config.gamble;
    let success_chance = g.base_success + state.stats.ability * g.success_per_ability;
    // A non-finite chance (hand-built config) counts as a sure loss.
    let p = if success_chance.is_finite() {
        success_chance.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let won = rng.gen_bool(p);

    let amount = if won {
        let amount = (g.win_amount * income_multiplier(cost)).round() as i64;
        state.stats.money += amount;
        state.stats.ability += g.ability_swing;
        state.add_important(format!(
            "The bet paid off ({:.1}% odds): {}",
            success_chance * 100.0,
            format_money_signed(amount)
        ));
        amount
    } else {
        let amount = (g.loss_amount * cost).round() as i64;
        state.stats.money -= amount;
        state.stats.ability -= g.ability_swing;
        state.add_important(format!(
            "The bet went wrong ({:.1}% odds): {}",
            success_chance * 100.0,
            format_money_signed(-amount)
        ));
        amount
    };
    // The static risk delta is never scaled by fatigue.
    state.stats.risk += action.effect.risk;
    state.add_log(action.summary);

    GambleResult {
        success_chance,
        won,
        amount,
    }
}

fn resolve_push(state: &mut PlayerState, action: &ActionDefinition, cost: f64) -> f64 {
    let mut gain = action.effect.performance;

    if state.stats.team_morale > 80.0 {
        gain += 10.0;
        state.add_log("Team morale is high: performance +10");
    } else if state.stats.team_morale < 40.0 {
        gain -= 10.0;
        state.add_log("Team morale is low: performance -10");
    }

    if state.stats.network >= 80.0 {
        gain += 15.0;
        state.add_log("Your wide network opens doors: performance +15");
    } else if state.stats.network >= 60.0 {
        gain += 5.0;
        state.add_log("Your network helps a little: performance +5");
    }

    apply_scaled(&mut state.stats, &action.effect, cost);
    state.stats.performance = gain;
    state.add_log(format!("{} Performance is now {}.", action.summary, gain));
    gain
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fresh() -> (PlayerState, EngineConfig) {
        let config = EngineConfig::default();
        (PlayerState::new(&config), config)
    }

    /// Always rolls 0, so every `gen_bool(p)` with p > 0 succeeds.
    fn always_win() -> StepRng {
        StepRng::new(0, 0)
    }

    /// Always rolls the maximum, so every `gen_bool(p)` with p < 1 fails.
    fn always_lose() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    #[test]
    fn catalog_order_matches_ids() {
        for (i, def) in ACTIONS.iter().enumerate() {
            assert_eq!(def.id.index(), i);
            assert_eq!(def.id.definition().id, def.id);
            assert_eq!(def.ap_cost, 1);
            assert_eq!(def.id.as_str().parse::<ActionId>().unwrap(), def.id);
        }
    }

    #[test]
    fn parse_unknown_action() {
        let err = "moonlighting".parse::<ActionId>().unwrap_err();
        assert_eq!(err, EngineError::UnknownAction("moonlighting".into()));
    }

    #[test]
    fn cost_multiplier_steps() {
        let expected = [(1, 1.0), (2, 1.0), (3, 1.8), (4, 1.8), (5, 2.5), (6, 2.5), (7, 3.5), (20, 3.5)];
        for (run, mult) in expected {
            assert_eq!(cost_multiplier(run), mult, "run {}", run);
        }
    }

    #[test]
    fn gain_multipliers_floor_at_half() {
        assert_eq!(energy_recovery_multiplier(1.0), 1.0);
        assert!((energy_recovery_multiplier(1.8) - 0.5).abs() < 1e-9);
        assert_eq!(energy_recovery_multiplier(3.5), 0.5);
        assert_eq!(income_multiplier(1.0), 1.25);
        assert!((income_multiplier(1.8) - 1.05).abs() < 1e-9);
        assert_eq!(income_multiplier(3.5), 0.625);
    }

    #[test]
    fn list_available_filters_by_tier_only() {
        let (mut s, _) = fresh();
        let ids: Vec<_> = list_available(&s).iter().map(|a| a.id).collect();
        assert_eq!(
            ids,
            vec![ActionId::PushProject, ActionId::Rest, ActionId::Training, ActionId::BusinessTrip]
        );

        s.has_monthly_action = false;
        assert_eq!(list_available(&s).len(), 4);

        s.career_level = 1;
        assert_eq!(list_available(&s).len(), 5);
        s.career_level = 2;
        assert_eq!(list_available(&s).len(), 8);
    }

    #[test]
    fn execute_consumes_the_slot() {
        let (mut s, config) = fresh();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        execute(&mut s, ActionId::Training.definition(), &config, &mut rng).unwrap();
        assert!(!s.has_monthly_action);

        let before = s.stats.clone();
        let err = execute(&mut s, ActionId::Training.definition(), &config, &mut rng).unwrap_err();
        assert_eq!(
            err,
            EngineError::ActionUnavailable {
                action: ActionId::Training,
                reason: Unavailable::SlotUsed
            }
        );
        assert_eq!(s.stats, before);
        assert_eq!(s.consecutive_use.count(ActionId::Training), 1);
    }

    #[test]
    fn execute_rejects_hidden_action() {
        let (mut s, config) = fresh();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = execute(&mut s, ActionId::RiskTrading.definition(), &config, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            EngineError::ActionUnavailable {
                reason: Unavailable::TierTooLow { required: 2, current: 0 },
                ..
            }
        ));
        assert!(s.has_monthly_action);
    }

    #[test]
    fn generic_effect_first_use() {
        let (mut s, config) = fresh();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let report = execute(&mut s, ActionId::Training.definition(), &config, &mut rng).unwrap();
        assert_eq!(report.run_length, 1);
        assert_eq!(report.cost_multiplier, 1.0);
        assert!(report.auto_advance);
        assert_eq!(s.stats.ability, 58.0);
        assert_eq!(s.stats.energy, 85.0);
        // Income on a fresh run is boosted by 1.25.
        assert_eq!(s.stats.money, 50_000 + 6_250);
    }

    #[test]
    fn fatigue_scales_energy_cost_and_income() {
        let (mut s, config) = fresh();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..2 {
            execute(&mut s, ActionId::Training.definition(), &config, &mut rng).unwrap();
            s.has_monthly_action = true;
        }
        let energy = s.stats.energy;
        let money = s.stats.money;
        let report = execute(&mut s, ActionId::Training.definition(), &config, &mut rng).unwrap();
        assert_eq!(report.run_length, 3);
        assert_eq!(report.cost_multiplier, 1.8);
        assert!((s.stats.energy - (energy - 9.0)).abs() < 1e-9);
        assert_eq!(s.stats.money, money + 5_250);
        assert!(s.log().any(|e| e.important && e.text.contains("3 times in a row")));
    }

    #[test]
    fn fatigue_shrinks_energy_recovery() {
        let (mut s, config) = fresh();
        s.stats.energy = 10.0;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut gains = Vec::new();
        for _ in 0..7 {
            let before = s.stats.energy;
            execute(&mut s, ActionId::Rest.definition(), &config, &mut rng).unwrap();
            gains.push(s.stats.energy - before);
            s.has_monthly_action = true;
            s.stats.energy = 10.0;
            s.stats.performance = 100.0;
            s.stats.ability = 50.0;
            s.stats.team_morale = 50.0;
        }
        assert_eq!(gains[0], 15.0);
        assert_eq!(gains[1], 15.0);
        // From the third use on, the recovery multiplier bottoms out at 0.5.
        for gain in &gains[2..] {
            assert_eq!(*gain, 7.5);
        }
    }

    #[test]
    fn switching_action_resets_the_run() {
        let (mut s, config) = fresh();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..3 {
            execute(&mut s, ActionId::Training.definition(), &config, &mut rng).unwrap();
            s.has_monthly_action = true;
        }
        assert_eq!(s.consecutive_use.count(ActionId::Training), 3);
        let report = execute(&mut s, ActionId::BusinessTrip.definition(), &config, &mut rng).unwrap();
        assert_eq!(report.cost_multiplier, 1.0);
        assert_eq!(s.consecutive_use.count(ActionId::Training), 0);
        assert_eq!(s.consecutive_use.count(ActionId::BusinessTrip), 1);
    }

    #[test]
    fn gamble_win() {
        let (mut s, config) = fresh();
        s.career_level = 2;
        s.stats.ability = 60.0;
        let report = execute(&mut s, ActionId::RiskTrading.definition(), &config, &mut always_win()).unwrap();
        let gamble = report.gamble.unwrap();
        assert!(gamble.won);
        assert!((gamble.success_chance - 0.68).abs() < 1e-9);
        assert_eq!(gamble.amount, 187_500);
        assert_eq!(s.stats.money, 50_000 + 187_500);
        assert_eq!(s.stats.ability, 65.0);
        assert_eq!(s.stats.risk, 20.0);
        assert!(s.log().any(|l| l.important && l.text.ends_with("+¥187,500")));
    }

    #[test]
    fn gamble_loss_scales_with_fatigue() {
        let (mut s, config) = fresh();
        s.career_level = 2;
        s.stats.money = 1_000_000;
        let mut rng = always_lose();
        for _ in 0..2 {
            execute(&mut s, ActionId::RiskTrading.definition(), &config, &mut rng).unwrap();
            s.has_monthly_action = true;
            s.stats.risk = 5.0;
            s.stats.ability = 50.0;
        }
        let money = s.stats.money;
        let report = execute(&mut s, ActionId::RiskTrading.definition(), &config, &mut rng).unwrap();
        let gamble = report.gamble.unwrap();
        assert!(!gamble.won);
        assert_eq!(gamble.amount, 144_000);
        assert_eq!(s.stats.money, money - 144_000);
        assert_eq!(s.stats.ability, 45.0);
        // Risk is never scaled.
        assert_eq!(s.stats.risk, 20.0);
        assert!(s.log().any(|l| l.text.ends_with("-¥144,000")));
    }

    #[test]
    fn gamble_with_nan_chance_loses_instead_of_panicking() {
        let (mut s, mut config) = fresh();
        config.gamble.base_success = f64::NAN;
        s.career_level = 2;
        let report = execute(&mut s, ActionId::RiskTrading.definition(), &config, &mut always_win()).unwrap();
        assert!(!report.gamble.unwrap().won);
        assert_eq!(s.stats.money, 50_000 - 80_000);
    }

    #[test]
    fn push_project_replaces_performance() {
        let (mut s, config) = fresh();
        s.stats.performance = 150.0;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let report = execute(&mut s, ActionId::PushProject.definition(), &config, &mut rng).unwrap();
        // Morale 50, network 25: no modifiers.
        assert_eq!(report.performance_gain, Some(50.0));
        assert_eq!(s.stats.performance, 50.0);
        assert_eq!(s.stats.ability, 53.0);
        assert_eq!(s.stats.energy, 80.0);
        assert_eq!(s.stats.risk, 10.0);
        assert_eq!(s.stats.money, 50_000 + 37_500);
    }

    #[test]
    fn push_project_bonuses() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let cases = [
            (85.0, 85.0, 75.0),
            (85.0, 65.0, 65.0),
            (30.0, 50.0, 40.0),
            (30.0, 60.0, 45.0),
            (80.0, 59.0, 50.0),
        ];
        for (morale, network, expected) in cases {
            let (mut s, config) = fresh();
            s.stats.team_morale = morale;
            s.stats.network = network;
            execute(&mut s, ActionId::PushProject.definition(), &config, &mut rng).unwrap();
            assert_eq!(s.stats.performance, expected, "morale {} network {}", morale, network);
        }
    }

    #[test]
    fn effects_are_clamped() {
        let (mut s, config) = fresh();
        s.stats.energy = 95.0;
        s.stats.performance = 50.0;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        execute(&mut s, ActionId::Rest.definition(), &config, &mut rng).unwrap();
        assert_eq!(s.stats.energy, 100.0);
    }
}
