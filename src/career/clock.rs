//! Calendar progression: monthly salary and decay, year-end settlement,
//! promotion and the stable-development streak.

use serde::Serialize;
use tracing::{debug, info};

use super::format::{format_money, format_money_signed};
use super::state::{promotion_rule, PlayerState, TIERS, TIER_COUNT};
use crate::config::{EngineConfig, Goals};

/// What happened at a year-end settlement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SettlementReport {
    /// The year that just closed.
    pub closed_year: i32,
    pub bonus: i64,
    pub carried_performance: f64,
    /// New tier index, if the player was promoted.
    pub promoted_to: Option<usize>,
    pub stable_year: bool,
    pub stable_years: u32,
}

/// What happened when the calendar moved forward one month.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MonthReport {
    pub year: i32,
    pub month: u32,
    pub salary: i64,
    pub settlement: Option<SettlementReport>,
}

pub fn monthly_salary(tier: usize, config: &EngineConfig) -> i64 {
    config.salaries[tier.min(TIER_COUNT - 1)]
}

/// Move to the next month, settling the year on a December rollover.
pub fn advance_month(state: &mut PlayerState, config: &EngineConfig) -> MonthReport {
    state.month += 1;
    let settlement = if state.month > 12 {
        state.month = 1;
        state.year += 1;
        Some(annual_settlement(state, config))
    } else {
        None
    };

    state.has_monthly_action = true;
    state.consecutive_use.reset();

    let salary = monthly_salary(state.career_level, config);
    state.stats.money += salary;
    state.add_log(format!("Monthly salary paid: {}", format_money_signed(salary)));

    state.stats.energy -= 1.0;
    if state.stats.ability < config.goals.ability_plateau {
        state.stats.ability -= 1.0;
    }
    if state.month == 1 {
        state.stats.team_morale += config.goals.january_morale_bonus;
    }
    state.clamp(&config.limits);

    debug!(year = state.year, month = state.month, salary, "month advanced");
    MonthReport {
        year: state.year,
        month: state.month,
        salary,
        settlement,
    }
}

/// Year-end bookkeeping: bonus, energy refill, performance carry-over,
/// promotion and the stability streak.
///
/// Promotion is judged on the performance of the closing year, before the
/// carry-over shrinks it.
pub fn annual_settlement(state: &mut PlayerState, config: &EngineConfig) -> SettlementReport {
    let goals = &config.goals;
    let closed_year = state.year - 1;
    let year_performance = state.stats.performance;

    let bonus = (year_performance * goals.bonus_per_performance).floor() as i64;
    state.stats.money += bonus;
    state.add_important(format!(
        "Year-end {}: performance {}, bonus {}",
        closed_year,
        year_performance,
        format_money(bonus)
    ));

    state.stats.energy = (state.stats.energy + goals.annual_energy_bonus).min(config.limits.max_stat);
    state.add_log(format!(
        "Holiday break: energy +{}",
        goals.annual_energy_bonus
    ));

    let promoted_to = check_promotion(state, year_performance);

    let carried_performance = (year_performance * goals.performance_carry).floor();
    state.stats.performance = carried_performance;
    state.add_log(format!(
        "{}% of performance carries over: {}",
        (goals.performance_carry * 100.0).round(),
        carried_performance
    ));

    let stable_year = check_stable_development(state, goals);

    SettlementReport {
        closed_year,
        bonus,
        carried_performance,
        promoted_to,
        stable_year,
        stable_years: state.stable_years,
    }
}

/// Promote by exactly one tier if the current tier's thresholds are all met.
/// Returns the new tier index.
pub fn check_promotion(state: &mut PlayerState, performance: f64) -> Option<usize> {
    let rule = promotion_rule(state.career_level)?;
    let stats = &state.stats;
    if stats.ability < rule.min_ability
        || performance < rule.min_performance
        || stats.executive < rule.min_executive
    {
        return None;
    }

    state.career_level = rule.next_tier;
    let tier = &TIERS[rule.next_tier];
    state.add_important(format!("Promoted! You are now a {}.", tier.display_name));
    info!(tier = tier.name, year = state.year, "promotion");
    Some(rule.next_tier)
}

/// Extend the stability streak if all six core stats clear the threshold,
/// otherwise reset it. Returns whether this year qualified.
pub fn check_stable_development(state: &mut PlayerState, goals: &Goals) -> bool {
    let s = &state.stats;
    let stable = [
        s.energy,
        s.reputation,
        s.executive,
        s.network,
        s.ability,
        s.team_morale,
    ]
    .iter()
    .all(|&v| v >= goals.stable_threshold);

    if stable {
        state.stable_years += 1;
        state.add_important(format!(
            "Stable year {}/{}",
            state.stable_years, goals.stable_years_to_win
        ));
    } else {
        if state.stable_years > 0 {
            state.add_log("The stable streak is broken.");
        }
        state.stable_years = 0;
    }
    stable
}
