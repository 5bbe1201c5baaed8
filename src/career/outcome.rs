//! Win and loss conditions.

use serde::Serialize;

use super::state::PlayerState;
use crate::config::Goals;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Burnout,
    Disgrace,
    Prison,
    Bankruptcy,
    Outcast,
    Dismissal,
    Sidelined,
    Incompetence,
    Mutiny,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryKind {
    Partnership,
    FinancialFreedom,
    IndustryLegend,
    SteadyMaster,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result", content = "kind")]
pub enum Outcome {
    Ongoing,
    Failure(FailureKind),
    Victory(VictoryKind),
}

impl Outcome {
    pub fn is_over(self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }
}

/// Failures first, then victories; the first match wins.
pub fn evaluate(state: &PlayerState, goals: &Goals) -> Outcome {
    let s = &state.stats;

    let failure = if s.energy <= 0.0 {
        Some(FailureKind::Burnout)
    } else if s.reputation <= 0.0 {
        Some(FailureKind::Disgrace)
    } else if s.risk >= 100.0 {
        Some(FailureKind::Prison)
    } else if s.money < goals.bankruptcy_floor {
        Some(FailureKind::Bankruptcy)
    } else if s.network <= 0.0 {
        Some(FailureKind::Outcast)
    } else if s.performance <= 0.0 {
        Some(FailureKind::Dismissal)
    } else if s.executive <= 0.0 {
        Some(FailureKind::Sidelined)
    } else if s.ability <= 0.0 {
        Some(FailureKind::Incompetence)
    } else if s.team_morale <= 0.0 {
        Some(FailureKind::Mutiny)
    } else {
        None
    };
    if let Some(kind) = failure {
        return Outcome::Failure(kind);
    }

    if state.is_terminal_tier() {
        Outcome::Victory(VictoryKind::Partnership)
    } else if s.money >= goals.wealth_target {
        Outcome::Victory(VictoryKind::FinancialFreedom)
    } else if s.reputation >= goals.legend_threshold && s.ability >= goals.legend_threshold {
        Outcome::Victory(VictoryKind::IndustryLegend)
    } else if state.stable_years >= goals.stable_years_to_win {
        Outcome::Victory(VictoryKind::SteadyMaster)
    } else {
        Outcome::Ongoing
    }
}

impl FailureKind {
    pub fn title(self) -> &'static str {
        match self {
            FailureKind::Burnout => "Total burnout",
            FailureKind::Disgrace => "Social death",
            FailureKind::Prison => "Silver bracelets",
            FailureKind::Bankruptcy => "Bankruptcy",
            FailureKind::Outcast => "Out of the circle",
            FailureKind::Dismissal => "Performance exit",
            FailureKind::Sidelined => "Glass ceiling",
            FailureKind::Incompetence => "Out of your depth",
            FailureKind::Mutiny => "Abandoned by all",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FailureKind::Burnout => {
                "You worked yourself into intensive care. The doctor says your checkup reads like a horror novel. \
                 The firm sends flowers, then quietly removes you from the group chat."
            }
            FailureKind::Disgrace => {
                "Your name is mud. You have a reserved seat on the industry blacklist and HR shreds your CV on sight."
            }
            FailureKind::Prison => {
                "Your \"innovative\" trades were discovered. A massive fine and a prison sentence later, \
                 you reflect behind bars: maybe be a little less financial."
            }
            FailureKind::Bankruptcy => {
                "Five million in debt. You achieved freedom, of the negative kind. \
                 The banks and your creditors are lining up to sue."
            }
            FailureKind::Outcast => {
                "Nobody in the industry takes your calls any more. In finance, no circle means no career."
            }
            FailureKind::Dismissal => {
                "Your numbers hit zero. HR explains that the company's ceiling cannot contain your talent. \
                 Your badge stops working the same afternoon."
            }
            FailureKind::Sidelined => {
                "Management looks straight through you. No promotions, no key projects, \
                 nobody even tells you where to sit in meetings."
            }
            FailureKind::Incompetence => {
                "Your skills have decayed to intern level. Clients ask for someone else \
                 and the firm is considering a transfer to the coffee-ordering department."
            }
            FailureKind::Mutiny => {
                "Your team has lost all faith. They resign together and leave you a general without an army."
            }
        }
    }
}

impl VictoryKind {
    pub fn title(self) -> &'static str {
        match self {
            VictoryKind::Partnership => "Made it ashore",
            VictoryKind::FinancialFreedom => "Financial freedom",
            VictoryKind::IndustryLegend => "Industry legend",
            VictoryKind::SteadyMaster => "Steady master",
        }
    }

    /// Ending text. The partnership ending mentions how long the climb took.
    pub fn description(self, state: &PlayerState) -> String {
        match self {
            VictoryKind::Partnership => {
                let (years, months) = state.career_length();
                let length = if years > 0 {
                    format!("{} years and {} months", years, months)
                } else {
                    format!("{} months", months)
                };
                format!(
                    "Congratulations! After {} of grinding you reached the top floor. \
                     Now it is your turn to squeeze the juniors. They call it \"passing it on\".",
                    length
                )
            }
            VictoryKind::FinancialFreedom => "Fifty million in the bank. On your last day you drop the resignation \
                 letter on the boss's desk, post \"I quit!\" and walk out a legend."
                .to_string(),
            VictoryKind::IndustryLegend => "You became a legend of the finance world. People add \"respect\" \
                 whenever your name comes up. You know it was luck and a thick skin. Stay humble."
                .to_string(),
            VictoryKind::SteadyMaster => "Five straight years with every core stat above 80. In the chaos of \
                 finance that is a miracle. HR uses you as a case study."
                .to_string(),
        }
    }
}

impl Outcome {
    pub fn title(self) -> &'static str {
        match self {
            Outcome::Ongoing => "",
            Outcome::Failure(kind) => kind.title(),
            Outcome::Victory(kind) => kind.title(),
        }
    }

    pub fn description(self, state: &PlayerState) -> String {
        match self {
            Outcome::Ongoing => String::new(),
            Outcome::Failure(kind) => kind.description().to_string(),
            Outcome::Victory(kind) => kind.description(state),
        }
    }
}
