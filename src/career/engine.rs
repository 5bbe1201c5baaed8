//! The session facade: owns the player state, the random generator, the
//! scheduler and the outbound notification queue.
//!
//! Every command either applies completely or returns an error and leaves
//! the session untouched.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

use super::actions::{self, ActionDefinition, ActionId, ActionReport};
use super::clock::{self, MonthReport};
use super::events::{self, EventChoice, EventId, EventRoll};
use super::outcome::{self, Outcome};
use super::schedule::{Scheduler, Task};
use super::state::{LogEntry, PlayerState, Stats};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};

/// Everything the front-end needs to draw the main screen.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub stats: Stats,
    pub tier: usize,
    pub tier_name: &'static str,
    pub tier_display_name: &'static str,
    pub year: i32,
    pub month: u32,
    pub has_monthly_action: bool,
    /// An auto-advance is scheduled and will end the month shortly.
    pub advance_pending: bool,
    pub stable_years: u32,
    pub career_years: u32,
    pub career_months: u32,
    /// Most recent action and how many times in a row it was used.
    pub streak: Option<(ActionId, u32)>,
    pub log: Vec<LogEntry>,
    pub is_game_over: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EventPresentation {
    pub id: EventId,
    pub title: &'static str,
    pub description: &'static str,
    pub choices: Vec<&'static str>,
}

impl EventPresentation {
    fn of(id: EventId) -> Self {
        let def = id.definition();
        Self {
            id,
            title: def.title,
            description: def.description,
            choices: def.choices.iter().map(|c| c.label).collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndingKind {
    Victory,
    Failure,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ending {
    pub kind: EndingKind,
    pub outcome: Outcome,
    pub title: &'static str,
    pub description: String,
    pub snapshot: Snapshot,
}

/// Outbound messages, drained by the presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    StateChanged(Snapshot),
    EventPresented(EventPresentation),
    GameEnded(Ending),
}

/// Result of a completed month advance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MonthSummary {
    pub report: MonthReport,
    /// Event now waiting for a choice, if one triggered.
    pub event: Option<EventId>,
    pub outcome: Outcome,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum MonthAdvance {
    Advanced(MonthSummary),
    /// The month's action slot is unused; ask the player before skipping it.
    ConfirmationRequired,
}

pub struct CareerEngine<R = ChaCha8Rng> {
    config: EngineConfig,
    state: PlayerState,
    rng: R,
    scheduler: Scheduler,
    pending_event: Option<EventId>,
    outcome: Outcome,
    ending: Option<Ending>,
    ending_unsent: bool,
    notifications: VecDeque<Notification>,
}

impl CareerEngine<ChaCha8Rng> {
    pub fn seeded(config: EngineConfig, seed: u64) -> Self {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> CareerEngine<R> {
    /// Start a fresh career.
    pub fn with_rng(config: EngineConfig, rng: R) -> Self {
        let state = PlayerState::new(&config);
        let mut engine = Self::build(config, state, rng);
        engine.welcome();
        engine.evaluate();
        engine.publish(None);
        engine
    }

    /// Resume from an arbitrary state. A state that already meets an ending
    /// condition is ended immediately.
    pub fn from_state(config: EngineConfig, state: PlayerState, rng: R) -> Self {
        let mut engine = Self::build(config, state, rng);
        engine.evaluate();
        engine.publish(None);
        engine
    }

    fn build(config: EngineConfig, state: PlayerState, rng: R) -> Self {
        Self {
            config,
            state,
            rng,
            scheduler: Scheduler::new(),
            pending_event: None,
            outcome: Outcome::Ongoing,
            ending: None,
            ending_unsent: false,
            notifications: VecDeque::new(),
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn ending(&self) -> Option<&Ending> {
        self.ending.as_ref()
    }

    pub fn pending_event(&self) -> Option<EventPresentation> {
        self.pending_event.map(EventPresentation::of)
    }

    pub fn is_advance_pending(&self) -> bool {
        self.scheduler.pending() == Some(Task::AdvanceMonth)
    }

    pub fn available_actions(&self) -> Vec<&'static ActionDefinition> {
        actions::list_available(&self.state)
    }

    pub fn snapshot(&self) -> Snapshot {
        let s = &self.state;
        let tier = s.current_tier();
        let (career_years, career_months) = s.career_length();
        Snapshot {
            stats: s.stats.clone(),
            tier: s.career_level,
            tier_name: tier.name,
            tier_display_name: tier.display_name,
            year: s.year,
            month: s.month,
            has_monthly_action: s.has_monthly_action,
            advance_pending: self.is_advance_pending(),
            stable_years: s.stable_years,
            career_years,
            career_months,
            streak: s.consecutive_use.current(),
            log: s.recent_log(self.config.log.display),
            is_game_over: s.is_game_over,
        }
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    // ── Commands ──────────────────────────────────────────────────────

    /// Spend this month's slot on `id`.
    pub fn request_action(&mut self, id: ActionId) -> Result<ActionReport> {
        self.ensure_playable()?;
        let report = actions::execute(&mut self.state, id.definition(), &self.config, &mut self.rng)?;

        let outcome = self.evaluate();
        if report.auto_advance && !outcome.is_over() {
            self.scheduler
                .schedule(Task::AdvanceMonth, self.config.auto_advance_delay_ticks);
        }
        self.publish(None);
        Ok(report)
    }

    /// End the current month. Skipping a month without using the action
    /// slot needs `confirmed`.
    pub fn request_month_advance(&mut self, confirmed: bool) -> Result<MonthAdvance> {
        self.ensure_playable()?;
        if self.state.has_monthly_action && !confirmed {
            return Ok(MonthAdvance::ConfirmationRequired);
        }
        // An explicit request supersedes a scheduled one.
        self.scheduler.cancel();
        Ok(MonthAdvance::Advanced(self.advance_month()))
    }

    /// Resolve the open event with choice `index`.
    pub fn request_event_choice(&mut self, event: EventId, index: usize) -> Result<&'static EventChoice> {
        if self.state.is_game_over {
            return Err(EngineError::InvalidTransitionAfterGameOver);
        }
        if self.pending_event != Some(event) {
            return Err(EngineError::EventNotPending(event));
        }
        let choice = events::apply_choice(&mut self.state, event.definition(), index, &self.config)?;
        self.pending_event = None;
        self.evaluate();
        self.publish(None);
        Ok(choice)
    }

    /// Throw the current career away and start over. Allowed at any time.
    pub fn request_restart(&mut self) {
        self.state = PlayerState::new(&self.config);
        self.scheduler.cancel();
        self.pending_event = None;
        self.outcome = Outcome::Ongoing;
        self.ending = None;
        self.ending_unsent = false;
        self.welcome();
        info!("career restarted");
        self.evaluate();
        self.publish(None);
    }

    /// Ticks until the scheduled month-end runs, if one is pending.
    pub fn advance_due_in(&self) -> Option<u64> {
        self.scheduler.remaining()
    }

    /// Feed elapsed ticks; runs the scheduled month-end once it is due.
    pub fn tick(&mut self, delta_ticks: u32) -> Option<MonthSummary> {
        match self.scheduler.tick(delta_ticks) {
            Some(Task::AdvanceMonth) => self.run_deferred_advance(),
            None => None,
        }
    }

    /// Run the scheduled month-end now, without waiting for its ticks.
    pub fn run_scheduled(&mut self) -> Option<MonthSummary> {
        match self.scheduler.take() {
            Some(Task::AdvanceMonth) => self.run_deferred_advance(),
            None => None,
        }
    }

    // ── Internals ─────────────────────────────────────────────────────

    fn ensure_playable(&self) -> Result<()> {
        if self.state.is_game_over {
            return Err(EngineError::InvalidTransitionAfterGameOver);
        }
        if let Some(event) = self.pending_event {
            return Err(EngineError::AwaitingEventChoice(event));
        }
        Ok(())
    }

    fn run_deferred_advance(&mut self) -> Option<MonthSummary> {
        if self.state.is_game_over || self.pending_event.is_some() {
            debug!("deferred month advance dropped");
            return None;
        }
        Some(self.advance_month())
    }

    fn advance_month(&mut self) -> MonthSummary {
        let idle = self.state.has_monthly_action;
        let report = clock::advance_month(&mut self.state, &self.config);
        if idle {
            self.state.add_log(format!(
                "Coasted through the month. Now {}-{:02}.",
                self.state.year, self.state.month
            ));
        } else {
            self.state
                .add_log(format!("Now {}-{:02}.", self.state.year, self.state.month));
        }

        let outcome = self.evaluate();
        let mut event = None;
        if !outcome.is_over() {
            if let EventRoll::Triggered(_, id) = events::try_trigger(&mut self.state, &self.config, &mut self.rng) {
                self.pending_event = Some(id);
                event = Some(id);
            }
        }
        self.publish(event);

        MonthSummary {
            report,
            event,
            outcome,
        }
    }

    /// Check ending conditions; on the first terminal result freeze the
    /// session and record the ending.
    fn evaluate(&mut self) -> Outcome {
        if self.outcome.is_over() {
            return self.outcome;
        }
        let outcome = outcome::evaluate(&self.state, &self.config.goals);
        let kind = match outcome {
            Outcome::Ongoing => return outcome,
            Outcome::Failure(_) => EndingKind::Failure,
            Outcome::Victory(_) => EndingKind::Victory,
        };

        self.outcome = outcome;
        self.state.is_game_over = true;
        self.scheduler.cancel();
        self.pending_event = None;
        self.state
            .add_important(format!("Game over: {}", outcome.title()));
        info!(?outcome, year = self.state.year, month = self.state.month, "career ended");

        self.ending_unsent = true;
        self.ending = Some(Ending {
            kind,
            outcome,
            title: outcome.title(),
            description: outcome.description(&self.state),
            snapshot: self.snapshot(),
        });
        outcome
    }

    fn publish(&mut self, event: Option<EventId>) {
        self.notify_state();
        if let Some(id) = event {
            self.notifications
                .push_back(Notification::EventPresented(EventPresentation::of(id)));
        }
        if self.ending_unsent {
            if let Some(ending) = &self.ending {
                self.notifications
                    .push_back(Notification::GameEnded(ending.clone()));
            }
            self.ending_unsent = false;
        }
    }

    fn notify_state(&mut self) {
        let snapshot = self.snapshot();
        self.notifications
            .push_back(Notification::StateChanged(snapshot));
    }

    fn welcome(&mut self) {
        self.state.add_log("Welcome to the finance industry.");
        self.state
            .add_log("You start as a Junior Analyst. One action per month, choose wisely.");
        self.state.add_log(format!(
            "It is {}-{:02}.",
            self.state.year, self.state.month
        ));
    }
}
