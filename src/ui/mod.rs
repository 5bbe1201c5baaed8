//! Terminal front-end: input dispatch and the pop-up state machine.
//!
//! [`App`] drains the engine's notifications after every command and keeps
//! the latest snapshot for the renderer.

pub mod actions;
pub mod render;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::career::engine::{CareerEngine, Ending, EventPresentation, MonthAdvance, Notification, Snapshot};
use crate::input::InputEvent;

use actions::*;

/// Ticks per real-time second driven by the binary.
pub const TICKS_PER_SEC: u32 = 10;

/// A modal pop-up. While one is open only its own keys and clicks work.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// The month's slot is unused; "coast through it anyway?"
    ConfirmSkip,
    Event(EventPresentation),
    Ending(Ending),
}

pub struct App<R = ChaCha8Rng> {
    engine: CareerEngine<R>,
    snapshot: Snapshot,
    overlay: Option<Overlay>,
    notice: Option<String>,
    quit: bool,
}

impl<R: Rng> App<R> {
    pub fn new(engine: CareerEngine<R>) -> Self {
        let snapshot = engine.snapshot();
        let mut app = Self {
            engine,
            snapshot,
            overlay: None,
            notice: None,
            quit: false,
        };
        app.sync();
        app
    }

    pub fn engine(&self) -> &CareerEngine<R> {
        &self.engine
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// One-line message from the last rejected command.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn tick(&mut self, delta_ticks: u32) {
        if self.engine.tick(delta_ticks).is_some() {
            self.sync();
        }
    }

    /// Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        debug!(?event, "input");
        match event {
            InputEvent::Cancel => {
                if self.overlay == Some(Overlay::ConfirmSkip) {
                    self.overlay = None;
                } else {
                    self.quit = true;
                }
                true
            }
            InputEvent::Key(ch) => self.handle_key(*ch),
            InputEvent::Click(id) => self.handle_click(*id),
        }
    }

    fn handle_key(&mut self, ch: char) -> bool {
        match &self.overlay {
            Some(Overlay::ConfirmSkip) => match ch {
                'y' | '\n' => self.end_month(true),
                'n' => {
                    self.overlay = None;
                    true
                }
                _ => false,
            },
            Some(Overlay::Event(_)) => match ch.to_digit(10) {
                Some(n @ 1..=3) => self.choose(n as usize - 1),
                _ => false,
            },
            Some(Overlay::Ending(_)) => match ch {
                'r' => self.restart(),
                'q' => {
                    self.quit = true;
                    true
                }
                _ => false,
            },
            None => match ch {
                '0' => self.end_month(false),
                'q' => {
                    self.quit = true;
                    true
                }
                _ => match ch.to_digit(10) {
                    Some(n @ 1..=9) => self.act(n as usize - 1),
                    _ => false,
                },
            },
        }
    }

    fn handle_click(&mut self, id: u16) -> bool {
        match (&self.overlay, id) {
            (Some(Overlay::ConfirmSkip), CONFIRM_YES) => self.end_month(true),
            (Some(Overlay::ConfirmSkip), CONFIRM_NO) => {
                self.overlay = None;
                true
            }
            (Some(Overlay::Event(_)), id) if (CHOICE_BASE..CHOICE_BASE + 3).contains(&id) => {
                self.choose((id - CHOICE_BASE) as usize)
            }
            (Some(Overlay::Ending(_)), RESTART) => self.restart(),
            (Some(Overlay::Ending(_)), QUIT) => {
                self.quit = true;
                true
            }
            (None, END_MONTH) => self.end_month(false),
            (None, id) if (ACTION_BASE..ACTION_BASE + 8).contains(&id) => self.act((id - ACTION_BASE) as usize),
            _ => false,
        }
    }

    // ── Commands ───────────────────────────────────────────────────────

    fn act(&mut self, row: usize) -> bool {
        let Some(def) = self.engine.available_actions().get(row).copied() else {
            return false;
        };
        let result = self.engine.request_action(def.id).map(|_| ());
        self.finish(result);
        true
    }

    fn end_month(&mut self, confirmed: bool) -> bool {
        self.overlay = None;
        match self.engine.request_month_advance(confirmed) {
            Ok(MonthAdvance::ConfirmationRequired) => {
                self.overlay = Some(Overlay::ConfirmSkip);
                self.notice = None;
            }
            Ok(MonthAdvance::Advanced(_)) => self.finish(Ok(())),
            Err(e) => self.finish(Err(e)),
        }
        true
    }

    fn choose(&mut self, index: usize) -> bool {
        let Some(Overlay::Event(event)) = &self.overlay else {
            return false;
        };
        let id = event.id;
        let result = self.engine.request_event_choice(id, index).map(|_| ());
        if result.is_ok() {
            self.overlay = None;
        }
        self.finish(result);
        true
    }

    fn restart(&mut self) -> bool {
        self.engine.request_restart();
        self.overlay = None;
        self.notice = None;
        self.sync();
        true
    }

    fn finish(&mut self, result: crate::error::Result<()>) {
        self.notice = result.err().map(|e| e.to_string());
        self.sync();
    }

    fn sync(&mut self) {
        for notification in self.engine.drain_notifications() {
            match notification {
                Notification::StateChanged(snapshot) => self.snapshot = snapshot,
                Notification::EventPresented(event) => self.overlay = Some(Overlay::Event(event)),
                Notification::GameEnded(ending) => self.overlay = Some(Overlay::Ending(ending)),
            }
        }
    }
}
