//! Deferred tasks stepped by discrete ticks.
//!
//! The engine never sleeps. A driving loop feeds ticks in with
//! [`Scheduler::tick`] and runs whatever comes due.

/// Work that can be deferred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    /// Month-end triggered by an auto-advancing action.
    AdvanceMonth,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Scheduled {
    task: Task,
    due: u64,
}

/// Holds at most one pending task; scheduling again replaces it.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    now: u64,
    pending: Option<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, task: Task, delay_ticks: u32) {
        self.pending = Some(Scheduled {
            task,
            due: self.now + delay_ticks as u64,
        });
    }

    pub fn pending(&self) -> Option<Task> {
        self.pending.map(|s| s.task)
    }

    /// Ticks left until the pending task is due.
    pub fn remaining(&self) -> Option<u64> {
        self.pending.map(|s| s.due.saturating_sub(self.now))
    }

    /// Advance the clock and return the pending task if it came due.
    pub fn tick(&mut self, delta_ticks: u32) -> Option<Task> {
        self.now += delta_ticks as u64;
        match self.pending {
            Some(s) if s.due <= self.now => self.take(),
            _ => None,
        }
    }

    /// Remove the pending task regardless of its due time.
    pub fn take(&mut self) -> Option<Task> {
        self.pending.take().map(|s| s.task)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
