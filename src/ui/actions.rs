//! Semantic click IDs for the terminal front-end.

// ── Main screen ──────────────────────────────────────────────
pub const END_MONTH: u16 = 1;
pub const ACTION_BASE: u16 = 10; // +row index 0..7

// ── Skip confirmation ────────────────────────────────────────
pub const CONFIRM_YES: u16 = 30;
pub const CONFIRM_NO: u16 = 31;

// ── Event pop-up ─────────────────────────────────────────────
pub const CHOICE_BASE: u16 = 40; // +choice index 0..2

// ── Ending pop-up ────────────────────────────────────────────
pub const RESTART: u16 = 50;
pub const QUIT: u16 = 51;
