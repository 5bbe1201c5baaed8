//! Front-end input: normalized events and mouse hit-testing.
//!
//! Renderers register a [`ClickTarget`] for every clickable row while they
//! draw; a later mouse click is resolved against those rectangles.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

/// Keyboard and mouse input, reduced to what the game reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(char),
    /// Esc or Ctrl-C.
    Cancel,
    /// A click on a registered target, identified by its semantic ID.
    Click(u16),
}

impl InputEvent {
    /// Translate a key press. Releases, repeats and unhandled keys map to `None`.
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(InputEvent::Cancel),
            KeyCode::Char(c) => Some(InputEvent::Key(c.to_ascii_lowercase())),
            KeyCode::Enter => Some(InputEvent::Key('\n')),
            KeyCode::Esc => Some(InputEvent::Cancel),
            _ => None,
        }
    }

    /// Resolve a left click against the registered targets.
    pub fn from_mouse(mouse: MouseEvent, clicks: &ClickState) -> Option<Self> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => clicks.hit_test(mouse.column, mouse.row).map(InputEvent::Click),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClickTarget {
    /// Hit region in terminal cells.
    pub rect: Rect,
    pub id: u16,
}

/// Click targets registered during the last frame.
#[derive(Debug, Default)]
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
}

impl ClickState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, id: u16) {
        self.targets.push(ClickTarget { rect, id });
    }

    /// Register a full-width target for one row of `area`. Rows outside the
    /// area are ignored.
    pub fn add_row_target(&mut self, area: Rect, row: u16, id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), id);
        }
    }

    /// The ID under a cell. Later targets sit on top of earlier ones, so an
    /// overlay registered after the main screen wins.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            let inside = col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height;
            inside.then_some(t.id)
        })
    }
}

/// Terminals narrower than this get the single-column layout.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 80
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn hit_test_rows() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 10, 80, 1), 1);
        cs.add_click_target(Rect::new(0, 11, 80, 1), 2);
        assert_eq!(cs.hit_test(5, 10), Some(1));
        assert_eq!(cs.hit_test(5, 11), Some(2));
        assert_eq!(cs.hit_test(5, 12), None);
        assert_eq!(cs.hit_test(80, 10), None);
    }

    #[test]
    fn later_targets_win() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 5, 80, 1), 1);
        cs.add_click_target(Rect::new(20, 3, 40, 5), 2);
        assert_eq!(cs.hit_test(25, 5), Some(2));
        assert_eq!(cs.hit_test(5, 5), Some(1));
    }

    #[test]
    fn row_target_outside_area_is_ignored() {
        let mut cs = ClickState::new();
        let area = Rect::new(5, 10, 30, 5);
        cs.add_row_target(area, 9, 99);
        cs.add_row_target(area, 15, 98);
        assert!(cs.targets.is_empty());
        cs.add_row_target(area, 12, 97);
        assert_eq!(cs.hit_test(6, 12), Some(97));
        assert_eq!(cs.hit_test(4, 12), None);
    }

    #[test]
    fn clear_removes_everything() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 1, 80, 1), 1);
        cs.clear_targets();
        assert_eq!(cs.hit_test(0, 1), None);
    }

    #[test]
    fn keys_are_normalized() {
        assert_eq!(InputEvent::from_key(press(KeyCode::Char('Y'))), Some(InputEvent::Key('y')));
        assert_eq!(InputEvent::from_key(press(KeyCode::Char('3'))), Some(InputEvent::Key('3')));
        assert_eq!(InputEvent::from_key(press(KeyCode::Esc)), Some(InputEvent::Cancel));
        assert_eq!(
            InputEvent::from_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(InputEvent::Cancel)
        );
        assert_eq!(InputEvent::from_key(press(KeyCode::Tab)), None);

        let release = KeyEvent {
            code: KeyCode::Char('1'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(InputEvent::from_key(release), None);
    }

    #[test]
    fn mouse_clicks_are_hit_tested() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 4, 20, 1), 7);
        assert_eq!(InputEvent::from_mouse(click(3, 4), &cs), Some(InputEvent::Click(7)));
        assert_eq!(InputEvent::from_mouse(click(3, 5), &cs), None);

        let moved = MouseEvent {
            kind: MouseEventKind::Moved,
            ..click(3, 4)
        };
        assert_eq!(InputEvent::from_mouse(moved, &cs), None);
    }

    #[test]
    fn narrow_layout_threshold() {
        assert!(is_narrow_layout(60));
        assert!(is_narrow_layout(79));
        assert!(!is_narrow_layout(80));
    }
}
