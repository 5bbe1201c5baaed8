//! Clickable list: rendered lines paired with the click targets they own.

use ratatui::layout::Rect;
use ratatui::text::Line;

use crate::input::ClickState;

/// Lines for a `Paragraph`, some of them bound to a click ID.
///
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push(Line::from("Actions"));
/// cl.push_clickable(Line::from(" [1] Rest"), ACTION_BASE);
/// cl.register_targets(area, &mut cs, 1, 1);
/// f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
/// ```
#[derive(Default)]
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, id)`
    targets: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    /// Add a line that reacts to clicks. The target follows the line, so
    /// lines pushed before it shift it down automatically.
    pub fn push_clickable(&mut self, line: Line<'a>, id: u16) {
        self.targets.push((self.lines.len() as u16, id));
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register a row target for each clickable line that is visible in
    /// `area`. `top_offset` and `bottom_offset` are the rows taken by the
    /// block's borders. Lines are assumed not to wrap.
    pub fn register_targets(&self, area: Rect, cs: &mut ClickState, top_offset: u16, bottom_offset: u16) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);
        for &(line, id) in &self.targets {
            let row = content_y + line;
            if row < content_end {
                cs.add_row_target(area, row, id);
            }
        }
    }
}
