//! Drawing (read-only from the app state). Click targets are registered
//! while drawing, so every `[X]` label must go through `push_clickable`.

use rand::Rng;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::career::actions::{cost_multiplier, ActionDefinition};
use crate::career::engine::{Ending, EndingKind, EventPresentation, Snapshot};
use crate::career::format::{format_money, format_money_short};
use crate::career::state::{promotion_rule, Stat, TIERS};
use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::ClickableList;

use super::actions::*;
use super::{App, Overlay, TICKS_PER_SEC};

pub fn draw<R: Rng>(f: &mut Frame, app: &App<R>, cs: &mut ClickState) {
    cs.clear_targets();
    let area = f.area();
    let narrow = is_narrow_layout(area.width);
    let borders = if narrow {
        Borders::TOP | Borders::BOTTOM
    } else {
        Borders::ALL
    };
    let snap = app.snapshot();

    let [header, body, log, help] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(12),
        Constraint::Length(app.engine().config().log.display as u16 + 2),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(snap, app.engine().advance_due_in(), f, header, borders);
    if narrow {
        let [stats, actions] = Layout::vertical([Constraint::Length(13), Constraint::Min(6)]).areas(body);
        render_stats(snap, f, stats, borders, 12);
        render_actions(app, f, actions, borders, cs);
    } else {
        let [stats, actions] = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(body);
        render_stats(snap, f, stats, borders, 16);
        render_actions(app, f, actions, borders, cs);
    }
    render_log(snap, f, log, borders);
    render_help(app, f, help);

    match app.overlay() {
        Some(Overlay::ConfirmSkip) => render_confirm(f, area, cs),
        Some(Overlay::Event(event)) => render_event(event, f, area, cs),
        Some(Overlay::Ending(ending)) => render_ending(ending, f, area, cs),
        None => {}
    }
}

// ── Main screen ────────────────────────────────────────────────────────

fn render_header(snap: &Snapshot, due_in: Option<u64>, f: &mut Frame, area: Rect, borders: Borders) {
    let slot = if let Some(ticks) = due_in {
        Span::styled(
            format!("month ends in {:.1}s", ticks as f64 / TICKS_PER_SEC as f64),
            Style::default().fg(Color::DarkGray),
        )
    } else if snap.has_monthly_action {
        Span::styled("action available", Style::default().fg(Color::Green))
    } else {
        Span::styled("action used", Style::default().fg(Color::Yellow))
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(" Title: ", Style::default().fg(Color::Gray)),
            Span::styled(
                snap.tier_display_name,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({}/{})", snap.tier + 1, TIERS.len()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(vec![
            Span::styled(" Date: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}-{:02}", snap.year, snap.month),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                format!("  in the industry {}y {}m  ", snap.career_years, snap.career_months),
                Style::default().fg(Color::DarkGray),
            ),
            slot,
        ]),
    ];

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Finance Elite Simulator ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_stats(snap: &Snapshot, f: &mut Frame, area: Rect, borders: Borders, bar_width: usize) {
    const BARS: [(Stat, f64, Color); 8] = [
        (Stat::Energy, 100.0, Color::Green),
        (Stat::Reputation, 100.0, Color::Magenta),
        (Stat::Executive, 100.0, Color::Blue),
        (Stat::Network, 100.0, Color::Cyan),
        (Stat::Ability, 100.0, Color::Yellow),
        (Stat::TeamMorale, 100.0, Color::LightGreen),
        (Stat::Performance, 200.0, Color::White),
        (Stat::Risk, 100.0, Color::Red),
    ];

    let s = &snap.stats;
    let mut lines: Vec<Line> = BARS
        .iter()
        .map(|&(stat, max, color)| stat_line(stat.label(), s.get(stat), max, bar_width, color))
        .collect();
    lines.push(Line::from(vec![
        Span::styled(format!(" {:<15}", Stat::Money.label()), Style::default().fg(Color::Gray)),
        Span::styled(
            format_money(s.money),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ]));

    if let Some(rule) = promotion_rule(snap.tier) {
        lines.push(Line::from(Span::styled(
            format!(
                " Next: {} (abi {} perf {} exec {})",
                TIERS[rule.next_tier].display_name, rule.min_ability, rule.min_performance, rule.min_executive
            ),
            Style::default().fg(Color::DarkGray),
        )));
    }
    if snap.stable_years > 0 {
        lines.push(Line::from(Span::styled(
            format!(" Stable years: {}", snap.stable_years),
            Style::default().fg(Color::Green),
        )));
    }

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Green))
        .title(" Status ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn stat_line(label: &str, value: f64, max: f64, bar_width: usize, color: Color) -> Line<'static> {
    let ratio = (value / max).clamp(0.0, 1.0);
    let filled = (ratio * bar_width as f64).round() as usize;
    let bar = "█".repeat(filled) + &"░".repeat(bar_width - filled);
    let value_color = if value <= 20.0 { Color::Red } else { Color::White };

    Line::from(vec![
        Span::styled(format!(" {:<14} ", label), Style::default().fg(Color::Gray)),
        Span::styled(bar, Style::default().fg(color)),
        Span::styled(format!(" {:.0}", value), Style::default().fg(value_color)),
    ])
}

fn render_actions<R: Rng>(app: &App<R>, f: &mut Frame, area: Rect, borders: Borders, cs: &mut ClickState) {
    let snap = app.snapshot();
    let open = snap.has_monthly_action && !snap.is_game_over;
    let mut cl = ClickableList::new();

    for (i, def) in app.engine().available_actions().into_iter().enumerate() {
        let next_run = match snap.streak {
            Some((id, run)) if id == def.id => run + 1,
            _ => 1,
        };
        push_action(&mut cl, i, def, cost_multiplier(next_run), open);
    }
    cl.push(Line::from(""));
    let end_style = if snap.is_game_over {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [0] ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled("End the month", end_style),
        ]),
        END_MONTH,
    );

    let top = if borders.contains(Borders::TOP) { 1 } else { 0 };
    let bottom = if borders.contains(Borders::BOTTOM) { 1 } else { 0 };
    cl.register_targets(area, cs, top, bottom);

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Actions ");
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn push_action(cl: &mut ClickableList, row: usize, def: &ActionDefinition, next_cost: f64, open: bool) {
    let (key_color, name_color) = if open {
        (Color::Cyan, Color::White)
    } else {
        (Color::DarkGray, Color::DarkGray)
    };
    let mut spans = vec![
        Span::styled(
            format!(" [{}] ", row + 1),
            Style::default().fg(key_color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(def.name, Style::default().fg(name_color)),
    ];
    if !def.auto_advance {
        spans.push(Span::styled(" +", Style::default().fg(Color::DarkGray)));
    }
    if next_cost > 1.0 {
        spans.push(Span::styled(
            format!(" x{:.1}", next_cost),
            Style::default().fg(Color::Red),
        ));
    }
    cl.push_clickable(Line::from(spans), ACTION_BASE + row as u16);
}

fn render_log(snap: &Snapshot, f: &mut Frame, area: Rect, borders: Borders) {
    let max_lines = area.height.saturating_sub(2) as usize;
    let start = snap.log.len().saturating_sub(max_lines);
    let lines: Vec<Line> = snap.log[start..]
        .iter()
        .map(|entry| {
            let style = if entry.important {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(format!(" > {}", entry.text), style))
        })
        .collect();

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Log ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help<R: Rng>(app: &App<R>, f: &mut Frame, area: Rect) {
    let line = match app.notice() {
        Some(notice) => Line::from(Span::styled(format!(" ! {}", notice), Style::default().fg(Color::Red))),
        None => Line::from(Span::styled(
            format!(
                " 1-8 act · 0 end month · q quit · money {}",
                format_money_short(app.snapshot().stats.money)
            ),
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

// ── Pop-ups ────────────────────────────────────────────────────────────

fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// A bordered pop-up: wrapped text on top, a clickable menu below.
fn render_popup(
    f: &mut Frame,
    area: Rect,
    title: String,
    color: Color,
    text: Vec<Line<'static>>,
    menu: ClickableList,
    cs: &mut ClickState,
) {
    let menu_height = menu.len() as u16;
    let popup = area;
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD)));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let [text_area, menu_area] = Layout::vertical([Constraint::Min(1), Constraint::Length(menu_height)]).areas(inner);
    f.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), text_area);
    menu.register_targets(menu_area, cs, 0, 0);
    f.render_widget(Paragraph::new(menu.into_lines()), menu_area);
}

fn push_choice(cl: &mut ClickableList, key: char, label: &str, id: u16) {
    cl.push_clickable(
        Line::from(vec![
            Span::styled(
                format!(" [{}] ", key),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(label.to_string(), Style::default().fg(Color::White)),
        ]),
        id,
    );
}

fn render_confirm(f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let text = vec![
        Line::from(""),
        Line::from(" Nothing big happened this month."),
        Line::from(" Coast through it anyway?"),
    ];
    let mut menu = ClickableList::new();
    push_choice(&mut menu, 'Y', "Yes, end the month", CONFIRM_YES);
    push_choice(&mut menu, 'N', "No, go back", CONFIRM_NO);
    let popup = popup_area(area, 50, 9);
    render_popup(f, popup, " End the month? ".to_string(), Color::Yellow, text, menu, cs);
}

fn render_event(event: &EventPresentation, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let text = vec![Line::from(""), Line::from(format!(" {}", event.description))];
    let mut menu = ClickableList::new();
    for (i, label) in event.choices.iter().enumerate() {
        let key = char::from_digit(i as u32 + 1, 10).unwrap_or('?');
        push_choice(&mut menu, key, label, CHOICE_BASE + i as u16);
    }
    let popup = popup_area(area, 70, 12);
    render_popup(f, popup, format!(" {} ", event.title), Color::Magenta, text, menu, cs);
}

fn render_ending(ending: &Ending, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let color = match ending.kind {
        EndingKind::Victory => Color::Green,
        EndingKind::Failure => Color::Red,
    };
    let s = &ending.snapshot;
    let text = vec![
        Line::from(""),
        Line::from(format!(" {}", ending.description)),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                " {} after {}y {}m, money {}",
                s.tier_display_name,
                s.career_years,
                s.career_months,
                format_money(s.stats.money)
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let mut menu = ClickableList::new();
    push_choice(&mut menu, 'R', "Start a new career", RESTART);
    push_choice(&mut menu, 'Q', "Quit", QUIT);
    let popup = popup_area(area, 70, 14);
    render_popup(f, popup, format!(" {} ", ending.title), color, text, menu, cs);
}
