//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! mutate state. The widget floats in the bottom-right corner: a launcher
//! badge when closed, a chat panel when open.

use agentdock_core::rich_text::Emphasis;
use agentdock_core::transcript::{Entry, EntryKind};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::state::{AppState, TerminalView};

/// Preferred panel size; shrinks to fit small terminals.
const PANEL_WIDTH: u16 = 56;
const PANEL_HEIGHT: u16 = 28;

/// Gap between the widget and the terminal edge.
const EDGE_MARGIN: u16 = 1;

const LAUNCHER_LABEL: &str = " 💬 AI Agent  Ctrl+O ";

const AGENT_LABEL: &str = "AI Agent";

/// Spinner frames for the thinking placeholder.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Ticks per spinner frame.
const SPINNER_SPEED_DIVISOR: usize = 3;

/// Renders the whole screen.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    if app.widget.is_open() {
        render_panel(app, frame, area);
    } else {
        render_launcher(frame, area);
    }
}

fn render_launcher(frame: &mut Frame, area: Rect) {
    let width = LAUNCHER_LABEL.width() as u16 + 2;
    let rect = bottom_right(area, width, 3);

    let badge = Paragraph::new(Line::from(Span::styled(
        LAUNCHER_LABEL,
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Magenta)),
    );

    frame.render_widget(Clear, rect);
    frame.render_widget(badge, rect);
}

fn render_panel(app: &AppState, frame: &mut Frame, area: Rect) {
    let settings = app.widget.settings();
    let rect = bottom_right(area, PANEL_WIDTH, PANEL_HEIGHT);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Magenta))
        .title(Line::from(Span::styled(
            format!(" 🤖 {} ", settings.title),
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .title_bottom(
            Line::from(Span::styled(
                " Esc close · Ctrl+R reset ",
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Right),
        );
    let inner = block.inner(rect);

    frame.render_widget(Clear, rect);
    frame.render_widget(block, rect);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(inner);

    render_transcript(app, frame, chunks[0]);
    render_input(app.view(), &settings.input_placeholder, frame, chunks[1]);

    let footer = Paragraph::new(Line::from(Span::styled(
        settings.footer.as_str(),
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[2]);
}

/// Draws the transcript, pinned to the most recent lines.
fn render_transcript(app: &AppState, frame: &mut Frame, area: Rect) {
    let width = usize::from(area.width.saturating_sub(1)).max(1);
    let spinner = SPINNER_FRAMES[(app.spinner_frame / SPINNER_SPEED_DIVISOR) % SPINNER_FRAMES.len()];

    let mut lines = Vec::new();
    for entry in &app.view().entries {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.extend(entry_lines(entry, width, spinner));
    }

    let height = usize::from(area.height);
    let start = lines.len().saturating_sub(height);
    let visible = lines.split_off(start);
    frame.render_widget(Paragraph::new(visible), area);
}

/// Display lines for one entry at the given width.
pub fn entry_lines(entry: &Entry, width: usize, spinner: &str) -> Vec<Line<'static>> {
    match &entry.kind {
        EntryKind::User(text) => {
            let style = Style::default().fg(Color::Green);
            // Leave room on the left so user bubbles read as right-hand.
            let bubble_width = (width * 4 / 5).max(1);
            wrap_runs(&[(text.as_str(), style)], bubble_width)
                .into_iter()
                .map(|line| line.alignment(Alignment::Right))
                .collect()
        }
        EntryKind::Agent(content) => {
            let mut lines = vec![agent_label()];
            for runs in content.lines() {
                let styled: Vec<(&str, Style)> = runs
                    .into_iter()
                    .map(|(text, emphasis)| (text, emphasis_style(emphasis)))
                    .collect();
                lines.extend(wrap_runs(&styled, width));
            }
            lines
        }
        EntryKind::Thinking => vec![
            agent_label(),
            Line::from(Span::styled(
                format!("{spinner} Thinking..."),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )),
        ],
    }
}

fn agent_label() -> Line<'static> {
    Line::from(Span::styled(
        AGENT_LABEL,
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    ))
}

fn emphasis_style(emphasis: Emphasis) -> Style {
    match emphasis {
        Emphasis::Plain => Style::default(),
        Emphasis::Strong => Style::default().add_modifier(Modifier::BOLD),
        Emphasis::Code => Style::default().fg(Color::Cyan),
        Emphasis::Muted => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    }
}

fn render_input(view: &TerminalView, placeholder: &str, frame: &mut Frame, area: Rect) {
    let border_color = if view.accepts_typing() {
        Color::Magenta
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    let width = usize::from(inner.width.saturating_sub(1));

    let line = if !view.input_enabled {
        Line::from(Span::styled(
            tail_fitting(&view.input, width),
            Style::default().fg(Color::DarkGray),
        ))
    } else if view.input.is_empty() {
        Line::from(Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(tail_fitting(&view.input, width))
    };

    frame.render_widget(Paragraph::new(line).block(block), area);

    if view.accepts_typing() {
        let shown = tail_fitting(&view.input, width).width() as u16;
        frame.set_cursor_position((inner.x + shown, inner.y));
    }
}

/// Returns the longest suffix of `text` that fits in `width` columns.
fn tail_fitting(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut start = text.len();
    for (idx, ch) in text.char_indices().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    text[start..].to_string()
}

/// Hard-wraps styled runs to `width` display columns, preferring to break
/// after a space.
pub fn wrap_runs(runs: &[(&str, Style)], width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current: Vec<(char, Style)> = Vec::new();
    let mut current_width = 0;

    for &(text, style) in runs {
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0);
            if current_width + w > width && !current.is_empty() {
                let carry = match current.iter().rposition(|(c, _)| *c == ' ') {
                    Some(pos) if pos + 1 < current.len() => current.split_off(pos + 1),
                    _ => Vec::new(),
                };
                lines.push(to_line(&current));
                current_width = carry.iter().map(|(c, _)| c.width().unwrap_or(0)).sum();
                current = carry;
                // A wide char may still not fit after the carried word.
                if current_width + w > width && !current.is_empty() {
                    lines.push(to_line(&current));
                    current.clear();
                    current_width = 0;
                }
            }
            current.push((ch, style));
            current_width += w;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(to_line(&current));
    }
    lines
}

fn to_line(chars: &[(char, Style)]) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut text = String::new();
    let mut style = None;

    for &(ch, ch_style) in chars {
        if style.is_some_and(|s| s != ch_style) {
            spans.push(Span::styled(std::mem::take(&mut text), style.unwrap_or_default()));
        }
        style = Some(ch_style);
        text.push(ch);
    }
    if !text.is_empty() {
        spans.push(Span::styled(text, style.unwrap_or_default()));
    }
    Line::from(spans)
}

/// Rect of `width`×`height` anchored to the bottom-right of `area`,
/// clamped to fit.
fn bottom_right(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(EDGE_MARGIN * 2));
    let height = height.min(area.height.saturating_sub(EDGE_MARGIN));
    Rect {
        x: area.x + area.width.saturating_sub(width + EDGE_MARGIN * 2),
        y: area.y + area.height.saturating_sub(height + EDGE_MARGIN),
        width,
        height,
    }
}
