//! Terminal rendering.
//!
//! Consumes the flattened rows and batch progress from `App` and draws
//! them; emits nothing back. All state changes travel through key events
//! handled by the event loop.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::models::OpStatus;
use crate::tree::DisplayRow;
use crate::ui::app::{App, Mode};

const REPO_COLOR: Color = Color::Rgb(0x4e, 0xc9, 0xb0);
const DIR_COLOR: Color = Color::Rgb(0x56, 0x9c, 0xd6);
const SUCCESS_COLOR: Color = Color::Rgb(0x5f, 0xff, 0x5f);
const FAILED_COLOR: Color = Color::Rgb(0xff, 0x5f, 0x5f);
const PENDING_COLOR: Color = Color::Rgb(0xff, 0xff, 0x5f);
const SELECTION_BG: Color = Color::Rgb(0x26, 0x4f, 0x78);

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(bottom_height(app)),
        ])
        .split(frame.area());

    match app.mode {
        Mode::ConfirmRemove => render_confirm(frame, chunks[0], app),
        Mode::Browse => render_list(frame, chunks[0], app),
    }
    render_bottom(frame, chunks[1], app);
}

fn render_list(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app.rows().iter().map(row_item).collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Your Repositories "),
        )
        .highlight_style(Style::default().bg(SELECTION_BG).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(app.cursor));
    frame.render_stateful_widget(list, area, &mut state);
}

fn row_item(row: &DisplayRow) -> ListItem<'static> {
    let selection = if row.selected { "▸ " } else { "  " };
    let indent = "  ".repeat(row.level);
    let expand = if row.expandable {
        if row.expanded { "▼ " } else { "▶ " }
    } else {
        "  "
    };
    let status = match row.status {
        OpStatus::Pending => "••• ",
        OpStatus::Success => "✓ ",
        OpStatus::Failed => "✗ ",
        OpStatus::None => "",
    };

    let color = match (row.is_repository, row.status) {
        (true, OpStatus::Success) => SUCCESS_COLOR,
        (true, OpStatus::Failed) => FAILED_COLOR,
        (true, OpStatus::Pending) => PENDING_COLOR,
        (true, OpStatus::None) => REPO_COLOR,
        (false, _) => DIR_COLOR,
    };

    let mut style = Style::default().fg(color);
    if row.selected {
        style = style.add_modifier(Modifier::BOLD).bg(SELECTION_BG);
    }

    ListItem::new(Line::from(Span::styled(
        format!("{}{}{}{}{}", selection, indent, expand, status, row.name),
        style,
    )))
}

fn render_confirm(frame: &mut Frame, area: Rect, app: &App) {
    let count = app.pending_removal.len();
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Remove {} repositor{}?", count, if count == 1 { "y" } else { "ies" }),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for target in app.pending_removal.iter().take(10) {
        lines.push(Line::from(format!("  - {}", target)));
    }
    if count > 10 {
        lines.push(Line::from(format!("  ... and {} more", count - 10)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("This action cannot be undone. [y/N]"));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Confirm Removal "),
    );
    frame.render_widget(paragraph, area);
}

fn render_bottom(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![Line::from(Span::styled(
        help_text(app),
        Style::default().fg(Color::DarkGray),
    ))];

    if let Some(batch) = &app.batch {
        lines.push(Line::from(Span::styled(
            format!(
                "{} operations: {}/{} completed",
                batch.kind, batch.completed, batch.total
            ),
            Style::default().fg(PENDING_COLOR),
        )));
    }

    if let Some(status) = &app.status_line {
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(SUCCESS_COLOR),
        )));
    }

    let failed = app.failed_results();
    if !failed.is_empty() {
        lines.push(Line::from(Span::styled(
            "Recent errors:",
            Style::default().fg(FAILED_COLOR),
        )));
        for result in failed.iter().take(5) {
            lines.push(Line::from(Span::styled(
                format!("  ✗ {}: {}", result.target, truncate(&result.message, 60)),
                Style::default().fg(FAILED_COLOR),
            )));
        }
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn bottom_height(app: &App) -> u16 {
    let mut height = 1; // help line
    if app.batch.is_some() {
        height += 1;
    }
    if app.status_line.is_some() {
        height += 1;
    }
    let failed = app.failed_results().len().min(5);
    if failed > 0 {
        height += 1 + failed as u16;
    }
    height
}

fn help_text(app: &App) -> String {
    match app.mode {
        Mode::ConfirmRemove => "y confirm • any other key cancel".to_string(),
        Mode::Browse => {
            let selected = app.selection_count();
            let base = "↑/↓ navigate • ←/→ collapse/expand • Space select • a all • n none • u update • r remove • q quit";
            if selected > 0 {
                format!("{} selected • {}", selected, base)
            } else {
                base.to_string()
            }
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
