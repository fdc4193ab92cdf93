//! Ratatui rendering.
//!
//! Pure functions from [`App`] state to widgets; no state is mutated here.
//! The layout is a title bar, a mode-dependent body, a status line, and a
//! key-hint footer. The share picker renders as a centered overlay.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::providers::{BarcodeSource, LinkOpener};
use crate::session::{Permission, ViewMode};

use super::app::App;

/// Render the whole frame.
pub fn render<S: BarcodeSource, O: LinkOpener>(frame: &mut Frame, app: &App<S, O>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_title(frame, app, chunks[0]);
    render_body(frame, app, chunks[1]);
    render_status(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);

    if app.picker().is_some() {
        render_share_picker(frame, app);
    }
}

fn render_title<S: BarcodeSource, O: LinkOpener>(frame: &mut Frame, app: &App<S, O>, area: Rect) {
    let theme = app.theme();
    let title = Paragraph::new("qrlink - QR link scanner")
        .style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.primary)));
    frame.render_widget(title, area);
}

fn render_body<S: BarcodeSource, O: LinkOpener>(frame: &mut Frame, app: &App<S, O>, area: Rect) {
    let theme = app.theme();
    let session = app.workflow().session();

    let lines: Vec<Line> = match session.mode() {
        ViewMode::Idle => match session.permission() {
            Permission::Unknown => vec![
                Line::raw(""),
                Line::styled("Checking camera access...", Style::default().fg(theme.dim)),
            ],
            Permission::Granted => vec![
                Line::raw(""),
                Line::styled(
                    "[ Press s to scan a QR code ]",
                    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                ),
            ],
            // Permission denied: the scan affordance is absent, not greyed.
            Permission::Denied => vec![
                Line::raw(""),
                Line::styled("Camera unavailable.", Style::default().fg(theme.danger)),
                Line::styled(
                    "Run `qrlink check` for details.",
                    Style::default().fg(theme.dim),
                ),
            ],
        },
        ViewMode::Scanning => vec![
            Line::raw(""),
            Line::styled(
                "Camera active - point it at a QR code",
                Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
            Line::styled("Esc cancels", Style::default().fg(theme.dim)),
        ],
        ViewMode::Result => {
            let payload = session.payload().unwrap_or_default();
            vec![
                Line::raw(""),
                Line::styled("Decoded link:", Style::default().fg(theme.dim)),
                Line::styled(
                    payload.to_string(),
                    Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
                ),
                Line::raw(""),
                Line::styled(
                    "o open    h share    a scan another",
                    Style::default().fg(theme.accent),
                ),
            ]
        }
    };

    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.dim)));
    frame.render_widget(body, area);
}

fn render_status<S: BarcodeSource, O: LinkOpener>(frame: &mut Frame, app: &App<S, O>, area: Rect) {
    let theme = app.theme();
    let text = app.status().unwrap_or("");
    let status = Paragraph::new(text)
        .style(Style::default().fg(theme.normal))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" status ")
                .border_style(Style::default().fg(theme.dim)),
        );
    frame.render_widget(status, area);
}

fn render_footer<S: BarcodeSource, O: LinkOpener>(frame: &mut Frame, app: &App<S, O>, area: Rect) {
    let theme = app.theme();
    let hints = match app.workflow().session().mode() {
        ViewMode::Idle => "s scan | q quit",
        ViewMode::Scanning => "Esc cancel | q quit",
        ViewMode::Result => "o open | h share | a scan another | q quit",
    };

    let mut spans = vec![Span::styled(hints, Style::default().fg(theme.dim))];
    if let Some(path) = app.log_path() {
        spans.push(Span::styled(
            format!("   log: {}", truncate_left(&path.display().to_string(), 40)),
            Style::default().fg(theme.dim),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_share_picker<S: BarcodeSource, O: LinkOpener>(frame: &mut Frame, app: &App<S, O>) {
    let theme = app.theme();
    let selected = app.picker().unwrap_or(0);
    let labels = app.workflow().share_target_labels();

    let items: Vec<ListItem> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let text = label.unwrap_or("(unnamed target)");
            let style = if i == selected {
                Style::default()
                    .fg(theme.inverted_fg)
                    .bg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.normal)
            };
            ListItem::new(format!(" {} ", text)).style(style)
        })
        .collect();

    let height = (labels.len() as u16 + 2).min(12);
    let area = centered_rect(40, height, frame.area());

    frame.render_widget(Clear, area);
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" share to (Enter confirm, Esc dismiss) ")
            .border_style(Style::default().fg(theme.accent)),
    );
    frame.render_widget(list, area);
}

/// A centered rectangle of fixed size within `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Truncate a string keeping its tail, prefixing with `...`.
#[must_use]
pub fn truncate_left(s: &str, max_chars: usize) -> String {
    let count = s.chars().count();
    if count <= max_chars {
        return s.to_string();
    }

    let keep = max_chars.saturating_sub(3);
    let tail: String = s
        .chars()
        .skip(count - keep)
        .collect();
    format!("...{}", tail)
}
