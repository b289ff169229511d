use std::io::Stdout;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use installer_core::{Mode, StepStatus};

use crate::app::steps::WIZARD_STEP_COUNT;
use crate::model::App;

pub(crate) const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub(crate) const SPINNER_LEN: usize = SPINNER.len();

pub(crate) enum NoticeAction {
    Next,
    Back,
    Quit,
}

pub(crate) enum LicenseAction {
    Next,
    Back,
    Quit,
}

pub(crate) enum SelectionAction {
    Submit(usize),
    Back,
    Quit,
}

pub(crate) enum ConfirmAction {
    Yes,
    No,
    Back,
    Quit,
}

pub(crate) struct MenuItem<'a> {
    pub label: &'a str,
    pub details: Vec<&'a str>,
}

fn shell(frame: &mut Frame, title: &str, position: Option<usize>) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(4),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let step_line = match position {
        Some(position) => format!("{title}  (step {position} of {WIZARD_STEP_COUNT})"),
        None => title.to_string(),
    };
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "YEET Image Format Setup",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            step_line,
            Style::default().fg(Color::Cyan),
        )),
    ])
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    (chunks[1], chunks[2])
}

fn footer(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let mut spans = Vec::new();
    for (index, (key, what)) in hints.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(format!(" {what}")));
    }
    let hints = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(hints, area);
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    matches!(code, KeyCode::Char('q') | KeyCode::Char('Q'))
        && modifiers.contains(KeyModifiers::CONTROL)
}

/// A static screen of text. Enter moves forward, Esc goes back.
pub(crate) fn run_notice(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    title: &str,
    position: usize,
    body: &[Line<'_>],
    back_hint: &str,
) -> Result<NoticeAction> {
    loop {
        terminal.draw(|frame| {
            let (content, hint_area) = shell(frame, title, Some(position));
            let text = Paragraph::new(body.to_vec()).wrap(Wrap { trim: false });
            frame.render_widget(text, content);
            footer(
                frame,
                hint_area,
                &[
                    ("Enter", "continue"),
                    ("Esc", back_hint),
                    ("Ctrl+Q", "cancel"),
                ],
            );
        })?;

        if let Event::Key(key) = event::read().context("read event")? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if is_quit(key.code, key.modifiers) {
                return Ok(NoticeAction::Quit);
            }
            match key.code {
                KeyCode::Enter => return Ok(NoticeAction::Next),
                KeyCode::Esc => return Ok(NoticeAction::Back),
                _ => {}
            }
        }
    }
}

/// Scrollable license text with an accept toggle. Enter only advances once
/// the toggle is on.
pub(crate) fn run_license(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    position: usize,
    license_text: &str,
    accepted: &mut bool,
    notice: Option<&str>,
) -> Result<LicenseAction> {
    let mut scroll: u16 = 0;
    loop {
        terminal.draw(|frame| {
            let (content, hint_area) = shell(frame, "License Agreement", Some(position));
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(4),
                    Constraint::Length(1),
                    Constraint::Length(if notice.is_some() { 1 } else { 0 }),
                ])
                .split(content);

            let text = Paragraph::new(license_text)
                .wrap(Wrap { trim: false })
                .scroll((scroll, 0))
                .block(Block::default().borders(Borders::ALL).title("MIT License"));
            frame.render_widget(text, chunks[0]);

            let marker = if *accepted { "[x]" } else { "[ ]" };
            let accept = Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Green)),
                Span::raw(" I accept the terms in the License Agreement"),
            ]);
            frame.render_widget(Paragraph::new(accept), chunks[1]);

            if let Some(notice) = notice {
                let warning = Line::from(Span::styled(
                    notice,
                    Style::default().fg(Color::Yellow),
                ));
                frame.render_widget(Paragraph::new(warning), chunks[2]);
            }

            footer(
                frame,
                hint_area,
                &[
                    ("Space", "toggle accept"),
                    ("Up/Down", "scroll"),
                    ("Enter", "continue"),
                    ("Esc", "back"),
                    ("Ctrl+Q", "cancel"),
                ],
            );
        })?;

        if let Event::Key(key) = event::read().context("read event")? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if is_quit(key.code, key.modifiers) {
                return Ok(LicenseAction::Quit);
            }
            match key.code {
                KeyCode::Char(' ') => *accepted = !*accepted,
                KeyCode::Up => scroll = scroll.saturating_sub(1),
                KeyCode::Down => scroll = scroll.saturating_add(1),
                KeyCode::Enter if *accepted => return Ok(LicenseAction::Next),
                KeyCode::Esc => return Ok(LicenseAction::Back),
                _ => {}
            }
        }
    }
}

pub(crate) fn run_menu(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    title: &str,
    position: usize,
    items: &[MenuItem<'_>],
) -> Result<SelectionAction> {
    let mut selected = 0usize;
    loop {
        terminal.draw(|frame| {
            let (content, hint_area) = shell(frame, title, Some(position));
            let mut lines: Vec<ListItem> = Vec::new();
            for (index, item) in items.iter().enumerate() {
                let marker = if index == selected { "> " } else { "  " };
                let style = if index == selected {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                lines.push(ListItem::new(Line::from(Span::styled(
                    format!("{marker}{}", item.label),
                    style,
                ))));
                for detail in &item.details {
                    lines.push(ListItem::new(Line::from(Span::styled(
                        format!("      {detail}"),
                        Style::default().fg(Color::DarkGray),
                    ))));
                }
                lines.push(ListItem::new(Line::from("")));
            }
            frame.render_widget(List::new(lines), content);
            footer(
                frame,
                hint_area,
                &[
                    ("Up/Down", "choose"),
                    ("Enter", "start"),
                    ("Esc", "back"),
                    ("Ctrl+Q", "cancel"),
                ],
            );
        })?;

        if let Event::Key(key) = event::read().context("read event")? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if is_quit(key.code, key.modifiers) {
                return Ok(SelectionAction::Quit);
            }
            match key.code {
                KeyCode::Up => selected = selected.saturating_sub(1),
                KeyCode::Down => selected = (selected + 1).min(items.len().saturating_sub(1)),
                KeyCode::Enter => return Ok(SelectionAction::Submit(selected)),
                KeyCode::Esc => return Ok(SelectionAction::Back),
                _ => {}
            }
        }
    }
}

pub(crate) fn run_confirm_selector(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    title: &str,
    question: &str,
    info: &[Line<'_>],
) -> Result<ConfirmAction> {
    let mut yes = true;
    loop {
        terminal.draw(|frame| {
            let (content, hint_area) = shell(frame, title, None);
            let mut body: Vec<Line> = vec![
                Line::from(Span::styled(
                    question,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ];
            body.extend(info.to_vec());
            body.push(Line::from(""));
            let choice = |label: &str, active: bool| {
                if active {
                    Span::styled(
                        format!("[{label}]"),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw(format!(" {label} "))
                }
            };
            body.push(Line::from(vec![
                choice("Yes", yes),
                Span::raw("   "),
                choice("No", !yes),
            ]));
            frame.render_widget(Paragraph::new(body).wrap(Wrap { trim: false }), content);
            footer(
                frame,
                hint_area,
                &[
                    ("Left/Right", "choose"),
                    ("Enter", "confirm"),
                    ("Esc", "back"),
                    ("Ctrl+Q", "cancel"),
                ],
            );
        })?;

        if let Event::Key(key) = event::read().context("read event")? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if is_quit(key.code, key.modifiers) {
                return Ok(ConfirmAction::Quit);
            }
            match key.code {
                KeyCode::Left | KeyCode::Right | KeyCode::Tab => yes = !yes,
                KeyCode::Char('y') | KeyCode::Char('Y') => return Ok(ConfirmAction::Yes),
                KeyCode::Char('n') | KeyCode::Char('N') => return Ok(ConfirmAction::No),
                KeyCode::Enter => {
                    return Ok(if yes { ConfirmAction::Yes } else { ConfirmAction::No })
                }
                KeyCode::Esc => return Ok(ConfirmAction::Back),
                _ => {}
            }
        }
    }
}

/// The progress/finish screen. Once the run reports done, the summary block
/// switches to the mode- and outcome-specific finish message.
pub(crate) fn draw_ui(area: Rect, frame: &mut Frame, app: &App) {
    let title = match (app.mode, app.done) {
        (Mode::Install, false) => "Installing YEET Viewer...",
        (Mode::Uninstall, false) => "Uninstalling YEET Viewer...",
        (Mode::Install, true) if app.err.is_none() => "Installation Complete",
        (Mode::Uninstall, true) if app.err.is_none() => "Uninstallation Complete",
        (Mode::Install, true) => "Installation Failed",
        (Mode::Uninstall, true) => "Uninstallation Failed",
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(app.steps.len() as u16 + 2),
            Constraint::Length(4),
            Constraint::Min(4),
            Constraint::Length(2),
        ])
        .split(area);

    let header = Paragraph::new(Line::from(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(app.progress.clamp(0.0, 1.0));
    frame.render_widget(gauge, chunks[1]);

    let spinner = SPINNER[app.spinner_idx % SPINNER_LEN];
    let items: Vec<ListItem> = app
        .steps
        .iter()
        .map(|step| {
            let (marker, style) = match step.status {
                StepStatus::Pending => ("   ".to_string(), Style::default().fg(Color::DarkGray)),
                StepStatus::Running => (format!(" {spinner} "), Style::default().fg(Color::Cyan)),
                StepStatus::Done => (" ok".to_string(), Style::default().fg(Color::Green)),
                StepStatus::Warned => ("  !".to_string(), Style::default().fg(Color::Yellow)),
                StepStatus::Failed => ("  x".to_string(), Style::default().fg(Color::Red)),
            };
            let mut spans = vec![
                Span::styled(marker, style),
                Span::raw(" "),
                Span::raw(step.name.clone()),
            ];
            if let Some(err) = &step.err {
                spans.push(Span::styled(
                    format!("  ({err})"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();
    let steps = List::new(items).block(Block::default().borders(Borders::ALL).title("Steps"));
    frame.render_widget(steps, chunks[2]);

    let summary = Paragraph::new(summary_lines(app)).wrap(Wrap { trim: false });
    frame.render_widget(summary, chunks[3]);

    let logs: Vec<ListItem> = app
        .logs
        .iter()
        .rev()
        .take(chunks[4].height.saturating_sub(2) as usize)
        .rev()
        .map(|line| ListItem::new(Line::from(line.clone())))
        .collect();
    let logs = List::new(logs).block(Block::default().borders(Borders::ALL).title("Log"));
    frame.render_widget(logs, chunks[4]);

    let hint = if app.done {
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::raw(" finish"),
        ])
    } else {
        Line::from(Span::styled(
            "Working - the wizard unlocks when the run completes",
            Style::default().fg(Color::DarkGray),
        ))
    };
    let hint = Paragraph::new(hint)
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(hint, chunks[5]);
}

fn summary_lines(app: &App) -> Vec<Line<'static>> {
    if !app.done {
        return vec![Line::from(app.status.clone())];
    }
    match (&app.err, app.mode) {
        (None, Mode::Install) => vec![
            Line::from(Span::styled(
                "YEET Viewer has been successfully installed!",
                Style::default().fg(Color::Green),
            )),
            Line::from("Double-click any .yeet file to open it in YEET Viewer."),
        ],
        (None, Mode::Uninstall) => vec![
            Line::from(Span::styled(
                "YEET Viewer has been removed.",
                Style::default().fg(Color::Green),
            )),
            Line::from("Your .yeet files remain on your computer."),
        ],
        (Some(err), _) => {
            let mut lines = vec![Line::from(Span::styled(
                format!("Setup failed: {err}"),
                Style::default().fg(Color::Red),
            ))];
            if let Some(path) = &app.failure_log {
                lines.push(Line::from(format!(
                    "The full log was saved to {}",
                    path.display()
                )));
            }
            lines
        }
    }
}
