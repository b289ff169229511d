use anyhow::Result;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::Terminal;

use crate::ui::{run_notice, NoticeAction};

use super::super::steps::WizardStep;
use super::StepOutcome;

pub(in crate::app) fn handle_welcome_step(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
) -> Result<StepOutcome> {
    let body = vec![
        Line::from(Span::styled(
            "What is .YEET?",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("YEETIFF (Yet Even Expressier Transcoded Image File Format) is a"),
        Line::from("simple, uncompressed image format that stores pixels as"),
        Line::from("hexadecimal color codes."),
        Line::from(""),
        Line::from("This wizard sets up YEET image format support on your system."),
        Line::from("You'll be able to double-click .yeet files to view them!"),
        Line::from(""),
        Line::from(Span::styled(
            "This program was developed by Stijn Jakobs",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    match run_notice(
        terminal,
        WizardStep::Welcome.title(),
        WizardStep::Welcome.position(),
        &body,
        "cancel",
    )? {
        NoticeAction::Next => Ok(StepOutcome::Next(WizardStep::License)),
        // The welcome screen has nothing to go back to.
        NoticeAction::Back | NoticeAction::Quit => Ok(StepOutcome::Quit),
    }
}
