use anyhow::Result;
use ratatui::backend::CrosstermBackend;
use ratatui::text::Line;
use ratatui::Terminal;

use installer_core::Mode;

use crate::ui::{run_confirm_selector, run_menu, ConfirmAction, MenuItem, SelectionAction};

use super::super::steps::{WizardState, WizardStep};
use super::StepOutcome;

pub(in crate::app) fn handle_mode_step(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut WizardState,
) -> Result<StepOutcome> {
    let items = [
        MenuItem {
            label: "Install YEET Viewer and register the .yeet format",
            details: vec![
                "Installs YEET Viewer to Program Files",
                "Registers .yeet as an image format",
                "Double-click .yeet files to open them",
            ],
        },
        MenuItem {
            label: "Remove YEET Viewer and the .yeet format",
            details: vec![
                "Removes the viewer from Program Files and unregisters .yeet.",
                "Your .yeet files will remain on your computer.",
            ],
        },
    ];
    match run_menu(
        terminal,
        WizardStep::InstallType.title(),
        WizardStep::InstallType.position(),
        &items,
    )? {
        SelectionAction::Submit(0) => {
            state.mode = Mode::Install;
            Ok(StepOutcome::Finish)
        }
        SelectionAction::Submit(_) => {
            state.mode = Mode::Uninstall;
            Ok(StepOutcome::Finish)
        }
        SelectionAction::Back => Ok(StepOutcome::Next(WizardStep::License)),
        SelectionAction::Quit => Ok(StepOutcome::Quit),
    }
}

/// Entry point for the `/uninstall` launch flag: welcome and license are
/// skipped, but the run still waits for one confirmation.
pub(in crate::app) fn handle_uninstall_confirm(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut WizardState,
) -> Result<StepOutcome> {
    let info = vec![
        Line::from("Removes the viewer from Program Files and unregisters the"),
        Line::from(".yeet format. Your .yeet files will remain on your computer."),
    ];
    match run_confirm_selector(
        terminal,
        "Uninstall YEET Viewer",
        "Remove YEET Viewer and the .yeet file format?",
        &info,
    )? {
        ConfirmAction::Yes => {
            state.mode = Mode::Uninstall;
            Ok(StepOutcome::Finish)
        }
        ConfirmAction::No | ConfirmAction::Back | ConfirmAction::Quit => Ok(StepOutcome::Quit),
    }
}
