use anyhow::Result;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use installer_core::{elevation, Mode};

use super::setup_steps::license_step;
use super::setup_steps::mode_step;
use super::setup_steps::welcome_step;
use super::setup_steps::StepOutcome;
use super::steps::{WizardState, WizardStep};
use super::LaunchOptions;

/// Walks the user through the wizard screens and returns the chosen mode,
/// or `None` if they cancelled. With the uninstall launch flag the welcome
/// and license screens are skipped and only the confirmation remains.
pub(crate) fn run_setup_wizard(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    opts: &LaunchOptions,
) -> Result<Option<Mode>> {
    let mut state = WizardState::new();
    let elevated = elevation::is_elevated() || opts.allow_unelevated;
    let mut elevation_notice: Option<String> = None;

    if opts.uninstall {
        return match mode_step::handle_uninstall_confirm(terminal, &mut state)? {
            StepOutcome::Finish => Ok(Some(state.mode)),
            StepOutcome::Next(_) | StepOutcome::Quit => Ok(None),
        };
    }

    'wizard: loop {
        let outcome = match state.step {
            WizardStep::Welcome => welcome_step::handle_welcome_step(terminal)?,
            WizardStep::License => license_step::handle_license_step(
                terminal,
                &mut state,
                elevated,
                &mut elevation_notice,
            )?,
            WizardStep::InstallType => mode_step::handle_mode_step(terminal, &mut state)?,
        };

        match outcome {
            StepOutcome::Next(next) => state.step = next,
            StepOutcome::Quit => return Ok(None),
            StepOutcome::Finish => break 'wizard,
        }
    }

    Ok(Some(state.mode))
}
