use anyhow::Result;
use ratatui::backend::CrosstermBackend;
use ratatui::text::Line;
use ratatui::Terminal;

use installer_core::elevation::{self, Relaunch};

use crate::ui::{run_confirm_selector, run_license, ConfirmAction, LicenseAction};

use super::super::steps::{advance_from_license, license_gate, LicenseGate, WizardState, WizardStep};
use super::StepOutcome;

const LICENSE_TEXT: &str = "\
MIT License

Copyright (c) 2025 Stijn Jakobs

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the \"Software\"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.";

pub(in crate::app) fn handle_license_step(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut WizardState,
    elevated: bool,
    notice: &mut Option<String>,
) -> Result<StepOutcome> {
    let shown_notice = notice.take();
    match run_license(
        terminal,
        WizardStep::License.position(),
        LICENSE_TEXT,
        &mut state.license_accepted,
        shown_notice.as_deref(),
    )? {
        LicenseAction::Next => {
            if advance_from_license(state, elevated) {
                return Ok(StepOutcome::Next(state.step));
            }
            match license_gate(state.license_accepted, elevated) {
                LicenseGate::NeedsElevation => offer_elevated_relaunch(terminal, notice),
                LicenseGate::Blocked | LicenseGate::Ready => {
                    *notice = Some("Accept the license terms to continue".to_string());
                    Ok(StepOutcome::Next(WizardStep::License))
                }
            }
        }
        LicenseAction::Back => Ok(StepOutcome::Next(WizardStep::Welcome)),
        LicenseAction::Quit => Ok(StepOutcome::Quit),
    }
}

/// Registering the file type writes machine-wide state, so an unelevated
/// process can only continue by restarting itself elevated.
fn offer_elevated_relaunch(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    notice: &mut Option<String>,
) -> Result<StepOutcome> {
    let info = vec![
        Line::from("The wizard needs administrator privileges to register the"),
        Line::from(".yeet file format."),
        Line::from(""),
        Line::from("A new instance will start from the beginning."),
    ];
    match run_confirm_selector(
        terminal,
        "Administrator Rights Required",
        "Restart the wizard as Administrator?",
        &info,
    )? {
        ConfirmAction::Yes => match elevation::relaunch_elevated(&[]) {
            // The elevated instance owns the flow now.
            Relaunch::Initiated => Ok(StepOutcome::Quit),
            Relaunch::Denied => {
                *notice =
                    Some("Elevation was declined - setup cannot continue without it".to_string());
                Ok(StepOutcome::Next(WizardStep::License))
            }
            Relaunch::Failed(reason) => {
                *notice = Some(format!("Could not restart elevated: {reason}"));
                Ok(StepOutcome::Next(WizardStep::License))
            }
        },
        ConfirmAction::No | ConfirmAction::Back => {
            *notice =
                Some("Administrator rights are required to go further".to_string());
            Ok(StepOutcome::Next(WizardStep::License))
        }
        ConfirmAction::Quit => Ok(StepOutcome::Quit),
    }
}
