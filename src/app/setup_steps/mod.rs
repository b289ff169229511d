pub(super) mod license_step;
pub(super) mod mode_step;
pub(super) mod welcome_step;

use super::steps::WizardStep;

pub(super) enum StepOutcome {
    Next(WizardStep),
    Quit,
    Finish,
}
