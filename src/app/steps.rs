use installer_core::Mode;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum WizardStep {
    Welcome,
    License,
    InstallType,
}

impl WizardStep {
    pub(crate) fn title(self) -> &'static str {
        match self {
            WizardStep::Welcome => "Welcome",
            WizardStep::License => "License Agreement",
            WizardStep::InstallType => "Choose Installation Type",
        }
    }

    pub(crate) fn position(self) -> usize {
        match self {
            WizardStep::Welcome => 1,
            WizardStep::License => 2,
            WizardStep::InstallType => 3,
        }
    }
}

pub(crate) const WIZARD_STEP_COUNT: usize = 3;

// Mutated only by the wizard step handlers; the run worker never sees it.
pub(crate) struct WizardState {
    pub step: WizardStep,
    pub license_accepted: bool,
    pub mode: Mode,
}

impl WizardState {
    pub(crate) fn new() -> Self {
        Self {
            step: WizardStep::Welcome,
            license_accepted: false,
            mode: Mode::Install,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum LicenseGate {
    /// License not accepted; the step does not advance.
    Blocked,
    /// Accepted, but the process lacks elevation; offer the relaunch.
    NeedsElevation,
    Ready,
}

pub(crate) fn license_gate(license_accepted: bool, elevated: bool) -> LicenseGate {
    if !license_accepted {
        LicenseGate::Blocked
    } else if !elevated {
        LicenseGate::NeedsElevation
    } else {
        LicenseGate::Ready
    }
}

/// Advances past the license step only when the gate is clear. Returns
/// whether the step changed.
pub(crate) fn advance_from_license(state: &mut WizardState, elevated: bool) -> bool {
    match license_gate(state.license_accepted, elevated) {
        LicenseGate::Ready => {
            state.step = WizardStep::InstallType;
            true
        }
        LicenseGate::Blocked | LicenseGate::NeedsElevation => false,
    }
}
