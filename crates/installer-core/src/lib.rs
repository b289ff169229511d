pub mod elevation;
pub mod events;
pub mod install;
pub mod locate;
pub mod paths;
pub mod registry;
pub mod session;

pub use events::{InstallerEvent, StepStatus};
pub use install::{run_session, step_names, InstallContext, INSTALL_STEPS, UNINSTALL_STEPS};
pub use session::{InstallSession, Mode, Outcome};
