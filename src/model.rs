use std::collections::VecDeque;
use std::fs::File;
use std::path::PathBuf;

pub use installer_core::{InstallerEvent, Mode, StepStatus};

// Single run step as shown on the progress screen
pub struct Step {
    pub name: String,        // The name of the step
    pub status: StepStatus,  // The current status of the step
    pub err: Option<String>, // An error message if the step failed
}

// The progress screen's state
pub struct App {
    // Whether this run installs or uninstalls
    pub mode: Mode,
    // The list of steps for this run
    pub steps: Vec<Step>,
    // The overall progress of the run
    pub progress: f64,
    // The human-readable description of the current step
    pub status: String,
    // A queue of log messages to be displayed
    pub logs: VecDeque<String>,
    // The current frame of the loading spinner animation
    pub spinner_idx: usize,
    // A flag indicating whether the run is finished
    pub done: bool,
    // A final error message if the run failed
    pub err: Option<String>,
    // An optional handle to the log file for writing logs to disk
    pub log_file: Option<File>,
    // Where the failure log was persisted, if the run failed
    pub failure_log: Option<PathBuf>,
}
