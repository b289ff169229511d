use std::path::{Path, PathBuf};

use chrono::Local;

pub const INSTALL_DIR_NAME: &str = "YeetViewer";

/// Where the viewer gets installed. Resolved from `ProgramFiles` with the
/// stock fallback so the path is stable even under stripped environments.
pub fn default_install_dir() -> PathBuf {
    let program_files =
        std::env::var("ProgramFiles").unwrap_or_else(|_| "C:\\Program Files".to_string());
    PathBuf::from(program_files).join(INSTALL_DIR_NAME)
}

/// Command the programs-list entry uses to re-invoke this installer in
/// uninstall mode.
pub fn uninstall_command(installer_exe: &Path) -> String {
    format!("\"{}\" /uninstall", installer_exe.display())
}

/// Per-run log file, written as the run progresses.
pub fn run_log_path() -> PathBuf {
    std::env::temp_dir().join(format!(
        "YeetSetup_{}.log",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}

/// Where a failed run's full log is persisted for inspection.
pub fn failure_log_path() -> PathBuf {
    std::env::temp_dir().join(format!(
        "YeetSetup_Error_{}.txt",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}
