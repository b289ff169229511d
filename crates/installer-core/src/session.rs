use chrono::{DateTime, Local};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Install,
    Uninstall,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Install => "install",
            Mode::Uninstall => "uninstall",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Pending,
    Success,
    Failure,
}

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub message: String,
}

// State for a single install or uninstall run. Owned by the worker that
// drives the run; the UI only ever sees the event stream and, on failure,
// the rendered log text.
pub struct InstallSession {
    pub mode: Mode,
    pub install_dir: Option<std::path::PathBuf>,
    pub viewer_path: Option<std::path::PathBuf>,
    log: Vec<LogEntry>,
    pub outcome: Outcome,
}

impl InstallSession {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            install_dir: None,
            viewer_path: None,
            log: Vec::new(),
            outcome: Outcome::Pending,
        }
    }

    pub fn record(&mut self, message: impl Into<String>) {
        self.log.push(LogEntry {
            at: Local::now(),
            message: message.into(),
        });
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Renders the log for persistence, one timestamped line per entry.
    pub fn render_log(&self) -> String {
        let mut out = String::new();
        for entry in &self.log {
            out.push_str(&format!(
                "[{}] {}\n",
                entry.at.format("%Y-%m-%d %H:%M:%S"),
                entry.message
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_append_only_and_renders_in_order() {
        let mut session = InstallSession::new(Mode::Install);
        session.record("first");
        session.record("second");
        assert_eq!(session.log().len(), 2);
        let rendered = session.render_log();
        let first = rendered.find("first").unwrap();
        let second = rendered.find("second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn new_session_is_pending() {
        let session = InstallSession::new(Mode::Uninstall);
        assert_eq!(session.outcome, Outcome::Pending);
        assert!(session.install_dir.is_none());
        assert!(session.viewer_path.is_none());
    }
}
