use std::collections::VecDeque;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::model::{App, InstallerEvent, StepStatus};

pub(crate) const LOG_CAPACITY: usize = 200;

pub(crate) fn handle_event(app: &mut App, evt: InstallerEvent) {
    match evt {
        InstallerEvent::Log(line) => {
            push_log(&mut app.logs, line.clone());
            append_log_file(&mut app.log_file, &line);
        }
        InstallerEvent::Status(line) => {
            app.status = line.clone();
            push_log(&mut app.logs, line.clone());
            append_log_file(&mut app.log_file, &line);
        }
        InstallerEvent::Progress(value) => app.progress = value,
        InstallerEvent::Step { index, status, err } => {
            if let Some(step) = app.steps.get_mut(index) {
                step.status = status;
                step.err = err.clone();
                let status_label = match step.status {
                    StepStatus::Pending => "PENDING",
                    StepStatus::Running => "RUNNING",
                    StepStatus::Done => "OK",
                    StepStatus::Warned => "WARN",
                    StepStatus::Failed => "FAIL",
                };
                let line = format!("STEP {}: {}", step.name, status_label);
                append_log_file(&mut app.log_file, &line);
                if let Some(err) = err {
                    append_log_file(&mut app.log_file, &format!("ERROR: {}", err));
                }
            }
        }
        InstallerEvent::Done(err) => {
            app.done = true;
            app.err = err.clone();
            match err {
                Some(err) => {
                    append_log_file(&mut app.log_file, &format!("DONE: {}", err));
                    // Failed runs persist the full log where the finish
                    // screen can point at it.
                    if let Some(path) = persist_failure_log(app, &err) {
                        let line = format!("Log saved to {}", path.display());
                        push_log(&mut app.logs, line.clone());
                        append_log_file(&mut app.log_file, &line);
                        open_log_for_inspection(&path);
                        app.failure_log = Some(path);
                    }
                }
                None => append_log_file(&mut app.log_file, "DONE: ok"),
            }
        }
    }
}

pub(crate) fn push_log(logs: &mut VecDeque<String>, line: String) {
    if logs.len() >= LOG_CAPACITY {
        logs.pop_front();
    }
    logs.push_back(line);
}

pub(crate) fn append_log_file(log_file: &mut Option<std::fs::File>, line: &str) {
    if let Some(file) = log_file.as_mut() {
        let _ = writeln!(file, "{}", line);
        let _ = file.flush();
    }
}

fn persist_failure_log(app: &App, reason: &str) -> Option<PathBuf> {
    let path = installer_core::paths::failure_log_path();
    let mut body = String::new();
    body.push_str("YEET Viewer Setup Error Log\n");
    body.push_str("==================================================\n");
    body.push_str(&format!(
        "Date: {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    body.push_str(&format!("Error: {reason}\n"));
    body.push_str("==================================================\n\n");
    for line in &app.logs {
        body.push_str(line);
        body.push('\n');
    }
    std::fs::write(&path, body).ok()?;
    Some(path)
}

#[cfg(windows)]
fn open_log_for_inspection(path: &Path) {
    let _ = std::process::Command::new("notepad.exe").arg(path).spawn();
}

#[cfg(not(windows))]
fn open_log_for_inspection(_path: &Path) {}
