use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::model::{App, Step, StepStatus};
use crate::ui::{draw_ui, SPINNER_LEN};
use installer_core::locate::LocateDirs;
use installer_core::registry::default_store;
use installer_core::{
    paths, run_session, step_names, InstallContext, InstallSession, InstallerEvent, Mode,
};

use super::logging::{append_log_file, handle_event, push_log};

pub(crate) fn run_install_progress(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mode: Mode,
    elevated: bool,
) -> Result<()> {
    let (tx, rx) = crossbeam_channel::unbounded();
    thread::spawn(move || {
        let store = default_store();
        let dirs = match LocateDirs::discover() {
            Ok(dirs) => dirs,
            Err(err) => {
                let _ = tx.send(InstallerEvent::Done(Some(format!("{err:#}"))));
                return;
            }
        };
        let installer_exe = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("yeet-setup"));
        let ctx = InstallContext {
            registry: &store,
            dirs,
            install_dir: paths::default_install_dir(),
            installer_exe,
            elevated,
        };
        let mut session = InstallSession::new(mode);
        run_session(&tx, &ctx, &mut session);
    });

    // Set up the UI for the progress screen
    let log_path = paths::run_log_path();
    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)
        .ok();

    let logs = VecDeque::from(vec![format!("Starting YEET Viewer {}...", mode.label())]);
    let mut app = App {
        mode,
        steps: step_names(mode)
            .iter()
            .map(|name| Step {
                name: (*name).to_string(),
                status: StepStatus::Pending,
                err: None,
            })
            .collect(),
        progress: 0.0,
        status: "Initializing...".to_string(),
        logs,
        spinner_idx: 0,
        done: false,
        err: None,
        log_file,
        failure_log: None,
    };
    if app.log_file.is_some() {
        let line = format!("Logging to {}", log_path.display());
        push_log(&mut app.logs, line.clone());
        append_log_file(&mut app.log_file, &line);
    }

    terminal.clear().context("clear terminal")?;
    terminal.draw(|f| draw_ui(f.size(), f, &app))?;

    // Progress screen; quitting stays locked until the run reaches a
    // terminal state so half-applied registry writes are never abandoned.
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| draw_ui(f.size(), f, &app))?;

        let timeout = Duration::from_millis(100);
        if event::poll(timeout).context("poll events")? {
            if let Event::Key(key) = event::read().context("read event")? {
                if key.kind == KeyEventKind::Press
                    && app.done
                    && matches!(key.code, KeyCode::Enter | KeyCode::Esc)
                {
                    break;
                }
            }
        }

        while let Ok(evt) = rx.try_recv() {
            handle_event(&mut app, evt);
        }

        // Update the spinner animation
        if last_tick.elapsed() >= Duration::from_millis(120) {
            app.spinner_idx = (app.spinner_idx + 1) % SPINNER_LEN;
            last_tick = Instant::now();
        }
    }

    Ok(())
}
