use std::io;

use anyhow::{Context, Result};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use crossterm::{cursor, execute};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

pub(crate) fn clear_screen() -> Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), cursor::MoveTo(0, 0)).context("clear screen")?;
    Ok(())
}

pub(crate) fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("enable raw mode")?;
    clear_screen()?;
    Terminal::new(CrosstermBackend::new(io::stdout())).context("create terminal")
}

pub(crate) fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = clear_screen();
}
