use std::process::ExitCode;

use yeet_setup::app::{self, LaunchOptions};

fn main() -> ExitCode {
    let opts = LaunchOptions::from_args(std::env::args());
    match app::run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        // Reaching the finish screen always exits 0; only failing to bring
        // up the interactive surface at all lands here.
        Err(err) => {
            eprintln!("yeet-setup: {err:#}");
            ExitCode::FAILURE
        }
    }
}
