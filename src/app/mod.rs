mod flow;
mod logging;
mod progress;
mod setup;
mod setup_steps;
pub(crate) mod steps;

use anyhow::Result;

/// How the binary was invoked. The uninstall flag is what the generated
/// programs-list entry passes back to us.
#[derive(Clone, Debug, Default)]
pub struct LaunchOptions {
    pub uninstall: bool,
    pub allow_unelevated: bool,
}

impl LaunchOptions {
    pub fn from_args(args: impl Iterator<Item = String>) -> Self {
        let uninstall = args
            .skip(1)
            .any(|arg| arg == "/uninstall" || arg == "--uninstall");
        Self {
            uninstall,
            allow_unelevated: false,
        }
    }
}

fn allow_unelevated_from_env() -> bool {
    std::env::var("YEET_SETUP_ALLOW_UNELEVATED").ok().as_deref() == Some("1")
}

pub fn run(opts: LaunchOptions) -> Result<()> {
    dotenvy::dotenv().ok();
    let opts = LaunchOptions {
        allow_unelevated: opts.allow_unelevated || allow_unelevated_from_env(),
        ..opts
    };

    let mut terminal = flow::init_terminal()?;
    let result = run_wizard(&mut terminal, &opts);
    flow::restore_terminal();
    result
}

fn run_wizard(
    terminal: &mut ratatui::Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
    opts: &LaunchOptions,
) -> Result<()> {
    let Some(mode) = setup::run_setup_wizard(terminal, opts)? else {
        return Ok(());
    };

    let elevated = installer_core::elevation::is_elevated() || opts.allow_unelevated;
    progress::run_install_progress(terminal, mode, elevated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn bare_invocation_runs_the_full_wizard() {
        let opts = LaunchOptions::from_args(args(&["yeet-setup"]));
        assert!(!opts.uninstall);
    }

    #[test]
    fn uninstall_flag_is_recognized_in_both_spellings() {
        assert!(LaunchOptions::from_args(args(&["yeet-setup", "/uninstall"])).uninstall);
        assert!(LaunchOptions::from_args(args(&["yeet-setup", "--uninstall"])).uninstall);
    }

    #[test]
    fn program_name_alone_never_means_uninstall() {
        let opts = LaunchOptions::from_args(args(&["/uninstall"]));
        assert!(!opts.uninstall);
    }
}
