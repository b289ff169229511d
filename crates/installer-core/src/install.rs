use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::Sender;

use crate::events::{InstallerEvent, StepStatus};
use crate::locate::{self, LocateDirs, VIEWER_EXE};
use crate::registry::{
    self, FileAssociation, KeyRemoval, RegistryStore, UninstallEntry, PRODUCT_ID,
};
use crate::session::{InstallSession, Mode, Outcome};

pub const INSTALL_STEPS: &[&str] = &[
    "Checking privileges",
    "Creating install directory",
    "Locating viewer",
    "Installing viewer",
    "Registering .yeet file type",
    "Adding programs-list entry",
];

pub const UNINSTALL_STEPS: &[&str] = &[
    "Checking privileges",
    "Unregistering .yeet file type",
    "Removing viewer",
    "Removing programs-list entry",
];

pub fn step_names(mode: Mode) -> &'static [&'static str] {
    match mode {
        Mode::Install => INSTALL_STEPS,
        Mode::Uninstall => UNINSTALL_STEPS,
    }
}

/// Everything one run needs. The registry handle is the only shared piece;
/// paths are resolved up front so the sequence itself stays deterministic.
pub struct InstallContext<'a> {
    pub registry: &'a dyn RegistryStore,
    pub dirs: LocateDirs,
    pub install_dir: PathBuf,
    pub installer_exe: PathBuf,
    pub elevated: bool,
}

/// Drives one install or uninstall run to a terminal outcome. Always ends by
/// sending `InstallerEvent::Done`; the error text, if any, doubles as the
/// reason shown on the finish screen.
pub fn run_session(
    tx: &Sender<InstallerEvent>,
    ctx: &InstallContext<'_>,
    session: &mut InstallSession,
) {
    let result = match session.mode {
        Mode::Install => run_install(tx, ctx, session),
        Mode::Uninstall => run_uninstall(tx, ctx, session),
    };
    match result {
        Ok(()) => {
            session.outcome = Outcome::Success;
            session.record(format!("{} completed successfully", session.mode.label()));
            let _ = tx.send(InstallerEvent::Done(None));
        }
        Err(err) => {
            session.outcome = Outcome::Failure;
            session.record(format!("{} failed: {err:#}", session.mode.label()));
            let _ = tx.send(InstallerEvent::Done(Some(format!("{err:#}"))));
        }
    }
}

fn run_install(
    tx: &Sender<InstallerEvent>,
    ctx: &InstallContext<'_>,
    session: &mut InstallSession,
) -> Result<()> {
    let step = StepReporter::new(tx, INSTALL_STEPS);

    step.begin(session, 0);
    if !ctx.elevated {
        return Err(step.fail(
            session,
            0,
            anyhow!("administrator privileges are required to register the file type"),
        ));
    }
    step.log(session, "Running with administrator privileges");
    step.done(session, 0);

    step.begin(session, 1);
    step.log(
        session,
        format!("Creating directory: {}", ctx.install_dir.display()),
    );
    if let Err(err) = fs::create_dir_all(&ctx.install_dir)
        .with_context(|| format!("create {}", ctx.install_dir.display()))
    {
        return Err(step.fail(session, 1, err));
    }
    session.install_dir = Some(ctx.install_dir.clone());
    step.done(session, 1);

    step.begin(session, 2);
    let found = match locate::locate(&ctx.dirs) {
        Some(found) => found,
        None => {
            return Err(step.fail(
                session,
                2,
                anyhow!("no viewer executable found in any known location"),
            ));
        }
    };
    step.log(
        session,
        format!("Found {}: {}", found.label, found.path.display()),
    );
    step.done(session, 2);

    step.begin(session, 3);
    let dest = ctx.install_dir.join(VIEWER_EXE);
    step.log(session, format!("Copying to: {}", dest.display()));
    if let Err(err) = fs::copy(&found.path, &dest)
        .with_context(|| format!("copy {} -> {}", found.path.display(), dest.display()))
    {
        return Err(step.fail(session, 3, err));
    }
    session.viewer_path = Some(dest.clone());
    step.done(session, 3);

    step.begin(session, 4);
    let assoc = FileAssociation::for_viewer(&dest);
    if let Err(err) = registry::apply(ctx.registry, &assoc)
        .with_context(|| format!("register {}", assoc.extension))
    {
        return Err(step.fail(session, 4, err));
    }
    step.log(
        session,
        format!("Associated {} with {}", assoc.extension, dest.display()),
    );
    step.done(session, 4);

    // The association already succeeded, so a broken programs-list entry
    // must not fail the run.
    step.begin(session, 5);
    let entry = UninstallEntry::for_install(&ctx.install_dir, &ctx.installer_exe);
    match registry::add_uninstall_entry(ctx.registry, &entry) {
        Ok(()) => step.done(session, 5),
        Err(err) => step.warn(
            session,
            5,
            format!("Could not add the programs-list entry: {err}"),
        ),
    }

    Ok(())
}

fn run_uninstall(
    tx: &Sender<InstallerEvent>,
    ctx: &InstallContext<'_>,
    session: &mut InstallSession,
) -> Result<()> {
    let step = StepReporter::new(tx, UNINSTALL_STEPS);

    step.begin(session, 0);
    if !ctx.elevated {
        return Err(step.fail(
            session,
            0,
            anyhow!("administrator privileges are required to unregister the file type"),
        ));
    }
    step.log(session, "Running with administrator privileges");
    step.done(session, 0);

    step.begin(session, 1);
    let assoc = FileAssociation::for_viewer(&ctx.install_dir.join(VIEWER_EXE));
    match registry::revert(ctx.registry, &assoc) {
        Ok(report) if report.removed == 0 => {
            step.log(session, ".yeet file type was not registered");
            step.done(session, 1);
        }
        Ok(_) => {
            step.log(session, "Removed the .yeet file type");
            step.done(session, 1);
        }
        Err(err) => step.warn(
            session,
            1,
            format!("Could not fully unregister the file type: {err}"),
        ),
    }

    step.begin(session, 2);
    if ctx.install_dir.exists() {
        step.log(session, format!("Removing: {}", ctx.install_dir.display()));
        match fs::remove_dir_all(&ctx.install_dir) {
            Ok(()) => step.done(session, 2),
            Err(err) => step.warn(session, 2, format!("Could not remove the viewer: {err}")),
        }
    } else {
        step.log(session, "Viewer was not installed");
        step.done(session, 2);
    }

    step.begin(session, 3);
    match registry::remove_uninstall_entry(ctx.registry, PRODUCT_ID) {
        Ok(KeyRemoval::Removed) => step.done(session, 3),
        Ok(KeyRemoval::Missing) => {
            step.log(session, "Programs-list entry was not found");
            step.done(session, 3);
        }
        Err(err) => step.warn(
            session,
            3,
            format!("Could not remove the programs-list entry: {err}"),
        ),
    }

    Ok(())
}

/// Emits the per-step status/log/progress events and mirrors every line into
/// the session log.
struct StepReporter<'a> {
    tx: &'a Sender<InstallerEvent>,
    names: &'static [&'static str],
}

impl<'a> StepReporter<'a> {
    fn new(tx: &'a Sender<InstallerEvent>, names: &'static [&'static str]) -> Self {
        Self { tx, names }
    }

    fn begin(&self, session: &mut InstallSession, index: usize) {
        let name = self.names[index];
        session.record(format!("{name}..."));
        let _ = self.tx.send(InstallerEvent::Status(format!("{name}...")));
        let _ = self.tx.send(InstallerEvent::Step {
            index,
            status: StepStatus::Running,
            err: None,
        });
    }

    fn log(&self, session: &mut InstallSession, message: impl Into<String>) {
        let message = message.into();
        session.record(message.clone());
        let _ = self.tx.send(InstallerEvent::Log(message));
    }

    fn done(&self, session: &mut InstallSession, index: usize) {
        session.record(format!("{} - ok", self.names[index]));
        let _ = self.tx.send(InstallerEvent::Step {
            index,
            status: StepStatus::Done,
            err: None,
        });
        self.progress(index);
    }

    fn warn(&self, session: &mut InstallSession, index: usize, message: String) {
        session.record(format!("warning: {message}"));
        let _ = self.tx.send(InstallerEvent::Log(format!("warning: {message}")));
        let _ = self.tx.send(InstallerEvent::Step {
            index,
            status: StepStatus::Warned,
            err: Some(message),
        });
        self.progress(index);
    }

    fn fail(&self, session: &mut InstallSession, index: usize, err: anyhow::Error) -> anyhow::Error {
        session.record(format!("{} failed: {err:#}", self.names[index]));
        let _ = self.tx.send(InstallerEvent::Log(format!("error: {err:#}")));
        let _ = self.tx.send(InstallerEvent::Step {
            index,
            status: StepStatus::Failed,
            err: Some(format!("{err:#}")),
        });
        err
    }

    fn progress(&self, index: usize) {
        let fraction = (index + 1) as f64 / self.names.len() as f64;
        let _ = self.tx.send(InstallerEvent::Progress(fraction));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Hive, MemoryRegistry};
    use crossbeam_channel::unbounded;
    use std::io;
    use std::path::Path;

    struct Fixture {
        _tmp: tempfile::TempDir,
        dirs: LocateDirs,
        install_dir: PathBuf,
        installer_exe: PathBuf,
    }

    fn fixture() -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let dirs = LocateDirs {
            exe_dir: root.join("installer"),
            workspace_dir: root.clone(),
            work_dir: root.join("installer"),
        };
        Fixture {
            dirs,
            install_dir: root.join("install"),
            installer_exe: root.join("installer").join("yeet-setup"),
            _tmp: tmp,
        }
    }

    fn place_viewer(fix: &Fixture) {
        // Workspace release build, the second candidate in search order.
        let path = fix
            .dirs
            .workspace_dir
            .join("target")
            .join("release")
            .join(VIEWER_EXE);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"viewer-bytes").unwrap();
    }

    fn run(
        store: &dyn RegistryStore,
        fix: &Fixture,
        mode: Mode,
        elevated: bool,
    ) -> (InstallSession, Vec<InstallerEvent>) {
        let ctx = InstallContext {
            registry: store,
            dirs: fix.dirs.clone(),
            install_dir: fix.install_dir.clone(),
            installer_exe: fix.installer_exe.clone(),
            elevated,
        };
        let (tx, rx) = unbounded();
        let mut session = InstallSession::new(mode);
        run_session(&tx, &ctx, &mut session);
        (session, rx.try_iter().collect())
    }

    fn step_events(events: &[InstallerEvent]) -> Vec<(usize, StepStatus)> {
        events
            .iter()
            .filter_map(|event| match event {
                InstallerEvent::Step { index, status, .. } => Some((*index, *status)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn install_then_uninstall_round_trip() {
        let store = MemoryRegistry::new();
        let fix = fixture();
        place_viewer(&fix);

        let (session, _) = run(&store, &fix, Mode::Install, true);
        assert_eq!(session.outcome, Outcome::Success);
        assert!(fix.install_dir.join(VIEWER_EXE).is_file());
        assert!(store.key_exists(Hive::ClassesRoot, ".yeet").unwrap());
        assert!(store
            .key_exists(
                Hive::LocalMachine,
                "Software\\Microsoft\\Windows\\CurrentVersion\\Uninstall\\YeetViewer"
            )
            .unwrap());
        assert_eq!(session.viewer_path, Some(fix.install_dir.join(VIEWER_EXE)));

        let (session, _) = run(&store, &fix, Mode::Uninstall, true);
        assert_eq!(session.outcome, Outcome::Success);
        assert!(!fix.install_dir.exists());
        assert!(!store.key_exists(Hive::ClassesRoot, ".yeet").unwrap());
        assert!(!store
            .key_exists(
                Hive::LocalMachine,
                "Software\\Microsoft\\Windows\\CurrentVersion\\Uninstall\\YeetViewer"
            )
            .unwrap());
    }

    #[test]
    fn missing_privileges_halt_before_any_work() {
        let store = MemoryRegistry::new();
        let fix = fixture();
        place_viewer(&fix);

        let (session, events) = run(&store, &fix, Mode::Install, false);
        assert_eq!(session.outcome, Outcome::Failure);
        assert!(!fix.install_dir.exists());
        assert!(store.dump().is_empty());
        assert_eq!(
            step_events(&events),
            vec![(0, StepStatus::Running), (0, StepStatus::Failed)]
        );
    }

    #[test]
    fn copy_failure_halts_without_touching_the_registry() {
        let store = MemoryRegistry::new();
        let fix = fixture();
        place_viewer(&fix);
        // A directory already squatting on the destination makes the copy
        // fail while every earlier step still succeeds.
        fs::create_dir_all(fix.install_dir.join(VIEWER_EXE)).unwrap();

        let (session, events) = run(&store, &fix, Mode::Install, true);
        assert_eq!(session.outcome, Outcome::Failure);
        assert!(store.dump().is_empty());

        let steps = step_events(&events);
        assert!(steps.contains(&(3, StepStatus::Failed)));
        assert!(steps.iter().all(|(index, _)| *index <= 3));
        assert!(events
            .iter()
            .any(|event| matches!(event, InstallerEvent::Done(Some(_)))));
    }

    #[test]
    fn viewer_not_found_is_a_reported_failure_not_a_panic() {
        let store = MemoryRegistry::new();
        let fix = fixture();

        let (session, events) = run(&store, &fix, Mode::Install, true);
        assert_eq!(session.outcome, Outcome::Failure);
        assert!(step_events(&events).contains(&(2, StepStatus::Failed)));
        assert!(session
            .render_log()
            .contains("no viewer executable found in any known location"));
    }

    /// Delegates to a real store but refuses every programs-list write.
    struct NoUninstallKey(MemoryRegistry);

    impl RegistryStore for NoUninstallKey {
        fn set_value(&self, hive: Hive, key: &str, name: &str, data: &str) -> io::Result<()> {
            if hive == Hive::LocalMachine {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "access denied",
                ));
            }
            self.0.set_value(hive, key, name, data)
        }

        fn get_value(&self, hive: Hive, key: &str, name: &str) -> io::Result<Option<String>> {
            self.0.get_value(hive, key, name)
        }

        fn delete_key(&self, hive: Hive, key: &str) -> io::Result<KeyRemoval> {
            self.0.delete_key(hive, key)
        }

        fn key_exists(&self, hive: Hive, key: &str) -> io::Result<bool> {
            self.0.key_exists(hive, key)
        }

        fn notify_changed(&self) {
            self.0.notify_changed();
        }
    }

    #[test]
    fn programs_entry_failure_is_a_warning_not_a_failure() {
        let store = NoUninstallKey(MemoryRegistry::new());
        let fix = fixture();
        place_viewer(&fix);

        let (session, events) = run(&store, &fix, Mode::Install, true);
        assert_eq!(session.outcome, Outcome::Success);
        assert!(store.0.key_exists(Hive::ClassesRoot, ".yeet").unwrap());

        let steps = step_events(&events);
        assert!(steps.contains(&(5, StepStatus::Warned)));
        assert!(events
            .iter()
            .any(|event| matches!(event, InstallerEvent::Done(None))));
    }

    #[test]
    fn uninstall_of_a_clean_system_succeeds_informationally() {
        let store = MemoryRegistry::new();
        let fix = fixture();

        let (session, events) = run(&store, &fix, Mode::Uninstall, true);
        assert_eq!(session.outcome, Outcome::Success);
        let log = session.render_log();
        assert!(log.contains(".yeet file type was not registered"));
        assert!(log.contains("Viewer was not installed"));
        assert!(log.contains("Programs-list entry was not found"));
        assert!(step_events(&events)
            .iter()
            .all(|(_, status)| *status != StepStatus::Failed));
    }

    #[test]
    fn progress_reaches_one_on_success() {
        let store = MemoryRegistry::new();
        let fix = fixture();
        place_viewer(&fix);

        let (_, events) = run(&store, &fix, Mode::Install, true);
        let last = events
            .iter()
            .filter_map(|event| match event {
                InstallerEvent::Progress(fraction) => Some(*fraction),
                _ => None,
            })
            .last()
            .unwrap();
        assert!((last - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn uninstall_string_points_back_at_the_installer() {
        let entry = UninstallEntry::for_install(
            Path::new("/opt/yeetviewer"),
            Path::new("/opt/yeet-setup"),
        );
        assert_eq!(entry.uninstall_string, "\"/opt/yeet-setup\" /uninstall");
    }
}
