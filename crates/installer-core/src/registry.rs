mod store;

use std::io;
use std::path::{Path, PathBuf};

pub use store::{default_store, Hive, KeyRemoval, MemoryRegistry, RegistryStore};
#[cfg(windows)]
pub use store::SystemRegistry;

pub const EXTENSION: &str = ".yeet";
pub const PROG_ID: &str = "YeetImageFile";
pub const DISPLAY_NAME: &str = "YEET Image File";
pub const CONTENT_TYPE: &str = "image/yeet";
pub const PERCEIVED_TYPE: &str = "image";
pub const PRODUCT_ID: &str = "YeetViewer";

const UNINSTALL_ROOT: &str = "Software\\Microsoft\\Windows\\CurrentVersion\\Uninstall";

/// Everything one file-type registration writes. All values under the prog
/// id reference the same resolved viewer path.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FileAssociation {
    pub extension: String,
    pub prog_id: String,
    pub display_name: String,
    pub content_type: String,
    pub perceived_type: String,
    pub viewer_path: PathBuf,
}

impl FileAssociation {
    pub fn for_viewer(viewer_path: &Path) -> Self {
        Self {
            extension: EXTENSION.to_string(),
            prog_id: PROG_ID.to_string(),
            display_name: DISPLAY_NAME.to_string(),
            content_type: CONTENT_TYPE.to_string(),
            perceived_type: PERCEIVED_TYPE.to_string(),
            viewer_path: viewer_path.to_path_buf(),
        }
    }

    pub fn icon_value(&self) -> String {
        format!("\"{}\",0", self.viewer_path.display())
    }

    /// Open command invoking the viewer with the clicked file substituted.
    pub fn open_command(&self) -> String {
        format!("\"{}\" \"%1\"", self.viewer_path.display())
    }

    fn icon_key(&self) -> String {
        format!("{}\\DefaultIcon", self.prog_id)
    }

    fn command_key(&self) -> String {
        format!("{}\\shell\\open\\command", self.prog_id)
    }
}

/// Writes the full association. Each write is idempotent, so re-applying
/// with the same inputs leaves the registry unchanged.
pub fn apply(store: &dyn RegistryStore, assoc: &FileAssociation) -> io::Result<()> {
    store.set_value(Hive::ClassesRoot, &assoc.extension, "", &assoc.prog_id)?;
    store.set_value(Hive::ClassesRoot, &assoc.prog_id, "", &assoc.display_name)?;
    store.set_value(
        Hive::ClassesRoot,
        &assoc.prog_id,
        "FriendlyTypeName",
        &assoc.display_name,
    )?;
    store.set_value(Hive::ClassesRoot, &assoc.icon_key(), "", &assoc.icon_value())?;
    store.set_value(
        Hive::ClassesRoot,
        &assoc.command_key(),
        "",
        &assoc.open_command(),
    )?;
    store.set_value(
        Hive::ClassesRoot,
        &assoc.extension,
        "Content Type",
        &assoc.content_type,
    )?;
    store.set_value(
        Hive::ClassesRoot,
        &assoc.extension,
        "PerceivedType",
        &assoc.perceived_type,
    )?;
    store.notify_changed();
    Ok(())
}

/// What `revert` found to do. Missing keys mean that portion was never
/// installed; reversal is unaffected.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RevertReport {
    pub removed: usize,
    pub missing: usize,
}

/// Deletes the association, leaf keys first. Absence of any key is not an
/// error; a genuine denial propagates so the caller can surface a warning.
pub fn revert(store: &dyn RegistryStore, assoc: &FileAssociation) -> io::Result<RevertReport> {
    let shell_open = format!("{}\\shell\\open", assoc.prog_id);
    let shell = format!("{}\\shell", assoc.prog_id);
    let keys = [
        assoc.extension.clone(),
        assoc.command_key(),
        shell_open,
        shell,
        assoc.icon_key(),
        assoc.prog_id.clone(),
    ];

    let mut report = RevertReport {
        removed: 0,
        missing: 0,
    };
    for key in &keys {
        match store.delete_key(Hive::ClassesRoot, key)? {
            KeyRemoval::Removed => report.removed += 1,
            KeyRemoval::Missing => report.missing += 1,
        }
    }
    store.notify_changed();
    Ok(report)
}

/// Programs-list record that lets the OS re-invoke this installer in
/// uninstall mode.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct UninstallEntry {
    pub product_id: String,
    pub display_name: String,
    pub publisher: String,
    pub display_version: String,
    pub install_location: PathBuf,
    pub uninstall_string: String,
}

impl UninstallEntry {
    pub fn for_install(install_dir: &Path, installer_exe: &Path) -> Self {
        Self {
            product_id: PRODUCT_ID.to_string(),
            display_name: "YEET Image Viewer".to_string(),
            publisher: "Stijn Jakobs".to_string(),
            display_version: "1.0.0".to_string(),
            install_location: install_dir.to_path_buf(),
            uninstall_string: crate::paths::uninstall_command(installer_exe),
        }
    }

    fn key(&self) -> String {
        format!("{}\\{}", UNINSTALL_ROOT, self.product_id)
    }
}

pub fn add_uninstall_entry(store: &dyn RegistryStore, entry: &UninstallEntry) -> io::Result<()> {
    let key = entry.key();
    store.set_value(Hive::LocalMachine, &key, "DisplayName", &entry.display_name)?;
    store.set_value(Hive::LocalMachine, &key, "Publisher", &entry.publisher)?;
    store.set_value(
        Hive::LocalMachine,
        &key,
        "DisplayVersion",
        &entry.display_version,
    )?;
    store.set_value(
        Hive::LocalMachine,
        &key,
        "InstallLocation",
        &entry.install_location.display().to_string(),
    )?;
    store.set_value(
        Hive::LocalMachine,
        &key,
        "UninstallString",
        &entry.uninstall_string,
    )?;
    Ok(())
}

pub fn remove_uninstall_entry(
    store: &dyn RegistryStore,
    product_id: &str,
) -> io::Result<KeyRemoval> {
    store.delete_key(
        Hive::LocalMachine,
        &format!("{}\\{}", UNINSTALL_ROOT, product_id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn association() -> FileAssociation {
        FileAssociation::for_viewer(Path::new("/opt/yeetviewer/yeet"))
    }

    #[test]
    fn apply_is_idempotent() {
        let store = MemoryRegistry::new();
        let assoc = association();
        apply(&store, &assoc).unwrap();
        let first = store.dump();
        apply(&store, &assoc).unwrap();
        assert_eq!(store.dump(), first);
    }

    #[test]
    fn apply_writes_the_full_record() {
        let store = MemoryRegistry::new();
        let assoc = association();
        apply(&store, &assoc).unwrap();

        assert_eq!(
            store.get_value(Hive::ClassesRoot, ".yeet", "").unwrap(),
            Some("YeetImageFile".to_string())
        );
        assert_eq!(
            store
                .get_value(Hive::ClassesRoot, ".yeet", "Content Type")
                .unwrap(),
            Some("image/yeet".to_string())
        );
        assert_eq!(
            store
                .get_value(Hive::ClassesRoot, ".yeet", "PerceivedType")
                .unwrap(),
            Some("image".to_string())
        );
        assert_eq!(
            store
                .get_value(Hive::ClassesRoot, "YeetImageFile\\shell\\open\\command", "")
                .unwrap(),
            Some(assoc.open_command())
        );
        assert_eq!(
            store
                .get_value(Hive::ClassesRoot, "YeetImageFile\\DefaultIcon", "")
                .unwrap(),
            Some(assoc.icon_value())
        );
        assert_eq!(store.notifications(), 1);
    }

    #[test]
    fn revert_then_apply_reproduces_the_original_state() {
        let store = MemoryRegistry::new();
        let assoc = association();
        apply(&store, &assoc).unwrap();
        let installed = store.dump();

        let report = revert(&store, &assoc).unwrap();
        assert!(report.removed > 0);
        assert!(store.dump().is_empty());

        apply(&store, &assoc).unwrap();
        assert_eq!(store.dump(), installed);
    }

    #[test]
    fn revert_of_a_clean_system_reports_only_missing_keys() {
        let store = MemoryRegistry::new();
        let report = revert(&store, &association()).unwrap();
        assert_eq!(report.removed, 0);
        assert_eq!(report.missing, 6);
        // The change broadcast still fires so shells drop stale state.
        assert_eq!(store.notifications(), 1);
    }

    #[test]
    fn uninstall_entry_lifecycle() {
        let store = MemoryRegistry::new();
        let entry = UninstallEntry::for_install(
            Path::new("/opt/yeetviewer"),
            Path::new("/opt/yeetviewer/yeet-setup"),
        );
        add_uninstall_entry(&store, &entry).unwrap();

        let key = format!("{}\\{}", UNINSTALL_ROOT, PRODUCT_ID);
        assert_eq!(
            store
                .get_value(Hive::LocalMachine, &key, "DisplayName")
                .unwrap(),
            Some("YEET Image Viewer".to_string())
        );
        assert!(entry.uninstall_string.ends_with("/uninstall"));

        assert_eq!(
            remove_uninstall_entry(&store, PRODUCT_ID).unwrap(),
            KeyRemoval::Removed
        );
        assert_eq!(
            remove_uninstall_entry(&store, PRODUCT_ID).unwrap(),
            KeyRemoval::Missing
        );
    }
}
