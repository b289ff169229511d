use std::collections::BTreeMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Logical registry root a key path is relative to.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Hive {
    ClassesRoot,
    LocalMachine,
}

impl Hive {
    fn tag(self) -> &'static str {
        match self {
            Hive::ClassesRoot => "HKCR",
            Hive::LocalMachine => "HKLM",
        }
    }
}

/// Outcome of a key deletion. Absence is a distinguished non-error result:
/// "nothing to do" must stay separate from "operation failed".
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum KeyRemoval {
    Removed,
    Missing,
}

/// Key/value surface the association code is written against. The empty
/// value name addresses a key's default value.
pub trait RegistryStore {
    fn set_value(&self, hive: Hive, key: &str, name: &str, data: &str) -> io::Result<()>;
    fn get_value(&self, hive: Hive, key: &str, name: &str) -> io::Result<Option<String>>;
    fn delete_key(&self, hive: Hive, key: &str) -> io::Result<KeyRemoval>;
    fn key_exists(&self, hive: Hive, key: &str) -> io::Result<bool>;
    /// Broadcast that file associations changed so running shells refresh.
    fn notify_changed(&self);
}

/// In-memory store. Backs tests everywhere and the dry-run mode on hosts
/// without a system registry.
#[derive(Default)]
pub struct MemoryRegistry {
    keys: Mutex<BTreeMap<(Hive, String), BTreeMap<String, String>>>,
    notifications: AtomicUsize,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> usize {
        self.notifications.load(Ordering::SeqCst)
    }

    /// Flattened snapshot of every key and value, for comparisons in tests.
    pub fn dump(&self) -> BTreeMap<String, BTreeMap<String, String>> {
        let keys = self.keys.lock().unwrap();
        keys.iter()
            .map(|((hive, key), values)| (format!("{}\\{}", hive.tag(), key), values.clone()))
            .collect()
    }
}

impl RegistryStore for MemoryRegistry {
    fn set_value(&self, hive: Hive, key: &str, name: &str, data: &str) -> io::Result<()> {
        let mut keys = self.keys.lock().unwrap();
        keys.entry((hive, key.to_string()))
            .or_default()
            .insert(name.to_string(), data.to_string());
        Ok(())
    }

    fn get_value(&self, hive: Hive, key: &str, name: &str) -> io::Result<Option<String>> {
        let keys = self.keys.lock().unwrap();
        Ok(keys
            .get(&(hive, key.to_string()))
            .and_then(|values| values.get(name).cloned()))
    }

    fn delete_key(&self, hive: Hive, key: &str) -> io::Result<KeyRemoval> {
        let mut keys = self.keys.lock().unwrap();
        match keys.remove(&(hive, key.to_string())) {
            Some(_) => Ok(KeyRemoval::Removed),
            None => Ok(KeyRemoval::Missing),
        }
    }

    fn key_exists(&self, hive: Hive, key: &str) -> io::Result<bool> {
        let keys = self.keys.lock().unwrap();
        Ok(keys.contains_key(&(hive, key.to_string())))
    }

    fn notify_changed(&self) {
        self.notifications.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(windows)]
pub use system::SystemRegistry;

#[cfg(windows)]
mod system {
    use super::{Hive, KeyRemoval, RegistryStore};
    use std::io;

    use winreg::enums::{HKEY_CLASSES_ROOT, HKEY_LOCAL_MACHINE};
    use winreg::RegKey;

    use windows_sys::Win32::UI::Shell::{SHChangeNotify, SHCNE_ASSOCCHANGED, SHCNF_IDLIST};

    /// The live Windows registry.
    pub struct SystemRegistry;

    fn root(hive: Hive) -> RegKey {
        match hive {
            Hive::ClassesRoot => RegKey::predef(HKEY_CLASSES_ROOT),
            Hive::LocalMachine => RegKey::predef(HKEY_LOCAL_MACHINE),
        }
    }

    impl RegistryStore for SystemRegistry {
        fn set_value(&self, hive: Hive, key: &str, name: &str, data: &str) -> io::Result<()> {
            let (subkey, _) = root(hive).create_subkey(key)?;
            subkey.set_value(name, &data)
        }

        fn get_value(&self, hive: Hive, key: &str, name: &str) -> io::Result<Option<String>> {
            let subkey = match root(hive).open_subkey(key) {
                Ok(subkey) => subkey,
                Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
                Err(err) => return Err(err),
            };
            match subkey.get_value::<String, _>(name) {
                Ok(value) => Ok(Some(value)),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err),
            }
        }

        fn delete_key(&self, hive: Hive, key: &str) -> io::Result<KeyRemoval> {
            match root(hive).delete_subkey(key) {
                Ok(()) => Ok(KeyRemoval::Removed),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(KeyRemoval::Missing),
                Err(err) => Err(err),
            }
        }

        fn key_exists(&self, hive: Hive, key: &str) -> io::Result<bool> {
            match root(hive).open_subkey(key) {
                Ok(_) => Ok(true),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
                Err(err) => Err(err),
            }
        }

        fn notify_changed(&self) {
            unsafe {
                SHChangeNotify(
                    SHCNE_ASSOCCHANGED,
                    SHCNF_IDLIST,
                    std::ptr::null(),
                    std::ptr::null(),
                )
            };
        }
    }
}

/// The store a normal run should use on this host: the system registry on
/// Windows, the in-memory dry-run store elsewhere.
#[cfg(windows)]
pub fn default_store() -> SystemRegistry {
    SystemRegistry
}

#[cfg(not(windows))]
pub fn default_store() -> MemoryRegistry {
    MemoryRegistry::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_round_trip() {
        let store = MemoryRegistry::new();
        store
            .set_value(Hive::ClassesRoot, ".yeet", "", "YeetImageFile")
            .unwrap();
        assert_eq!(
            store.get_value(Hive::ClassesRoot, ".yeet", "").unwrap(),
            Some("YeetImageFile".to_string())
        );
        assert_eq!(store.get_value(Hive::ClassesRoot, ".yeet", "missing").unwrap(), None);
    }

    #[test]
    fn deleting_an_absent_key_reports_missing() {
        let store = MemoryRegistry::new();
        assert_eq!(
            store.delete_key(Hive::ClassesRoot, "NoSuchKey").unwrap(),
            KeyRemoval::Missing
        );
        store
            .set_value(Hive::ClassesRoot, "NoSuchKey", "", "x")
            .unwrap();
        assert_eq!(
            store.delete_key(Hive::ClassesRoot, "NoSuchKey").unwrap(),
            KeyRemoval::Removed
        );
    }

    #[test]
    fn hives_do_not_alias() {
        let store = MemoryRegistry::new();
        store.set_value(Hive::ClassesRoot, "Shared", "", "a").unwrap();
        assert!(!store.key_exists(Hive::LocalMachine, "Shared").unwrap());
        assert!(store.key_exists(Hive::ClassesRoot, "Shared").unwrap());
    }
}
