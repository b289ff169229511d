use std::path::PathBuf;

use anyhow::{Context, Result};

#[cfg(windows)]
pub const VIEWER_EXE: &str = "yeet.exe";
#[cfg(not(windows))]
pub const VIEWER_EXE: &str = "yeet";

#[cfg(windows)]
const SELF_BUILT_EXE: &str = "YeetViewer.exe";
#[cfg(not(windows))]
const SELF_BUILT_EXE: &str = "YeetViewer";

/// Directories the candidate search is anchored to.
#[derive(Clone, Debug)]
pub struct LocateDirs {
    /// Directory holding the running installer binary.
    pub exe_dir: PathBuf,
    /// Workspace root the viewer is built in during development.
    pub workspace_dir: PathBuf,
    /// The installer's own working directory.
    pub work_dir: PathBuf,
}

impl LocateDirs {
    pub fn discover() -> Result<Self> {
        let exe = std::env::current_exe().context("resolve current exe")?;
        let exe_dir = exe
            .parent()
            .context("installer exe has no parent directory")?
            .to_path_buf();
        let work_dir = std::env::current_dir().context("resolve working directory")?;
        // During development the installer lives one level below the
        // workspace that builds the viewer.
        let workspace_dir = exe_dir.parent().unwrap_or(&exe_dir).to_path_buf();
        Ok(Self {
            exe_dir,
            workspace_dir,
            work_dir,
        })
    }
}

#[derive(Clone, Debug)]
pub struct Candidate {
    pub path: PathBuf,
    pub label: &'static str,
}

/// Candidate locations in priority order. Kept in sync with where the
/// distributable bundles the viewer and where development builds land.
pub fn candidates(dirs: &LocateDirs) -> Vec<Candidate> {
    let ws = &dirs.workspace_dir;
    vec![
        Candidate {
            path: dirs.exe_dir.join(VIEWER_EXE),
            label: "viewer bundled with the installer",
        },
        Candidate {
            path: ws.join("target").join("release").join(VIEWER_EXE),
            label: "workspace release build",
        },
        Candidate {
            path: ws
                .join("yeet-core")
                .join("target")
                .join("release")
                .join(VIEWER_EXE),
            label: "yeet-core release build",
        },
        Candidate {
            path: ws
                .join("yeet-format")
                .join("target")
                .join("release")
                .join(VIEWER_EXE),
            label: "legacy release build",
        },
        Candidate {
            path: ws
                .join("yeet-format")
                .join("target")
                .join("debug")
                .join(VIEWER_EXE),
            label: "legacy debug build",
        },
        Candidate {
            path: dirs.work_dir.join("dist").join(SELF_BUILT_EXE),
            label: "previously built viewer",
        },
    ]
}

/// First candidate that exists on disk, or `None` when every location is
/// empty. Callers treat `None` as a normal, user-visible outcome.
pub fn locate(dirs: &LocateDirs) -> Option<Candidate> {
    candidates(dirs)
        .into_iter()
        .find(|candidate| candidate.path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn dirs_in(root: &Path) -> LocateDirs {
        LocateDirs {
            exe_dir: root.join("installer"),
            workspace_dir: root.to_path_buf(),
            work_dir: root.join("installer"),
        }
    }

    fn place(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"viewer").unwrap();
    }

    #[test]
    fn earlier_candidate_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = dirs_in(tmp.path());
        let all = candidates(&dirs);
        // Populate positions 2 and 4 (1-indexed); position 2 must win.
        place(&all[1].path);
        place(&all[3].path);

        let found = locate(&dirs).unwrap();
        assert_eq!(found.path, all[1].path);
        assert_eq!(found.label, "workspace release build");
    }

    #[test]
    fn exhausted_search_is_none_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = dirs_in(tmp.path());
        assert!(locate(&dirs).is_none());
    }

    #[test]
    fn candidate_order_is_stable() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = dirs_in(tmp.path());
        let labels: Vec<&str> = candidates(&dirs).iter().map(|c| c.label).collect();
        assert_eq!(
            labels,
            [
                "viewer bundled with the installer",
                "workspace release build",
                "yeet-core release build",
                "legacy release build",
                "legacy debug build",
                "previously built viewer",
            ]
        );
    }

    #[test]
    fn directories_do_not_count_as_candidates() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = dirs_in(tmp.path());
        let bundled = &candidates(&dirs)[0].path;
        fs::create_dir_all(bundled).unwrap();
        assert!(locate(&dirs).is_none());
    }
}
