/// How an elevated-relaunch request ended.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Relaunch {
    /// A new elevated instance was started; this process should exit.
    Initiated,
    /// The user declined the consent prompt.
    Denied,
    Failed(String),
}

#[cfg(windows)]
pub fn is_elevated() -> bool {
    use windows_sys::Win32::UI::Shell::IsUserAnAdmin;
    unsafe { IsUserAnAdmin() != 0 }
}

#[cfg(unix)]
pub fn is_elevated() -> bool {
    unsafe { libc::geteuid() == 0 }
}

/// Relaunches this binary with an elevation request, forwarding `args`.
/// The new instance starts its own wizard from the beginning.
#[cfg(windows)]
pub fn relaunch_elevated(args: &[&str]) -> Relaunch {
    use std::os::windows::ffi::OsStrExt;
    use windows_sys::Win32::UI::Shell::ShellExecuteW;
    use windows_sys::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

    const SE_ERR_ACCESSDENIED: isize = 5;

    fn to_wide(value: &std::ffi::OsStr) -> Vec<u16> {
        value.encode_wide().chain(std::iter::once(0)).collect()
    }

    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(err) => return Relaunch::Failed(format!("resolve current exe: {err}")),
    };
    let exe_wide = to_wide(exe.as_os_str());
    let verb = to_wide(std::ffi::OsStr::new("runas"));
    let params = to_wide(std::ffi::OsStr::new(&args.join(" ")));

    let result = unsafe {
        ShellExecuteW(
            std::ptr::null_mut(),
            verb.as_ptr(),
            exe_wide.as_ptr(),
            params.as_ptr(),
            std::ptr::null(),
            SW_SHOWNORMAL,
        )
    } as isize;

    if result > 32 {
        Relaunch::Initiated
    } else if result == SE_ERR_ACCESSDENIED {
        Relaunch::Denied
    } else {
        Relaunch::Failed(format!("relaunch failed (code {result})"))
    }
}

#[cfg(not(windows))]
pub fn relaunch_elevated(_args: &[&str]) -> Relaunch {
    Relaunch::Failed("elevated relaunch is only supported on Windows".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(windows))]
    fn relaunch_is_unsupported_off_windows() {
        match relaunch_elevated(&[]) {
            Relaunch::Failed(reason) => assert!(reason.contains("Windows")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn elevation_check_does_not_panic() {
        let _ = is_elevated();
    }
}
