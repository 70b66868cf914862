//! Platform-specific interrupt primitive: deliver an interrupt to the
//! debugged process without going through the debugger's own command
//! channel, so a command that requires a paused inferior can force a pause
//! first.
//!
//! Unix sends `SIGINT` to the inferior's process group; Windows posts a
//! Ctrl-Break to its console.

/// Send an interrupt to the inferior identified by `pid` (decimal string, as
/// the debugger reports it).
///
/// Unix: `SIGINT` to the process group (negative pid). This crate always
/// has a group to target, since [`crate::process::GdbProcess::spawn`]
/// places the debugger (and therefore its inferior) in one.
#[cfg(unix)]
pub fn interrupt_inferior(pid: &str) -> std::io::Result<()> {
    let pid: libc::pid_t = pid
        .parse()
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "malformed pid"))?;
    // SAFETY: kill(2) is safe to call with any pid and valid signal number.
    let ret = unsafe { libc::kill(-pid, libc::SIGINT) };
    if ret != 0 {
        let err = std::io::Error::last_os_error();
        if err.raw_os_error() != Some(libc::ESRCH) {
            return Err(err);
        }
    }
    Ok(())
}

/// Windows: post `CTRL_BREAK_EVENT` to the inferior's console process group
/// via the `windows` crate (see DESIGN.md for why this doesn't shell out to
/// a helper binary).
#[cfg(windows)]
pub fn interrupt_inferior(pid: &str) -> std::io::Result<()> {
    use windows::Win32::System::Console::{GenerateConsoleCtrlEvent, CTRL_BREAK_EVENT};

    let pid: u32 = pid
        .parse()
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "malformed pid"))?;

    unsafe {
        GenerateConsoleCtrlEvent(CTRL_BREAK_EVENT, pid)
            .map_err(|e| std::io::Error::other(e.to_string()))
    }
}

#[cfg(not(any(unix, windows)))]
pub fn interrupt_inferior(_pid: &str) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "interrupting the inferior is not supported on this platform",
    ))
}
