//! Subprocess supervisor (§4.B): spawns the debugger with its MI2 interpreter
//! and owns the child's stdio handles until they are handed off to the
//! demultiplexer and dispatcher.

use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStderr, ChildStdout, Command, ExitStatus, Stdio};

use crate::error::{Error, Result};

/// What the debugger should attach to.
#[derive(Debug, Clone)]
pub enum Target {
    /// Launch a fresh program under the debugger.
    Program(String),
    /// Attach to an already-running process by pid.
    Pid(u32),
}

/// Construction parameters for a [`crate::Gdb`] session.
///
/// Mirrors the teacher's layered root-directory resolution (`resolve_root`)
/// in spirit: every field has a sane default, and nothing here reads a
/// configuration *file* — that stays out of scope per spec.md §1.
#[derive(Debug, Clone)]
pub struct GdbOptions {
    /// Path to the debugger executable. Defaults to `"gdb"` (resolved via
    /// `PATH`).
    pub executable: String,
    /// What to debug.
    pub target: Target,
    /// Working directory for the debugger process, used to resolve source
    /// file paths. `None` inherits the caller's current directory.
    pub working_dir: Option<PathBuf>,
    /// Extra arguments appended after the interpreter flag, for
    /// debugger-specific tuning this crate doesn't model directly.
    pub extra_args: Vec<String>,
}

impl GdbOptions {
    /// Launch `program` under a fresh debugger instance.
    pub fn launch(program: impl Into<String>) -> Self {
        GdbOptions {
            executable: "gdb".to_string(),
            target: Target::Program(program.into()),
            working_dir: None,
            extra_args: Vec::new(),
        }
    }

    /// Attach the debugger to an already-running process.
    pub fn attach(pid: u32) -> Self {
        GdbOptions {
            executable: "gdb".to_string(),
            target: Target::Pid(pid),
            working_dir: None,
            extra_args: Vec::new(),
        }
    }

    /// Override the debugger executable path.
    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Set the working directory used to resolve source paths.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

/// An owned debugger subprocess with its stdio pipes split out.
pub struct GdbProcess {
    child: Child,
}

impl GdbProcess {
    /// Spawn the debugger per `options`, with `--interpreter mi2` and stdio
    /// wired as pipes.
    ///
    /// On Unix the child is placed in its own process group (the Rust
    /// analogue of the teacher's Windows Job Object assignment in
    /// `run.rs::assign_to_job_object` — same purpose, different platform:
    /// isolate the child so signals aimed at the driver do not reach the
    /// debugger or its inferior). On platforms without that semantics this
    /// step is a no-op.
    pub fn spawn(options: &GdbOptions) -> Result<GdbProcess> {
        let mut cmd = Command::new(&options.executable);

        match &options.target {
            Target::Program(program) => {
                cmd.arg(program);
            }
            Target::Pid(pid) => {
                cmd.arg("-p").arg(pid.to_string());
            }
        }

        cmd.arg("--interpreter").arg("mi2");
        cmd.args(&options.extra_args);

        if let Some(dir) = &options.working_dir {
            cmd.current_dir(dir);
        }

        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        fix_process_group(&mut cmd);

        let child = cmd.spawn().map_err(Error::Spawn)?;
        tracing::info!(pid = child.id(), executable = %options.executable, "debugger subprocess spawned");

        Ok(GdbProcess { child })
    }

    /// Take ownership of the child's stdin, stdout and stderr handles.
    ///
    /// Panics if called more than once — the handles can only be taken once
    /// per process, by construction of `std::process::Child`.
    pub fn take_stdio(&mut self) -> (ChildStdin, ChildStdout, ChildStderr) {
        let stdin = self.child.stdin.take().expect("stdin piped at spawn");
        let stdout = self.child.stdout.take().expect("stdout piped at spawn");
        let stderr = self.child.stderr.take().expect("stderr piped at spawn");
        (stdin, stdout, stderr)
    }

    /// The OS process id of the debugger itself (not the inferior).
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Block until the debugger subprocess exits.
    pub fn wait_for_exit(&mut self) -> Result<ExitStatus> {
        self.child.wait().map_err(Error::Io)
    }
}

#[cfg(unix)]
fn fix_process_group(cmd: &mut Command) {
    use std::os::unix::process::CommandExt;
    // SAFETY: setpgid(0, 0) in the post-fork child is async-signal-safe and
    // touches only the child's own process state.
    unsafe {
        cmd.pre_exec(|| {
            if libc::setpgid(0, 0) != 0 {
                return Err(std::io::Error::last_os_error());
            }
            Ok(())
        });
    }
}

#[cfg(not(unix))]
fn fix_process_group(_cmd: &mut Command) {
    // No process-group separation is required on Windows: processes do not
    // share signals the way they do on Unix.
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_defaults_to_gdb_with_no_working_dir() {
        let options = GdbOptions::launch("a.out");
        assert_eq!(options.executable, "gdb");
        assert!(options.working_dir.is_none());
        match options.target {
            Target::Program(program) => assert_eq!(program, "a.out"),
            Target::Pid(_) => panic!("expected Target::Program"),
        }
    }

    #[test]
    fn attach_targets_by_pid() {
        let options = GdbOptions::attach(4321);
        match options.target {
            Target::Pid(pid) => assert_eq!(pid, 4321),
            Target::Program(_) => panic!("expected Target::Pid"),
        }
    }

    #[test]
    fn with_working_dir_stores_the_given_path() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let options = GdbOptions::launch("a.out").with_working_dir(dir.path());
        assert_eq!(options.working_dir.as_deref(), Some(dir.path()));
    }

    #[test]
    fn with_executable_overrides_the_default() {
        let options = GdbOptions::launch("a.out").with_executable("gdb-multiarch");
        assert_eq!(options.executable, "gdb-multiarch");
    }
}
