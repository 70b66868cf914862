//! A client library for driving a debugger's MI2 machine interface over a
//! subprocess's stdin/stdout/stderr.
//!
//! [`Gdb`] spawns the debugger, wires up the three long-lived tasks the
//! protocol needs (a stdout reader, a stderr drain, and a stdin
//! dispatcher), and exposes a typed façade over the handful of MI commands
//! `commands` implements. Four channels — [`Gdb::console`],
//! [`Gdb::target`], [`Gdb::internal_log`], [`Gdb::async_results`] — carry
//! everything the debugger prints or reports asynchronously; callers must
//! keep draining all four or the reader thread blocks and wedges every
//! in-flight command (see the module docs on `demux` for why).

pub mod commands;
pub mod demux;
pub mod dispatcher;
pub mod error;
pub mod inferior;
pub mod parser;
pub mod process;
pub mod signal;

use std::process::ExitStatus;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

pub use commands::breakpoint::{
    break_disable, break_enable, break_insert, break_list, BreakInsertParms, BreakInsertResult,
    BreakListResult, Breakpoint, BreakpointHeaderElement, BreakpointTable,
};
pub use commands::exec::{
    exec_continue, exec_interrupt, exec_next, exec_run, exec_step, ExecContinueParms,
    ExecInterruptParms, ExecNextParms, ExecRunParms, ExecStepParms,
};
pub use commands::frame::{
    stack_info_frame, stack_list_frames, stack_list_variables, Frame, StackInfoFrameResult,
    StackListFramesParms, StackListFramesResult, StackListVariablesParms,
    StackListVariablesResult, Variable,
};
pub use commands::misc::{gdb_exit, gdb_set, gdb_show, GdbShowResult};
pub use commands::thread::{
    thread_info, thread_list_ids, thread_select, ArgInfo, FrameInfo, ThreadInfo,
    ThreadInfoParms, ThreadInfoResult, ThreadListIdsResult, ThreadSelectParms,
    ThreadSelectResult,
};
pub use commands::variable::{
    var_create, var_delete, var_list_children, ChildVar, VarCreateParms, VarCreateResult,
    VarDeleteParms, VarListChildrenParms, VarListChildrenResult,
};
pub use demux::AsyncResultRecord;
pub use dispatcher::Session;
pub use error::{Error, Result};
pub use inferior::InferiorState;
pub use process::{GdbOptions, GdbProcess, Target};

/// A running debugger session: the subprocess, its demultiplexed output
/// streams, and the dispatcher that owns its stdin.
pub struct Gdb {
    process: GdbProcess,
    session: Session,
    inferior: Arc<InferiorState>,
    console: Receiver<String>,
    target: Receiver<String>,
    internal_log: Receiver<String>,
    async_results: Receiver<AsyncResultRecord>,
}

impl Gdb {
    /// Spawn the debugger per `options` and bring up all three long-lived
    /// tasks (§5).
    ///
    /// Rust's `std::process::Command::spawn` already opens stdio pipes
    /// synchronously before returning the child, so the start barrier
    /// spec.md §5 describes (writer opens stdin before the reader attempts
    /// stdout) is satisfied by construction here — there is no window where
    /// the reader thread could race the writer for an unopened pipe, unlike
    /// the two-phase pipe-then-start dance the original source performs
    /// (see DESIGN.md).
    pub fn launch(options: GdbOptions) -> Result<Gdb> {
        let mut process = GdbProcess::spawn(&options)?;
        let (stdin, stdout, stderr) = process.take_stdio();

        let (console_tx, console_rx) = std::sync::mpsc::channel();
        let (target_tx, target_rx) = std::sync::mpsc::channel();
        let (log_tx, log_rx) = std::sync::mpsc::channel();
        let (async_tx, async_rx) = std::sync::mpsc::channel();
        let (results_tx, results_rx) = std::sync::mpsc::channel();

        let channels = demux::Channels {
            console: console_tx,
            target: target_tx,
            internal_log: log_tx,
            async_results: async_tx,
        };

        let inferior = Arc::new(InferiorState::new());

        let reader_channels = channels.clone();
        let reader_inferior = inferior.clone();
        std::thread::spawn(move || {
            demux::run_reader(stdout, reader_channels, reader_inferior, results_tx);
        });

        let stderr_target = channels.target.clone();
        std::thread::spawn(move || {
            demux::run_err_reader(stderr, stderr_target);
        });

        let session = Session::spawn(stdin, results_rx, inferior.clone());

        Ok(Gdb {
            process,
            session,
            inferior,
            console: console_rx,
            target: target_rx,
            internal_log: log_rx,
            async_results: async_rx,
        })
    }

    /// The dispatcher handle, for callers that want to issue raw commands
    /// not covered by the typed façade.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The debugger's `(pid, running)` snapshot, per [`InferiorState`].
    pub fn inferior_snapshot(&self) -> (Option<String>, bool) {
        self.inferior.snapshot()
    }

    /// Console stream (`~`): human-readable debugger output.
    pub fn console(&self) -> &Receiver<String> {
        &self.console
    }

    /// Target stream (`@`): inferior output, plus raw/unclassified lines
    /// and `[stderr] `-prefixed stderr lines.
    pub fn target(&self) -> &Receiver<String> {
        &self.target
    }

    /// Internal log stream (`&`): the debugger's own log of commands and
    /// diagnostics.
    pub fn internal_log(&self) -> &Receiver<String> {
        &self.internal_log
    }

    /// Async result records (`*`/`=`): execution and notification events.
    pub fn async_results(&self) -> &Receiver<AsyncResultRecord> {
        &self.async_results
    }

    /// Block until the debugger subprocess exits.
    pub fn wait_for_exit(&mut self) -> Result<ExitStatus> {
        self.process.wait_for_exit()
    }

    /// Issue `-gdb-exit` and wait for the subprocess to terminate — the
    /// session-close procedure spec.md §5 describes.
    pub fn close(&mut self) -> Result<ExitStatus> {
        gdb_exit(&self.session)?;
        self.wait_for_exit()
    }

    pub fn break_list(&self) -> Result<BreakListResult> {
        break_list(&self.session)
    }

    pub fn break_insert(&self, parms: &BreakInsertParms) -> Result<BreakInsertResult> {
        break_insert(&self.session, parms)
    }

    pub fn break_enable(&self, breakpoints: &[String]) -> Result<()> {
        break_enable(&self.session, breakpoints)
    }

    pub fn break_disable(&self, breakpoints: &[String]) -> Result<()> {
        break_disable(&self.session, breakpoints)
    }

    pub fn exec_run(&self, parms: &ExecRunParms) -> Result<()> {
        exec_run(&self.session, parms)
    }

    pub fn exec_interrupt(&self, parms: &ExecInterruptParms) -> Result<()> {
        exec_interrupt(&self.session, parms)
    }

    pub fn exec_next(&self, parms: &ExecNextParms) -> Result<()> {
        exec_next(&self.session, parms)
    }

    pub fn exec_step(&self, parms: &ExecStepParms) -> Result<()> {
        exec_step(&self.session, parms)
    }

    pub fn exec_continue(&self, parms: &ExecContinueParms) -> Result<()> {
        exec_continue(&self.session, parms)
    }

    pub fn stack_info_frame(&self) -> Result<StackInfoFrameResult> {
        stack_info_frame(&self.session)
    }

    pub fn stack_list_frames(
        &self,
        parms: &StackListFramesParms,
    ) -> Result<StackListFramesResult> {
        stack_list_frames(&self.session, parms)
    }

    pub fn stack_list_variables(
        &self,
        parms: &StackListVariablesParms,
    ) -> Result<StackListVariablesResult> {
        stack_list_variables(&self.session, parms)
    }

    pub fn thread_list_ids(&self) -> Result<ThreadListIdsResult> {
        thread_list_ids(&self.session)
    }

    pub fn thread_info(&self, parms: &ThreadInfoParms) -> Result<ThreadInfoResult> {
        thread_info(&self.session, parms)
    }

    pub fn thread_select(&self, parms: &ThreadSelectParms) -> Result<ThreadSelectResult> {
        thread_select(&self.session, parms)
    }

    pub fn var_create(&self, parms: &VarCreateParms) -> Result<VarCreateResult> {
        var_create(&self.session, parms)
    }

    pub fn var_delete(&self, parms: &VarDeleteParms) -> Result<()> {
        var_delete(&self.session, parms)
    }

    pub fn var_list_children(
        &self,
        parms: &VarListChildrenParms,
    ) -> Result<VarListChildrenResult> {
        var_list_children(&self.session, parms)
    }

    pub fn gdb_set(&self, name: &str, value: &str) -> Result<()> {
        gdb_set(&self.session, name, value)
    }

    pub fn gdb_show(&self, name: &str) -> Result<GdbShowResult> {
        gdb_show(&self.session, name)
    }
}
