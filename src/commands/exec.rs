//! `-exec-*` commands. Grounded on `exec.go`.
//!
//! None of these commands carry a result payload worth decoding (the Go
//! originals all call `parseResult(result, nil)`), so each builds its
//! command string and checks only the indication.

use crate::dispatcher::Session;
use crate::error::Result;

use super::decode_unit;

#[derive(Debug, Clone, Default)]
pub struct ExecRunParms {
    pub thread_group: Option<String>,
    pub all_inferiors: bool,
}

pub fn exec_run(session: &Session, parms: &ExecRunParms) -> Result<()> {
    let mut cmd = String::from("-exec-run");
    if parms.all_inferiors {
        cmd.push_str(" --all");
    } else if let Some(group) = &parms.thread_group {
        cmd.push_str(" --thread-group ");
        cmd.push_str(group);
    }
    decode_unit(session.command(cmd, false)?)
}

#[derive(Debug, Clone, Default)]
pub struct ExecInterruptParms {
    pub thread_group: Option<String>,
    pub all_inferiors: bool,
}

pub fn exec_interrupt(session: &Session, parms: &ExecInterruptParms) -> Result<()> {
    let mut cmd = String::from("-exec-interrupt");
    if parms.all_inferiors {
        cmd.push_str(" --all");
    } else if let Some(group) = &parms.thread_group {
        cmd.push_str(" --thread-group ");
        cmd.push_str(group);
    }
    decode_unit(session.command(cmd, false)?)
}

#[derive(Debug, Clone, Default)]
pub struct ExecNextParms {
    pub reverse: bool,
}

pub fn exec_next(session: &Session, parms: &ExecNextParms) -> Result<()> {
    let mut cmd = String::from("-exec-next");
    if parms.reverse {
        cmd.push_str(" --reverse");
    }
    decode_unit(session.command(cmd, false)?)
}

#[derive(Debug, Clone, Default)]
pub struct ExecStepParms {
    pub reverse: bool,
}

pub fn exec_step(session: &Session, parms: &ExecStepParms) -> Result<()> {
    let mut cmd = String::from("-exec-step");
    if parms.reverse {
        cmd.push_str(" --reverse");
    }
    decode_unit(session.command(cmd, false)?)
}

#[derive(Debug, Clone, Default)]
pub struct ExecContinueParms {
    pub reverse: bool,
    pub thread_group: Option<String>,
    pub all_inferiors: bool,
}

pub fn exec_continue(session: &Session, parms: &ExecContinueParms) -> Result<()> {
    let mut cmd = String::from("-exec-continue");
    if parms.reverse {
        cmd.push_str(" --reverse");
    }
    if parms.all_inferiors {
        cmd.push_str(" --all");
    } else if let Some(group) = &parms.thread_group {
        cmd.push_str(" --thread-group ");
        cmd.push_str(group);
    }
    decode_unit(session.command(cmd, false)?)
}
