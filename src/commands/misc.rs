//! `-gdb-set`, `-gdb-show`, `-gdb-exit`. These three commands don't share a
//! family with anything else in spec.md §6's operation list, so they get
//! their own module rather than crowding into one of the others.

use serde::Deserialize;

use crate::dispatcher::Session;
use crate::error::Result;

use super::{decode, decode_unit};

pub fn gdb_set(session: &Session, name: &str, value: &str) -> Result<()> {
    let cmd = format!("-gdb-set {name} {value}");
    decode_unit(session.command(cmd, false)?)
}

#[derive(Debug, Clone, Deserialize)]
pub struct GdbShowResult {
    pub value: String,
}

pub fn gdb_show(session: &Session, name: &str) -> Result<GdbShowResult> {
    let cmd = format!("-gdb-show {name}");
    decode(session.command(cmd, false)?)
}

/// Terminate the debugger.
///
/// Always force-interrupts: `-gdb-exit` is the command §4.E names as
/// requiring the inferior to be paused first, and it is the one entry in
/// `dispatcher::SUPPRESS_RESUME` — no `-exec-continue` follows it, since
/// cleanup is already under way (spec.md §8 scenario 5).
pub fn gdb_exit(session: &Session) -> Result<()> {
    decode_unit(session.command("-gdb-exit", true)?)
}
