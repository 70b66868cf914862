//! Typed command façade (§4.F): one module per command family, mirroring
//! `breakpoint.go` / `exec.go` / `frame.go` / `thread.go` / `variable.go`
//! one-for-one, plus `misc.rs` for the three commands that don't fit any
//! family (`-gdb-set`, `-gdb-show`, `-gdb-exit`).
//!
//! Every operation follows the same shape: build a command string from a
//! parameter record, send it through the [`crate::dispatcher::Session`],
//! and decode the reply. All of that repetition lives here as two small
//! helpers so the per-command functions stay mechanical, matching spec.md
//! §4.F's "the façade is intentionally mechanical" note.

pub mod breakpoint;
pub mod exec;
pub mod frame;
pub mod misc;
pub mod thread;
pub mod variable;

use serde::de::DeserializeOwned;

use crate::dispatcher::CmdResultRecord;
use crate::error::{Error, Result};
use crate::parser::parse_payload;

/// Decode a reply's payload into `T`, surfacing `^error` replies as
/// [`Error::Command`] first.
fn decode<T: DeserializeOwned>(record: CmdResultRecord) -> Result<T> {
    let record = record.into_result()?;
    let (_node, json) = parse_payload(&record.payload);
    serde_json::from_str(&json).map_err(|source| Error::Decode {
        source,
        mi: record.payload,
        json,
    })
}

/// Check a reply for `^error` and discard its payload otherwise — used by
/// commands whose result carries no data (spec.md §4.F's "nil decoder").
fn decode_unit(record: CmdResultRecord) -> Result<()> {
    record.into_result().map(|_| ())
}
