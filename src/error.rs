//! Crate-level error type.
//!
//! A library's public API should let callers match on failure kind rather
//! than inspect an opaque message chain, so errors here are a closed
//! `enum` rather than a boxed catch-all.

use thiserror::Error;

/// Errors returned by this crate's public API.
#[derive(Debug, Error)]
pub enum Error {
    /// The debugger subprocess could not be spawned.
    #[error("failed to spawn debugger process: {0}")]
    Spawn(#[source] std::io::Error),

    /// I/O failure writing to or reading from the subprocess pipes, once the
    /// process is already running.
    #[error("debugger subprocess I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// The debugger replied to a command with `^error`.
    ///
    /// `message` is the text inside `msg="…"`, with its surrounding quotes
    /// stripped and escapes preserved verbatim.
    #[error("debugger reported an error: {message}")]
    Command { message: String },

    /// A result record's payload could not be decoded into the shape an
    /// operation expected.
    #[error("failed to decode MI result into the expected shape: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        /// The raw MI payload text, kept for diagnosis.
        mi: String,
        /// The lowered JSON text that failed to decode.
        json: String,
    },

    /// A command was sent after the dispatcher thread had already exited
    /// (e.g. because the debugger subprocess died).
    #[error("session is closed; the dispatcher is no longer running")]
    SessionClosed,
}

/// Convenience alias used throughout the crate's public API.
pub type Result<T> = std::result::Result<T, Error>;
