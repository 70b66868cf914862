//! Output demultiplexer (§4.C): classifies each line the debugger writes to
//! stdout/stderr and fans it out to the four public streams plus the
//! dispatcher's internal result-record channel.
//!
//! Grounded on the teacher's `stream_to_logs` pattern in `run.rs` — one
//! thread per pipe, reading and classifying lines — generalized from "copy
//! to a log file" to "classify and route to typed channels", and on the Go
//! `reader` closure in `gdblib.go` for the exact classification grammar.

use std::io::{BufRead, BufReader, Read};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::inferior::InferiorState;
use crate::parser::parse_payload;

/// One decoded async record, ready to publish on [`Channels::async_results`].
#[derive(Debug, Clone)]
pub struct AsyncResultRecord {
    pub indication: String,
    pub result: serde_json::Value,
}

/// A synchronous result record read off stdout, destined for the dispatcher.
#[derive(Debug, Clone)]
pub struct RawResultRecord {
    pub id: i64,
    pub indication: String,
    /// Raw MI payload text (not yet lowered to JSON) — lowering happens in
    /// the dispatcher/façade once the caller's expected shape is known.
    pub payload: String,
}

/// The four public streams a caller must drain, per §5's backpressure
/// contract.
#[derive(Clone)]
pub struct Channels {
    pub console: Sender<String>,
    pub target: Sender<String>,
    pub internal_log: Sender<String>,
    pub async_results: Sender<AsyncResultRecord>,
}

/// Strip outer quotes and undo the two MI string escapes, per §4.C.
///
/// Mirrors the Go `convertCString`: strip a leading and trailing `"` only if
/// both are present, then replace `\"` with `"` and `\n` with a real
/// newline. Nothing else is unescaped.
pub fn convert_c_string(body: &str) -> String {
    let body = if body.starts_with('"') && body.ends_with('"') && body.len() >= 2 {
        &body[1..body.len() - 1]
    } else {
        body
    };
    body.replace("\\\"", "\"").replace("\\n", "\n")
}

/// Split a result-record line (`<id?>^<indication>(,<payload>)?`) into its
/// parts, or `None` if `line` does not match that shape.
///
/// Matches the spec's anchored grammar `^(id?)\^(indication)(,payload)?$`
/// (Go: `^(\d*)\^(\S+?)(,(.*))?$`) over the whole line: `id` must be all
/// digits (or empty), and `indication` must be a single run of non-
/// whitespace — a raw line that merely happens to contain a `^` after some
/// digits (e.g. stray debugger chatter) does not match and falls through to
/// the Target stream per §4.C, instead of being misrouted to the dispatcher
/// as a bogus result record.
fn split_result_record(line: &str) -> Option<(&str, &str, &str)> {
    let caret = line.find('^')?;
    let id = &line[..caret];
    if !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let rest = &line[caret + 1..];
    let (indication, payload) = match rest.find(',') {
        Some(comma) => (&rest[..comma], &rest[comma + 1..]),
        None => (rest, ""),
    };
    if indication.is_empty() || indication.bytes().any(|b| b.is_ascii_whitespace()) {
        return None;
    }
    Some((id, indication, payload))
}

/// Split an async-record line (`[*=]<indication>,<payload>`) into its parts.
fn split_async_record(line: &str) -> Option<(&str, &str)> {
    let rest = &line[1..];
    let comma = rest.find(',')?;
    Some((&rest[..comma], &rest[comma + 1..]))
}

/// Run the **Reader** task: consume `stdout` line by line until EOF or an
/// I/O error, classifying and routing every line per §4.C.
///
/// Blocks the calling thread; callers spawn this on a dedicated OS thread
/// (the teacher's `stream_to_logs` convention).
pub fn run_reader<R: Read>(
    stdout: R,
    channels: Channels,
    inferior: Arc<InferiorState>,
    results_tx: Sender<RawResultRecord>,
) {
    let mut reader = BufReader::new(stdout);
    let mut buf = String::new();

    loop {
        buf.clear();
        let n = match reader.read_line(&mut buf) {
            Ok(0) => {
                tracing::info!("debugger stdout closed");
                break;
            }
            Ok(n) => n,
            Err(err) => {
                tracing::warn!(error = %err, "error reading debugger stdout");
                break;
            }
        };
        let _ = n;

        let line = buf.trim_end_matches(['\n', '\r']);
        if line.is_empty() {
            continue;
        }

        classify_and_route(line, &channels, &inferior, &results_tx);
    }
}

fn classify_and_route(
    line: &str,
    channels: &Channels,
    inferior: &Arc<InferiorState>,
    results_tx: &Sender<RawResultRecord>,
) {
    let first = line.as_bytes()[0];
    match first {
        b'~' => {
            tracing::debug!(kind = "console", "classified debugger line");
            let _ = channels.console.send(convert_c_string(&line[1..]));
        }
        b'@' => {
            tracing::debug!(kind = "target", "classified debugger line");
            let _ = channels.target.send(convert_c_string(&line[1..]));
        }
        b'&' => {
            tracing::debug!(kind = "log", "classified debugger line");
            let mut text = convert_c_string(&line[1..]);
            text.push('\n');
            let _ = channels.internal_log.send(text);
        }
        b'*' | b'=' => {
            tracing::debug!(kind = "async", "classified debugger line");
            match split_async_record(line) {
                Some((indication, payload)) => {
                    let (_node, json) = parse_payload(payload);
                    match serde_json::from_str::<serde_json::Value>(&json) {
                        Ok(result) => {
                            inferior.on_async(indication, &result);
                            let _ = channels.async_results.send(AsyncResultRecord {
                                indication: indication.to_string(),
                                result,
                            });
                        }
                        Err(err) => {
                            tracing::warn!(
                                error = %err,
                                mi = payload,
                                json = %json,
                                "dropping malformed async record"
                            );
                        }
                    }
                }
                None => {
                    tracing::warn!(line, "async-looking line did not match the record grammar");
                }
            }
        }
        b'(' if line == "(gdb) " => {
            // Prompt; discarded.
        }
        b'0'..=b'9' | b'^' => match split_result_record(line) {
            Some((id, indication, payload)) if !id.is_empty() => {
                if let Ok(id) = id.parse::<i64>() {
                    tracing::debug!(kind = "result", id, "classified debugger line");
                    let _ = results_tx.send(RawResultRecord {
                        id,
                        indication: indication.to_string(),
                        payload: payload.to_string(),
                    });
                } else {
                    tracing::warn!(line, "result record id failed to parse as i64");
                }
            }
            Some(_) => {
                tracing::debug!(line, "result record without an id; not ours, dropping");
            }
            None => {
                tracing::debug!(kind = "raw", "classified debugger line");
                let _ = channels.target.send(format!("{line}\n"));
            }
        },
        _ => {
            tracing::debug!(kind = "raw", "classified debugger line");
            let mut text = line.to_string();
            text.push('\n');
            let _ = channels.target.send(text);
        }
    }
}

/// Run the **ErrReader** task: every stderr line is forwarded to the Target
/// channel, prefixed with `[stderr] `.
pub fn run_err_reader<R: Read>(stderr: R, target: Sender<String>) {
    let mut reader = BufReader::new(stderr);
    let mut buf = String::new();

    loop {
        buf.clear();
        match reader.read_line(&mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = buf.trim_end_matches(['\n', '\r']);
                let _ = target.send(format!("[stderr] {line}"));
            }
            Err(err) => {
                tracing::warn!(error = %err, "error reading debugger stderr");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn test_channels() -> (
        Channels,
        mpsc::Receiver<String>,
        mpsc::Receiver<String>,
        mpsc::Receiver<String>,
        mpsc::Receiver<AsyncResultRecord>,
    ) {
        let (console_tx, console_rx) = mpsc::channel();
        let (target_tx, target_rx) = mpsc::channel();
        let (log_tx, log_rx) = mpsc::channel();
        let (async_tx, async_rx) = mpsc::channel();
        (
            Channels {
                console: console_tx,
                target: target_tx,
                internal_log: log_tx,
                async_results: async_tx,
            },
            console_rx,
            target_rx,
            log_rx,
            async_rx,
        )
    }

    /// Classification emits `debug!`/`warn!` events; install a capture
    /// subscriber so a run with `RUST_LOG=gdbmi=debug` shows them, the way
    /// the teacher's binary installs one in `main.rs` (library code itself
    /// never calls `.init()`, only tests do).
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }

    #[test]
    fn convert_c_string_strips_quotes_and_unescapes() {
        assert_eq!(convert_c_string("\"hello\\nworld\""), "hello\nworld");
        assert_eq!(convert_c_string("\"she said \\\"hi\\\"\""), "she said \"hi\"");
        assert_eq!(convert_c_string("bare"), "bare");
    }

    #[test]
    fn console_stream_routes_and_unescapes() {
        init_tracing();
        let (channels, console_rx, _t, _l, _a) = test_channels();
        let inferior = Arc::new(InferiorState::new());
        let (results_tx, _results_rx) = mpsc::channel();

        classify_and_route(r#"~"hello\n""#, &channels, &inferior, &results_tx);
        assert_eq!(console_rx.recv().unwrap(), "hello\n");
    }

    #[test]
    fn gdb_prompt_is_discarded() {
        let (channels, console_rx, target_rx, _l, _a) = test_channels();
        let inferior = Arc::new(InferiorState::new());
        let (results_tx, _results_rx) = mpsc::channel();

        classify_and_route("(gdb) ", &channels, &inferior, &results_tx);
        assert!(console_rx.try_recv().is_err());
        assert!(target_rx.try_recv().is_err());
    }

    #[test]
    fn async_stopped_record_updates_inferior_and_publishes() {
        let (channels, _c, _t, _l, async_rx) = test_channels();
        let inferior = Arc::new(InferiorState::new());
        let (results_tx, _results_rx) = mpsc::channel();

        classify_and_route(
            r#"*stopped,reason="breakpoint-hit",thread-id="2""#,
            &channels,
            &inferior,
            &results_tx,
        );

        let (_pid, running) = inferior.snapshot();
        assert!(!running);
        let record = async_rx.recv().unwrap();
        assert_eq!(record.indication, "stopped");
        assert_eq!(record.result["reason"], "breakpoint-hit");
    }

    #[test]
    fn result_record_with_id_is_forwarded() {
        let (channels, _c, _t, _l, _a) = test_channels();
        let inferior = Arc::new(InferiorState::new());
        let (results_tx, results_rx) = mpsc::channel();

        classify_and_route(r#"17^done,value="42""#, &channels, &inferior, &results_tx);

        let record = results_rx.recv().unwrap();
        assert_eq!(record.id, 17);
        assert_eq!(record.indication, "done");
        assert_eq!(record.payload, "value=\"42\"");
    }

    #[test]
    fn result_record_without_id_is_dropped() {
        let (channels, _c, _t, _l, _a) = test_channels();
        let inferior = Arc::new(InferiorState::new());
        let (results_tx, results_rx) = mpsc::channel();

        classify_and_route("^done", &channels, &inferior, &results_tx);

        assert!(results_rx.try_recv().is_err());
    }

    #[test]
    fn unrecognised_line_falls_through_to_target() {
        let (channels, _c, target_rx, _l, _a) = test_channels();
        let inferior = Arc::new(InferiorState::new());
        let (results_tx, _results_rx) = mpsc::channel();

        classify_and_route("some raw debugger chatter", &channels, &inferior, &results_tx);

        assert_eq!(target_rx.recv().unwrap(), "some raw debugger chatter\n");
    }

    #[test]
    fn digit_prefixed_line_with_caret_but_whitespace_falls_through_to_target() {
        let (channels, _c, target_rx, _l, _a) = test_channels();
        let inferior = Arc::new(InferiorState::new());
        let (results_tx, results_rx) = mpsc::channel();

        let line = "123^oops not a record";
        classify_and_route(line, &channels, &inferior, &results_tx);

        assert!(results_rx.try_recv().is_err());
        assert_eq!(target_rx.recv().unwrap(), format!("{line}\n"));
    }

    #[test]
    fn split_result_record_rejects_whitespace_in_indication() {
        assert_eq!(split_result_record("123^oops not a record"), None);
        assert_eq!(
            split_result_record("17^done,value=\"42\""),
            Some(("17", "done", "value=\"42\""))
        );
    }
}
