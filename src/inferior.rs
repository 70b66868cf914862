//! Inferior-state tracker and forced-interrupt protocol.

use std::sync::Mutex;

/// Mutex-protected record of whether the debugged process exists and is
/// running.
///
/// Two tasks touch this: the demultiplexer (via [`InferiorState::on_async`],
/// called before the async record is published) and the dispatcher (via
/// [`InferiorState::snapshot`], read before deciding whether to force an
/// interrupt). The command registry in `dispatcher.rs` needs no such lock —
/// it is owned exclusively by the dispatcher thread.
pub struct InferiorState {
    inner: Mutex<Inner>,
}

struct Inner {
    /// Present iff a thread group is active; this crate's only notion of a
    /// "process handle" is the pid it tracks.
    pid: Option<String>,
    running: bool,
}

impl Default for InferiorState {
    fn default() -> Self {
        InferiorState {
            inner: Mutex::new(Inner {
                pid: None,
                running: false,
            }),
        }
    }
}

impl InferiorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update state from one async record. Must be called before the record
    /// is handed to consumers so that a reader observing `stopped` always
    /// sees a consistent `running = false`.
    pub fn on_async(&self, indication: &str, payload: &serde_json::Value) {
        let mut inner = self.inner.lock().expect("inferior state mutex poisoned");
        match indication {
            "thread-group-started" => {
                if let Some(pid) = payload.get("pid").and_then(|v| v.as_str()) {
                    inner.pid = Some(pid.to_string());
                } else {
                    tracing::warn!("thread-group-started without a pid field");
                }
            }
            "thread-group-exited" => {
                inner.pid = None;
            }
            "running" => {
                inner.running = true;
            }
            "stopped" => {
                inner.running = false;
            }
            _ => {}
        }
    }

    /// Current `(pid, running)` snapshot, taken under the lock.
    pub fn snapshot(&self) -> (Option<String>, bool) {
        let inner = self.inner.lock().expect("inferior state mutex poisoned");
        (inner.pid.clone(), inner.running)
    }
}
