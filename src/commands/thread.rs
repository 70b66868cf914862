//! `-thread-*` commands. Grounded on `thread.go`.

use serde::Deserialize;

use crate::dispatcher::Session;
use crate::error::{Error, Result};
use crate::parser::parse_payload;

use super::decode;

#[derive(Debug, Clone, Deserialize)]
pub struct ThreadListIdsResult {
    #[serde(rename = "thread-ids")]
    pub thread_ids: Vec<String>,
    #[serde(rename = "current-thread-id", default)]
    pub current_thread_id: String,
    #[serde(rename = "number-of-threads")]
    pub number_of_threads: String,
}

/// Rewrite the `thread-ids={thread-id="1",thread-id="2"}` block into
/// `thread-ids=["1","2"]` so it lowers into a JSON array instead of an
/// object with duplicate keys (§6's "thread-id payload quirk").
///
/// Mirrors the Go `ThreadListIds`'s `strings.Replace` dance, but as a
/// dedicated function rather than four chained string-surgery calls inline
/// — same transformation, read top to bottom instead of reconstructed from
/// four replace calls (see DESIGN.md).
fn rewrite_thread_ids(payload: &str) -> String {
    const NEEDLE: &str = "thread-ids={";
    let Some(begin) = payload.find(NEEDLE) else {
        return payload.to_string();
    };
    let body_start = begin + "thread-ids=".len();
    let Some(close_offset) = payload[body_start..].find('}') else {
        return payload.to_string();
    };
    let body_end = body_start + close_offset + 1;
    let block = &payload[body_start..body_end];

    let rewritten = block.replace("thread-id=", "").replace('{', "[").replace('}', "]");

    let mut out = String::with_capacity(payload.len());
    out.push_str(&payload[..body_start]);
    out.push_str(&rewritten);
    out.push_str(&payload[body_end..]);
    out
}

pub fn thread_list_ids(session: &Session) -> Result<ThreadListIdsResult> {
    let record = session.command("-thread-list-ids", false)?.into_result()?;
    let rewritten = rewrite_thread_ids(&record.payload);
    let (_node, json) = parse_payload(&rewritten);
    serde_json::from_str(&json).map_err(|source| Error::Decode {
        source,
        mi: record.payload,
        json,
    })
}

#[derive(Debug, Clone, Default)]
pub struct ThreadInfoParms {
    pub thread_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArgInfo {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrameInfo {
    pub level: String,
    pub addr: String,
    #[serde(default)]
    pub func: String,
    #[serde(default)]
    pub args: Vec<ArgInfo>,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub line: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThreadInfo {
    pub id: String,
    #[serde(rename = "target-id")]
    pub target_id: String,
    pub frame: FrameInfo,
    pub state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThreadInfoResult {
    pub threads: Vec<ThreadInfo>,
    #[serde(rename = "current-thread-id", default)]
    pub current_thread_id: String,
}

pub fn thread_info(session: &Session, parms: &ThreadInfoParms) -> Result<ThreadInfoResult> {
    let mut cmd = String::from("-thread-info");
    if let Some(tid) = &parms.thread_id {
        cmd.push(' ');
        cmd.push_str(tid);
    }
    decode(session.command(cmd, false)?)
}

#[derive(Debug, Clone, Default)]
pub struct ThreadSelectParms {
    pub thread_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThreadSelectResult {
    #[serde(rename = "new-thread-id")]
    pub new_thread_id: String,
}

pub fn thread_select(session: &Session, parms: &ThreadSelectParms) -> Result<ThreadSelectResult> {
    let mut cmd = String::from("-thread-select");
    if let Some(tid) = &parms.thread_id {
        cmd.push(' ');
        cmd.push_str(tid);
    }
    decode(session.command(cmd, false)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_repeated_thread_id_keys_into_an_array() {
        let payload =
            r#"thread-ids={thread-id="1",thread-id="2"},current-thread-id="1",number-of-threads="2""#;
        let rewritten = rewrite_thread_ids(payload);
        assert_eq!(
            rewritten,
            r#"thread-ids=["1","2"],current-thread-id="1",number-of-threads="2""#
        );

        let (_node, json) = parse_payload(&rewritten);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["thread-ids"].as_array().unwrap().len(), 2);
        assert_eq!(value["thread-ids"][0], "1");
        assert_eq!(value["thread-ids"][1], "2");
    }

    #[test]
    fn leaves_payload_without_thread_ids_untouched() {
        let payload = r#"current-thread-id="1""#;
        assert_eq!(rewrite_thread_ids(payload), payload);
    }
}
