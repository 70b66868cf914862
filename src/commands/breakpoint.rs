//! `-break-*` commands. Grounded on `breakpoint.go`.

use serde::Deserialize;

use crate::dispatcher::Session;
use crate::error::Result;

use super::decode;

#[derive(Debug, Clone, Deserialize)]
pub struct BreakpointHeaderElement {
    pub width: String,
    pub alignment: String,
    #[serde(default)]
    pub col_name: String,
    #[serde(default)]
    pub colhdr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Breakpoint {
    pub number: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub fullname: String,
    pub disp: String,
    pub enabled: String,
    #[serde(default)]
    pub addr: String,
    #[serde(default)]
    pub func: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub line: String,
    #[serde(rename = "thread-groups", default)]
    pub thread_groups: Vec<String>,
    #[serde(default)]
    pub times: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BreakpointTable {
    pub nr_rows: String,
    pub nr_cols: String,
    pub hdr: Vec<BreakpointHeaderElement>,
    pub body: Vec<Breakpoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BreakListResult {
    #[serde(rename = "BreakpointTable")]
    pub breakpoint_table: BreakpointTable,
}

pub fn break_list(session: &Session) -> Result<BreakListResult> {
    decode(session.command("-break-list", false)?)
}

#[derive(Debug, Clone, Default)]
pub struct BreakInsertParms {
    pub temporary: bool,
    pub hardware: bool,
    pub force: bool,
    pub disabled: bool,
    pub tracepoint: bool,
    pub condition: Option<String>,
    pub ignore_count: Option<i64>,
    pub thread_id: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BreakInsertResult {
    pub bkpt: Breakpoint,
}

pub fn break_insert(session: &Session, parms: &BreakInsertParms) -> Result<BreakInsertResult> {
    let mut cmd = String::from("-break-insert");
    if parms.temporary {
        cmd.push_str(" -t");
    }
    if parms.hardware {
        cmd.push_str(" -h");
    }
    if parms.force {
        cmd.push_str(" -f");
    }
    if parms.disabled {
        cmd.push_str(" -d");
    }
    if parms.tracepoint {
        cmd.push_str(" -a");
    }
    if let Some(cond) = &parms.condition {
        cmd.push_str(" -c ");
        cmd.push_str(cond);
    }
    if let Some(ignore) = parms.ignore_count {
        if ignore > 0 {
            cmd.push_str(" -i ");
            cmd.push_str(&ignore.to_string());
        }
    }
    if let Some(tid) = &parms.thread_id {
        cmd.push_str(" -p ");
        cmd.push_str(tid);
    }
    if let Some(location) = &parms.location {
        cmd.push(' ');
        cmd.push_str(location);
    }

    decode(session.command(cmd, false)?)
}

pub fn break_enable(session: &Session, breakpoints: &[String]) -> Result<()> {
    let mut cmd = String::from("-break-enable");
    for id in breakpoints {
        cmd.push(' ');
        cmd.push_str(id);
    }
    super::decode_unit(session.command(cmd, false)?)
}

pub fn break_disable(session: &Session, breakpoints: &[String]) -> Result<()> {
    let mut cmd = String::from("-break-disable");
    for id in breakpoints {
        cmd.push(' ');
        cmd.push_str(id);
    }
    super::decode_unit(session.command(cmd, false)?)
}
