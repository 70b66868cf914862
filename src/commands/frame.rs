//! `-stack-*` commands. Grounded on `frame.go`.

use serde::Deserialize;

use crate::dispatcher::Session;
use crate::error::Result;

use super::decode;

#[derive(Debug, Clone, Deserialize)]
pub struct Frame {
    pub level: String,
    pub addr: String,
    #[serde(default)]
    pub func: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub line: String,
    #[serde(default)]
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StackInfoFrameResult {
    pub frame: Frame,
}

pub fn stack_info_frame(session: &Session) -> Result<StackInfoFrameResult> {
    decode(session.command("-stack-info-frame", false)?)
}

#[derive(Debug, Clone, Default)]
pub struct StackListFramesParms {
    pub no_frame_filters: bool,
    pub low_frame: Option<String>,
    pub high_frame: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StackListFramesResult {
    pub stack: Vec<Frame>,
}

pub fn stack_list_frames(
    session: &Session,
    parms: &StackListFramesParms,
) -> Result<StackListFramesResult> {
    let mut cmd = String::from("-stack-list-frames");
    if parms.no_frame_filters {
        cmd.push_str(" --no-frame-filters");
    }
    if let (Some(low), Some(high)) = (&parms.low_frame, &parms.high_frame) {
        cmd.push(' ');
        cmd.push_str(low);
        cmd.push(' ');
        cmd.push_str(high);
    }
    decode(session.command(cmd, false)?)
}

#[derive(Debug, Clone)]
pub struct StackListVariablesParms {
    pub all_values: bool,
    pub thread: String,
    pub frame: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StackListVariablesResult {
    pub variables: Vec<Variable>,
}

pub fn stack_list_variables(
    session: &Session,
    parms: &StackListVariablesParms,
) -> Result<StackListVariablesResult> {
    let mut cmd = String::from("-stack-list-variables");
    cmd.push_str(" --thread ");
    cmd.push_str(&parms.thread);
    cmd.push_str(" --frame ");
    cmd.push_str(&parms.frame);
    if parms.all_values {
        cmd.push_str(" --all-values");
    }
    decode(session.command(cmd, false)?)
}
