//! `-var-*` commands (variable objects). Grounded on `variable.go`.

use serde::Deserialize;

use crate::dispatcher::Session;
use crate::error::Result;

use super::{decode, decode_unit};

/// Parameters for creating a variable object.
///
/// `name` empty lets the debugger assign a unique name (written as `-`, per
/// the MI convention); `frame_addr` empty defaults to the current frame
/// (written as `*`).
#[derive(Debug, Clone, Default)]
pub struct VarCreateParms {
    pub name: Option<String>,
    pub frame_addr: Option<String>,
    pub expression: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VarCreateResult {
    pub name: String,
    #[serde(rename = "numchild")]
    pub num_child: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "thread-id", default)]
    pub thread_id: String,
    #[serde(default)]
    pub has_more: String,
}

pub fn var_create(session: &Session, parms: &VarCreateParms) -> Result<VarCreateResult> {
    let mut cmd = String::from("-var-create ");
    match &parms.name {
        Some(name) if !name.is_empty() => cmd.push_str(name),
        _ => cmd.push('-'),
    }
    cmd.push(' ');
    match &parms.frame_addr {
        Some(addr) if !addr.is_empty() => cmd.push_str(addr),
        _ => cmd.push('*'),
    }
    cmd.push(' ');
    cmd.push_str(&parms.expression);

    decode(session.command(cmd, false)?)
}

#[derive(Debug, Clone, Default)]
pub struct VarDeleteParms {
    pub name: String,
    pub children_only: bool,
}

pub fn var_delete(session: &Session, parms: &VarDeleteParms) -> Result<()> {
    let mut cmd = String::from("-var-delete");
    if parms.children_only {
        cmd.push_str(" -c");
    }
    cmd.push(' ');
    cmd.push_str(&parms.name);
    decode_unit(session.command(cmd, false)?)
}

#[derive(Debug, Clone, Default)]
pub struct VarListChildrenParms {
    pub name: String,
    pub all_values: bool,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChildVar {
    pub name: String,
    #[serde(default)]
    pub exp: String,
    #[serde(rename = "numchild")]
    pub num_child: String,
    #[serde(default)]
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "thread-id", default)]
    pub thread_id: String,
    #[serde(default)]
    pub frozen: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VarListChildrenResult {
    #[serde(rename = "num-child", default)]
    pub num_child: String,
    #[serde(default)]
    pub children: Vec<ChildVar>,
}

pub fn var_list_children(
    session: &Session,
    parms: &VarListChildrenParms,
) -> Result<VarListChildrenResult> {
    let mut cmd = String::from("-var-list-children");
    if parms.all_values {
        cmd.push_str(" --all-values");
    }
    cmd.push(' ');
    cmd.push_str(&parms.name);
    if let (Some(from), Some(to)) = (&parms.from, &parms.to) {
        cmd.push(' ');
        cmd.push_str(from);
        cmd.push(' ');
        cmd.push_str(to);
    }
    decode(session.command(cmd, false)?)
}
