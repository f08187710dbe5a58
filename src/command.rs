//! Commands and types used throughout wsnav.
//!
//! This module defines the vocabulary that all components share:
//! [`Command`] describes every action the switcher can perform,
//! [`Binding`] is a configured key binding, and [`Reply`] /
//! [`WorkspaceInfo`] are what the switcher hands back to callers.
//!
//! Binding commands and IPC requests use the same plain-text grammar: the
//! command is split on spaces, the first token is the verb and the second
//! token is the target.  Anything after the target is ignored.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Targets of `workspace` that name a navigation action rather than a
/// workspace.  None of these may ever be handed out as a workspace name.
pub const NAVIGATION_KEYWORDS: [&str; 7] = [
    "next",
    "prev",
    "next_on_output",
    "prev_on_output",
    "number",
    "back_and_forth",
    "current",
];

/// Direction of a traversal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    /// Signed index offset of one step.
    pub fn delta(self) -> isize {
        match self {
            Direction::Next => 1,
            Direction::Prev => -1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Next => write!(f, "next"),
            Direction::Prev => write!(f, "prev"),
        }
    }
}

/// A key binding from the active input mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Key combination, e.g. `"Mod4+1"`.  Informational only.
    #[serde(default)]
    pub keys: String,
    /// Command text, e.g. `"workspace 1"`.
    pub command: String,
}

impl Binding {
    pub fn new(keys: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            keys: keys.into(),
            command: command.into(),
        }
    }
}

/// Split command text the way configuration bindings are tokenized:
/// on single spaces, dropping empty tokens.
pub fn split_command(command: &str) -> Vec<&str> {
    command.split(' ').filter(|t| !t.is_empty()).collect()
}

/// The target of a `workspace <target>` command, with leading blanks
/// stripped.  `None` for any other verb or a missing target.
pub fn workspace_target(command: &str) -> Option<&str> {
    let args = split_command(command);
    if args.first() != Some(&"workspace") {
        return None;
    }
    let target = args.get(1)?.trim_start_matches(|c: char| c == ' ' || c == '\t');
    if target.is_empty() {
        None
    } else {
        Some(target)
    }
}

/// Every action the switcher can perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Switch to a workspace by name or navigation keyword, creating a
    /// named workspace if it does not exist yet.
    Workspace(String),

    /// Return to the workspace focus was last switched away from.
    BackAndForth,

    /// List every workspace.
    GetWorkspaces,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Workspace(target) => write!(f, "workspace {}", target),
            Command::BackAndForth => write!(f, "workspace back_and_forth"),
            Command::GetWorkspaces => write!(f, "get_workspaces"),
        }
    }
}

/// Error from parsing command text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0:?}")]
    UnknownVerb(String),
    #[error("{0}: missing argument")]
    MissingArgument(&'static str),
    #[error("workspace {0}: not supported")]
    Unsupported(String),
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let args = split_command(text);
        let verb = *args.first().ok_or(ParseError::Empty)?;
        match verb {
            "workspace" => match workspace_target(text) {
                None => Err(ParseError::MissingArgument("workspace")),
                Some("back_and_forth") => Ok(Command::BackAndForth),
                Some("number") => Err(ParseError::Unsupported("number".into())),
                Some(target) => Ok(Command::Workspace(target.to_string())),
            },
            "get_workspaces" => Ok(Command::GetWorkspaces),
            other => Err(ParseError::UnknownVerb(other.to_string())),
        }
    }
}

/// Snapshot of one workspace, as reported by [`Command::GetWorkspaces`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    pub name: String,
    /// Name of the output holding the workspace.
    pub output: String,
    /// The workspace holds input focus.
    pub focused: bool,
    /// The workspace is the one shown on its output.
    pub visible: bool,
}

/// Result of handling a [`Command`], sent back to IPC clients as one JSON
/// line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Name of the workspace focused after the command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspaces: Option<Vec<WorkspaceInfo>>,
}

impl Reply {
    pub fn focused(workspace: Option<String>) -> Self {
        Self {
            success: true,
            error: None,
            workspace,
            workspaces: None,
        }
    }

    pub fn listing(workspaces: Vec<WorkspaceInfo>) -> Self {
        Self {
            success: true,
            error: None,
            workspace: None,
            workspaces: Some(workspaces),
        }
    }

    pub fn failure(error: impl fmt::Display) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            workspace: None,
            workspaces: None,
        }
    }
}
