//! Turning workspace references into workspaces.
//!
//! [`resolve`] understands the navigation keywords `next`, `prev`,
//! `next_on_output`, `prev_on_output` and `current` (matched exactly and
//! case-sensitively); anything else is a literal, case-insensitive name
//! lookup.  Resolution never creates anything: an unknown name resolves to
//! `None` and it is up to the caller to [`create`] it.

use crate::command::Direction;
use crate::navigation::{global_step, output_step, NavError};
use crate::tree::{NodeId, NodeKind, Tree, TreeError};
use log::{error, info};

/// Resolve a keyword or literal name against the current focus.
///
/// A traversal handed the wrong kind of node is reported and yields
/// `Ok(None)`.  An exhausted traversal is returned as an error.
pub fn resolve(tree: &Tree, name: &str) -> Result<Option<NodeId>, NavError> {
    match name {
        "prev" => degrade(workspace_step(tree, Direction::Prev)),
        "prev_on_output" => degrade(output_relative_step(tree, Direction::Prev)),
        "next" => degrade(workspace_step(tree, Direction::Next)),
        "next_on_output" => degrade(output_relative_step(tree, Direction::Next)),
        "current" => Ok(tree.active_workspace()),
        literal => Ok(tree.workspace_by_name(literal)),
    }
}

/// Whether `name` is one of the references [`resolve`] interprets.
pub fn is_keyword(name: &str) -> bool {
    matches!(
        name,
        "prev" | "prev_on_output" | "next" | "next_on_output" | "current"
    )
}

/// One global step from the focused workspace.
pub fn workspace_step(tree: &Tree, direction: Direction) -> Result<NodeId, NavError> {
    let current = tree
        .active_workspace()
        .ok_or_else(|| NavError::ExhaustedTraversal("no workspace has focus".into()))?;
    global_step(tree, current, direction)
}

/// One step on the focused output.
pub fn output_relative_step(tree: &Tree, direction: Direction) -> Result<NodeId, NavError> {
    let output = tree
        .active_output()
        .ok_or_else(|| NavError::ExhaustedTraversal("no output has focus".into()))?;
    output_step(tree, output, direction)
}

fn degrade(result: Result<NodeId, NavError>) -> Result<Option<NodeId>, NavError> {
    match result {
        Ok(id) => Ok(Some(id)),
        Err(e @ NavError::InvalidArgument { .. }) => {
            error!("resolver: {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Create a workspace named `name` as the last child of the focused
/// output.  When focus has not reached any output yet, the first output is
/// used.  Fails only if there is no output at all.
pub fn create(tree: &mut Tree, name: &str) -> Result<NodeId, TreeError> {
    let focused = tree.focused_view(tree.root());
    let output = tree
        .parent_of_kind(focused, NodeKind::Output)
        .or_else(|| tree.outputs().first().copied())
        .ok_or(TreeError::NoOutput)?;
    info!(
        "creating workspace {} on output {}",
        name,
        tree.name(output).unwrap_or("?")
    );
    tree.add_workspace(output, name)
}

/// Literal lookup, creating the workspace if it does not exist.  Keywords
/// are not interpreted.
pub fn lookup_or_create(tree: &mut Tree, name: &str) -> Result<NodeId, TreeError> {
    match tree.workspace_by_name(name) {
        Some(id) => Ok(id),
        None => create(tree, name),
    }
}
