//! Ordered workspace traversal with wraparound.
//!
//! Two orders exist:
//!
//! * **Within an output** ([`output_step`]): one step from the workspace
//!   the output currently shows, wrapping at both ends.
//! * **Global** ([`global_step`]): one step from a given workspace among
//!   its siblings.  From the last (first) workspace on an output the step
//!   crosses to the first (last) workspace of the next (previous) output,
//!   wrapping over the root's outputs.  Outputs without workspaces are
//!   skipped, so at most one full lap over the outputs is made.
//!
//! Because every crossing lands on an output's edge, repeated global steps
//! visit every workspace exactly once per lap.

use crate::command::Direction;
use crate::tree::{NodeId, NodeKind, Tree};
use log::debug;

/// Errors from the traversal functions.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// A traversal received a node of the wrong kind.  This is a caller
    /// bug; callers report it and treat the result as "no workspace".
    #[error("argument must be a {expected}, is {found}")]
    InvalidArgument { expected: NodeKind, found: String },

    /// The tree has no workspace where one must exist.  Focus state can no
    /// longer be trusted when this happens.
    #[error("traversal exhausted: {0}")]
    ExhaustedTraversal(String),
}

/// True modulo: the result is always in `0..len`.
pub fn wrap(index: isize, len: usize) -> usize {
    index.rem_euclid(len as isize) as usize
}

fn expect_kind(tree: &Tree, id: NodeId, expected: NodeKind) -> Result<(), NavError> {
    match tree.kind(id) {
        Some(kind) if kind == expected => Ok(()),
        Some(kind) => Err(NavError::InvalidArgument {
            expected,
            found: kind.to_string(),
        }),
        None => Err(NavError::InvalidArgument {
            expected,
            found: format!("unknown node {:?}", id),
        }),
    }
}

/// The workspace one step away from the one `output` currently shows.
pub fn output_step(tree: &Tree, output: NodeId, direction: Direction) -> Result<NodeId, NavError> {
    expect_kind(tree, output, NodeKind::Output)?;

    let children = tree.children_of(output);
    let index = tree
        .focused_child_of(output)
        .and_then(|focused| children.iter().position(|&c| c == focused))
        .ok_or_else(|| {
            NavError::ExhaustedTraversal(format!(
                "output {} has no focused workspace",
                tree.name(output).unwrap_or("?")
            ))
        })?;

    let target = children[wrap(index as isize + direction.delta(), children.len())];
    debug!(
        "nav: {} on output {:?} from {:?} -> {:?}",
        direction, output, children[index], target
    );
    Ok(target)
}

/// The workspace one step away from `workspace`, crossing output edges.
pub fn global_step(
    tree: &Tree,
    workspace: NodeId,
    direction: Direction,
) -> Result<NodeId, NavError> {
    expect_kind(tree, workspace, NodeKind::Workspace)?;

    let output = tree.parent_of(workspace).ok_or_else(|| {
        NavError::ExhaustedTraversal(format!("workspace {:?} has no output", workspace))
    })?;
    let siblings = tree.children_of(output);
    let index = siblings
        .iter()
        .position(|&w| w == workspace)
        .ok_or_else(|| {
            NavError::ExhaustedTraversal(format!("workspace {:?} is detached", workspace))
        })? as isize;

    let neighbour = index + direction.delta();
    if neighbour >= 0 && (neighbour as usize) < siblings.len() {
        return Ok(siblings[neighbour as usize]);
    }

    let outputs = tree.outputs();
    let output_index = outputs
        .iter()
        .position(|&o| o == output)
        .ok_or_else(|| NavError::ExhaustedTraversal(format!("output {:?} is detached", output)))?
        as isize;

    for hop in 1..=outputs.len() as isize {
        let candidate = outputs[wrap(output_index + hop * direction.delta(), outputs.len())];
        if let Some(edge) = edge_workspace(tree, candidate, direction) {
            debug!(
                "nav: {} from {:?} crosses to output {:?} -> {:?}",
                direction, workspace, candidate, edge
            );
            return Ok(edge);
        }
    }

    Err(NavError::ExhaustedTraversal(
        "no output holds a workspace".into(),
    ))
}

/// The workspace a step in `direction` enters `output` at.
fn edge_workspace(tree: &Tree, output: NodeId, direction: Direction) -> Option<NodeId> {
    let children = tree.children_of(output);
    match direction {
        Direction::Next => children.first().copied(),
        Direction::Prev => children.last().copied(),
    }
}
