//! The container tree.
//!
//! [`Tree`] is an arena of [`Node`]s addressed by [`NodeId`].  The shape is
//! fixed at the top: a single root holds outputs, outputs hold workspaces,
//! and workspaces hold containers and views.  Child order is insertion
//! order and doubles as display / traversal order; focus changes never
//! reorder children.
//!
//! Each node remembers which child currently has focus as a plain id.  The
//! id is only honoured while it still names one of the node's children, so
//! a detached child can never be reached through a stale focus pointer.

use log::debug;
use std::fmt;

/// Opaque handle to a node in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// What a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Output,
    Workspace,
    Container,
    View,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Root => write!(f, "root"),
            NodeKind::Output => write!(f, "output"),
            NodeKind::Workspace => write!(f, "workspace"),
            NodeKind::Container => write!(f, "container"),
            NodeKind::View => write!(f, "view"),
        }
    }
}

impl NodeKind {
    /// Whether a node of kind `child` may be attached under `self`.
    fn accepts(self, child: NodeKind) -> bool {
        matches!(
            (self, child),
            (NodeKind::Root, NodeKind::Output)
                | (NodeKind::Output, NodeKind::Workspace)
                | (NodeKind::Workspace, NodeKind::Container)
                | (NodeKind::Workspace, NodeKind::View)
                | (NodeKind::Container, NodeKind::Container)
                | (NodeKind::Container, NodeKind::View)
        )
    }
}

/// A single entry in the tree.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    /// Display name, stored with the casing it was created with.
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Weak pointer to the focused child.
    focused: Option<NodeId>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Errors from structural tree operations.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("cannot attach a {child} under a {parent}")]
    InvalidParent { parent: NodeKind, child: NodeKind },
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("no output available")]
    NoOutput,
}

/// Case-insensitive workspace name comparison.
pub fn names_match(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

const ROOT: NodeId = NodeId(0);

/// Arena-backed container tree with a single root.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create a tree holding only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                id: ROOT,
                kind: NodeKind::Root,
                name: "root".into(),
                parent: None,
                children: Vec::new(),
                focused: None,
            }],
        }
    }

    //  Accessors

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(Node::kind)
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(Node::name)
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// Ordered children of `id`.  Unknown ids have no children.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    /// Outputs in display order.
    pub fn outputs(&self) -> &[NodeId] {
        self.children_of(ROOT)
    }

    /// Every workspace, output by output, in traversal order.
    pub fn workspaces(&self) -> Vec<NodeId> {
        self.outputs()
            .iter()
            .flat_map(|&o| self.children_of(o).iter().copied())
            .collect()
    }

    /// The focused child of `id`, if the pointer still names one of its
    /// children.
    pub fn focused_child_of(&self, id: NodeId) -> Option<NodeId> {
        let node = self.get(id)?;
        node.focused.filter(|f| node.children.contains(f))
    }

    /// Whether `workspace` is the one its output currently shows.
    pub fn is_visible(&self, workspace: NodeId) -> bool {
        self.parent_of(workspace)
            .and_then(|output| self.focused_child_of(output))
            == Some(workspace)
    }

    //  Construction

    /// Attach a new output as the last child of the root.
    pub fn add_output(&mut self, name: &str) -> NodeId {
        let id = self.push(ROOT, NodeKind::Output, name);
        debug!("tree: added output {} as {:?}", name, id);
        id
    }

    /// Append a new workspace as the last child of `output`.
    pub fn add_workspace(&mut self, output: NodeId, name: &str) -> Result<NodeId, TreeError> {
        self.attach(output, NodeKind::Workspace, name)
    }

    /// Attach a container or view under a workspace or container.
    pub fn add_container(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        name: &str,
    ) -> Result<NodeId, TreeError> {
        self.attach(parent, kind, name)
    }

    fn attach(&mut self, parent: NodeId, kind: NodeKind, name: &str) -> Result<NodeId, TreeError> {
        let parent_kind = self.kind(parent).ok_or(TreeError::UnknownNode(parent))?;
        if !parent_kind.accepts(kind) {
            return Err(TreeError::InvalidParent {
                parent: parent_kind,
                child: kind,
            });
        }
        let id = self.push(parent, kind, name);
        debug!("tree: added {} {:?} ({}) under {:?}", kind, id, name, parent);
        Ok(id)
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind, name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            kind,
            name: name.to_string(),
            parent: Some(parent),
            children: Vec::new(),
            focused: None,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    //  Focus

    /// Point every ancestor's focused-child pointer towards `id`, so that
    /// the focus path from the root ends at `id`.
    pub fn set_focused(&mut self, id: NodeId) -> Result<(), TreeError> {
        if self.get(id).is_none() {
            return Err(TreeError::UnknownNode(id));
        }
        let mut child = id;
        while let Some(parent) = self.parent_of(child) {
            self.nodes[parent.0].focused = Some(child);
            child = parent;
        }
        Ok(())
    }

    /// Point `parent`'s focused-child pointer at `child` without touching
    /// any other node.
    pub fn set_focused_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if !self.children_of(parent).contains(&child) {
            return Err(TreeError::UnknownNode(child));
        }
        self.nodes[parent.0].focused = Some(child);
        Ok(())
    }

    /// The chain of focused nodes starting at the root.
    pub fn focused_path(&self) -> Vec<NodeId> {
        let mut path = vec![ROOT];
        let mut current = ROOT;
        while let Some(next) = self.focused_child_of(current) {
            path.push(next);
            current = next;
        }
        path
    }

    /// The deepest focused descendant of `id`, or `id` itself when nothing
    /// below it has focus.
    pub fn focused_view(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(next) = self.focused_child_of(current) {
            current = next;
        }
        current
    }

    /// Walk up from `id` (inclusive) to the nearest node of `kind`.
    pub fn parent_of_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.get(c)) {
            if node.kind == kind {
                return Some(node.id);
            }
            current = node.parent;
        }
        None
    }

    /// The output on the focus path.
    pub fn active_output(&self) -> Option<NodeId> {
        self.on_focus_path(NodeKind::Output)
    }

    /// The workspace on the focus path.
    pub fn active_workspace(&self) -> Option<NodeId> {
        self.on_focus_path(NodeKind::Workspace)
    }

    fn on_focus_path(&self, kind: NodeKind) -> Option<NodeId> {
        self.focused_path()
            .into_iter()
            .find(|&id| self.kind(id) == Some(kind))
    }

    //  Search

    /// Depth-first, pre-order search for the first node accepted by
    /// `predicate`.
    pub fn find<P>(&self, predicate: P) -> Option<NodeId>
    where
        P: Fn(&Node) -> bool,
    {
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            if predicate(node) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Literal, case-insensitive workspace lookup.
    pub fn workspace_by_name(&self, name: &str) -> Option<NodeId> {
        self.find(|node| node.kind == NodeKind::Workspace && names_match(&node.name, name))
    }
}

//  Tests
