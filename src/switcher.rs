//! The orchestrator that ties the tree, naming, resolution and the layout
//! engine together.
//!
//! [`WorkspaceSwitcher`] owns the [`Tree`] and the back-and-forth history,
//! and reacts to [`Command`]s by resolving a target, moving focus and
//! asking the [`Arranger`] to lay the output out again.

use crate::command::{Binding, Command, Reply, WorkspaceInfo};
use crate::naming::next_free_name;
use crate::navigation::NavError;
use crate::resolver::{create, is_keyword, lookup_or_create, resolve};
use crate::traits::{Arranger, KEEP_GEOMETRY};
use crate::tree::{NodeId, NodeKind, Tree, TreeError};
use log::{debug, error, info};

/// Possible errors from the switcher.
#[derive(Debug, thiserror::Error)]
pub enum SwitcherError {
    #[error(transparent)]
    Nav(#[from] NavError),
    #[error(transparent)]
    Tree(#[from] TreeError),
    /// The arranger failed.  Focus has already moved when this is returned.
    #[error("arrange error: {0}")]
    Arrange(String),
}

/// Commits workspace switches.
///
/// The switcher is generic over any [`Arranger`], making it independent of
/// the layout engine.  Each instance keeps its own back-and-forth history.
///
/// # Typical usage
///
/// ```ignore
/// let mut switcher = WorkspaceSwitcher::new(arranger, Tree::new());
/// switcher.add_output("DP-1")?;
/// switcher.handle(Command::Workspace("next".into()))?;
/// ```
pub struct WorkspaceSwitcher<A: Arranger> {
    arranger: A,
    tree: Tree,
    bindings: Vec<Binding>,
    auto_back_and_forth: bool,
    /// Name of the workspace focus was last switched away from.  Empty
    /// until the first switch.
    previous_workspace: String,
}

impl<A: Arranger> WorkspaceSwitcher<A> {
    /// Create a switcher over an existing tree, with no bindings and
    /// auto-back-and-forth disabled.
    pub fn new(arranger: A, tree: Tree) -> Self {
        Self {
            arranger,
            tree,
            bindings: Vec::new(),
            auto_back_and_forth: false,
            previous_workspace: String::new(),
        }
    }

    /// Replace the active mode's bindings used for naming new workspaces.
    pub fn set_bindings(&mut self, bindings: Vec<Binding>) {
        self.bindings = bindings;
    }

    /// When enabled, switching to the workspace that already has focus
    /// returns to the previous one instead.
    pub fn set_auto_back_and_forth(&mut self, enabled: bool) {
        self.auto_back_and_forth = enabled;
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Mutable access for structural changes owned elsewhere (views,
    /// output hotplug).
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn arranger(&self) -> &A {
        &self.arranger
    }

    pub fn previous_workspace_name(&self) -> &str {
        &self.previous_workspace
    }

    /// Name of the focused workspace, if any.
    pub fn focused_workspace_name(&self) -> Option<String> {
        self.tree
            .active_workspace()
            .and_then(|ws| self.tree.name(ws))
            .map(str::to_string)
    }

    /// Bring up an output together with its first workspace.
    ///
    /// The workspace is named by [`next_free_name`].  It takes focus only
    /// when nothing else has focus yet.
    pub fn add_output(&mut self, name: &str) -> Result<NodeId, SwitcherError> {
        let output = self.tree.add_output(name);
        let ws_name = next_free_name(&self.tree, &self.bindings);
        let ws = self.tree.add_workspace(output, &ws_name)?;
        self.tree.set_focused_child(output, ws)?;
        if self.tree.active_workspace().is_none() {
            self.tree.set_focused(ws)?;
        }
        info!("output {} up with workspace {}", name, ws_name);
        Ok(output)
    }

    /// Process a single [`Command`].
    pub fn handle(&mut self, cmd: Command) -> Result<Reply, SwitcherError> {
        match cmd {
            Command::Workspace(reference) => {
                info!("workspace {}", reference);
                self.switch_to_reference(&reference)?;
                Ok(Reply::focused(self.focused_workspace_name()))
            }

            Command::BackAndForth => {
                info!("workspace back_and_forth");
                self.back_and_forth()?;
                Ok(Reply::focused(self.focused_workspace_name()))
            }

            Command::GetWorkspaces => Ok(Reply::listing(self.workspace_infos())),
        }
    }

    /// Resolve `reference` and switch to it.  Literal names that do not
    /// exist yet are created on the focused output first.
    pub fn switch_to_reference(&mut self, reference: &str) -> Result<(), SwitcherError> {
        let target = match resolve(&self.tree, reference)? {
            Some(ws) => Some(ws),
            None if is_keyword(reference) => {
                debug!("{} resolved to nothing", reference);
                None
            }
            None => Some(create(&mut self.tree, reference)?),
        };
        self.switch_to(target)
    }

    /// Switch to the workspace focus was last switched away from.  Does
    /// nothing until a switch has happened.
    pub fn back_and_forth(&mut self) -> Result<(), SwitcherError> {
        if self.previous_workspace.is_empty() {
            debug!("back_and_forth: no previous workspace");
            return Ok(());
        }
        let previous = self.previous_workspace.clone();
        let target = lookup_or_create(&mut self.tree, &previous)?;
        self.switch_to(Some(target))
    }

    /// Focus `target` and re-arrange its output.
    ///
    /// The name of the workspace being left is recorded before focus moves.
    /// With auto-back-and-forth enabled, switching to the workspace that
    /// already has focus goes to the recorded workspace instead.
    pub fn switch_to(&mut self, target: Option<NodeId>) -> Result<(), SwitcherError> {
        let Some(mut target) = target else {
            return Ok(());
        };
        if self.tree.kind(target) != Some(NodeKind::Workspace) {
            error!("switch_to: {:?} is not a workspace", target);
            return Ok(());
        }

        if let Some(current) = self.tree.active_workspace() {
            let current_name = self.tree.name(current).unwrap_or_default().to_string();
            if current_name != self.previous_workspace && current != target {
                debug!("leaving {}", current_name);
                self.previous_workspace = current_name;
            } else if self.auto_back_and_forth
                && current == target
                && !self.previous_workspace.is_empty()
            {
                let previous = self.previous_workspace.clone();
                debug!("auto back_and_forth from {} to {}", current_name, previous);
                target = lookup_or_create(&mut self.tree, &previous)?;
                self.previous_workspace = current_name;
            }
        }

        info!(
            "switching to workspace {:?}:{}",
            target,
            self.tree.name(target).unwrap_or("?")
        );
        let view = self.tree.focused_view(target);
        self.tree.set_focused(view)?;
        self.arranger
            .arrange(&self.tree, target, KEEP_GEOMETRY, KEEP_GEOMETRY)
            .map_err(|e| SwitcherError::Arrange(e.to_string()))
    }

    /// Snapshot of every workspace in traversal order.
    pub fn workspace_infos(&self) -> Vec<WorkspaceInfo> {
        let focused = self.tree.active_workspace();
        self.tree
            .workspaces()
            .into_iter()
            .map(|ws| WorkspaceInfo {
                name: self.tree.name(ws).unwrap_or_default().to_string(),
                output: self
                    .tree
                    .parent_of(ws)
                    .and_then(|o| self.tree.name(o))
                    .unwrap_or_default()
                    .to_string(),
                focused: focused == Some(ws),
                visible: self.tree.is_visible(ws),
            })
            .collect()
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Record-keeping mock arranger.
    #[derive(Debug, Default)]
    struct RecorderArranger {
        calls: RefCell<Vec<(String, i32, i32)>>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("recorder error")]
    struct RecorderErr;

    impl Arranger for RecorderArranger {
        type Error = RecorderErr;

        fn arrange(&self, tree: &Tree, ws: NodeId, w: i32, h: i32) -> Result<(), RecorderErr> {
            self.calls
                .borrow_mut()
                .push((tree.name(ws).unwrap_or("?").to_string(), w, h));
            Ok(())
        }
    }

    /// Arranger that always fails.
    struct BrokenArranger;

    impl Arranger for BrokenArranger {
        type Error = RecorderErr;

        fn arrange(&self, _: &Tree, _: NodeId, _: i32, _: i32) -> Result<(), RecorderErr> {
            Err(RecorderErr)
        }
    }

    /// DP-1 holds A and B, DP-2 holds C.  Focus is on A.
    fn tree() -> Tree {
        let mut t = Tree::new();
        let dp1 = t.add_output("DP-1");
        let dp2 = t.add_output("DP-2");
        t.add_workspace(dp1, "A").unwrap();
        t.add_workspace(dp1, "B").unwrap();
        let c = t.add_workspace(dp2, "C").unwrap();
        t.set_focused(c).unwrap();
        let a = t.workspace_by_name("A").unwrap();
        t.set_focused(a).unwrap();
        t
    }

    fn switcher() -> WorkspaceSwitcher<RecorderArranger> {
        WorkspaceSwitcher::new(RecorderArranger::default(), tree())
    }

    fn id(s: &WorkspaceSwitcher<RecorderArranger>, name: &str) -> NodeId {
        s.tree().workspace_by_name(name).unwrap()
    }

    fn focused(s: &WorkspaceSwitcher<RecorderArranger>) -> String {
        s.focused_workspace_name().unwrap()
    }

    #[test]
    fn switch_to_none_is_noop() {
        let mut s = switcher();
        s.switch_to(None).unwrap();
        assert_eq!(focused(&s), "A");
        assert!(s.arranger().calls.borrow().is_empty());
    }

    #[test]
    fn switch_records_workspace_left() {
        let mut s = switcher();
        let b = id(&s, "B");
        s.switch_to(Some(b)).unwrap();
        assert_eq!(focused(&s), "B");
        assert_eq!(s.previous_workspace_name(), "A");
    }

    #[test]
    fn switch_arranges_with_existing_geometry() {
        let mut s = switcher();
        let c = id(&s, "C");
        s.switch_to(Some(c)).unwrap();
        assert_eq!(
            s.arranger().calls.borrow().as_slice(),
            &[("C".to_string(), -1, -1)]
        );
    }

    #[test]
    fn auto_back_and_forth_toggles() {
        let mut s = switcher();
        s.set_auto_back_and_forth(true);
        let b = id(&s, "B");

        s.switch_to(Some(b)).unwrap();
        assert_eq!(focused(&s), "B");
        assert_eq!(s.previous_workspace_name(), "A");

        s.switch_to(Some(b)).unwrap();
        assert_eq!(focused(&s), "A");
        assert_eq!(s.previous_workspace_name(), "B");

        s.switch_to(Some(b)).unwrap();
        assert_eq!(focused(&s), "B");
        assert_eq!(s.previous_workspace_name(), "A");
    }

    #[test]
    fn reswitch_without_auto_stays_put() {
        let mut s = switcher();
        let b = id(&s, "B");
        s.switch_to(Some(b)).unwrap();
        s.switch_to(Some(b)).unwrap();
        assert_eq!(focused(&s), "B");
        assert_eq!(s.previous_workspace_name(), "A");
        assert_eq!(s.arranger().calls.borrow().len(), 2);
    }

    #[test]
    fn auto_back_and_forth_needs_history() {
        let mut s = switcher();
        s.set_auto_back_and_forth(true);
        let a = id(&s, "A");
        s.switch_to(Some(a)).unwrap();
        assert_eq!(focused(&s), "A");
        assert_eq!(s.previous_workspace_name(), "");
    }

    #[test]
    fn switch_focuses_deepest_view() {
        let mut s = switcher();
        let c = id(&s, "C");
        let split = s
            .tree_mut()
            .add_container(c, NodeKind::Container, "split")
            .unwrap();
        let view = s
            .tree_mut()
            .add_container(split, NodeKind::View, "editor")
            .unwrap();
        s.tree_mut().set_focused(view).unwrap();
        let a = id(&s, "A");
        s.switch_to(Some(a)).unwrap();

        s.switch_to(Some(c)).unwrap();
        assert_eq!(s.tree().focused_path().last(), Some(&view));
    }

    #[test]
    fn switch_to_non_workspace_is_ignored() {
        let mut s = switcher();
        let output = s.tree().outputs()[1];
        s.switch_to(Some(output)).unwrap();
        assert_eq!(focused(&s), "A");
        assert!(s.arranger().calls.borrow().is_empty());
    }

    #[test]
    fn arrange_failure_is_reported_after_focus_moves() {
        let mut s = WorkspaceSwitcher::new(BrokenArranger, tree());
        let c = s.tree().workspace_by_name("C").unwrap();
        let err = s.switch_to(Some(c)).unwrap_err();
        assert!(matches!(err, SwitcherError::Arrange(_)));
        assert_eq!(s.focused_workspace_name().as_deref(), Some("C"));
    }

    #[test]
    fn independent_switchers_keep_independent_history() {
        let mut first = switcher();
        let second = switcher();
        let b = id(&first, "B");
        first.switch_to(Some(b)).unwrap();
        assert_eq!(first.previous_workspace_name(), "A");
        assert_eq!(second.previous_workspace_name(), "");
    }

    #[test]
    fn handle_workspace_next_crosses_outputs() {
        let mut s = switcher();
        let reply = s.handle(Command::Workspace("next".into())).unwrap();
        assert_eq!(reply.workspace.as_deref(), Some("B"));
        let reply = s.handle(Command::Workspace("next".into())).unwrap();
        assert_eq!(reply.workspace.as_deref(), Some("C"));
        let reply = s.handle(Command::Workspace("next".into())).unwrap();
        assert_eq!(reply.workspace.as_deref(), Some("A"));
    }

    #[test]
    fn handle_prev_on_output_wraps() {
        let mut s = switcher();
        let reply = s.handle(Command::Workspace("prev_on_output".into())).unwrap();
        assert_eq!(reply.workspace.as_deref(), Some("B"));
    }

    #[test]
    fn handle_unknown_name_creates_on_focused_output() {
        let mut s = switcher();
        let c = id(&s, "C");
        s.switch_to(Some(c)).unwrap();
        let reply = s.handle(Command::Workspace("scratch".into())).unwrap();
        assert_eq!(reply.workspace.as_deref(), Some("scratch"));
        let dp2 = s.tree().outputs()[1];
        assert_eq!(s.tree().children_of(dp2).last(), Some(&id(&s, "scratch")));
        assert_eq!(s.previous_workspace_name(), "C");
    }

    #[test]
    fn handle_existing_name_is_case_insensitive() {
        let mut s = switcher();
        let before = s.tree().workspaces().len();
        let reply = s.handle(Command::Workspace("c".into())).unwrap();
        assert_eq!(reply.workspace.as_deref(), Some("C"));
        assert_eq!(s.tree().workspaces().len(), before);
    }

    #[test]
    fn handle_current_reswitches() {
        let mut s = switcher();
        let reply = s.handle(Command::Workspace("current".into())).unwrap();
        assert_eq!(reply.workspace.as_deref(), Some("A"));
        assert_eq!(s.arranger().calls.borrow().len(), 1);
    }

    #[test]
    fn back_and_forth_command() {
        let mut s = switcher();
        s.handle(Command::BackAndForth).unwrap();
        assert_eq!(focused(&s), "A");

        s.handle(Command::Workspace("C".into())).unwrap();
        let reply = s.handle(Command::BackAndForth).unwrap();
        assert_eq!(reply.workspace.as_deref(), Some("A"));
        let reply = s.handle(Command::BackAndForth).unwrap();
        assert_eq!(reply.workspace.as_deref(), Some("C"));
    }

    #[test]
    fn get_workspaces_reports_focus_and_visibility() {
        let mut s = switcher();
        let reply = s.handle(Command::GetWorkspaces).unwrap();
        let list = reply.workspaces.unwrap();
        let summary: Vec<(&str, &str, bool, bool)> = list
            .iter()
            .map(|w| (w.name.as_str(), w.output.as_str(), w.focused, w.visible))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("A", "DP-1", true, true),
                ("B", "DP-1", false, false),
                ("C", "DP-2", false, true),
            ]
        );
    }

    #[test]
    fn add_output_names_first_workspace_from_bindings() {
        let mut s = WorkspaceSwitcher::new(RecorderArranger::default(), Tree::new());
        s.set_bindings(vec![
            Binding::new("Mod4+1", "workspace 1: web"),
            Binding::new("Mod4+2", "workspace 2: code"),
        ]);
        s.add_output("DP-1").unwrap();
        s.add_output("DP-2").unwrap();
        s.add_output("DP-3").unwrap();

        let names: Vec<String> = s.workspace_infos().into_iter().map(|w| w.name).collect();
        assert_eq!(names, vec!["1:", "2:", "3"]);
        assert_eq!(focused(&s), "1:");
    }

    #[test]
    fn added_outputs_are_navigable() {
        let mut s = WorkspaceSwitcher::new(RecorderArranger::default(), Tree::new());
        s.add_output("DP-1").unwrap();
        s.add_output("DP-2").unwrap();
        assert_eq!(focused(&s), "1");
        s.handle(Command::Workspace("next".into())).unwrap();
        assert_eq!(focused(&s), "2");
        let reply = s.handle(Command::Workspace("next_on_output".into())).unwrap();
        assert_eq!(reply.workspace.as_deref(), Some("2"));
        let reply = s.handle(Command::Workspace("prev".into())).unwrap();
        assert_eq!(reply.workspace.as_deref(), Some("1"));
    }

    #[test]
    fn navigation_without_outputs_is_an_error() {
        let mut s = WorkspaceSwitcher::new(RecorderArranger::default(), Tree::new());
        assert!(matches!(
            s.handle(Command::Workspace("next".into())),
            Err(SwitcherError::Nav(NavError::ExhaustedTraversal(_)))
        ));
        assert!(matches!(
            s.handle(Command::Workspace("web".into())),
            Err(SwitcherError::Tree(TreeError::NoOutput))
        ));
    }
}
