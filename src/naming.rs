//! Automatic workspace naming.
//!
//! New workspaces take their name from the active mode's key bindings: the
//! first `workspace <name>` binding whose target is not a navigation
//! keyword and not already in use wins.  When no binding offers a free
//! name, the name is numeric, starting at the number of outputs.

use crate::command::{workspace_target, Binding, NAVIGATION_KEYWORDS};
use crate::tree::Tree;
use log::debug;

/// Pick a name for a new workspace.  Never fails and never returns the
/// name of an existing workspace (compared case-insensitively).
pub fn next_free_name(tree: &Tree, bindings: &[Binding]) -> String {
    debug!("naming: generating new workspace name");

    for binding in bindings {
        let Some(target) = workspace_target(&binding.command) else {
            continue;
        };
        if NAVIGATION_KEYWORDS.contains(&target) {
            continue;
        }
        if tree.workspace_by_name(target).is_some() {
            debug!("naming: {:?} already exists", target);
            continue;
        }
        debug!("naming: found free name {:?} in binding {:?}", target, binding.keys);
        return target.to_string();
    }

    // Numeric names are not padded.
    let mut number = tree.outputs().len();
    while tree.workspace_by_name(&number.to_string()).is_some() {
        number += 1;
    }
    debug!("naming: falling back to {}", number);
    number.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeId;

    fn bindings(commands: &[&str]) -> Vec<Binding> {
        commands
            .iter()
            .enumerate()
            .map(|(i, c)| Binding::new(format!("Mod4+{}", i), *c))
            .collect()
    }

    fn tree_with(workspaces: &[&str]) -> (Tree, NodeId) {
        let mut t = Tree::new();
        let out = t.add_output("DP-1");
        for name in workspaces {
            t.add_workspace(out, name).unwrap();
        }
        (t, out)
    }

    #[test]
    fn first_free_binding_wins() {
        let (t, _) = tree_with(&["1"]);
        let b = bindings(&["workspace 1", "workspace web", "workspace mail"]);
        assert_eq!(next_free_name(&t, &b), "web");
    }

    #[test]
    fn navigation_keywords_are_skipped() {
        let (t, _) = tree_with(&[]);
        let b = bindings(&[
            "workspace next",
            "workspace prev",
            "workspace next_on_output",
            "workspace prev_on_output",
            "workspace number 4",
            "workspace back_and_forth",
            "workspace current",
            "workspace chat",
        ]);
        assert_eq!(next_free_name(&t, &b), "chat");
    }

    #[test]
    fn existing_names_match_case_insensitively() {
        let (t, _) = tree_with(&["Web"]);
        let b = bindings(&["workspace web", "workspace WEB", "workspace code"]);
        assert_eq!(next_free_name(&t, &b), "code");
    }

    #[test]
    fn other_verbs_and_bare_workspace_are_ignored() {
        let (t, _) = tree_with(&[]);
        let b = bindings(&["exec foot", "workspace", "move container to workspace 5"]);
        assert_eq!(next_free_name(&t, &b), "1");
    }

    #[test]
    fn leading_tabs_are_trimmed() {
        let (t, _) = tree_with(&[]);
        let b = bindings(&["workspace \tmusic"]);
        assert_eq!(next_free_name(&t, &b), "music");
    }

    #[test]
    fn fallback_uses_output_count() {
        let mut t = Tree::new();
        for (output, ws) in [("DP-1", "a"), ("DP-2", "b"), ("DP-3", "c")] {
            let o = t.add_output(output);
            t.add_workspace(o, ws).unwrap();
        }
        assert_eq!(next_free_name(&t, &[]), "3");
    }

    #[test]
    fn fallback_has_no_padding() {
        let mut t = Tree::new();
        for i in 0..12 {
            t.add_output(&format!("OUT-{}", i));
        }
        assert_eq!(next_free_name(&t, &[]), "12");
    }

    #[test]
    fn fallback_skips_taken_numbers() {
        let (t, _) = tree_with(&["1", "2"]);
        assert_eq!(next_free_name(&t, &[]), "3");
    }

    #[test]
    fn generated_names_never_collide() {
        let b = bindings(&["workspace 1", "workspace 2", "workspace Web"]);
        let (mut t, out) = tree_with(&[]);
        for _ in 0..8 {
            let name = next_free_name(&t, &b);
            assert!(t.workspace_by_name(&name).is_none(), "{} already exists", name);
            t.add_workspace(out, &name).unwrap();
        }
        assert_eq!(t.children_of(out).len(), 8);
    }
}
