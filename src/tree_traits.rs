//! Rendering of the registry tree with `termtree`.

use itertools::Itertools;
use termtree::Tree;

use crate::domain::{Registry, TreeNode};

/// What goes into a rendered node label besides the name.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Append `*` to profiles of interest
    pub mark_flagged: bool,
    /// Append the marker list, e.g. `[AGATCx4 AATGx1]`
    pub show_markers: bool,
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self, options: &RenderOptions) -> Tree<String>;
}

impl TreeNodeConvert for TreeNode {
    fn to_tree_string(&self, options: &RenderOptions) -> Tree<String> {
        build_tree(self, None, options)
    }
}

impl TreeNodeConvert for Registry {
    fn to_tree_string(&self, options: &RenderOptions) -> Tree<String> {
        match self.root() {
            Some(root) => root.to_tree_string(options),
            None => Tree::new("(empty registry)".to_string()),
        }
    }
}

// Children are tagged L/R since a lone child would otherwise be ambiguous.
fn build_tree(node: &TreeNode, side: Option<&str>, options: &RenderOptions) -> Tree<String> {
    let leaves: Vec<_> = [("L", node.left()), ("R", node.right())]
        .into_iter()
        .filter_map(|(tag, child)| child.map(|c| build_tree(c, Some(tag), options)))
        .collect();
    Tree::new(label(node, side, options)).with_leaves(leaves)
}

pub fn label(node: &TreeNode, side: Option<&str>, options: &RenderOptions) -> String {
    let mut label = match side {
        Some(tag) => format!("{tag}: {}", node.key()),
        None => node.key().to_string(),
    };
    if options.mark_flagged && node.profile().is_of_interest() {
        label.push_str(" *");
    }
    if options.show_markers {
        label.push_str(&format!(" [{}]", node.profile().markers().iter().join(" ")));
    }
    label
}
