//! Binary search tree nodes and the recursive algorithms working on them.
//!
//! Every node owns its children outright (`Option<Box<TreeNode>>`), so a subtree
//! can be detached and re-attached by moving the box. Keys are ordered by plain
//! lexicographic byte order: left subtree < node <= right subtree.

use std::cmp::Ordering;

use tracing::trace;

use crate::domain::entities::{DuplicatePolicy, Profile};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::queue::Queue;

/// Owning edge to a subtree, `None` for an empty one.
pub type Link = Option<Box<TreeNode>>;

/// Registry tree node: person name as key, profile as value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    key: String,
    profile: Profile,
    left: Link,
    right: Link,
}

impl TreeNode {
    pub fn new(key: impl Into<String>, profile: Profile) -> Self {
        Self {
            key: key.into(),
            profile,
            left: None,
            right: None,
        }
    }

    /// Name in `"Last, First"` form
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn left(&self) -> Option<&TreeNode> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&TreeNode> {
        self.right.as_deref()
    }

    /// Leftmost descendant, i.e. the smallest key of this subtree.
    pub fn min(&self) -> &TreeNode {
        match self.left.as_deref() {
            Some(left) => left.min(),
            None => self,
        }
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let left = self.left().map_or(0, TreeNode::depth);
        let right = self.right().map_or(0, TreeNode::depth);
        1 + left.max(right)
    }

    /// Number of nodes in this subtree.
    pub fn size(&self) -> usize {
        1 + self.left().map_or(0, TreeNode::size) + self.right().map_or(0, TreeNode::size)
    }
}

/// Attach a new leaf below `root`, walking down iteratively.
///
/// Descends left while the visited key is greater than `key`, right otherwise.
/// Returns `true` when a node was added, `false` when an existing profile was
/// overwritten.
pub(crate) fn insert(
    root: &mut Link,
    key: String,
    profile: Profile,
    policy: DuplicatePolicy,
) -> DomainResult<bool> {
    let mut slot = root;
    while let Some(node) = slot {
        if node.key == key {
            match policy {
                DuplicatePolicy::Reject => return Err(DomainError::DuplicateKey(key)),
                DuplicatePolicy::Overwrite => {
                    node.profile = profile;
                    return Ok(false);
                }
                DuplicatePolicy::InsertRight => {}
            }
        }
        slot = if node.key.as_str() > key.as_str() {
            &mut node.left
        } else {
            &mut node.right
        };
    }
    trace!("attaching leaf {:?}", key);
    *slot = Some(Box::new(TreeNode::new(key, profile)));
    Ok(true)
}

/// Hibbard deletion of `key` from the subtree `link`, returning the new subtree.
///
/// Sets `removed` when a node with `key` was found. An absent key leaves the
/// subtree untouched.
pub(crate) fn remove(link: Link, key: &str, removed: &mut bool) -> Link {
    remove_where(link, key, &|_| true, removed)
}

/// Hibbard deletion of the topmost node carrying `key` that satisfies `accept`.
///
/// Equal keys only ever sit in the right subtree of one another, so a rejected
/// node hands the search on to its right child.
pub(crate) fn remove_where(
    link: Link,
    key: &str,
    accept: &dyn Fn(&TreeNode) -> bool,
    removed: &mut bool,
) -> Link {
    let mut node = link?;
    match key.cmp(node.key.as_str()) {
        Ordering::Less => node.left = remove_where(node.left.take(), key, accept, removed),
        Ordering::Greater => node.right = remove_where(node.right.take(), key, accept, removed),
        Ordering::Equal if !accept(&*node) => {
            node.right = remove_where(node.right.take(), key, accept, removed)
        }
        Ordering::Equal => {
            *removed = true;
            return match (node.left.take(), node.right.take()) {
                (None, right) => right,
                (left, None) => left,
                (Some(left), Some(right)) => {
                    // successor takes over the removed node's position
                    let (rest, mut successor) = delete_min(right);
                    successor.left = Some(left);
                    successor.right = rest;
                    Some(successor)
                }
            };
        }
    }
    Some(node)
}

/// Detach the leftmost node of `node`'s subtree.
///
/// Returns the remaining subtree together with the detached minimum.
pub(crate) fn delete_min(mut node: Box<TreeNode>) -> (Link, Box<TreeNode>) {
    match node.left.take() {
        None => {
            let rest = node.right.take();
            (rest, node)
        }
        Some(left) => {
            let (rest, min) = delete_min(left);
            node.left = rest;
            (Some(node), min)
        }
    }
}

/// Count nodes whose interest flag equals `want`.
pub(crate) fn count_by_interest(node: Option<&TreeNode>, want: bool) -> usize {
    let Some(node) = node else {
        return 0;
    };
    let own = usize::from(node.profile.is_of_interest() == want);
    own + count_by_interest(node.left(), want) + count_by_interest(node.right(), want)
}

/// Pre-order pass flagging every profile that matches the sequences.
///
/// Returns how many profiles were newly flagged.
pub(crate) fn flag_matches(node: Option<&mut TreeNode>, sequence_a: &str, sequence_b: &str) -> usize {
    let Some(node) = node else {
        return 0;
    };
    let mut newly_flagged = 0;
    if !node.profile.is_of_interest() && node.profile.matches(sequence_a, sequence_b) {
        trace!("flagging {:?}", node.key);
        node.profile.mark_of_interest();
        newly_flagged += 1;
    }
    newly_flagged
        + flag_matches(node.left.as_deref_mut(), sequence_a, sequence_b)
        + flag_matches(node.right.as_deref_mut(), sequence_a, sequence_b)
}

/// Look up `key`, returning the first (topmost) node carrying it.
pub(crate) fn find<'a>(mut node: Option<&'a TreeNode>, key: &str) -> Option<&'a TreeNode> {
    while let Some(current) = node {
        node = match key.cmp(current.key.as_str()) {
            Ordering::Less => current.left(),
            Ordering::Greater => current.right(),
            Ordering::Equal => return Some(current),
        };
    }
    None
}

/// Ascending (in-order) iterator over a tree.
pub struct InOrder<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> InOrder<'a> {
    pub(crate) fn new(root: Option<&'a TreeNode>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a TreeNode>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left();
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        Some(node)
    }
}

/// Breadth-first iterator: top level to bottom, left to right within a level.
pub struct LevelOrder<'a> {
    queue: Queue<&'a TreeNode>,
}

impl<'a> LevelOrder<'a> {
    pub(crate) fn new(root: Option<&'a TreeNode>) -> Self {
        let mut queue = Queue::new();
        if let Some(root) = root {
            queue.enqueue(root);
        }
        Self { queue }
    }
}

impl<'a> Iterator for LevelOrder<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.dequeue()?;
        if let Some(left) = node.left() {
            self.queue.enqueue(left);
        }
        if let Some(right) = node.right() {
            self.queue.enqueue(right);
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::MarkerRecord;

    fn build(keys: &[&str]) -> Link {
        let mut root = None;
        for key in keys {
            insert(&mut root, key.to_string(), Profile::new(vec![]), DuplicatePolicy::Reject)
                .unwrap();
        }
        root
    }

    fn keys_in_order(root: &Link) -> Vec<&str> {
        InOrder::new(root.as_deref()).map(TreeNode::key).collect()
    }

    //        M
    //      /   \
    //     F     T
    //    / \   / \
    //   B   H P   W
    //          \
    //           R
    const KEYS: [&str; 8] = ["M", "F", "T", "B", "H", "P", "W", "R"];

    #[test]
    fn given_keys_when_inserting_then_leaves_attach_by_ordering() {
        let root = build(&KEYS);
        let root = root.as_deref().unwrap();
        assert_eq!(root.key(), "M");
        assert_eq!(root.left().unwrap().key(), "F");
        assert_eq!(root.right().unwrap().left().unwrap().key(), "P");
        assert_eq!(root.right().unwrap().left().unwrap().right().unwrap().key(), "R");
        assert_eq!(root.size(), 8);
        assert_eq!(root.depth(), 4);
        assert_eq!(root.min().key(), "B");
    }

    #[test]
    fn given_duplicate_when_rejecting_then_errors_and_tree_unchanged() {
        let mut root = build(&KEYS);
        let before = root.clone();
        let result = insert(&mut root, "P".into(), Profile::new(vec![]), DuplicatePolicy::Reject);
        assert_eq!(result, Err(DomainError::DuplicateKey("P".into())));
        assert_eq!(root, before);
    }

    #[test]
    fn given_duplicate_when_overwriting_then_profile_replaced_in_place() {
        let mut root = build(&KEYS);
        let profile = Profile::new(vec![MarkerRecord::new("GATA", 2)]);
        let added = insert(&mut root, "P".into(), profile.clone(), DuplicatePolicy::Overwrite);
        assert_eq!(added, Ok(false));
        assert_eq!(find(root.as_deref(), "P").unwrap().profile(), &profile);
        assert_eq!(root.as_deref().unwrap().size(), 8);
    }

    #[test]
    fn given_duplicate_when_inserting_right_then_lands_in_right_subtree() {
        let mut root = build(&["M"]);
        let added = insert(&mut root, "M".into(), Profile::new(vec![]), DuplicatePolicy::InsertRight);
        assert_eq!(added, Ok(true));
        assert_eq!(root.as_deref().unwrap().right().unwrap().key(), "M");
    }

    #[test]
    fn given_leaf_when_removing_then_detached() {
        let mut removed = false;
        let root = remove(build(&KEYS), "R", &mut removed);
        assert!(removed);
        assert_eq!(keys_in_order(&root), ["B", "F", "H", "M", "P", "T", "W"]);
    }

    #[test]
    fn given_node_with_only_right_child_when_removing_then_child_spliced_in() {
        let mut removed = false;
        let root = remove(build(&KEYS), "P", &mut removed);
        assert!(removed);
        let t = root.as_deref().unwrap().right().unwrap();
        assert_eq!(t.left().unwrap().key(), "R");
    }

    #[test]
    fn given_root_with_two_children_when_removing_then_successor_takes_its_place() {
        let mut removed = false;
        let root = remove(build(&KEYS), "M", &mut removed);
        assert!(removed);
        let root_node = root.as_deref().unwrap();
        assert_eq!(root_node.key(), "P");
        assert_eq!(root_node.left().unwrap().key(), "F");
        // R moved up into the successor's old slot
        assert_eq!(root_node.right().unwrap().left().unwrap().key(), "R");
        assert_eq!(keys_in_order(&root), ["B", "F", "H", "P", "R", "T", "W"]);
    }

    #[test]
    fn given_absent_key_when_removing_then_structure_unchanged() {
        let before = build(&KEYS);
        let mut removed = false;
        let after = remove(before.clone(), "Q", &mut removed);
        assert!(!removed);
        assert_eq!(after, before);
    }

    #[test]
    fn given_equal_keys_when_removing_where_then_skips_rejected_node() {
        let mut root = build(&["M"]);
        let flagged = Profile::new(vec![MarkerRecord::new("GATA", 1)]);
        insert(&mut root, "M".into(), flagged, DuplicatePolicy::InsertRight).unwrap();

        let mut removed = false;
        let root = remove_where(root, "M", &|node| !node.profile().markers().is_empty(), &mut removed);

        assert!(removed);
        let root = root.as_deref().unwrap();
        assert_eq!(root.size(), 1);
        assert!(root.profile().markers().is_empty());
    }

    #[test]
    fn given_no_accepted_node_when_removing_where_then_unchanged() {
        let before = build(&KEYS);
        let mut removed = false;
        let after = remove_where(before.clone(), "P", &|_| false, &mut removed);
        assert!(!removed);
        assert_eq!(after, before);
    }

    #[test]
    fn given_subtree_when_deleting_min_then_returns_leftmost() {
        let root = build(&KEYS).unwrap();
        let (rest, min) = delete_min(root);
        assert_eq!(min.key(), "B");
        assert_eq!(keys_in_order(&rest), ["F", "H", "M", "P", "R", "T", "W"]);
    }

    #[test]
    fn given_tree_when_iterating_level_order_then_top_down_left_to_right() {
        let root = build(&KEYS);
        let keys: Vec<&str> = LevelOrder::new(root.as_deref()).map(TreeNode::key).collect();
        assert_eq!(keys, ["M", "F", "T", "B", "H", "P", "W", "R"]);
    }

    #[test]
    fn given_empty_tree_when_traversing_then_nothing_yielded() {
        assert_eq!(InOrder::new(None).count(), 0);
        assert_eq!(LevelOrder::new(None).count(), 0);
        assert_eq!(count_by_interest(None, false), 0);
        assert_eq!(flag_matches(None, "A", "B"), 0);
        assert!(find(None, "M").is_none());
    }
}
