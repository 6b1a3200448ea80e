//! Profile registry: the BST of registered persons plus the two unknown sequences.

use tracing::{debug, instrument};

use crate::domain::entities::{DuplicatePolicy, Profile};
use crate::domain::error::DomainResult;
use crate::domain::tree::{self, InOrder, LevelOrder, Link, TreeNode};

/// In-memory registry of profiles keyed by `"Last, First"`.
///
/// Not synchronized: callers sharing a registry between threads must put it
/// behind a single exclusive lock.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Registry {
    root: Link,
    sequence_a: String,
    sequence_b: String,
    duplicate_policy: DuplicatePolicy,
    len: usize,
}

impl Registry {
    pub fn new(sequence_a: impl Into<String>, sequence_b: impl Into<String>) -> Self {
        Self {
            sequence_a: sequence_a.into(),
            sequence_b: sequence_b.into(),
            ..Self::default()
        }
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_deref()
    }

    /// First unknown sequence
    pub fn sequence_a(&self) -> &str {
        &self.sequence_a
    }

    /// Second unknown sequence
    pub fn sequence_b(&self) -> &str {
        &self.sequence_b
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree, 0 when empty.
    pub fn depth(&self) -> usize {
        self.root().map_or(0, TreeNode::depth)
    }

    /// Register a profile under `name`.
    ///
    /// The new node always becomes a leaf; the tree is never rebalanced.
    /// An existing `name` is handled according to the duplicate policy.
    #[instrument(level = "debug", skip(self, profile))]
    pub fn insert(&mut self, name: &str, profile: Profile) -> DomainResult<()> {
        let added = tree::insert(&mut self.root, name.to_string(), profile, self.duplicate_policy)?;
        if added {
            self.len += 1;
        } else {
            debug!("overwrote profile of {:?}", name);
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        tree::find(self.root(), name).map(TreeNode::profile)
    }

    pub fn contains(&self, name: &str) -> bool {
        tree::find(self.root(), name).is_some()
    }

    /// Remove the profile registered under `name`.
    ///
    /// Returns `false` and leaves the tree untouched when `name` is absent.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, name: &str) -> bool {
        let mut removed = false;
        self.root = tree::remove(self.root.take(), name, &mut removed);
        if removed {
            self.len -= 1;
        } else {
            debug!("no profile registered under {:?}", name);
        }
        removed
    }

    /// Flag every profile whose markers sufficiently agree with the unknown sequences.
    ///
    /// Flags are only ever set, never cleared, so running the pass again is a
    /// no-op. Returns the number of newly flagged profiles.
    #[instrument(level = "debug", skip(self))]
    pub fn flag_profiles_of_interest(&mut self) -> usize {
        let flagged = tree::flag_matches(self.root.as_deref_mut(), &self.sequence_a, &self.sequence_b);
        debug!("flagged {} profiles", flagged);
        flagged
    }

    /// Number of profiles whose interest flag equals `of_interest`.
    pub fn count_by_interest(&self, of_interest: bool) -> usize {
        tree::count_by_interest(self.root(), of_interest)
    }

    /// Names of all unflagged profiles in level order.
    #[instrument(level = "debug", skip(self))]
    pub fn collect_unflagged(&self) -> Vec<String> {
        let mut unflagged = Vec::with_capacity(self.count_by_interest(false));
        for node in self.level_order() {
            if !node.profile().is_of_interest() {
                unflagged.push(node.key().to_string());
            }
        }
        unflagged
    }

    /// Remove every unflagged profile, returning the removed names.
    ///
    /// The full name list is collected before the first deletion since
    /// deletions restructure the tree. Each deletion targets an unflagged node,
    /// so a flagged profile sharing the name stays registered.
    #[instrument(level = "debug", skip(self))]
    pub fn cleanup(&mut self) -> Vec<String> {
        let unflagged = self.collect_unflagged();
        for name in &unflagged {
            let mut removed = false;
            self.root = tree::remove_where(
                self.root.take(),
                name,
                &|node| !node.profile().is_of_interest(),
                &mut removed,
            );
            if removed {
                self.len -= 1;
            }
        }
        debug!("removed {} unflagged profiles, {} remain", unflagged.len(), self.len);
        unflagged
    }

    /// Nodes in ascending key order.
    pub fn iter(&self) -> InOrder<'_> {
        InOrder::new(self.root())
    }

    /// Nodes top level to bottom, left to right within a level.
    pub fn level_order(&self) -> LevelOrder<'_> {
        LevelOrder::new(self.root())
    }

    /// Registered names in ascending order.
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(TreeNode::key).collect()
    }
}
