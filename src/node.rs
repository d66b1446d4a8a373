//! Node model (spec.md §3, §4.1).
//!
//! Nodes are immutable once shared: a node is built once by a constructor
//! that folds its cached summaries, then referenced by `Arc` from however
//! many tree versions want it. A path-copy edit clones only the nodes on
//! its routing path (via `(*arc).clone()`, which clones the node's own
//! fields including its `SmallVec` storage) and rebuilds summaries for the
//! nodes it touches; everything below an untouched child is shared by
//! `Arc` identity (spec.md §9 "shared subtree identity").
//!
//! Inline storage: the teacher (`content-tree`) backs each node with a
//! fixed array plus a logical length, and the invariant checker confirms
//! the view aliases that array. Rust has no safe way to expose a
//! variable-length view over a fixed array without also tracking a
//! separate length, so here the same contract — O(1) access, logical
//! length bounded at construction — is met with `SmallVec`, inlining
//! storage up to `OVERFLOW_SLOTS` so a node's storage never spills to the
//! heap even mid-split (the teacher already depends on this exact crate
//! for the same reason, see `content-tree`'s `Cargo.toml`).

use smallvec::SmallVec;
use std::fmt::Debug;
use std::sync::Arc;

use crate::summary::{Extension, Item, Summary};

pub const BASE: usize = 6;
pub const MAX_CHILDREN: usize = 2 * BASE;
pub const MAX_LEAF_ITEMS: usize = 2 * BASE;
pub const OVERFLOW_SLOTS: usize = MAX_CHILDREN + 1;

pub(crate) type ItemVec<I> = SmallVec<[I; OVERFLOW_SLOTS]>;

#[derive(Debug)]
pub(crate) struct LeafNode<I: Item, E: Extension<I>> {
    pub(crate) items: ItemVec<I>,
    pub(crate) summary: I::Summary,
    pub(crate) ext: E,
}

#[derive(Debug)]
pub(crate) struct InnerNode<I: Item, E: Extension<I>> {
    pub(crate) children: SmallVec<[Node<I, E>; OVERFLOW_SLOTS]>,
    /// Number of items in each child subtree, parallel to `children`.
    /// Routing by item index (spec.md §4.2: "inner nodes do not store
    /// separator keys") reads this directly instead of re-deriving a
    /// count from `S`, since the caller's base monoid need not have
    /// anything to do with item count.
    pub(crate) child_counts: SmallVec<[usize; OVERFLOW_SLOTS]>,
    pub(crate) count: usize,
    pub(crate) summary: I::Summary,
    pub(crate) ext: E,
    pub(crate) height: usize,
}

#[derive(Debug)]
pub(crate) enum Node<I: Item, E: Extension<I>> {
    Leaf(Arc<LeafNode<I, E>>),
    Inner(Arc<InnerNode<I, E>>),
}

impl<I: Item, E: Extension<I>> Clone for Node<I, E> {
    fn clone(&self) -> Self {
        match self {
            Node::Leaf(l) => Node::Leaf(l.clone()),
            Node::Inner(n) => Node::Inner(n.clone()),
        }
    }
}

impl<I: Item, E: Extension<I>> LeafNode<I, E> {
    pub(crate) fn new(items: ItemVec<I>) -> Self {
        let mut summary = I::Summary::zero();
        let mut ext = E::zero();
        for item in &items {
            let s = item.summary();
            ext.add_extension(&E::from_item(item, &s));
            summary.add_summary(&s);
        }
        LeafNode { items, summary, ext }
    }

    pub(crate) fn count(&self) -> usize {
        self.items.len()
    }
}

impl<I: Item, E: Extension<I>> InnerNode<I, E> {
    pub(crate) fn new(children: SmallVec<[Node<I, E>; OVERFLOW_SLOTS]>) -> Self {
        debug_assert!(!children.is_empty());
        let mut child_counts = SmallVec::with_capacity(children.len());
        let mut count = 0usize;
        let mut summary = I::Summary::zero();
        let mut ext = E::zero();
        let height = children[0].height() + 1;
        for child in &children {
            debug_assert_eq!(child.height(), height - 1, "children must be uniform height");
            let c = child.count();
            child_counts.push(c);
            count += c;
            summary.add_summary(child.summary());
            ext.add_extension(child.ext());
        }
        InnerNode { children, child_counts, count, summary, ext, height }
    }
}

impl<I: Item, E: Extension<I>> Node<I, E> {
    pub(crate) fn new_leaf(items: ItemVec<I>) -> Self {
        Node::Leaf(Arc::new(LeafNode::new(items)))
    }

    pub(crate) fn new_inner(children: SmallVec<[Node<I, E>; OVERFLOW_SLOTS]>) -> Self {
        Node::Inner(Arc::new(InnerNode::new(children)))
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub(crate) fn count(&self) -> usize {
        match self {
            Node::Leaf(l) => l.count(),
            Node::Inner(n) => n.count,
        }
    }

    pub(crate) fn summary(&self) -> &I::Summary {
        match self {
            Node::Leaf(l) => &l.summary,
            Node::Inner(n) => &n.summary,
        }
    }

    pub(crate) fn ext(&self) -> &E {
        match self {
            Node::Leaf(l) => &l.ext,
            Node::Inner(n) => &n.ext,
        }
    }

    pub(crate) fn height(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Inner(n) => n.height,
        }
    }

    pub(crate) fn as_leaf(&self) -> &Arc<LeafNode<I, E>> {
        match self {
            Node::Leaf(l) => l,
            Node::Inner(_) => panic!("expected leaf node"),
        }
    }

    pub(crate) fn as_inner(&self) -> &Arc<InnerNode<I, E>> {
        match self {
            Node::Inner(n) => n,
            Node::Leaf(_) => panic!("expected internal node"),
        }
    }

    pub(crate) fn into_leaf(self) -> Arc<LeafNode<I, E>> {
        match self {
            Node::Leaf(l) => l,
            Node::Inner(_) => panic!("expected leaf node"),
        }
    }

    pub(crate) fn into_inner(self) -> Arc<InnerNode<I, E>> {
        match self {
            Node::Inner(n) => n,
            Node::Leaf(_) => panic!("expected internal node"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::NoExtension;
    use crate::testutil::{seq, Count, Unit};
    use smallvec::smallvec;

    #[test]
    fn leaf_new_folds_summary() {
        let items: ItemVec<Unit> = seq(5).into_iter().collect();
        let leaf = LeafNode::<Unit, NoExtension>::new(items);
        assert_eq!(leaf.count(), 5);
        assert_eq!(leaf.summary, Count(5));
        assert_eq!(leaf.ext, NoExtension);
    }

    #[test]
    fn inner_new_folds_children_and_height() {
        let left = Node::<Unit, NoExtension>::new_leaf(seq(6).into_iter().collect());
        let right = Node::<Unit, NoExtension>::new_leaf(seq(4).into_iter().collect());
        let children: SmallVec<[Node<Unit, NoExtension>; OVERFLOW_SLOTS]> = smallvec![left, right];
        let inner = InnerNode::new(children);

        assert_eq!(inner.height, 2);
        assert_eq!(inner.count, 10);
        assert_eq!(inner.summary, Count(10));
        assert_eq!(inner.child_counts.as_slice(), &[6, 4]);
    }

    #[test]
    fn node_wrappers_report_height_one_for_leaves() {
        let leaf = Node::<Unit, NoExtension>::new_leaf(seq(3).into_iter().collect());
        assert!(leaf.is_leaf());
        assert_eq!(leaf.height(), 1);
        assert_eq!(leaf.count(), 3);
    }
}
