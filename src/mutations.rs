//! The path-copy mutation core (spec.md §4.2-§4.5).
//!
//! Every function here takes nodes by value or by shared reference and
//! returns brand new nodes; nothing is ever mutated in place. Structural
//! sharing falls out for free: cloning a `Node` only bumps an `Arc`
//! refcount, so a recursive function that doesn't touch a given child
//! just clones its `Node` handle and moves on (spec.md §9 "shared subtree
//! identity").
//!
//! The split/overflow and borrow/merge/underflow machinery mirrors the
//! shape of the teacher's `content-tree::mutations` (split at the
//! midpoint on overflow, promote a sibling to the parent, cascade
//! underflow fixes upward) but is rebuilt against owned, immutable nodes
//! instead of an in-place array with an overflow slot.

use log::trace;
use smallvec::{smallvec, SmallVec};

use crate::node::{InnerNode, Node, BASE, MAX_CHILDREN, MAX_LEAF_ITEMS, OVERFLOW_SLOTS};
use crate::summary::{Extension, Item};

type Children<I, E> = SmallVec<[Node<I, E>; OVERFLOW_SLOTS]>;

/// Outcome of inserting into a single node: either it absorbed the new
/// item without overflowing, or it split and the right half must be
/// promoted to the parent (spec.md §4.2).
enum InsertOutcome<I: Item, E: Extension<I>> {
    Single(Node<I, E>),
    Split(Node<I, E>, Node<I, E>),
}

/// Locate the child (and the index local to that child) that owns global
/// item index `index`, by walking cumulative child item counts. Inner
/// nodes never store separator keys — routing is purely by count
/// (spec.md §4.2).
fn locate_child<I: Item, E: Extension<I>>(node: &InnerNode<I, E>, index: usize) -> (usize, usize) {
    let mut remaining = index;
    for (i, &count) in node.child_counts.iter().enumerate() {
        if remaining < count || i == node.child_counts.len() - 1 {
            return (i, remaining);
        }
        remaining -= count;
    }
    unreachable!("inner node must have at least one child");
}

pub(crate) fn insert_one<I: Item, E: Extension<I>>(
    node: &Node<I, E>,
    index: usize,
    item: I,
) -> InsertOutcome<I, E> {
    match node {
        Node::Leaf(l) => {
            let mut items = l.items.clone();
            items.insert(index, item);
            if items.len() <= MAX_LEAF_ITEMS {
                InsertOutcome::Single(Node::new_leaf(items))
            } else {
                trace!(target: "sumtree::mutations", "leaf overflow at {} items, splitting", items.len());
                let mid = items.len() / 2;
                let right = items.split_off(mid);
                InsertOutcome::Split(Node::new_leaf(items), Node::new_leaf(right))
            }
        }
        Node::Inner(n) => {
            let (ci, local_index) = locate_child(n, index);
            match insert_one(&n.children[ci], local_index, item) {
                InsertOutcome::Single(new_child) => {
                    let mut children = n.children.clone();
                    children[ci] = new_child;
                    InsertOutcome::Single(Node::new_inner(children))
                }
                InsertOutcome::Split(left, right) => {
                    let mut children = n.children.clone();
                    children[ci] = left;
                    children.insert(ci + 1, right);
                    if children.len() <= MAX_CHILDREN {
                        InsertOutcome::Single(Node::new_inner(children))
                    } else {
                        trace!(target: "sumtree::mutations", "inner overflow at {} children, splitting", children.len());
                        let mid = children.len() / 2;
                        let right_children = children.split_off(mid);
                        InsertOutcome::Split(Node::new_inner(children), Node::new_inner(right_children))
                    }
                }
            }
        }
    }
}

/// Occupancy of a node as measured by its parent: item count for a leaf,
/// child count for an inner node (spec.md §4.1).
fn occupancy<I: Item, E: Extension<I>>(node: &Node<I, E>) -> usize {
    match node {
        Node::Leaf(l) => l.items.len(),
        Node::Inner(n) => n.children.len(),
    }
}

/// Combine two same-height siblings into one or two balanced replacements.
/// When the combined occupancy still fits under the max, this is a plain
/// merge (spec.md §4.3 step 3); when it doesn't (possible once
/// `delete_range` removes many items across several siblings in one
/// pass), it's a redistribute: split the combined contents back down the
/// middle so both sides land back in `[BASE, MAX]` (a generalization of
/// the single-entry "borrow" in spec.md §4.3 step 2 to however many
/// entries are needed to restore balance).
fn combine_pair<I: Item, E: Extension<I>>(
    left: Node<I, E>,
    right: Node<I, E>,
) -> SmallVec<[Node<I, E>; 2]> {
    match (left, right) {
        (Node::Leaf(l), Node::Leaf(r)) => {
            let mut items = (*l).items.clone();
            items.extend(r.items.iter().cloned());
            if items.len() <= MAX_LEAF_ITEMS {
                smallvec![Node::new_leaf(items)]
            } else {
                let mid = items.len() / 2;
                let right_items = items.split_off(mid);
                smallvec![Node::new_leaf(items), Node::new_leaf(right_items)]
            }
        }
        (Node::Inner(l), Node::Inner(r)) => {
            let mut children = (*l).children.clone();
            children.extend(r.children.iter().cloned());
            if children.len() <= MAX_CHILDREN {
                smallvec![Node::new_inner(children)]
            } else {
                let mid = children.len() / 2;
                let right_children = children.split_off(mid);
                smallvec![Node::new_inner(children), Node::new_inner(right_children)]
            }
        }
        _ => unreachable!("siblings at the same tree level always match node kind"),
    }
}

/// Restore the `[BASE, MAX]` occupancy invariant across one node's
/// children, fixing however many underflowing entries are present by
/// repeatedly pairing an underflowing child with a neighbor (preferring
/// the left sibling, per spec.md §4.3 step 1) and combining them. A
/// single `delete_at` only ever leaves one child underflowing by exactly
/// one entry; `delete_range` can leave several at once, which is why this
/// is a loop rather than a single borrow/merge step.
fn rebalance_children<I: Item, E: Extension<I>>(mut children: Children<I, E>) -> Children<I, E> {
    if children.len() <= 1 {
        return children;
    }
    let mut i = 0;
    while i < children.len() {
        if children.len() <= 1 {
            break;
        }
        if occupancy(&children[i]) >= BASE {
            i += 1;
            continue;
        }
        let donor_idx = if i > 0 { i - 1 } else { i + 1 };
        let lo = donor_idx.min(i);
        trace!(target: "sumtree::mutations", "rebalancing underflowing child at {} with donor at {}", i, donor_idx);
        let left = children.remove(lo);
        let right = children.remove(lo);
        let replaced = combine_pair(left, right);
        for (k, node) in replaced.into_iter().enumerate() {
            children.insert(lo + k, node);
        }
        i = lo;
    }
    children
}

pub(crate) fn delete_at<I: Item, E: Extension<I>>(node: &Node<I, E>, index: usize) -> Node<I, E> {
    match node {
        Node::Leaf(l) => {
            let mut items = l.items.clone();
            items.remove(index);
            Node::new_leaf(items)
        }
        Node::Inner(n) => {
            let (ci, local_index) = locate_child(n, index);
            let new_child = delete_at(&n.children[ci], local_index);
            let mut children = n.children.clone();
            children[ci] = new_child;
            Node::new_inner(rebalance_children(children))
        }
    }
}

/// Remove items `[start, start+count)` from `node`'s subtree in a single
/// descent, excising the interval across however many leaves it spans
/// (spec.md §4.3's "single descent" implementation choice, recorded in
/// DESIGN.md). Returns `None` when the whole subtree was inside the
/// deleted range, so the caller drops this child entirely rather than
/// keeping an empty one around.
///
/// A surviving inner node is never collapsed down to its lone child here
/// even when a range empties all but one of its children: doing so would
/// shorten it relative to untouched siblings at the same parent, which
/// still expect a node at the original height. Left as a single-child
/// inner node, it reads as merely underflowing, and the ordinary
/// `rebalance_children` cascade at the parent (or `normalize_root` at the
/// very top) folds it away without ever touching height.
pub(crate) fn delete_range<I: Item, E: Extension<I>>(
    node: &Node<I, E>,
    start: usize,
    count: usize,
) -> Option<Node<I, E>> {
    if count == 0 {
        return Some(node.clone());
    }
    match node {
        Node::Leaf(l) => {
            let mut items = l.items.clone();
            items.drain(start..start + count);
            if items.is_empty() { None } else { Some(Node::new_leaf(items)) }
        }
        Node::Inner(n) => {
            let mut new_children: Children<I, E> = SmallVec::new();
            let mut offset = 0usize;
            let end = start + count;
            for (i, child) in n.children.iter().enumerate() {
                let c = n.child_counts[i];
                let child_start = offset;
                let child_end = offset + c;
                offset = child_end;

                let range_start = start.max(child_start);
                let range_end = end.min(child_end);
                if range_start >= range_end {
                    new_children.push(child.clone());
                } else if range_start == child_start && range_end == child_end {
                    // Entire child falls inside the deleted range; drop it.
                    continue;
                } else {
                    let local_start = range_start - child_start;
                    let local_count = range_end - range_start;
                    if let Some(new_child) = delete_range(child, local_start, local_count) {
                        new_children.push(new_child);
                    }
                }
            }
            if new_children.is_empty() {
                None
            } else {
                Some(Node::new_inner(rebalance_children(new_children)))
            }
        }
    }
}

/// Collapse a freshly assembled child list down to a single node when it
/// holds exactly one entry (this is what keeps `split_at` from ever
/// materializing a single-child inner node at any level, spec.md §9's
/// chosen interpretation (b) of the split-spine question), or `None` when
/// it's empty.
fn build_from_children<I: Item, E: Extension<I>>(mut children: Children<I, E>) -> Option<Node<I, E>> {
    match children.len() {
        0 => None,
        1 => Some(children.pop().unwrap()),
        _ => Some(Node::new_inner(children)),
    }
}

/// Re-wrap a fragment returned from a lower split recursion in single-
/// child inner nodes until it reaches `target_height`.
///
/// `build_from_children` unwraps a singleton child list down to its bare
/// contained node, which is exactly right when that node is the whole
/// result — but it also means a fragment can come back one (or more)
/// levels shorter than the untouched siblings sitting next to it at the
/// level above, whenever the lower split collapsed to a single surviving
/// child. Padding it back up before splicing it into this level's own
/// child list keeps every entry `rebalance_children`/`combine_pair` see
/// at a uniform height — and hence uniform node kind, which is what lets
/// them pair siblings up at all. The padding is transient: if there's a
/// real sibling to merge with, `rebalance_children` immediately absorbs
/// the single-child wrapper (occupancy 1 always reads as underflowing);
/// if there isn't, the wrapper becomes this level's own collapsed
/// result and gets padded again (or finally absorbed) one level up.
fn pad_to_height<I: Item, E: Extension<I>>(mut node: Node<I, E>, target_height: usize) -> Node<I, E> {
    while node.height() < target_height {
        node = Node::new_inner(smallvec![node]);
    }
    node
}

/// Structural split at item index `index`, sharing every subtree that
/// lies wholly to one side (spec.md §4.4).
pub(crate) fn split_node<I: Item, E: Extension<I>>(
    node: &Node<I, E>,
    index: usize,
) -> (Option<Node<I, E>>, Option<Node<I, E>>) {
    match node {
        Node::Leaf(l) => {
            let mut left_items = l.items.clone();
            let right_items = left_items.split_off(index);
            let left = if left_items.is_empty() { None } else { Some(Node::new_leaf(left_items)) };
            let right = if right_items.is_empty() { None } else { Some(Node::new_leaf(right_items)) };
            (left, right)
        }
        Node::Inner(n) => {
            let (ci, local_index) = locate_child(n, index);
            let child_height = n.children[ci].height();

            let mut left_children: Children<I, E> = n.children[..ci].iter().cloned().collect();
            let mut right_children: Children<I, E> = n.children[ci + 1..].iter().cloned().collect();

            let (child_left, child_right) = split_node(&n.children[ci], local_index);
            if let Some(cl) = child_left {
                left_children.push(pad_to_height(cl, child_height));
            }
            if let Some(cr) = child_right {
                right_children.insert(0, pad_to_height(cr, child_height));
            }

            let left = build_from_children(rebalance_children(left_children));
            let right = build_from_children(rebalance_children(right_children));
            (left, right)
        }
    }
}

/// Join two equal-height subtrees, merging into one node when the result
/// fits under the max occupancy, or wrapping both as the two children of
/// a new, one-taller node otherwise (spec.md §4.5).
fn join_same_height<I: Item, E: Extension<I>>(left: Node<I, E>, right: Node<I, E>) -> Node<I, E> {
    debug_assert_eq!(left.height(), right.height());
    match (left, right) {
        (Node::Leaf(l), Node::Leaf(r)) => {
            let total = l.items.len() + r.items.len();
            if total <= MAX_LEAF_ITEMS {
                let mut items = (*l).items.clone();
                items.extend(r.items.iter().cloned());
                Node::new_leaf(items)
            } else {
                Node::new_inner(smallvec![Node::Leaf(l), Node::Leaf(r)])
            }
        }
        (Node::Inner(l), Node::Inner(r)) => {
            let total = l.children.len() + r.children.len();
            if total <= MAX_CHILDREN {
                let mut children = (*l).children.clone();
                children.extend(r.children.iter().cloned());
                Node::new_inner(children)
            } else {
                Node::new_inner(smallvec![Node::Inner(l), Node::Inner(r)])
            }
        }
        _ => unreachable!("join_same_height called on mismatched node kinds"),
    }
}

/// Rebuild an inner node's child list after a 1-for-1 same-height
/// replacement. Occupancy cannot have changed, so no overflow check is
/// needed.
fn finish_inner<I: Item, E: Extension<I>>(children: Children<I, E>) -> Node<I, E> {
    Node::new_inner(children)
}

/// Rebuild an inner node's child list after splicing in one extra child
/// (the taller side of a recursive join grew by one level and had to be
/// unwrapped into its two children). May overflow and need to split.
fn finish_inner_with_overflow<I: Item, E: Extension<I>>(mut children: Children<I, E>) -> Node<I, E> {
    if children.len() <= MAX_CHILDREN {
        Node::new_inner(children)
    } else {
        trace!(target: "sumtree::mutations", "concat spine overflow at {} children, splitting", children.len());
        let mid = children.len() / 2;
        let right = children.split_off(mid);
        Node::new_inner(smallvec![Node::new_inner(children), Node::new_inner(right)])
    }
}

/// Height-aware structural join (spec.md §4.5). `left` and `right` must
/// both be non-empty; the empty-side short-circuit lives in
/// `Tree::concat`.
pub(crate) fn concat_nodes<I: Item, E: Extension<I>>(left: Node<I, E>, right: Node<I, E>) -> Node<I, E> {
    use std::cmp::Ordering::*;
    match left.height().cmp(&right.height()) {
        Equal => join_same_height(left, right),
        Greater => {
            let l = left.into_inner();
            let mut children: Children<I, E> = (*l).children.clone();
            let last = children.pop().unwrap();
            let last_height = last.height();
            let joined = concat_nodes(last, right);
            if joined.height() == last_height {
                children.push(joined);
                finish_inner(children)
            } else {
                let grown = joined.into_inner();
                for child in grown.children.iter().cloned() {
                    children.push(child);
                }
                finish_inner_with_overflow(children)
            }
        }
        Less => {
            let r = right.into_inner();
            let mut children: Children<I, E> = (*r).children.clone();
            let first = children.remove(0);
            let first_height = first.height();
            let joined = concat_nodes(left, first);
            if joined.height() == first_height {
                children.insert(0, joined);
                finish_inner(children)
            } else {
                let grown = joined.into_inner();
                for (k, child) in grown.children.iter().cloned().enumerate() {
                    children.insert(k, child);
                }
                finish_inner_with_overflow(children)
            }
        }
    }
}

pub(crate) fn insert_many<I: Item, E: Extension<I>>(
    root: Option<Node<I, E>>,
    mut index: usize,
    items: impl IntoIterator<Item = I>,
) -> Option<Node<I, E>> {
    let mut root = root;
    for item in items {
        root = Some(match root {
            None => Node::new_leaf({
                let mut v: SmallVec<[I; OVERFLOW_SLOTS]> = SmallVec::new();
                v.push(item);
                v
            }),
            Some(r) => match insert_one(&r, index, item) {
                InsertOutcome::Single(n) => n,
                InsertOutcome::Split(l, r) => Node::new_inner(smallvec![l, r]),
            },
        });
        index += 1;
    }
    root
}

/// Collapse a root that ended up an inner node with a single child,
/// iteratively, until it's a leaf or has at least two children (spec.md
/// §4.3, §9 (i)).
pub(crate) fn normalize_root<I: Item, E: Extension<I>>(mut root: Node<I, E>) -> Node<I, E> {
    loop {
        match &root {
            Node::Inner(n) if n.children.len() == 1 => {
                let only = n.children[0].clone();
                root = only;
            }
            _ => return root,
        }
    }
}
