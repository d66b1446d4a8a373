//! Dimension-guided descent: cursor seek and prefix aggregation
//! (spec.md §4.6).
//!
//! The teacher's cursor (`content-tree::root::unsafe_cursor_at_query`)
//! descends by accumulating a running offset and comparing it against a
//! target at each level. The shape here is the same; the genericity is
//! pushed one step further so the identical descent serves both a
//! base-summary dimension and an extension dimension, selected by which
//! [`Measure`] is plugged in.

use std::cmp::Ordering;
use std::marker::PhantomData;

use crate::node::Node;
use crate::summary::{Dimension, Extension, Item, Summary};

/// Picks which cached field a descent folds over: the base summary or
/// the extension summary. Internal — callers only ever see [`Cursor`] and
/// [`ExtCursor`], which fix this choice for them.
pub(crate) trait Measure<I: Item, E: Extension<I>> {
    type Source;

    fn item_measure(item: &I, item_summary: &I::Summary) -> Self::Source;
    fn node_measure(node: &Node<I, E>) -> &Self::Source;
}

pub(crate) struct BaseMeasure;
impl<I: Item, E: Extension<I>> Measure<I, E> for BaseMeasure {
    type Source = I::Summary;

    fn item_measure(_item: &I, item_summary: &I::Summary) -> I::Summary {
        item_summary.clone()
    }

    fn node_measure(node: &Node<I, E>) -> &I::Summary {
        node.summary()
    }
}

pub(crate) struct ExtMeasure;
impl<I: Item, E: Extension<I>> Measure<I, E> for ExtMeasure {
    type Source = E;

    fn item_measure(item: &I, item_summary: &I::Summary) -> E {
        E::from_item(item, item_summary)
    }

    fn node_measure(node: &Node<I, E>) -> &E {
        node.ext()
    }
}

/// Descend from `root`, folding left-to-right, and return the first item
/// index whose cumulative fold compares `>=` the target, along with the
/// fold accumulated through (and including) that item. Returns
/// `(len, full fold)` if no such index exists (spec.md §4.6).
pub(crate) fn seek<I, E, D, M>(root: Option<&Node<I, E>>, target: &D::Value) -> (usize, D::Value)
where
    I: Item,
    E: Extension<I>,
    D: Dimension<M::Source>,
    M: Measure<I, E>,
{
    let mut acc = D::zero();
    if D::compare(&acc, target) != Ordering::Less {
        return (0, acc);
    }
    let Some(mut node) = root else {
        return (0, acc);
    };
    let mut index = 0usize;
    loop {
        match node {
            Node::Leaf(l) => {
                for item in l.items.iter() {
                    let item_summary = item.summary();
                    let measure = M::item_measure(item, &item_summary);
                    let next = D::add(&acc, &measure);
                    if D::compare(&next, target) != Ordering::Less {
                        return (index, next);
                    }
                    acc = next;
                    index += 1;
                }
                return (index, acc);
            }
            Node::Inner(n) => {
                let mut descend = None;
                for child in n.children.iter() {
                    let next = D::add(&acc, M::node_measure(child));
                    if D::compare(&next, target) != Ordering::Less {
                        descend = Some(child);
                        break;
                    }
                    acc = next;
                    index += child.count();
                }
                match descend {
                    Some(child) => node = child,
                    None => return (index, acc),
                }
            }
        }
    }
}

/// Fold the first `k` items' base summaries (spec.md §4.6 "prefix
/// aggregation"). Full child caches are added for subtrees wholly inside
/// the prefix; only the boundary leaf is scanned item-by-item.
pub(crate) fn prefix_summary<I: Item, E: Extension<I>>(root: Option<&Node<I, E>>, k: usize) -> I::Summary {
    let Some(root) = root else { return I::Summary::zero() };
    if k == 0 {
        return I::Summary::zero();
    }
    if k >= root.count() {
        return root.summary().clone();
    }
    fold_prefix_summary(root, k)
}

fn fold_prefix_summary<I: Item, E: Extension<I>>(node: &Node<I, E>, k: usize) -> I::Summary {
    match node {
        Node::Leaf(l) => {
            let mut acc = I::Summary::zero();
            for item in l.items.iter().take(k) {
                acc.add_summary(&item.summary());
            }
            acc
        }
        Node::Inner(n) => {
            let mut acc = I::Summary::zero();
            let mut remaining = k;
            for (i, child) in n.children.iter().enumerate() {
                let c = n.child_counts[i];
                if remaining >= c {
                    acc.add_summary(child.summary());
                    remaining -= c;
                    if remaining == 0 {
                        break;
                    }
                } else {
                    acc.add_summary(&fold_prefix_summary(child, remaining));
                    break;
                }
            }
            acc
        }
    }
}

/// Fold the first `k` items' extension summaries. Mirrors
/// [`prefix_summary`]; kept as a separate function rather than a shared
/// generic helper because `Summary` and `Extension` are different traits
/// with different fold signatures (`from_item` needs both the item and
/// its base summary).
pub(crate) fn prefix_ext<I: Item, E: Extension<I>>(root: Option<&Node<I, E>>, k: usize) -> E {
    let Some(root) = root else { return E::zero() };
    if k == 0 {
        return E::zero();
    }
    if k >= root.count() {
        return root.ext().clone();
    }
    fold_prefix_ext(root, k)
}

fn fold_prefix_ext<I: Item, E: Extension<I>>(node: &Node<I, E>, k: usize) -> E {
    match node {
        Node::Leaf(l) => {
            let mut acc = E::zero();
            for item in l.items.iter().take(k) {
                acc.add_extension(&E::from_item(item, &item.summary()));
            }
            acc
        }
        Node::Inner(n) => {
            let mut acc = E::zero();
            let mut remaining = k;
            for (i, child) in n.children.iter().enumerate() {
                let c = n.child_counts[i];
                if remaining >= c {
                    acc.add_extension(child.ext());
                    remaining -= c;
                    if remaining == 0 {
                        break;
                    }
                } else {
                    acc.add_extension(&fold_prefix_ext(child, remaining));
                    break;
                }
            }
            acc
        }
    }
}

/// A cursor over a tree's base summary dimension (spec.md §4.6, §6).
pub struct Cursor<'a, I: Item, E: Extension<I>, D: Dimension<I::Summary>> {
    pub(crate) root: Option<&'a Node<I, E>>,
    pub(crate) _dim: PhantomData<D>,
}

impl<'a, I: Item, E: Extension<I>, D: Dimension<I::Summary>> Cursor<'a, I, E, D> {
    /// First item index whose cumulative base-summary fold compares `>=`
    /// `target`, and the fold accumulated through (and including) it.
    pub fn seek(&self, target: &D::Value) -> (usize, D::Value) {
        seek::<I, E, D, BaseMeasure>(self.root, target)
    }
}

/// A cursor over a tree's extension dimension (spec.md §4.6, §6).
pub struct ExtCursor<'a, I: Item, E: Extension<I>, D: Dimension<E>> {
    pub(crate) root: Option<&'a Node<I, E>>,
    pub(crate) _dim: PhantomData<D>,
}

impl<'a, I: Item, E: Extension<I>, D: Dimension<E>> ExtCursor<'a, I, E, D> {
    pub fn seek(&self, target: &D::Value) -> (usize, D::Value) {
        seek::<I, E, D, ExtMeasure>(self.root, target)
    }
}
