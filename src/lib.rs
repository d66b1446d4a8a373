//! A persistent, rope-oriented B+ sum-tree: path-copy editing, structural
//! sharing, and summary-guided navigation over a caller-supplied monoidal
//! summary (and, optionally, a second parallel one).
//!
//! ```
//! use sumtree::{NoExtension, Tree, TreeConfig, Item, Summary};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Count(u64);
//! impl Summary for Count {
//!     fn zero() -> Self { Count(0) }
//!     fn add_summary(&mut self, other: &Self) { self.0 += other.0 }
//! }
//!
//! #[derive(Clone, Debug)]
//! struct Word(&'static str);
//! impl Item for Word {
//!     type Summary = Count;
//!     fn summary(&self) -> Count { Count(1) }
//! }
//!
//! let tree: Tree<Word, NoExtension> = Tree::new(TreeConfig::new()).unwrap();
//! let tree = tree.insert_at(0, [Word("a"), Word("b"), Word("c")]).unwrap();
//! assert_eq!(tree.len(), 3);
//! assert_eq!(tree.summary().0, 3);
//! ```

mod check;
mod cursor;
mod debug;
mod error;
mod iter;
mod mutations;
mod node;
mod summary;
#[cfg(test)]
mod testutil;

pub use cursor::{Cursor, ExtCursor};
pub use error::{Result, TreeError};
pub use iter::Iter;
pub use summary::{Dimension, Extension, Item, NoExtension, Summary};

use std::marker::PhantomData;

use node::Node;

/// Configuration captured by a [`Tree`] at construction: which summary
/// and (optional) extension monoid it was built with (spec.md §3, §6).
/// Both are static type parameters, so there is nothing to store at
/// runtime beyond the type witnesses.
pub struct TreeConfig<I: Item, E: Extension<I> = NoExtension> {
    _marker: PhantomData<fn() -> (I, E)>,
}

impl<I: Item, E: Extension<I>> TreeConfig<I, E> {
    pub fn new() -> Self {
        TreeConfig { _marker: PhantomData }
    }
}

impl<I: Item, E: Extension<I>> Default for TreeConfig<I, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Item, E: Extension<I>> Clone for TreeConfig<I, E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}
impl<I: Item, E: Extension<I>> Copy for TreeConfig<I, E> {}

fn extension_present<I: Item, E: Extension<I>>() -> bool {
    E::is_configured()
}

/// A persistent sequence of items, organized as a B+ sum-tree (spec.md
/// §2, §3). Every mutating method returns a brand new `Tree` and leaves
/// `self` untouched; untouched subtrees are shared by `Arc` identity
/// with whatever version they came from.
pub struct Tree<I: Item, E: Extension<I> = NoExtension> {
    root: Option<Node<I, E>>,
    height: usize,
}

impl<I: Item, E: Extension<I>> Clone for Tree<I, E> {
    fn clone(&self) -> Self {
        Tree { root: self.root.clone(), height: self.height }
    }
}

impl<I: Item, E: Extension<I>> Tree<I, E> {
    /// Build an empty tree under the given configuration (spec.md §6).
    /// Fails only if `E` is a real (non-[`NoExtension`]-shaped) extension
    /// whose `MAGIC_ID` is empty, which would make `concat` unable to
    /// ever confirm two trees share an extension semantics.
    pub fn new(_cfg: TreeConfig<I, E>) -> Result<Self> {
        if E::is_configured() && E::magic_id().is_empty() {
            return Err(TreeError::InvalidConfig("extension magic id must be non-empty"));
        }
        Ok(Tree { root: None, height: 0 })
    }

    fn from_root(root: Option<Node<I, E>>) -> Self {
        let height = root.as_ref().map(|r| r.height()).unwrap_or(0);
        Tree { root, height }
    }

    pub fn len(&self) -> usize {
        self.root.as_ref().map(|r| r.count()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The folded base summary of every item in the tree (spec.md §4.1).
    pub fn summary(&self) -> I::Summary {
        self.root.as_ref().map(|r| r.summary().clone()).unwrap_or_else(I::Summary::zero)
    }

    /// The folded extension summary, and whether an extension is actually
    /// configured for this tree (spec.md §4.7). When no extension is
    /// configured the first element is always `E::zero()`.
    pub fn ext(&self) -> (E, bool) {
        let e = self.root.as_ref().map(|r| r.ext().clone()).unwrap_or_else(E::zero);
        (e, extension_present::<I, E>())
    }

    /// The item at position `i` (spec.md §6).
    pub fn at(&self, index: usize) -> Result<I> {
        let len = self.len();
        if index >= len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        Ok(item_at(self.root.as_ref().unwrap(), index))
    }

    /// Visit every item in order, stopping early the first time `f`
    /// returns `false` (spec.md §6, SPEC_FULL ambient supplement).
    pub fn for_each_item(&self, mut f: impl FnMut(&I) -> bool) {
        for item in self.iter() {
            if !f(item) {
                break;
            }
        }
    }

    /// A borrowing, in-order iterator over every item (SPEC_FULL ambient
    /// supplement; not in spec.md's original surface, added since this
    /// lineage always exposes a real `Iterator` alongside a callback
    /// walk).
    pub fn iter(&self) -> Iter<'_, I, E> {
        Iter::new(self.root.as_ref())
    }

    /// Collects every item into a `Vec`, for test assertions that want
    /// to compare whole-tree content without hand-rolling
    /// `iter().cloned().collect()` at every call site (SPEC_FULL ambient
    /// supplement; test-only, not part of the public surface).
    #[cfg(test)]
    pub(crate) fn items(&self) -> Vec<I> {
        self.iter().cloned().collect()
    }

    /// Insert `items` starting at position `index` (spec.md §4.2, §6).
    /// `index == len()` appends.
    pub fn insert_at(&self, index: usize, items: impl IntoIterator<Item = I>) -> Result<Self> {
        let len = self.len();
        if index > len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        let root = mutations::insert_many(self.root.clone(), index, items);
        let root = root.map(mutations::normalize_root);
        Ok(Self::from_root(root))
    }

    /// Delete the single item at `index` (spec.md §4.3, §6).
    pub fn delete_at(&self, index: usize) -> Result<Self> {
        let len = self.len();
        if index >= len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        let root = self.root.as_ref().unwrap();
        let new_root = if len == 1 {
            None
        } else {
            Some(mutations::normalize_root(mutations::delete_at(root, index)))
        };
        Ok(Self::from_root(new_root))
    }

    /// Delete `count` items starting at `start` (spec.md §4.3, §6).
    pub fn delete_range(&self, start: usize, count: usize) -> Result<Self> {
        let len = self.len();
        if start > len || start + count > len {
            return Err(TreeError::IndexOutOfBounds { index: start + count, len });
        }
        if count == 0 {
            return Ok(self.clone());
        }
        let root = self.root.as_ref().unwrap();
        let new_root = mutations::delete_range(root, start, count).map(mutations::normalize_root);
        Ok(Self::from_root(new_root))
    }

    /// Split into two trees at item index `index`: `[0, index)` and
    /// `[index, len())`, sharing every subtree wholly on one side
    /// (spec.md §4.4, §6).
    pub fn split_at(&self, index: usize) -> Result<(Self, Self)> {
        let len = self.len();
        if index > len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        let (left, right) = match &self.root {
            None => (None, None),
            Some(root) => mutations::split_node(root, index),
        };
        Ok((Self::from_root(left), Self::from_root(right)))
    }

    /// Concatenate `self` followed by `other` (spec.md §4.5, §6). Both
    /// operands share the same `E` type parameter, so extension
    /// compatibility (spec.md §4.7, §9(ii)) is guaranteed at compile
    /// time: two values of the same `E` always agree on `MAGIC_ID`,
    /// since [`Extension::magic_id`] is a per-type constant, not a
    /// per-value one. Height-aware join stays `O(log n)` either way
    /// (spec.md §4.5). For joining trees configured with two different
    /// `E` types at runtime (e.g. one side has no extension), see
    /// [`Tree::concat_with`].
    pub fn concat(&self, other: &Self) -> Result<Self> {
        let root = match (self.root.clone(), other.root.clone()) {
            (None, None) => None,
            (Some(l), None) => Some(l),
            (None, Some(r)) => Some(r),
            (Some(l), Some(r)) => Some(mutations::normalize_root(mutations::concat_nodes(l, r))),
        };
        Ok(Self::from_root(root))
    }

    /// Concatenate `self` followed by `other`, where `other` may be
    /// configured with a different extension type `E2` (spec.md §4.5
    /// "Extension compatibility", §9(ii)). Compatibility is checked by
    /// `MAGIC_ID` value rather than by Rust type, matching spec.md
    /// §4.7's "the only cross-tree compatibility key". Mismatched
    /// `MAGIC_ID`s — including one side configured and the other not —
    /// fail with [`TreeError::IncompatibleExtension`] and leave both
    /// inputs untouched.
    ///
    /// This is the slow path: unlike [`Tree::concat`], which shares
    /// `other`'s subtrees by `Arc` identity, this rebuilds `other`'s
    /// items under `E` from scratch (`E2`'s cached extension values
    /// aren't reusable once the extension type changes), so it costs
    /// `O(other.len() · log other.len())` rather than `O(log n)`.
    pub fn concat_with<E2: Extension<I>>(&self, other: &Tree<I, E2>) -> Result<Self> {
        if E::magic_id() != E2::magic_id() {
            return Err(TreeError::IncompatibleExtension);
        }
        if other.is_empty() {
            return Ok(self.clone());
        }
        let rebuilt = Tree::<I, E>::new(TreeConfig::new())?
            .insert_at(0, other.iter().cloned())?;
        self.concat(&rebuilt)
    }

    /// The base summary of items `[0, k)` in `O(log n)` (spec.md §4.6,
    /// §6). `k` is clamped to `len()`.
    pub fn prefix_summary(&self, k: usize) -> Result<I::Summary> {
        let k = k.min(self.len());
        Ok(cursor::prefix_summary(self.root.as_ref(), k))
    }

    /// The extension summary of items `[0, k)` in `O(log n)` (spec.md
    /// §4.6, §6). Errors if no extension is configured.
    pub fn prefix_ext(&self, k: usize) -> Result<E> {
        if !extension_present::<I, E>() {
            return Err(TreeError::ExtensionUnavailable);
        }
        let k = k.min(self.len());
        Ok(cursor::prefix_ext(self.root.as_ref(), k))
    }

    /// A cursor that descends by folding the base summary (spec.md §4.6,
    /// §6).
    pub fn cursor<D: Dimension<I::Summary>>(&self) -> Cursor<'_, I, E, D> {
        Cursor { root: self.root.as_ref(), _dim: PhantomData }
    }

    /// A cursor that descends by folding the extension summary (spec.md
    /// §4.6, §6). Errors if no extension is configured.
    pub fn ext_cursor<D: Dimension<E>>(&self) -> Result<ExtCursor<'_, I, E, D>> {
        if !extension_present::<I, E>() {
            return Err(TreeError::ExtensionUnavailable);
        }
        Ok(ExtCursor { root: self.root.as_ref(), _dim: PhantomData })
    }

    /// `(0, D::zero())` without a descent (SPEC_FULL ambient supplement).
    pub fn cursor_at_start<D: Dimension<I::Summary>>(&self) -> (usize, D::Value) {
        (0, D::zero())
    }

    /// `(len(), full fold)` without a descent (SPEC_FULL ambient
    /// supplement).
    pub fn cursor_at_end<D: Dimension<I::Summary>>(&self) -> (usize, D::Value) {
        (self.len(), D::add(&D::zero(), &self.summary()))
    }

    /// `(0, D::zero())` for an extension dimension, without a descent.
    pub fn ext_cursor_at_start<D: Dimension<E>>(&self) -> Result<(usize, D::Value)> {
        if !extension_present::<I, E>() {
            return Err(TreeError::ExtensionUnavailable);
        }
        Ok((0, D::zero()))
    }

    /// `(len(), full fold)` for an extension dimension, without a
    /// descent.
    pub fn ext_cursor_at_end<D: Dimension<E>>(&self) -> Result<(usize, D::Value)> {
        if !extension_present::<I, E>() {
            return Err(TreeError::ExtensionUnavailable);
        }
        let (ext, _) = self.ext();
        Ok((self.len(), D::add(&D::zero(), &ext)))
    }

    /// Verify every structural invariant from the root down (spec.md
    /// §4.8), returning [`TreeError::InvariantViolation`] on the first
    /// one found. Always returns a `Result` rather than panicking, in
    /// every build profile — `check` is the verifier spec.md calls out
    /// as "used by tests", and tests need to assert on the specific
    /// violation rather than catch a panic.
    pub fn check(&self) -> Result<()> {
        check::check(self.root.as_ref(), self.height)
    }
}

fn item_at<I: Item, E: Extension<I>>(node: &Node<I, E>, index: usize) -> I {
    match node {
        Node::Leaf(l) => l.items[index].clone(),
        Node::Inner(n) => {
            let mut remaining = index;
            for (i, &count) in n.child_counts.iter().enumerate() {
                if remaining < count {
                    return item_at(&n.children[i], remaining);
                }
                remaining -= count;
            }
            unreachable!("index already bounds-checked against len()");
        }
    }
}

impl<'a, I: Item, E: Extension<I>> IntoIterator for &'a Tree<I, E> {
    type Item = &'a I;
    type IntoIter = Iter<'a, I, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
