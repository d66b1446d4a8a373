//! The summary/extension/dimension algebra (spec.md §3, §4.7, §6).
//!
//! These traits are the only behaviors the core is polymorphic over. They
//! are monomorphized at compile time everywhere they drive the hot fold
//! paths (node construction, insert, descent); dynamic dispatch is only
//! acceptable at configuration boundaries, which here means nowhere at
//! all, since `Tree<I, S, E>` captures everything as static type
//! parameters. See the `TreeIndex`/`TreeMetrics` split in the teacher's
//! `content-tree` crate for the precedent of pushing this to generics
//! rather than trait objects.

use std::fmt::Debug;

/// An item held at a leaf position. Opaque to the core beyond its summary.
pub trait Item: Clone + Debug {
    type Summary: Summary;

    fn summary(&self) -> Self::Summary;
}

/// The base monoid `(S, ⊕, 0_S)` folded over items. Must be associative
/// with a two-sided identity; the core trusts this and never checks it.
pub trait Summary: Clone + Debug + PartialEq {
    fn zero() -> Self;

    /// `self ⊕ other`, written into `self`.
    fn add_summary(&mut self, other: &Self);
}

/// The optional parallel monoid `(E, ⊞, 0_E, fromItem)` (spec.md §3, §4.7).
///
/// A tree is either configured with an extension or not; when it isn't,
/// callers use [`NoExtension`] as a zero-cost placeholder.
pub trait Extension<I: Item>: Clone + Debug + PartialEq {
    /// Stable identifier for this extension's semantics. The only
    /// cross-tree compatibility key `concat` checks (spec.md §4.5,
    /// §4.7). Must be non-empty whenever [`Extension::is_configured`]
    /// is `true` (enforced at `Tree::new`).
    fn magic_id() -> &'static str;

    fn zero() -> Self;

    /// Projects one item (plus its already-computed base summary) into
    /// extension space.
    fn from_item(item: &I, item_summary: &I::Summary) -> Self;

    /// `self ⊞ other`, written into `self`.
    fn add_extension(&mut self, other: &Self);

    /// Whether a tree built with this `E` should report an extension as
    /// present (spec.md §4.7 `ext()`). `true` for every real extension;
    /// [`NoExtension`] is the only type that overrides this to `false`.
    ///
    /// Kept separate from "`magic_id` is non-empty" so that a caller who
    /// writes a real extension and forgets to give it a `MAGIC_ID` is
    /// rejected by `Tree::new` (spec.md §6) instead of being silently
    /// treated the same as "no extension configured".
    fn is_configured() -> bool {
        true
    }
}

/// Marker for trees with no extension configured. Zero-cost: folding it
/// is a no-op, and [`Tree::ext`](crate::Tree::ext) reports `present =
/// false` whenever this type is in play.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoExtension;

impl<I: Item> Extension<I> for NoExtension {
    fn magic_id() -> &'static str { "" }
    fn zero() -> Self { NoExtension }
    fn from_item(_item: &I, _item_summary: &I::Summary) -> Self { NoExtension }
    fn add_extension(&mut self, _other: &Self) {}
    fn is_configured() -> bool {
        false
    }
}

/// A folder `(0_K, add: (K, S) → K, compare: (K, K) → Ordering)` over a
/// source summary type `Source`, used to turn a target value into an item
/// index during cursor descent (spec.md §4.6).
///
/// `Source` is `S` for a base-summary dimension, or `E` for an extension
/// dimension — an "Extension dimension" in spec.md's terms is simply
/// `Dimension<E>` rather than `Dimension<S>`, the same trait with a
/// different summary type folded in.
pub trait Dimension<Source>: Copy + Debug {
    /// The accumulator type `K`.
    type Value: Clone + Debug;

    fn zero() -> Self::Value;

    /// Folds `acc` forward by one `Source` value (a whole subtree's
    /// cached summary, or a single item's contribution at a leaf).
    /// Accumulation is strictly left-to-right by item index (spec.md
    /// §4.6).
    fn add(acc: &Self::Value, next: &Source) -> Self::Value;

    /// Ordering of `lhs` relative to `rhs`. Descent recurses into the
    /// first child where the accumulator-plus-child-summary would reach
    /// or exceed the target.
    fn compare(lhs: &Self::Value, rhs: &Self::Value) -> std::cmp::Ordering;
}
