//! Minimal item/summary/extension types shared by the `#[cfg(test)]`
//! modules throughout this crate, playing the same role as the
//! teacher's `content-tree::testrange::TestRange`.

#![cfg(test)]

use crate::summary::{Extension, Item, Summary};

/// The simplest possible item: a single unit of length 1, tagged with an
/// id so assertions can tell items apart after a mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Unit(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Count(pub u64);

impl Summary for Count {
    fn zero() -> Self {
        Count(0)
    }

    fn add_summary(&mut self, other: &Self) {
        self.0 += other.0;
    }
}

impl Item for Unit {
    type Summary = Count;

    fn summary(&self) -> Count {
        Count(1)
    }
}

/// A second extension doubling each item's id, to exercise coherence
/// between a base summary and a parallel extension in the same tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DoubleExt(pub u64);

impl Extension<Unit> for DoubleExt {
    fn magic_id() -> &'static str {
        "test:double"
    }

    fn zero() -> Self {
        DoubleExt(0)
    }

    fn from_item(item: &Unit, _item_summary: &Count) -> Self {
        DoubleExt(item.0 as u64 * 2)
    }

    fn add_extension(&mut self, other: &Self) {
        self.0 += other.0;
    }
}

/// `n` sequential units `Unit(0), Unit(1), ..., Unit(n-1)`.
pub(crate) fn seq(n: u32) -> Vec<Unit> {
    (0..n).map(Unit).collect()
}
