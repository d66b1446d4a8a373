//! `Debug` for [`Tree`](crate::Tree).
//!
//! Mirrors the teacher's `content-tree::debug::DebugContent`: rather than
//! dumping the raw node shape (which would bury the thing a reader
//! actually wants, the item sequence, under nesting), this prints a flat
//! list built from the same iterator `for_each_item`/`Iter` walk.

use std::fmt;

use crate::summary::{Extension, Item};
use crate::Tree;

impl<I: Item, E: Extension<I>> fmt::Debug for Tree<I, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.len())
            .field("height", &self.height())
            .field("items", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}
