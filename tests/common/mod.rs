//! Shared byte/line summary type used by the end-to-end scenarios in
//! spec.md §8. Lives under `tests/` because spec.md scopes text-oriented
//! summary types out of the core crate itself (§1 "Out of scope").

use sumtree::{Dimension, Extension, Item, Summary};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextSummary {
    pub bytes: u64,
    pub lines: u64,
}

impl Summary for TextSummary {
    fn zero() -> Self {
        TextSummary { bytes: 0, lines: 0 }
    }

    fn add_summary(&mut self, other: &Self) {
        self.bytes += other.bytes;
        self.lines += other.lines;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk(pub String);

impl Chunk {
    pub fn new(s: &str) -> Self {
        Chunk(s.to_string())
    }
}

impl Item for Chunk {
    type Summary = TextSummary;

    fn summary(&self) -> TextSummary {
        TextSummary {
            bytes: self.0.len() as u64,
            lines: self.0.matches('\n').count() as u64,
        }
    }
}

/// Extension: plain byte count, kept in parallel to `TextSummary::bytes`
/// so the tests can exercise both a base-summary cursor and an
/// extension cursor over the same input (spec.md §8 scenario 4 vs the
/// extension-presence assertions in scenarios 1-3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ByteExt(pub u64);

impl Extension<Chunk> for ByteExt {
    fn magic_id() -> &'static str {
        "ext:bytes"
    }

    fn zero() -> Self {
        ByteExt(0)
    }

    fn from_item(_item: &Chunk, item_summary: &TextSummary) -> Self {
        ByteExt(item_summary.bytes)
    }

    fn add_extension(&mut self, other: &Self) {
        self.0 += other.0;
    }
}

/// A second, incompatible extension config used only to exercise
/// `IncompatibleExtension` (spec.md §8 scenario 6, §9 (ii)).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OtherExt(pub u64);

impl Extension<Chunk> for OtherExt {
    fn magic_id() -> &'static str {
        "ext:other"
    }

    fn zero() -> Self {
        OtherExt(0)
    }

    fn from_item(_item: &Chunk, item_summary: &TextSummary) -> Self {
        OtherExt(item_summary.bytes)
    }

    fn add_extension(&mut self, other: &Self) {
        self.0 += other.0;
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ByteDim;

impl Dimension<TextSummary> for ByteDim {
    type Value = u64;

    fn zero() -> u64 {
        0
    }

    fn add(acc: &u64, next: &TextSummary) -> u64 {
        acc + next.bytes
    }

    fn compare(lhs: &u64, rhs: &u64) -> std::cmp::Ordering {
        lhs.cmp(rhs)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LineDim;

impl Dimension<TextSummary> for LineDim {
    type Value = u64;

    fn zero() -> u64 {
        0
    }

    fn add(acc: &u64, next: &TextSummary) -> u64 {
        acc + next.lines
    }

    fn compare(lhs: &u64, rhs: &u64) -> std::cmp::Ordering {
        lhs.cmp(rhs)
    }
}

pub fn chunks(strs: &[&str]) -> Vec<Chunk> {
    strs.iter().map(|s| Chunk::new(s)).collect()
}
