//! Strict, test-time-only invariant checker (spec.md §4.8).
//!
//! Grounded on the teacher's `content-tree::root::check`/`check_leaf`/
//! `check_internal`, adapted to a tree with no parent pointers: instead
//! of checking each node's stored parent pointer, this walks down from
//! the root validating occupancy, uniform depth, and that every node's
//! cached summaries equal the fold recomputed from its own children.

use crate::error::TreeError;
use crate::node::{Node, BASE, MAX_CHILDREN, MAX_LEAF_ITEMS};
use crate::summary::{Extension, Item, Summary};

pub(crate) fn check<I, E>(root: Option<&Node<I, E>>, height: usize) -> Result<(), TreeError>
where
    I: Item,
    E: Extension<I>,
{
    match root {
        None => {
            if height != 0 {
                return Err(TreeError::InvariantViolation("empty tree must report height 0"));
            }
            Ok(())
        }
        Some(root) => {
            if height != root.height() {
                return Err(TreeError::InvariantViolation("tree height does not match root height"));
            }
            match root {
                Node::Leaf(l) => {
                    if l.items.is_empty() {
                        return Err(TreeError::InvariantViolation("non-empty tree has an empty root leaf"));
                    }
                }
                Node::Inner(n) => {
                    if n.children.len() < 2 {
                        return Err(TreeError::InvariantViolation("root inner node has fewer than 2 children"));
                    }
                }
            }
            check_node(root, true)
        }
    }
}

fn check_node<I, E>(node: &Node<I, E>, is_root: bool) -> Result<(), TreeError>
where
    I: Item,
    E: Extension<I>,
{
    match node {
        Node::Leaf(l) => {
            if !is_root {
                if l.items.len() < BASE {
                    return Err(TreeError::InvariantViolation("non-root leaf below BASE occupancy"));
                }
            }
            if l.items.len() > MAX_LEAF_ITEMS {
                return Err(TreeError::InvariantViolation("leaf above MAX_LEAF_ITEMS occupancy"));
            }

            let mut summary = I::Summary::zero();
            let mut ext = E::zero();
            for item in l.items.iter() {
                let s = item.summary();
                ext.add_extension(&E::from_item(item, &s));
                summary.add_summary(&s);
            }
            if summary != l.summary {
                return Err(TreeError::InvariantViolation("leaf cached summary does not match its items"));
            }
            if ext != l.ext {
                return Err(TreeError::InvariantViolation("leaf cached extension does not match its items"));
            }
            Ok(())
        }
        Node::Inner(n) => {
            if !is_root && n.children.len() < BASE {
                return Err(TreeError::InvariantViolation("non-root inner node below BASE occupancy"));
            }
            if n.children.len() > MAX_CHILDREN {
                return Err(TreeError::InvariantViolation("inner node above MAX_CHILDREN occupancy"));
            }

            let expected_height = n.height - 1;
            let mut summary = I::Summary::zero();
            let mut ext = E::zero();
            let mut count = 0usize;

            for (i, child) in n.children.iter().enumerate() {
                if child.height() != expected_height {
                    return Err(TreeError::InvariantViolation("children are not at a uniform height"));
                }
                check_node(child, false)?;

                if child.count() != n.child_counts[i] {
                    return Err(TreeError::InvariantViolation("cached child item count does not match child"));
                }
                count += child.count();
                summary.add_summary(child.summary());
                ext.add_extension(child.ext());
            }

            if count != n.count {
                return Err(TreeError::InvariantViolation("inner node cached item count does not match children"));
            }
            if summary != n.summary {
                return Err(TreeError::InvariantViolation("inner node cached summary does not match children"));
            }
            if ext != n.ext {
                return Err(TreeError::InvariantViolation("inner node cached extension does not match children"));
            }
            Ok(())
        }
    }
}
