// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Binary clustering of wide sibling lists.
//!
//! The reducer deletes sub-trees by binary search, so a node with `N`
//! children costs `N` probes while a balanced binary tree over the same
//! children costs `log₂ N`. This pass rebalances every over-wide child
//! list, bottom-up, into synthetic groups of at most [`BIN_SIZE`].

use crate::entity::{Entity, EntityArena, EntityId, Tree};

/// Maximum children per entity after clustering.
const BIN_SIZE: usize = 2;

/// Rebalances the whole tree in place.
///
/// After this pass every entity has at most [`BIN_SIZE`] children. The
/// in-order text of the tree is unchanged - clustering only inserts
/// synthetic wrappers.
pub fn optimize(tree: &mut Tree) {
    cluster(&mut tree.arena, tree.root);
}

fn cluster(arena: &mut EntityArena, id: EntityId) {
    let mut children = std::mem::take(&mut arena[id].children);
    for &child in &children {
        cluster(arena, child);
    }

    while children.len() > BIN_SIZE {
        let len = children.len();
        let size = if len >= 2 * BIN_SIZE {
            BIN_SIZE
        } else {
            (len + 1).div_ceil(2)
        };
        let bins = len / size;
        let remainder = len - bins * size;

        // Rewrite back to front so earlier indices stay valid.
        if remainder > 1 {
            bin(arena, &mut children, bins * size, remainder);
        }
        for k in (0..bins).rev() {
            bin(arena, &mut children, k * size, size);
        }
    }
    arena[id].children = children;
}

/// Replaces `children[start..start + len]` with one synthetic group.
fn bin(arena: &mut EntityArena, children: &mut Vec<EntityId>, start: usize, len: usize) {
    let slice: Vec<EntityId> = children[start..start + len].to_vec();
    let group = arena.alloc(Entity {
        children: slice,
        ..Entity::default()
    });
    children.splice(start..start + len, [group]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::TokenKind;

    fn leaf_list(arena: &mut EntityArena, n: usize) -> EntityId {
        let children: Vec<EntityId> = (0..n)
            .map(|i| arena.alloc(Entity::leaf(format!("x{i};"), TokenKind::Other)))
            .collect();
        arena.alloc(Entity {
            children,
            ..Entity::default()
        })
    }

    fn max_width(arena: &EntityArena, id: EntityId) -> usize {
        let e = &arena[id];
        e.children
            .iter()
            .map(|&c| max_width(arena, c))
            .max()
            .unwrap_or(0)
            .max(e.children.len())
    }

    fn depth(arena: &EntityArena, id: EntityId) -> usize {
        1 + arena[id]
            .children
            .iter()
            .map(|&c| depth(arena, c))
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn wide_lists_become_binary() {
        for n in [0, 1, 2, 3, 4, 5, 7, 16, 33] {
            let mut arena = EntityArena::new();
            let root = leaf_list(&mut arena, n);
            let expected = arena.text_of(root);
            let mut tree = Tree { arena, root };
            tree.optimize();
            assert!(
                max_width(&tree.arena, tree.root) <= BIN_SIZE,
                "width for n={n}"
            );
            assert_eq!(tree.reassemble(), expected, "text for n={n}");
        }
    }

    #[test]
    fn clustering_depth_is_logarithmic() {
        let mut arena = EntityArena::new();
        let root = leaf_list(&mut arena, 64);
        let mut tree = Tree { arena, root };
        tree.optimize();
        // 64 leaves in a binary tree: depth 7 (root + 6 levels of groups),
        // plus the leaf level itself.
        assert!(depth(&tree.arena, tree.root) <= 8);
    }

    #[test]
    fn optimize_is_idempotent() {
        let mut arena = EntityArena::new();
        let root = leaf_list(&mut arena, 9);
        let mut tree = Tree { arena, root };
        tree.optimize();
        let once = tree.reassemble();
        let count = tree.arena.len();
        tree.optimize();
        assert_eq!(tree.reassemble(), once);
        assert_eq!(tree.arena.len(), count, "no new groups on a second run");
    }

    #[test]
    fn narrow_lists_are_untouched() {
        let mut arena = EntityArena::new();
        let root = leaf_list(&mut arena, 2);
        let before = arena.len();
        let mut tree = Tree { arena, root };
        tree.optimize();
        assert_eq!(tree.arena.len(), before);
        assert_eq!(tree.arena[tree.root].children.len(), 2);
    }
}
