// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The entity tree: labelled slices of source with ordered children.
//!
//! An [`Entity`] is the sole node type of the splitter's output. The
//! in-order concatenation of `head`, each child and `tail` reproduces the
//! slice of source the entity stands for, so the reducer can delete any
//! sub-tree and reassemble valid-looking text from what remains.
//!
//! Entities live in an [`EntityArena`] and reference each other through
//! copyable [`EntityId`] handles. Ownership flows strictly parent→child
//! via `children`; `dependencies` are identity references with no
//! ownership, so a dropped tree needs no cycle breaking.
//!
//! # Invariants
//!
//! 1. `head ++ children… ++ tail` equals the entity's source range
//!    (modulo explicit comment stripping).
//! 2. `token == TokenKind::None` iff the entity was synthesised by
//!    grouping rather than produced by a terminal token.
//! 3. `is_pair` implies exactly two children.
//! 4. `filename` is non-empty only on file roots.
//! 5. `dependencies` never contain ids outside the tree.

use ecow::EcoString;

use crate::source_analysis::TokenKind;

/// A handle to an [`Entity`] in its [`EntityArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(u32);

impl EntityId {
    /// Returns the arena index of this handle.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A contiguous slice of source annotated with a structural role.
///
/// Fields are public in the manner of an AST node: the splitter fills
/// everything up to post-processing, after which only the reducer-owned
/// fields (`removed`, `id`, `descendants`) change.
#[derive(Debug, Clone, Default)]
pub struct Entity {
    /// Text preceding the children (the whole text for a leaf).
    pub head: EcoString,
    /// Ordered sub-entities.
    pub children: Vec<EntityId>,
    /// Text following the children (e.g. `}` or `;`).
    pub tail: EcoString,
    /// Path relative to the load root (`/`-separated); file roots only.
    pub filename: EcoString,
    /// The full file text; file roots only.
    pub contents: EcoString,
    /// The lexical token that produced this entity, if any.
    pub token: TokenKind,
    /// Marks an entity wrapping a brace-paired statement.
    pub is_pair: bool,
    /// Forbids removal of this entity itself (children may still go).
    pub no_remove: bool,
    /// Reducer state: whether this entity is currently removed.
    pub removed: bool,
    /// Entities whose removal must imply this one's removal.
    pub dependencies: Vec<EntityId>,
    /// Reducer diagnostic: stable numbering assigned during reduction.
    pub id: usize,
    /// Reducer diagnostic: cached live-descendant count.
    pub descendants: usize,
}

impl Entity {
    /// Creates an empty entity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a childless entity holding `head`.
    #[must_use]
    pub fn leaf(head: impl Into<EcoString>, token: TokenKind) -> Self {
        Self {
            head: head.into(),
            token,
            ..Self::default()
        }
    }

    /// A short diagnostic label: `"Pair"`, the operator text, or empty.
    #[must_use]
    pub fn comment(&self) -> EcoString {
        if self.is_pair {
            EcoString::from("Pair")
        } else {
            self.token.op_text()
        }
    }
}

/// Flat storage for every entity of one loaded tree.
#[derive(Debug, Default)]
pub struct EntityArena {
    entities: Vec<Entity>,
}

impl EntityArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entities allocated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if no entity has been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Stores an entity and returns its handle.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "trees with over 4 billion entities are not supported"
    )]
    pub fn alloc(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.entities.len() as u32);
        self.entities.push(entity);
        id
    }

    /// Iterates over every allocated handle.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "alloc already bounds the entity count"
    )]
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        (0..self.entities.len()).map(|i| EntityId(i as u32))
    }

    /// Wraps `entities` in a fresh synthetic entity, unless the list
    /// already has at most one element, which is returned unchanged.
    pub fn group(&mut self, entities: Vec<EntityId>) -> Vec<EntityId> {
        if entities.len() <= 1 {
            return entities;
        }
        let group = self.alloc(Entity {
            children: entities,
            ..Entity::default()
        });
        vec![group]
    }

    /// Appends the in-order text of `id` to `out`.
    pub fn write_text(&self, id: EntityId, out: &mut String) {
        let entity = &self[id];
        out.push_str(&entity.head);
        for &child in &entity.children {
            self.write_text(child, out);
        }
        out.push_str(&entity.tail);
    }

    /// Returns the in-order text of `id`.
    #[must_use]
    pub fn text_of(&self, id: EntityId) -> String {
        let mut out = String::new();
        self.write_text(id, &mut out);
        out
    }
}

impl std::ops::Index<EntityId> for EntityArena {
    type Output = Entity;

    fn index(&self, id: EntityId) -> &Entity {
        &self.entities[id.index()]
    }
}

impl std::ops::IndexMut<EntityId> for EntityArena {
    fn index_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.entities[id.index()]
    }
}

/// A complete loaded tree: an arena plus its root entity.
#[derive(Debug)]
pub struct Tree {
    /// Storage for every entity of the tree.
    pub arena: EntityArena,
    /// The root entity (a file root, or a directory root with file
    /// children).
    pub root: EntityId,
}

impl Tree {
    /// Returns the in-order concatenation of the whole tree.
    ///
    /// For a freshly loaded file this equals the file bytes, or the bytes
    /// with comments removed when stripping was enabled.
    #[must_use]
    pub fn reassemble(&self) -> String {
        self.arena.text_of(self.root)
    }

    /// Rebalances wide child lists into binary clusters; see
    /// [`crate::cluster::optimize`].
    pub fn optimize(&mut self) {
        crate::cluster::optimize(self);
    }
}

impl std::ops::Index<EntityId> for Tree {
    type Output = Entity;

    fn index(&self, id: EntityId) -> &Entity {
        &self.arena[id]
    }
}

impl std::ops::IndexMut<EntityId> for Tree {
    fn index_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.arena[id]
    }
}
