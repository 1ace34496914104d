// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Post-processing passes over a freshly parsed entity tree.
//!
//! The raw tree out of the scope parser is correct but clumsy: synthetic
//! wrappers abound, idiomatic constructs (`if`/`else`, `try`/`catch`,
//! `signature { body }`) are still flat sibling runs, and binary operators
//! sit apart from their operands. The passes here run bottom-up and, on
//! each sibling list, in a fixed order:
//!
//! 1. **simplify** - drop empty synthetic wrappers, inline single-child
//!    ones, and flatten one-child postfix statements into `{head, tail}`
//!    leaves.
//! 2. **dependency** - restructure around the median binary separator and
//!    link its right operand group so that removing the operator cascades
//!    to the operand.
//! 3. **block keywords** - attach each block keyword to its argument and
//!    body entities.
//! 4. **block statements** - merge `if`/`else`, `do`/`while` and
//!    `try`/`catch`/`finally` runs into single groups.
//! 5. **pairs** - discover `signature { body }` pairings between statement
//!    boundaries.
//!
//! Re-running the pipeline reproduces the same tree shape: the only pass
//! that re-fires, block-statement grouping, wraps a list that the parent's
//! simplify immediately inlines again.

use crate::entity::{EntityArena, EntityId};

use super::token::{Op, SeparatorKind, TokenKind};

/// Runs every pass over `entities`, children first.
pub(crate) fn post_process(arena: &mut EntityArena, entities: &mut Vec<EntityId>) {
    for index in 0..entities.len() {
        let id = entities[index];
        let mut children = std::mem::take(&mut arena[id].children);
        post_process(arena, &mut children);
        arena[id].children = children;
    }
    simplify(arena, entities);
    link_dependencies(arena, entities);
    group_block_keywords(arena, entities);
    group_block_statements(arena, entities);
    form_pairs(arena, entities);
}

/// Removes pointless wrappers, to a fixed point.
///
/// A synthetic entity (no token, no head/tail, no dependencies) with no
/// children disappears; with one child it is replaced by that child. A
/// postfix separator whose only content is a bare leaf absorbs the leaf's
/// text as its own head - this is what turns `a` + `;` into the flat
/// `{head: "a", tail: ";"}` statement the reducer likes to delete. Binary
/// separators keep their collected operands for the dependency pass.
fn simplify(arena: &mut EntityArena, entities: &mut Vec<EntityId>) {
    let mut changed = true;
    while changed {
        changed = false;
        let mut index = entities.len();
        while index > 0 {
            index -= 1;
            let id = entities[index];
            let entity = &arena[id];

            let synthetic = entity.token == TokenKind::None
                && entity.head.is_empty()
                && entity.tail.is_empty()
                && entity.dependencies.is_empty();
            if synthetic {
                match entity.children.len() {
                    0 => {
                        entities.remove(index);
                        changed = true;
                        continue;
                    }
                    1 => {
                        entities[index] = entity.children[0];
                        changed = true;
                        continue;
                    }
                    _ => {}
                }
            }

            if entity.token.separator() == SeparatorKind::Postfix
                && entity.head.is_empty()
                && entity.children.len() == 1
            {
                let child_id = entity.children[0];
                let child = &arena[child_id];
                if child.children.is_empty()
                    && child.tail.is_empty()
                    && child.dependencies.is_empty()
                    && !child.no_remove
                {
                    let head = child.head.clone();
                    arena[id].head = head;
                    arena[id].children.clear();
                    changed = true;
                }
            }
        }
    }
}

/// Splits a sibling list at its median binary separator and records the
/// removal dependency between the operator and its right operand.
///
/// The list becomes `[group(left ++ operands ++ op), right]`, and `right`
/// remembers `op` in its `dependencies`: if the reducer removes the
/// operator, the now-dangling right operand goes with it. The left side
/// needs no edge - the operator lives inside the left group, so removing
/// that group removes the operator structurally.
fn link_dependencies(arena: &mut EntityArena, entities: &mut Vec<EntityId>) {
    if entities.len() < 2 {
        return;
    }

    let points: Vec<usize> = entities
        .iter()
        .enumerate()
        .filter(|&(_, &id)| {
            arena[id].token.separator() == SeparatorKind::Binary
                && !arena[id].children.is_empty()
        })
        .map(|(index, _)| index)
        .collect();
    let Some(&median) = points.get(points.len() / 2) else {
        return;
    };

    let separator = entities[median];
    let operands = std::mem::take(&mut arena[separator].children);

    let mut left: Vec<EntityId> = entities[..median].to_vec();
    left.extend(arena.group(operands));
    left.push(separator);

    let right_items: Vec<EntityId> = entities[median + 1..].to_vec();
    let right = arena.group(right_items);
    if let Some(&target) = right.first() {
        arena[target].dependencies.push(separator);
    }

    let mut replacement = arena.group(left);
    replacement.extend(right);
    *entities = replacement;

    // The rewrite built fresh groups; give their child lists the same
    // treatment.
    for index in 0..entities.len() {
        let id = entities[index];
        let mut children = std::mem::take(&mut arena[id].children);
        link_dependencies(arena, &mut children);
        arena[id].children = children;
    }
}

/// Attaches each block keyword to its optional `(...)` argument and its
/// body entity, marking the result as a pair.
fn group_block_keywords(arena: &mut EntityArena, entities: &mut Vec<EntityId>) {
    let mut index = 0;
    while index < entities.len() {
        let keyword = arena[entities[index]]
            .token
            .as_op()
            .is_some_and(Op::is_block_keyword);
        if keyword {
            let mut next = index + 1;
            if next < entities.len()
                && arena[entities[next]].token == TokenKind::Op(Op::LeftParen)
            {
                next += 1;
            }
            if next < entities.len() {
                next += 1;
            }
            if next > index + 1 {
                let inner: Vec<EntityId> = entities[index..next - 1].to_vec();
                let mut parts = arena.group(inner);
                parts.push(entities[next - 1]);
                let grouped = arena.group(parts);
                if let Some(&id) = grouped.first() {
                    arena[id].is_pair = true;
                }
                entities.splice(index..next, grouped);
            }
        }
        index += 1;
    }
}

/// Merges adjacent keyword-led groups into higher-order statements:
/// `if [else]`, `do [while]`, `try catch* [finally]`, and the fallback of
/// one slot plus any run of contract clauses (`in`/`out`/`body`).
fn group_block_statements(arena: &mut EntityArena, entities: &mut Vec<EntityId>) {
    let mut index = 0;
    while index < entities.len() {
        let mut next = index;
        if consume(arena, entities, &mut next, &[Op::If, Op::StaticIf]) {
            consume(arena, entities, &mut next, &[Op::Else]);
        } else if consume(arena, entities, &mut next, &[Op::Do]) {
            consume(arena, entities, &mut next, &[Op::While]);
        } else if consume(arena, entities, &mut next, &[Op::Try]) {
            while consume(arena, entities, &mut next, &[Op::Catch]) {}
            consume(arena, entities, &mut next, &[Op::Finally]);
        } else {
            next += 1;
            while consume(arena, entities, &mut next, &[Op::In, Op::Out, Op::Body]) {}
        }

        if next > index + 1 && next <= entities.len() {
            let slice: Vec<EntityId> = entities[index..next].to_vec();
            let grouped = arena.group(slice);
            entities.splice(index..next, grouped);
        }
        index += 1;
    }
}

/// Advances `cursor` over one slot iff it holds a keyword group led by one
/// of `ops` - a synthetic entity with exactly two children whose first
/// child's first token matches.
fn consume(arena: &EntityArena, entities: &[EntityId], cursor: &mut usize, ops: &[Op]) -> bool {
    let Some(&id) = entities.get(*cursor) else {
        return false;
    };
    let entity = &arena[id];
    if entity.token != TokenKind::None || entity.children.len() != 2 {
        return false;
    }
    let first = first_token(arena, entity.children[0]);
    if ops.iter().any(|&op| first == TokenKind::Op(op)) {
        *cursor += 1;
        true
    } else {
        false
    }
}

/// The token of the leftmost token-bearing descendant.
fn first_token(arena: &EntityArena, id: EntityId) -> TokenKind {
    let entity = &arena[id];
    if entity.token != TokenKind::None {
        return entity.token;
    }
    match entity.children.first() {
        Some(&child) => first_token(arena, child),
        None => TokenKind::None,
    }
}

/// Discovers `signature { body }` pairings without syntactic knowledge.
///
/// Walks the list tracking the last statement boundary; a `{` entity pairs
/// everything since that boundary with itself. `;` entities advance the
/// boundary, so separate statements never leak into a following pair.
fn form_pairs(arena: &mut EntityArena, entities: &mut Vec<EntityId>) {
    let mut boundary = 0;
    let mut index = 0;
    while index < entities.len() {
        match arena[entities[index]].token {
            TokenKind::Op(Op::Semicolon) => {
                boundary = index + 1;
                index += 1;
            }
            TokenKind::Op(Op::LeftBrace) => {
                if index >= boundary + 1 {
                    let signature: Vec<EntityId> = entities[boundary..index].to_vec();
                    let mut parts = arena.group(signature);
                    parts.push(entities[index]);
                    let grouped = arena.group(parts);
                    if let Some(&id) = grouped.first() {
                        arena[id].is_pair = true;
                    }
                    entities.splice(boundary..=index, grouped);
                    index = boundary + 1;
                    boundary = index;
                } else {
                    boundary = index + 1;
                    index += 1;
                }
            }
            _ => index += 1,
        }
    }
}
