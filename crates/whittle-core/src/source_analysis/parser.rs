// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The scope parser: a flat token stream in, a raw entity tree out.
//!
//! # Design
//!
//! The parser keeps one **level queue** per precedence row, plus a `text`
//! level at the bottom and a `zero` sentinel at the top. Ordinary tokens
//! accumulate at the `text` level. When a separator of row `n` arrives,
//! every queue finer than `n` is terminated (grouped and handed upward)
//! and becomes the separator's children. Lower-priority separators thus
//! naturally become ancestors of higher-priority ones, a shunting-yard
//! grouping that needs no grammar: removing a `;`-delimited statement or
//! one operand of `||` always removes a coherent source range.
//!
//! # Error tolerance
//!
//! The parser always produces a tree. A scope closer that never arrives
//! leaves the scope's `tail` empty; stray closers are carried as plain
//! text. This is load-bearing: the reducer feeds the parser source that
//! it is itself breaking.

use ecow::EcoString;

use crate::entity::{Entity, EntityArena, EntityId, Tree};

use super::lexer::Lexer;
use super::token::{Op, SeparatorKind, TokenKind, PRECEDENCE_ROWS};
use super::passes;

/// Sentinel level above every separator row.
const LEVEL_ZERO: usize = 0;
/// Level of precedence row 0; row `n` maps to `LEVEL_SEPARATOR0 + n`.
const LEVEL_SEPARATOR0: usize = 1;
/// Bottom level where plain text accumulates.
const LEVEL_TEXT: usize = LEVEL_SEPARATOR0 + PRECEDENCE_ROWS;
/// Total number of level queues.
const LEVEL_COUNT: usize = LEVEL_TEXT + 1;

struct ScopeParser<'a, 'src> {
    lexer: Lexer<'src>,
    arena: &'a mut EntityArena,
}

impl<'a, 'src> ScopeParser<'a, 'src> {
    fn new(arena: &'a mut EntityArena, source: &'src str) -> Self {
        Self {
            lexer: Lexer::new(source),
            arena,
        }
    }

    /// Terminates every queue finer than `level`: the accumulated entities
    /// are grouped level by level and returned in source order.
    fn terminate_level(&mut self, queues: &mut [Vec<EntityId>], level: usize) -> Vec<EntityId> {
        if level + 1 >= LEVEL_COUNT {
            return Vec::new();
        }
        let lower = self.terminate_level(queues, level + 1);
        let mut result = std::mem::take(&mut queues[level + 1]);
        result.extend(self.arena.group(lower));
        result
    }

    /// Parses one scope, consuming tokens until `scope_end` or the end of
    /// input. Returns the scope's children and its tail (the span of the
    /// matching closer, or empty when input ran out first).
    fn parse_scope(&mut self, scope_end: TokenKind) -> (Vec<EntityId>, EcoString) {
        let mut queues: Vec<Vec<EntityId>> = vec![Vec::new(); LEVEL_COUNT];

        loop {
            let (token, span) = self.lexer.read_token();
            let text = self.lexer.text_for(span);

            if token.is_end() || token == scope_end {
                let mut tail = EcoString::new();
                if token.is_end() {
                    // Trailing whitespace or comments with no token after
                    // them still belong to the tree.
                    if !text.is_empty() {
                        let leftover = self.arena.alloc(Entity::leaf(text, TokenKind::Other));
                        queues[LEVEL_TEXT].push(leftover);
                    }
                } else {
                    tail = text.into();
                }
                let children = self.terminate_level(&mut queues, LEVEL_ZERO);
                return (children, tail);
            }

            let mut level = LEVEL_TEXT;
            let mut entity = Entity {
                token,
                ..Entity::default()
            };
            if let Some(row) = token.as_op().and_then(Op::precedence_row) {
                level = LEVEL_SEPARATOR0 + row;
                entity.children = self.terminate_level(&mut queues, level);
            }

            match token.separator() {
                SeparatorKind::Pair | SeparatorKind::Prefix => {
                    let closer = token.as_op().and_then(Op::pair_closer);
                    if entity.children.is_empty() {
                        entity.head = text.into();
                        let id = self.arena.alloc(entity);
                        if let Some(closer) = closer {
                            let (children, tail) = self.parse_scope(TokenKind::Op(closer));
                            self.arena[id].children = children;
                            self.arena[id].tail = tail;
                        }
                        queues[level].push(id);
                    } else {
                        // Content was already pending: it becomes a plain
                        // container, and the separator itself goes into a
                        // second entity right after it.
                        entity.token = TokenKind::None;
                        let container = self.arena.alloc(entity);
                        let separator = self.arena.alloc(Entity::leaf(text, token));
                        if let Some(closer) = closer {
                            let (children, tail) = self.parse_scope(TokenKind::Op(closer));
                            self.arena[separator].children = children;
                            self.arena[separator].tail = tail;
                        }
                        queues[level].push(container);
                        queues[level].push(separator);
                    }
                }
                SeparatorKind::Postfix | SeparatorKind::Binary => {
                    entity.tail = text.into();
                    let id = self.arena.alloc(entity);
                    queues[level].push(id);
                }
                SeparatorKind::None => {
                    entity.head = text.into();
                    let id = self.arena.alloc(entity);
                    queues[level].push(id);
                }
            }
        }
    }
}

/// Parses D source into a post-processed list of top-level entities.
///
/// Never fails: malformed input yields a best-effort tree whose in-order
/// text still equals the input.
pub fn parse(arena: &mut EntityArena, source: &str) -> Vec<EntityId> {
    let mut children = {
        let mut parser = ScopeParser::new(arena, source);
        let (children, _tail) = parser.parse_scope(TokenKind::End);
        children
    };
    passes::post_process(arena, &mut children);
    children
}

/// Parses D source into a self-contained [`Tree`] under a synthetic root.
///
/// # Examples
///
/// ```
/// use whittle_core::source_analysis::parse_source;
///
/// let tree = parse_source("int x;\nint y;\n");
/// assert_eq!(tree.reassemble(), "int x;\nint y;\n");
/// ```
#[must_use]
pub fn parse_source(source: &str) -> Tree {
    let mut arena = EntityArena::new();
    let children = parse(&mut arena, source);
    let root = arena.alloc(Entity {
        children,
        ..Entity::default()
    });
    Tree { arena, root }
}
