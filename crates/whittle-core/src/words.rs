// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Plain word splitting, for files with no recognised syntax.
//!
//! Unlike the D-aware splitter in
//! [`source_analysis::lexer`](crate::source_analysis::lexer), this variant
//! knows nothing about strings or comments: it slices text at word/non-word
//! transitions, one entity per `(word, trailing junk)` pair. Useful for
//! reducing identifiers in config files, or any text where the reducer
//! should try deleting words.

use crate::entity::{Entity, EntityArena, EntityId};
use crate::source_analysis::is_word_byte;
use crate::source_analysis::TokenKind;

/// Splits `text` into word entities.
///
/// Each entity's `head` is a maximal run of word characters
/// (`[A-Za-z0-9_]`) and its `tail` the non-word run that follows. Text
/// before the first word becomes an entity with an empty head. The
/// concatenation of all entities reproduces `text` exactly.
pub fn parse_to_words(arena: &mut EntityArena, text: &str) -> Vec<EntityId> {
    let bytes = text.as_bytes();
    let mut entities = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let word_start = pos;
        while pos < bytes.len() && is_word_byte(bytes[pos]) {
            pos += 1;
        }
        let word_end = pos;
        while pos < bytes.len() && !is_word_byte(bytes[pos]) {
            pos += 1;
        }
        let mut entity = Entity::leaf(&text[word_start..word_end], TokenKind::Other);
        entity.tail = text[word_end..pos].into();
        entities.push(arena.alloc(entity));
    }
    entities
}
