// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the lexer and the round-trip laws.
//!
//! These use `proptest` to verify the invariants the reducer depends on:
//!
//! 1. **Lexing never panics** - arbitrary input always tokenises
//! 2. **Token spans tile the input** - concatenating spans reproduces it
//! 3. **`read_token` spans tile the input** - trivia folding loses nothing
//! 4. **`strip_comments` is idempotent** and removes every comment token
//! 5. **`reassemble(parse(s)) == s`** for arbitrary input
//! 6. **Parsing is deterministic** up to entity identity
//! 7. **`optimize` preserves text** and bounds fan-out

use proptest::prelude::*;

use crate::entity::{EntityArena, EntityId, Tree};
use crate::words;

use super::lexer::{parse_to_words, strip_comments, Lexer};
use super::parser::parse_source;
use super::token::TokenKind;

// ============================================================================
// Generators
// ============================================================================

/// Fragments of valid and broken D that exercise every lexical rule.
const FRAGMENTS: &[&str] = &[
    "int x;",
    "void f() { g(); }",
    "if (a > b) { c; } else { d; }",
    "try { x; } catch (E e) { y; } finally { z; }",
    "do { i++; } while (i < 10);",
    "import std.stdio;\n",
    "a = b + c * d;",
    "x <<= 2;",
    "auto s = \"str \\\" esc\";",
    "auto r = r\"raw\";",
    "auto w = `wysiwyg`;",
    "auto c = 'q';",
    "auto e = '\\'';",
    "// line comment\n",
    "/* block */",
    "/+ nested /+ deeper +/ +/",
    "@safe void f();",
    "#line 10\n",
    "in out body",
    "static if (x) { y; }",
    "a!b(c)[d]",
    "\"unterminated",
    "/* unterminated",
    "}}}",
    "((((",
    ";;;",
    "\\x",
    "é ü €",
];

/// Glue between fragments.
const SEPARATORS: &[&str] = &[" ", "\n", "\t", ""];

fn fragment() -> impl Strategy<Value = String> {
    prop::sample::select(FRAGMENTS).prop_map(std::string::ToString::to_string)
}

/// A few fragments glued together with assorted separators.
fn d_like_source() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(fragment(), 0..6),
        prop::sample::select(SEPARATORS),
    )
        .prop_map(|(parts, sep)| parts.join(sep))
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

fn shape(tree: &Tree, id: EntityId) -> String {
    let e = &tree.arena[id];
    let children: Vec<String> = e.children.iter().map(|&c| shape(tree, c)).collect();
    format!(
        "({:?} {:?} {:?} {} [{}])",
        e.head,
        e.tail,
        e.token,
        e.is_pair,
        children.join(" ")
    )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn lexing_never_panics(input in ".*") {
        let mut lexer = Lexer::new(&input);
        while !lexer.skip_token_or_ws().is_end() {}
    }

    #[test]
    fn token_spans_tile_arbitrary_input(input in ".*") {
        let mut lexer = Lexer::new(&input);
        let mut collected = String::new();
        loop {
            let start = lexer.pos();
            if lexer.skip_token_or_ws().is_end() {
                break;
            }
            prop_assert!(lexer.pos() > start, "lexer must make progress");
            collected.push_str(&input[start..lexer.pos()]);
        }
        prop_assert_eq!(collected, input);
    }

    #[test]
    fn read_token_spans_tile_d_like_input(input in d_like_source()) {
        let mut lexer = Lexer::new(&input);
        let mut collected = String::new();
        loop {
            let (kind, span) = lexer.read_token();
            collected.push_str(lexer.text_for(span));
            if kind.is_end() {
                break;
            }
        }
        prop_assert_eq!(collected, input);
    }

    #[test]
    fn strip_comments_is_idempotent_and_complete(input in d_like_source()) {
        let stripped = strip_comments(&input);
        prop_assert_eq!(strip_comments(&stripped), stripped.clone());

        let mut lexer = Lexer::new(&stripped);
        loop {
            let kind = lexer.skip_token_or_ws();
            if kind.is_end() {
                break;
            }
            prop_assert!(kind != TokenKind::Comment, "comment survived stripping");
        }
    }

    #[test]
    fn parse_round_trips_arbitrary_input(input in ".*") {
        prop_assert_eq!(parse_source(&input).reassemble(), input);
    }

    #[test]
    fn parse_round_trips_d_like_input(input in d_like_source()) {
        prop_assert_eq!(parse_source(&input).reassemble(), input);
    }

    #[test]
    fn parsing_is_deterministic(input in d_like_source()) {
        let a = parse_source(&input);
        let b = parse_source(&input);
        prop_assert_eq!(shape(&a, a.root), shape(&b, b.root));
    }

    #[test]
    fn optimize_preserves_text_and_bounds_width(input in d_like_source()) {
        let mut tree = parse_source(&input);
        let before = tree.reassemble();
        tree.optimize();
        prop_assert_eq!(tree.reassemble(), before);
        prop_assert!(max_width(&tree.arena, tree.root) <= 2);
    }

    #[test]
    fn word_splitters_round_trip(input in ".*") {
        let mut arena = EntityArena::new();
        let plain: String = words::parse_to_words(&mut arena, &input)
            .into_iter()
            .map(|id| arena.text_of(id))
            .collect();
        prop_assert_eq!(plain, input.clone());

        let mut arena = EntityArena::new();
        let lexed: String = parse_to_words(&mut arena, &input)
            .into_iter()
            .map(|id| arena.text_of(id))
            .collect();
        prop_assert_eq!(lexed, input);
    }
}
