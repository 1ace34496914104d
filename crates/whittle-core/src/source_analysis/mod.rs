// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source analysis: lexing, scope parsing and tree refinement for D.
//!
//! # Lexing
//!
//! The [`Lexer`] walks raw bytes and reports one [`TokenKind`] per call.
//! It understands all D string and comment flavours but no grammar, and it
//! never fails - truncated tokens degrade to [`TokenKind::Other`].
//!
//! ```
//! use whittle_core::source_analysis::{Lexer, TokenKind};
//!
//! let mut lexer = Lexer::new("/+ nested /+ comment +/ +/");
//! assert_eq!(lexer.skip_token_or_ws(), TokenKind::Comment);
//! assert_eq!(lexer.skip_token_or_ws(), TokenKind::End);
//! ```
//!
//! # Parsing
//!
//! [`parse_source`] (and the arena-level [`parser::parse`]) builds the
//! refined entity tree: scope parsing by precedence level queues, then the
//! post-processing passes. The in-order text of the result always equals
//! the input.

pub mod lexer;
pub mod parser;
mod passes;
mod span;
mod token;

// Property-based tests for the lexer and the round-trip laws.
#[cfg(test)]
mod lexer_property_tests;

pub use lexer::{strip_comments, Lexer};
pub use parser::parse_source;
pub use span::Span;
pub use token::{is_word_byte, Op, SeparatorKind, TokenKind, PRECEDENCE_ROWS};
