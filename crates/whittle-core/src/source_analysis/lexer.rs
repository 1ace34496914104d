// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical scanning for D source text.
//!
//! This is not a conformant D lexer: it recognises exactly enough lexical
//! structure (string and comment flavours, the operator/keyword table) to
//! split source into plausible slices. It is hand-written for full
//! control over error recovery.
//!
//! # Design principles
//!
//! - **Never fail**: malformed input is tokenised as [`TokenKind::Other`];
//!   reaching end-of-input mid-token truncates the token and subsequent
//!   reads return [`TokenKind::End`]. The reducer routinely feeds this
//!   lexer source that it is itself breaking.
//! - **Byte-indexed**: all scanning is on raw bytes. The only concession
//!   to UTF-8 is that the catch-all advances a whole character, so spans
//!   always slice cleanly.
//!
//! # Example
//!
//! ```
//! use whittle_core::source_analysis::{Lexer, TokenKind};
//!
//! let mut lexer = Lexer::new("a + b");
//! assert_eq!(lexer.skip_token_or_ws(), TokenKind::Other); // a
//! assert_eq!(lexer.skip_token_or_ws(), TokenKind::Whitespace);
//! ```

use crate::entity::{Entity, EntityArena, EntityId};

use super::token::is_word_byte;
use super::{Op, Span, TokenKind};

/// The `@`-words consumed as single tokens. Matched by prefix, without a
/// word-boundary check.
const AT_WORDS: &[&str] = &["@disable", "@property", "@safe", "@trusted", "@system"];

/// A cursor over an immutable source buffer.
///
/// Each call to [`Lexer::skip_token_or_ws`] advances past exactly one
/// token; [`Lexer::read_token`] folds leading whitespace and comments into
/// the returned span. A fresh lexer is used per parse - the cursor lives
/// on the instance, never in a global.
pub struct Lexer<'src> {
    source: &'src str,
    pos: usize,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("pos", &self.pos)
            .field("remaining", &self.source.get(self.pos..).unwrap_or(""))
            .finish()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer over the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { source, pos: 0 }
    }

    /// Returns the current byte position.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Extracts the source text for a span.
    #[must_use]
    pub fn text_for(&self, span: Span) -> &'src str {
        &self.source[span.as_range()]
    }

    fn rest(&self) -> &'src [u8] {
        &self.source.as_bytes()[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + n).copied()
    }

    /// Advances one byte. Only used where the current byte is known ASCII.
    fn bump(&mut self) {
        self.pos += 1;
    }

    /// Advances one full character, keeping the cursor on a UTF-8 boundary.
    fn bump_char(&mut self) {
        match self.source[self.pos..].chars().next() {
            Some(c) => self.pos += c.len_utf8(),
            None => self.pos = self.source.len(),
        }
    }

    fn bump_while(&mut self, predicate: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.bump();
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Advances past exactly one token and returns its kind.
    ///
    /// First match wins: literals, comments, `@`-words and `#`-lines are
    /// checked before the operator table; the table before whitespace and
    /// word runs.
    pub fn skip_token_or_ws(&mut self) -> TokenKind {
        let Some(b) = self.peek() else {
            return TokenKind::End;
        };
        match b {
            b'\'' => self.lex_char_literal(),
            // A naked escaped string, D1-style: the backslash and the
            // escaped character lex as one token.
            b'\\' => {
                self.bump();
                if !self.at_end() {
                    self.bump_char();
                }
                TokenKind::Other
            }
            b'"' => self.lex_string(),
            b'r' if self.peek_at(1) == Some(b'"') => self.lex_raw_string(),
            b'`' => self.lex_wysiwyg_string(),
            b'/' if self.peek_at(1) == Some(b'/') => self.lex_line_comment(),
            b'/' if self.peek_at(1) == Some(b'*') => self.lex_block_comment(),
            b'/' if self.peek_at(1) == Some(b'+') => self.lex_nested_comment(),
            b'@' => self.lex_at_word(),
            b'#' => self.lex_hash_line(),
            _ => {
                if let Some(op) = Op::longest_match(self.rest()) {
                    self.pos += op.text().len();
                    TokenKind::Op(op)
                } else if b.is_ascii_whitespace() {
                    self.bump_while(|b| b.is_ascii_whitespace());
                    TokenKind::Whitespace
                } else if is_word_byte(b) {
                    self.bump_while(is_word_byte);
                    TokenKind::Other
                } else {
                    self.bump_char();
                    TokenKind::Other
                }
            }
        }
    }

    /// `'x'` or `'\x'`; tolerates a missing closing quote.
    fn lex_char_literal(&mut self) -> TokenKind {
        self.bump(); // '
        if self.peek() == Some(b'\\') {
            self.bump();
            if !self.at_end() {
                self.bump_char();
            }
        }
        while let Some(b) = self.peek() {
            if b == b'\'' {
                self.bump();
                break;
            }
            self.bump_char();
        }
        TokenKind::Other
    }

    /// `"..."` with backslash escapes.
    fn lex_string(&mut self) -> TokenKind {
        self.bump(); // "
        loop {
            match self.peek() {
                None => break,
                Some(b'\\') => {
                    self.bump();
                    if !self.at_end() {
                        self.bump_char();
                    }
                }
                Some(b'"') => {
                    self.bump();
                    break;
                }
                Some(_) => self.bump_char(),
            }
        }
        TokenKind::Other
    }

    /// `r"..."` - no escapes, ends at the next quote.
    fn lex_raw_string(&mut self) -> TokenKind {
        self.bump(); // r
        self.bump(); // "
        while let Some(b) = self.peek() {
            if b == b'"' {
                self.bump();
                break;
            }
            self.bump_char();
        }
        TokenKind::Other
    }

    /// `` `...` `` - no escapes, ends at the next backtick.
    fn lex_wysiwyg_string(&mut self) -> TokenKind {
        self.bump(); // `
        while let Some(b) = self.peek() {
            if b == b'`' {
                self.bump();
                break;
            }
            self.bump_char();
        }
        TokenKind::Other
    }

    /// `// ...` to the end of the line (the newline is not consumed).
    fn lex_line_comment(&mut self) -> TokenKind {
        self.bump(); // /
        self.bump(); // /
        while self.peek().is_some_and(|b| b != b'\n') {
            self.bump_char();
        }
        TokenKind::Comment
    }

    /// `/* ... */`; unterminated input degrades to `Other`.
    fn lex_block_comment(&mut self) -> TokenKind {
        self.bump(); // /
        self.bump(); // *
        loop {
            match self.peek() {
                None => return TokenKind::Other,
                Some(b'*') if self.peek_at(1) == Some(b'/') => {
                    self.bump();
                    self.bump();
                    return TokenKind::Comment;
                }
                Some(_) => self.bump_char(),
            }
        }
    }

    /// `/+ ... +/` with nesting; unterminated input degrades to `Other`.
    fn lex_nested_comment(&mut self) -> TokenKind {
        self.bump(); // /
        self.bump(); // +
        let mut depth = 1usize;
        loop {
            match self.peek() {
                None => return TokenKind::Other,
                Some(b'/') if self.peek_at(1) == Some(b'+') => {
                    self.bump();
                    self.bump();
                    depth += 1;
                }
                Some(b'+') if self.peek_at(1) == Some(b'/') => {
                    self.bump();
                    self.bump();
                    depth -= 1;
                    if depth == 0 {
                        return TokenKind::Comment;
                    }
                }
                Some(_) => self.bump_char(),
            }
        }
    }

    /// `@safe` and friends as single tokens; a lone `@` is a single token.
    fn lex_at_word(&mut self) -> TokenKind {
        for word in AT_WORDS {
            if self.rest().starts_with(word.as_bytes()) {
                self.pos += word.len();
                return TokenKind::Other;
            }
        }
        self.bump();
        TokenKind::Other
    }

    /// `#...` to the end of the line, honouring `\` line continuations.
    fn lex_hash_line(&mut self) -> TokenKind {
        self.bump(); // #
        loop {
            match self.peek() {
                None | Some(b'\n') => break,
                Some(b'\\') => {
                    self.bump();
                    if !self.at_end() {
                        self.bump_char();
                    }
                }
                Some(_) => self.bump_char(),
            }
        }
        TokenKind::Other
    }

    /// Reads the next significant token.
    ///
    /// Whitespace and comments are skipped but remain part of the returned
    /// span, as does the trailing whitespace run up to and including the
    /// first newline - a statement keeps its own line ending, but not the
    /// indentation of the next.
    pub fn read_token(&mut self) -> (TokenKind, Span) {
        let start = self.pos;
        let kind = loop {
            let kind = self.skip_token_or_ws();
            if !matches!(kind, TokenKind::Whitespace | TokenKind::Comment) {
                break kind;
            }
        };
        while let Some(b) = self.peek() {
            match b {
                b'\n' => {
                    self.bump();
                    break;
                }
                b' ' | b'\t' | b'\r' => self.bump(),
                _ => break,
            }
        }
        (kind, Span::from(start..self.pos))
    }
}

/// Returns a copy of `source` with all comment tokens elided.
///
/// Every non-comment span is preserved verbatim, so the result is exactly
/// the input minus its comments. Unterminated block comments lex as
/// [`TokenKind::Other`] and therefore survive.
#[must_use]
pub fn strip_comments(source: &str) -> String {
    let mut lexer = Lexer::new(source);
    let mut out = String::with_capacity(source.len());
    loop {
        let start = lexer.pos();
        let kind = lexer.skip_token_or_ws();
        if kind.is_end() {
            break;
        }
        if kind != TokenKind::Comment {
            out.push_str(&source[start..lexer.pos()]);
        }
    }
    out
}

/// Splits source into word-level entities using the D lexer.
///
/// Every `Other` token becomes its own entity; runs of operators,
/// whitespace and comments accumulate on the previous entity's tail, so
/// the reducer can try deleting identifiers and literals one by one. A
/// file that opens with non-word tokens gets a placeholder entity with an
/// empty head to carry them.
pub fn parse_to_words(arena: &mut EntityArena, source: &str) -> Vec<EntityId> {
    let mut lexer = Lexer::new(source);
    let mut entities: Vec<EntityId> = Vec::new();
    loop {
        let start = lexer.pos();
        let kind = lexer.skip_token_or_ws();
        let span = &source[start..lexer.pos()];
        match kind {
            TokenKind::End => break,
            TokenKind::Other => {
                entities.push(arena.alloc(Entity::leaf(span, TokenKind::Other)));
            }
            _ => {
                let last = match entities.last() {
                    Some(&id) => id,
                    None => {
                        let id = arena.alloc(Entity::leaf("", TokenKind::Other));
                        entities.push(id);
                        id
                    }
                };
                arena[last].tail.push_str(span);
            }
        }
    }
    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lexes the whole input, returning `(kind, text)` pairs.
    fn lex_all(source: &str) -> Vec<(TokenKind, &str)> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let start = lexer.pos();
            let kind = lexer.skip_token_or_ws();
            if kind.is_end() {
                break;
            }
            tokens.push((kind, &source[start..lexer.pos()]));
        }
        tokens
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex_all(source).into_iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn empty_input_is_end() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.skip_token_or_ws(), TokenKind::End);
        assert_eq!(lexer.skip_token_or_ws(), TokenKind::End);
    }

    #[test]
    fn words_operators_and_whitespace() {
        let tokens = lex_all("foo + bar2");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Other, "foo"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Op(Op::Plus), "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Other, "bar2"),
            ]
        );
    }

    #[test]
    fn spans_tile_the_input() {
        let source = "int f() { return x != 0; } // done";
        let text: String = lex_all(source).into_iter().map(|(_, t)| t).collect();
        assert_eq!(text, source);
    }

    #[test]
    fn string_flavours() {
        assert_eq!(kinds(r#""a\"b""#), vec![TokenKind::Other]);
        assert_eq!(kinds(r#"r"a\""#), vec![TokenKind::Other]);
        assert_eq!(kinds("`a\\`"), vec![TokenKind::Other]);
        // The raw-string prefix only fires with an immediate quote.
        assert_eq!(
            kinds("rx"),
            vec![TokenKind::Other],
            "identifier starting with r is a word"
        );
    }

    #[test]
    fn char_literals() {
        assert_eq!(kinds("'a'"), vec![TokenKind::Other]);
        assert_eq!(kinds(r"'\''"), vec![TokenKind::Other]);
        assert_eq!(kinds(r"'\n'x"), vec![TokenKind::Other, TokenKind::Other]);
    }

    #[test]
    fn naked_backslash_consumes_one_character() {
        let tokens = lex_all(r"\n x");
        assert_eq!(tokens[0], (TokenKind::Other, r"\n"));
    }

    #[test]
    fn comment_flavours() {
        assert_eq!(kinds("// line"), vec![TokenKind::Comment]);
        assert_eq!(kinds("/* block */"), vec![TokenKind::Comment]);
        assert_eq!(kinds("/+ a /+ b +/ c +/"), vec![TokenKind::Comment]);
        // Line comments stop before the newline.
        let tokens = lex_all("// c\nx");
        assert_eq!(tokens[0], (TokenKind::Comment, "// c"));
    }

    #[test]
    fn unterminated_tokens_degrade_to_other() {
        assert_eq!(kinds("\"abc"), vec![TokenKind::Other]);
        assert_eq!(kinds("/* abc"), vec![TokenKind::Other]);
        assert_eq!(kinds("/+ a /+ b +/"), vec![TokenKind::Other]);
        assert_eq!(kinds("`abc"), vec![TokenKind::Other]);
        assert_eq!(kinds("'a"), vec![TokenKind::Other]);
    }

    #[test]
    fn at_words_and_lone_at() {
        let tokens = lex_all("@safe x");
        assert_eq!(tokens[0], (TokenKind::Other, "@safe"));
        let tokens = lex_all("@ x");
        assert_eq!(tokens[0], (TokenKind::Other, "@"));
    }

    #[test]
    fn hash_lines_honour_continuations() {
        let tokens = lex_all("#line 1 \\\n2\nx");
        assert_eq!(tokens[0], (TokenKind::Other, "#line 1 \\\n2"));
        assert_eq!(tokens.last().map(|&(_, t)| t), Some("x"));
    }

    #[test]
    fn keyword_matching_respects_boundaries() {
        assert_eq!(kinds("interface"), vec![TokenKind::Other]);
        assert_eq!(
            kinds("in x"),
            vec![
                TokenKind::Op(Op::In),
                TokenKind::Whitespace,
                TokenKind::Other
            ]
        );
        assert_eq!(kinds("static if"), vec![TokenKind::Op(Op::StaticIf)]);
        // Two spaces break the two-word token into plain words.
        assert_eq!(
            kinds("static  if"),
            vec![
                TokenKind::Other,
                TokenKind::Whitespace,
                TokenKind::Op(Op::If)
            ]
        );
    }

    #[test]
    fn longest_operator_wins() {
        assert_eq!(kinds(">>>="), vec![TokenKind::Op(Op::UshrAssign)]);
        assert_eq!(
            kinds(">> >"),
            vec![
                TokenKind::Op(Op::Shr),
                TokenKind::Whitespace,
                TokenKind::Op(Op::Greater)
            ]
        );
    }

    #[test]
    fn read_token_folds_trivia_and_trailing_newline() {
        let source = "a;\n    b; // end\n";
        let mut lexer = Lexer::new(source);
        let (kind, span) = lexer.read_token();
        assert_eq!(kind, TokenKind::Other);
        assert_eq!(lexer.text_for(span), "a");
        // The statement keeps its own line ending, but not the
        // indentation of the next line.
        let (kind, span) = lexer.read_token();
        assert_eq!(kind, TokenKind::Op(Op::Semicolon));
        assert_eq!(lexer.text_for(span), ";\n");
        let (kind, span) = lexer.read_token();
        assert_eq!(kind, TokenKind::Other);
        assert_eq!(lexer.text_for(span), "    b");
        // Trailing-whitespace folding stops short of a comment; the
        // comment becomes leading trivia of whatever follows.
        let (kind, span) = lexer.read_token();
        assert_eq!(kind, TokenKind::Op(Op::Semicolon));
        assert_eq!(lexer.text_for(span), "; ");
        let (kind, span) = lexer.read_token();
        assert_eq!(kind, TokenKind::End);
        assert_eq!(lexer.text_for(span), "// end\n");
    }

    #[test]
    fn read_token_at_eof_carries_leftover_trivia() {
        let mut lexer = Lexer::new("  \n");
        let (kind, span) = lexer.read_token();
        assert_eq!(kind, TokenKind::End);
        assert_eq!(lexer.text_for(span), "  \n");
    }

    #[test]
    fn strip_comments_elides_only_comments() {
        assert_eq!(strip_comments("a /* b */ c"), "a  c");
        assert_eq!(strip_comments("// gone\nx"), "\nx");
        assert_eq!(strip_comments("/+ a /+ b +/ c +/"), "");
        // Strings that look like comments are untouched.
        assert_eq!(strip_comments("\"// not\""), "\"// not\"");
        // Unterminated comments are `Other`, so they survive.
        assert_eq!(strip_comments("/* open"), "/* open");
    }

    #[test]
    fn strip_comments_is_idempotent() {
        let source = "int x; // c\n/* d */ y;";
        let once = strip_comments(source);
        assert_eq!(strip_comments(&once), once);
    }

    #[test]
    fn parse_to_words_keeps_every_byte() {
        let mut arena = EntityArena::new();
        let source = "int foo(bar) { return 1; }";
        let ids = parse_to_words(&mut arena, source);
        let text: String = ids
            .iter()
            .map(|&id| format!("{}{}", arena[id].head, arena[id].tail))
            .collect();
        assert_eq!(text, source);
        // One entity per word.
        let heads: Vec<_> = ids.iter().map(|&id| arena[id].head.as_str()).collect();
        assert_eq!(heads, vec!["int", "foo", "bar", "return", "1"]);
    }

    #[test]
    fn parse_to_words_leading_junk_gets_a_placeholder() {
        let mut arena = EntityArena::new();
        let ids = parse_to_words(&mut arena, "+= x");
        assert_eq!(ids.len(), 2);
        assert_eq!(arena[ids[0]].head, "");
        assert_eq!(arena[ids[0]].tail, "+= ");
        assert_eq!(arena[ids[1]].head, "x");
    }
}
