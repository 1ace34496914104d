// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token kinds and the operator/keyword table.
//!
//! The splitter does not parse D; it only needs to recognise the tokens
//! that *separate* source into removable slices. Every recognised operator
//! or keyword is one [`Op`] variant, and the whole table - spelling,
//! separator category, precedence row, pair closers - is compile-time data
//! hung off `const fn`s on the enum.
//!
//! # Separator categories
//!
//! - **pair** - `{`, `[`, `(`: opens a nested scope, closed by its partner
//! - **prefix** - `import` and the block keywords: binds to what follows
//! - **postfix** - `;`: binds to what precedes
//! - **binary** - every other table entry: binds both sides, and induces a
//!   dependency between its operands
//! - **none** - closers and all unrecognised text
//!
//! # Precedence rows
//!
//! [`Op::precedence_row`] returns the split-priority row (0 = outermost
//! split, e.g. `;` and `{`; 20 = innermost, e.g. `(`). A handful of
//! spellings appear in more than one conceptual role in D (`&`, `*`, `in`,
//! …); the *first* row containing a spelling wins, so each `Op` has exactly
//! one row. Closers have none.

use ecow::EcoString;

/// Returns `true` for the characters that form words: `[A-Za-z0-9_]`.
#[must_use]
pub const fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// How a token separates the entities around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparatorKind {
    /// Opens a nested scope (`{`, `[`, `(`).
    Pair,
    /// Binds to the following entities (`import`, block keywords).
    Prefix,
    /// Binds to the preceding entities (`;`).
    Postfix,
    /// Binds both sides and links its operands (`+`, `,`, `=`, …).
    Binary,
    /// Not a separator.
    None,
}

/// One entry of the operator/keyword table.
///
/// Variants are grouped by role; the spelling of each is returned by
/// [`Op::text`]. The set is exactly what the splitter needs to build a
/// plausible tree - it is not the full D token grammar.
#[expect(missing_docs, reason = "variant names mirror their spellings")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    // Structure
    Semicolon,
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,

    // Keywords
    Import,
    Try,
    Catch,
    Finally,
    While,
    Do,
    In,
    Out,
    Body,
    If,
    StaticIf,
    Else,
    Is,
    NotIs,
    NotIn,

    // Operators
    DotDot,
    Comma,
    FatArrow,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    ModAssign,
    XorAssign,
    PowAssign,
    CatAssign,
    ShlAssign,
    ShrAssign,
    UshrAssign,
    Question,
    Colon,
    OrOr,
    AndAnd,
    Pipe,
    Caret,
    Amp,
    EqEq,
    NotEq,
    Greater,
    Less,
    GreaterEq,
    LessEq,
    NotGreater,
    NotLess,
    NotGreaterEq,
    NotLessEq,
    LessGreater,
    NotLessGreater,
    LessGreaterEq,
    NotLessGreaterEq,
    Shl,
    Shr,
    Ushr,
    Plus,
    Minus,
    Tilde,
    Star,
    Slash,
    Percent,
    Increment,
    Decrement,
    Pow,
    Dot,
    Bang,
}

/// Number of precedence rows in the split-priority table.
pub const PRECEDENCE_ROWS: usize = 21;

impl Op {
    /// Every table entry, for longest-match scanning.
    pub const ALL: &'static [Op] = &[
        Op::Semicolon,
        Op::LeftBrace,
        Op::RightBrace,
        Op::LeftParen,
        Op::RightParen,
        Op::LeftBracket,
        Op::RightBracket,
        Op::Import,
        Op::Try,
        Op::Catch,
        Op::Finally,
        Op::While,
        Op::Do,
        Op::In,
        Op::Out,
        Op::Body,
        Op::If,
        Op::StaticIf,
        Op::Else,
        Op::Is,
        Op::NotIs,
        Op::NotIn,
        Op::DotDot,
        Op::Comma,
        Op::FatArrow,
        Op::Assign,
        Op::AddAssign,
        Op::SubAssign,
        Op::MulAssign,
        Op::ModAssign,
        Op::XorAssign,
        Op::PowAssign,
        Op::CatAssign,
        Op::ShlAssign,
        Op::ShrAssign,
        Op::UshrAssign,
        Op::Question,
        Op::Colon,
        Op::OrOr,
        Op::AndAnd,
        Op::Pipe,
        Op::Caret,
        Op::Amp,
        Op::EqEq,
        Op::NotEq,
        Op::Greater,
        Op::Less,
        Op::GreaterEq,
        Op::LessEq,
        Op::NotGreater,
        Op::NotLess,
        Op::NotGreaterEq,
        Op::NotLessEq,
        Op::LessGreater,
        Op::NotLessGreater,
        Op::LessGreaterEq,
        Op::NotLessGreaterEq,
        Op::Shl,
        Op::Shr,
        Op::Ushr,
        Op::Plus,
        Op::Minus,
        Op::Tilde,
        Op::Star,
        Op::Slash,
        Op::Percent,
        Op::Increment,
        Op::Decrement,
        Op::Pow,
        Op::Dot,
        Op::Bang,
    ];

    /// The source spelling of this token.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Op::Semicolon => ";",
            Op::LeftBrace => "{",
            Op::RightBrace => "}",
            Op::LeftParen => "(",
            Op::RightParen => ")",
            Op::LeftBracket => "[",
            Op::RightBracket => "]",
            Op::Import => "import",
            Op::Try => "try",
            Op::Catch => "catch",
            Op::Finally => "finally",
            Op::While => "while",
            Op::Do => "do",
            Op::In => "in",
            Op::Out => "out",
            Op::Body => "body",
            Op::If => "if",
            Op::StaticIf => "static if",
            Op::Else => "else",
            Op::Is => "is",
            Op::NotIs => "!is",
            Op::NotIn => "!in",
            Op::DotDot => "..",
            Op::Comma => ",",
            Op::FatArrow => "=>",
            Op::Assign => "=",
            Op::AddAssign => "+=",
            Op::SubAssign => "-=",
            Op::MulAssign => "*=",
            Op::ModAssign => "%=",
            Op::XorAssign => "^=",
            Op::PowAssign => "^^=",
            Op::CatAssign => "~=",
            Op::ShlAssign => "<<=",
            Op::ShrAssign => ">>=",
            Op::UshrAssign => ">>>=",
            Op::Question => "?",
            Op::Colon => ":",
            Op::OrOr => "||",
            Op::AndAnd => "&&",
            Op::Pipe => "|",
            Op::Caret => "^",
            Op::Amp => "&",
            Op::EqEq => "==",
            Op::NotEq => "!=",
            Op::Greater => ">",
            Op::Less => "<",
            Op::GreaterEq => ">=",
            Op::LessEq => "<=",
            Op::NotGreater => "!>",
            Op::NotLess => "!<",
            Op::NotGreaterEq => "!>=",
            Op::NotLessEq => "!<=",
            Op::LessGreater => "<>",
            Op::NotLessGreater => "!<>",
            Op::LessGreaterEq => "<>=",
            Op::NotLessGreaterEq => "!<>=",
            Op::Shl => "<<",
            Op::Shr => ">>",
            Op::Ushr => ">>>",
            Op::Plus => "+",
            Op::Minus => "-",
            Op::Tilde => "~",
            Op::Star => "*",
            Op::Slash => "/",
            Op::Percent => "%",
            Op::Increment => "++",
            Op::Decrement => "--",
            Op::Pow => "^^",
            Op::Dot => ".",
            Op::Bang => "!",
        }
    }

    /// The separator category of this token.
    #[must_use]
    pub const fn separator(self) -> SeparatorKind {
        match self {
            Op::LeftBrace | Op::LeftBracket | Op::LeftParen => SeparatorKind::Pair,
            Op::Semicolon => SeparatorKind::Postfix,
            Op::Import
            | Op::Try
            | Op::Catch
            | Op::Finally
            | Op::While
            | Op::Do
            | Op::In
            | Op::Out
            | Op::Body
            | Op::If
            | Op::StaticIf
            | Op::Else => SeparatorKind::Prefix,
            Op::RightBrace | Op::RightParen | Op::RightBracket => SeparatorKind::None,
            _ => SeparatorKind::Binary,
        }
    }

    /// The split-priority row of this token, or `None` for closers.
    ///
    /// Row 0 splits outermost. Spellings that D reuses in several roles
    /// keep the row of their first (highest-priority) appearance.
    #[must_use]
    pub const fn precedence_row(self) -> Option<usize> {
        Some(match self {
            Op::Semicolon
            | Op::LeftBrace
            | Op::Try
            | Op::Catch
            | Op::Finally
            | Op::While
            | Op::Do
            | Op::In
            | Op::Out
            | Op::Body
            | Op::If
            | Op::StaticIf
            | Op::Else => 0,
            Op::Import => 1,
            Op::DotDot => 2,
            Op::Comma => 3,
            Op::FatArrow => 4,
            Op::Assign
            | Op::AddAssign
            | Op::SubAssign
            | Op::MulAssign
            | Op::ModAssign
            | Op::XorAssign
            | Op::PowAssign
            | Op::CatAssign
            | Op::ShlAssign
            | Op::ShrAssign
            | Op::UshrAssign => 5,
            Op::Question | Op::Colon => 6,
            Op::OrOr => 7,
            Op::AndAnd => 8,
            Op::Pipe => 9,
            Op::Caret => 10,
            Op::Amp => 11,
            Op::EqEq
            | Op::NotEq
            | Op::Greater
            | Op::Less
            | Op::GreaterEq
            | Op::LessEq
            | Op::NotGreater
            | Op::NotLess
            | Op::NotGreaterEq
            | Op::NotLessEq
            | Op::LessGreater
            | Op::NotLessGreater
            | Op::LessGreaterEq
            | Op::NotLessGreaterEq
            | Op::NotIn
            | Op::Is
            | Op::NotIs => 12,
            Op::Shl | Op::Shr | Op::Ushr => 13,
            Op::Plus | Op::Minus | Op::Tilde => 14,
            Op::Star | Op::Slash | Op::Percent => 15,
            Op::Increment | Op::Decrement => 16,
            Op::Pow => 17,
            Op::Dot => 18,
            Op::Bang => 19,
            Op::LeftParen | Op::LeftBracket => 20,
            Op::RightBrace | Op::RightParen | Op::RightBracket => return None,
        })
    }

    /// Returns `true` for the keywords that open block statements.
    #[must_use]
    pub const fn is_block_keyword(self) -> bool {
        matches!(
            self,
            Op::Try
                | Op::Catch
                | Op::Finally
                | Op::While
                | Op::Do
                | Op::In
                | Op::Out
                | Op::Body
                | Op::If
                | Op::StaticIf
                | Op::Else
        )
    }

    /// The closing token of a pair opener, or `None` for non-openers.
    #[must_use]
    pub const fn pair_closer(self) -> Option<Op> {
        match self {
            Op::LeftBrace => Some(Op::RightBrace),
            Op::LeftBracket => Some(Op::RightBracket),
            Op::LeftParen => Some(Op::RightParen),
            _ => None,
        }
    }

    /// Whether a match of this token must end at a word boundary.
    ///
    /// True for every spelling ending in a word character, so `in` does
    /// not match inside `int`, while `!=` may abut anything.
    #[must_use]
    pub fn requires_word_boundary(self) -> bool {
        self.text()
            .as_bytes()
            .last()
            .copied()
            .is_some_and(is_word_byte)
    }

    /// Finds the longest table entry matching the start of `rest`.
    ///
    /// `rest` is the unread remainder of the source. Keyword-like entries
    /// only match when the following byte (if any) is not a word
    /// character. Ties cannot occur: on equal spellings the longer match
    /// always wins, and spellings are unique.
    #[must_use]
    pub fn longest_match(rest: &[u8]) -> Option<Op> {
        let mut best: Option<Op> = None;
        for &op in Op::ALL {
            let text = op.text().as_bytes();
            if !rest.starts_with(text) {
                continue;
            }
            if op.requires_word_boundary() && rest.get(text.len()).copied().is_some_and(is_word_byte)
            {
                continue;
            }
            if best.is_none_or(|b| text.len() > b.text().len()) {
                best = Some(op);
            }
        }
        best
    }
}

/// The kind of a lexical token, as reported by the lexer.
///
/// `None` never comes from the lexer; it marks entities synthesised by
/// grouping rather than produced by a terminal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenKind {
    /// No token: the entity was synthesised by grouping.
    #[default]
    None,
    /// End of input. Subsequent reads keep returning `End`.
    End,
    /// A run of whitespace.
    Whitespace,
    /// A comment (`//`, `/* */` or nested `/+ +/`).
    Comment,
    /// Anything else: words, literals, unrecognised bytes.
    Other,
    /// An entry of the operator/keyword table.
    Op(Op),
}

impl TokenKind {
    /// Returns the separator category, `None` for non-operator tokens.
    #[must_use]
    pub const fn separator(self) -> SeparatorKind {
        match self {
            TokenKind::Op(op) => op.separator(),
            _ => SeparatorKind::None,
        }
    }

    /// Returns the contained operator, if any.
    #[must_use]
    pub const fn as_op(self) -> Option<Op> {
        match self {
            TokenKind::Op(op) => Some(op),
            _ => None,
        }
    }

    /// Returns `true` if this is the end-of-input marker.
    #[must_use]
    pub const fn is_end(self) -> bool {
        matches!(self, TokenKind::End)
    }

    /// The operator spelling, or an empty string for non-operator kinds.
    #[must_use]
    pub fn op_text(self) -> EcoString {
        match self {
            TokenKind::Op(op) => EcoString::from(op.text()),
            _ => EcoString::new(),
        }
    }
}
