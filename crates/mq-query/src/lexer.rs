//! Logos-based lexer for object-query text.
//!
//! Keywords are not separate token kinds: every identifier-shaped run of
//! characters lexes as [`Token::Word`] and the parser asks [`Keyword::from_word`]
//! whether it is reserved. This keeps keyword matching case-insensitive while
//! entity and field names stay case-sensitive.

use logos::Logos;
use std::ops::Range;

use crate::error::{QueryError, Result};

/// Token types recognized by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token<'src> {
    /// Identifier or keyword (e.g. `SELECT`, `m`, `menuName`, `Menu`).
    #[regex(r"[\p{L}_][\p{L}\p{N}_]*")]
    Word(&'src str),

    /// Unsigned integer literal.
    #[regex(r"[0-9]+")]
    Integer(&'src str),

    /// Unsigned decimal literal with a fractional part.
    #[regex(r"[0-9]+\.[0-9]+")]
    Decimal(&'src str),

    /// Single-quoted string literal; `''` inside the quotes is an escaped quote.
    #[regex(r"'([^']|'')*'")]
    Str(&'src str),

    /// Named parameter such as `:menuCode`.
    #[regex(r":[\p{L}_][\p{L}\p{N}_]*")]
    NamedParam(&'src str),

    /// Positional parameter such as `?1`.
    #[regex(r"\?[0-9]+")]
    PositionalParam(&'src str),

    #[token(".")]
    Dot,

    #[token(",")]
    Comma,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("*")]
    Star,

    #[token("-")]
    Minus,

    #[token("=")]
    Eq,

    #[token("<>")]
    #[token("!=")]
    NotEq,

    #[token("<")]
    Lt,

    #[token("<=")]
    LtEq,

    #[token(">")]
    Gt,

    #[token(">=")]
    GtEq,
}

/// Byte span in the query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

/// A token together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

/// Reserved words of the query language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Select,
    Distinct,
    From,
    As,
    Where,
    And,
    Or,
    Not,
    In,
    Like,
    Escape,
    Between,
    Is,
    Null,
    Order,
    By,
    Asc,
    Desc,
}

impl Keyword {
    /// Classify a word, ignoring ASCII case.
    pub fn from_word(word: &str) -> Option<Self> {
        const TABLE: &[(&str, Keyword)] = &[
            ("SELECT", Keyword::Select),
            ("DISTINCT", Keyword::Distinct),
            ("FROM", Keyword::From),
            ("AS", Keyword::As),
            ("WHERE", Keyword::Where),
            ("AND", Keyword::And),
            ("OR", Keyword::Or),
            ("NOT", Keyword::Not),
            ("IN", Keyword::In),
            ("LIKE", Keyword::Like),
            ("ESCAPE", Keyword::Escape),
            ("BETWEEN", Keyword::Between),
            ("IS", Keyword::Is),
            ("NULL", Keyword::Null),
            ("ORDER", Keyword::Order),
            ("BY", Keyword::By),
            ("ASC", Keyword::Asc),
            ("DESC", Keyword::Desc),
        ];
        TABLE
            .iter()
            .find(|(text, _)| text.eq_ignore_ascii_case(word))
            .map(|(_, kw)| *kw)
    }
}

impl Token<'_> {
    /// The keyword this token spells, if any.
    pub fn keyword(&self) -> Option<Keyword> {
        match self {
            Token::Word(w) => Keyword::from_word(w),
            _ => None,
        }
    }
}

/// Split query text into lexemes.
pub fn tokenize(input: &str) -> Result<Vec<Lexeme<'_>>> {
    let mut lexemes = Vec::new();
    for (result, range) in Token::lexer(input).spanned() {
        match result {
            Ok(token) => lexemes.push(Lexeme {
                token,
                span: range.into(),
            }),
            Err(()) => {
                let snippet = &input[range.clone()];
                let message = if snippet.starts_with('\'') {
                    "unterminated string literal".to_string()
                } else {
                    format!("unexpected character {snippet:?}")
                };
                return Err(QueryError::syntax(range.start, message));
            }
        }
    }
    Ok(lexemes)
}

/// Strip the quotes from a string literal token and collapse `''` escapes.
pub fn unquote(raw: &str) -> String {
    raw[1..raw.len() - 1].replace("''", "'")
}
