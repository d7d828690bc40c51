use std::fmt;

use serde::Serialize;

/// Kinds an accepting DFA state can carry.
///
/// The ordering of a kind type decides which candidate wins when one DFA state
/// accepts for several kinds: the smallest one.
pub trait TokenType: Copy + Ord + fmt::Debug {
    /// Kinds that are scanned but never emitted (whitespace).
    fn is_skipped(&self) -> bool;
    /// Kind of the synthetic token appended after the last real token.
    fn end_of_input() -> Self;
}

/// Token kinds of the expression language, in declaration order.
///
/// `Eof` is ordinal 0 and is only ever produced by the scanner itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TokenKind {
    Eof,
    Id,
    Number,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Whitespace,
}

impl TokenKind {
    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Eof => "$",
            TokenKind::Id => "ID",
            TokenKind::Number => "NUMBER",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Whitespace => "WS",
        }
    }

    /// `+ - * /`
    pub fn is_binary_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash
        )
    }

    pub fn is_sign(&self) -> bool {
        matches!(self, TokenKind::Plus | TokenKind::Minus)
    }
}

impl TokenType for TokenKind {
    fn is_skipped(&self) -> bool {
        matches!(self, TokenKind::Whitespace)
    }

    fn end_of_input() -> Self {
        TokenKind::Eof
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token<TokenType> {
    pub kind: TokenType,
    pub lexeme: String,
    /// Byte offset of the lexeme in the scanned text.
    pub offset: usize,
}

impl<TokenType> Token<TokenType> {
    pub fn new(kind: TokenType, lexeme: impl Into<String>, offset: usize) -> Token<TokenType> {
        Token { kind, lexeme: lexeme.into(), offset }
    }
}

impl fmt::Display for Token<TokenKind> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Id | TokenKind::Number => write!(f, "{}({})", self.kind, self.lexeme),
            _ => write!(f, "{}", self.kind),
        }
    }
}
