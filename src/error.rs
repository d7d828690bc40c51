//! Error types for the three analysis layers.
//!
//! Each layer reports through its own contract:
//!
//! - [`LexError`]: no DFA transition at a token boundary. Tokenization fails as a whole.
//! - [`ValidationError`]: one structural heuristic failed. Carried inside a
//!   [`ValidationResult`](crate::validator::ValidationResult) and never blocks a parse.
//! - [`SyntaxError`]: terminal mismatch or missing table entry. The parser halts rejected.
use thiserror::Error;

use crate::parser::grammar::{NonTerminal, Terminal};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected character {found:?} at offset {offset}")]
pub struct LexError {
    /// Byte offset of the token boundary where no pattern matched.
    pub offset: usize,
    pub found: char,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// The stack top is a terminal that differs from the lookahead.
    #[error("expected '{expected}' but found '{found}' at token {position}")]
    Mismatch {
        expected: Terminal,
        found: Terminal,
        position: usize,
    },
    /// The parse table has no entry for the stack top and the lookahead.
    #[error("no rule for {nonterminal} on '{lookahead}' at token {position}")]
    NoRule {
        nonterminal: NonTerminal,
        lookahead: Terminal,
        position: usize,
    },
}

impl SyntaxError {
    /// Index of the lookahead token when the parser halted.
    pub fn position(&self) -> usize {
        match self {
            SyntaxError::Mismatch { position, .. } | SyntaxError::NoRule { position, .. } => {
                *position
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Empty expression")]
    Empty,

    #[error("Unmatched closing parenthesis ')'")]
    UnmatchedClose,

    #[error("Unmatched opening parenthesis '('")]
    UnmatchedOpen,

    #[error("Adjacent operators '{0}{1}' are not allowed")]
    AdjacentOperators(String, String),

    #[error("Expression cannot start with operator '{0}'")]
    LeadingOperator(String),

    #[error("Expression cannot end with operator '{0}'")]
    TrailingOperator(String),

    #[error("Unary operator '{0}' must be enclosed in parentheses, e.g., ({0}3)")]
    UnaryOutsideParens(String),
}
