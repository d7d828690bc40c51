//! Structural pre-checks over a token sequence.
//!
//! These heuristics run independently of the LL(1) parser and may disagree with
//! it: the grammar derives `-3` through `F -> - F`, while the unary check below
//! rejects a sign outside parentheses. Both behaviours are kept.
use serde::Serialize;
use tracing::debug;

use crate::error::ValidationError;
use crate::tokenizer::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: String,
    /// Index of the offending token in the checked sequence.
    pub index: Option<usize>,
    #[serde(skip)]
    pub error: Option<ValidationError>,
}

impl ValidationResult {
    fn ok() -> Self {
        ValidationResult { valid: true, message: String::new(), index: None, error: None }
    }

    fn fail(error: ValidationError, index: usize) -> Self {
        ValidationResult {
            valid: false,
            message: error.to_string(),
            index: Some(index),
            error: Some(error),
        }
    }
}

type Check = Result<(), (ValidationError, usize)>;

/// Runs the checks in order (empty, parentheses, adjacency, placement, unary)
/// and reports the first failure.
pub fn validate(tokens: &[Token<TokenKind>]) -> ValidationResult {
    let checks = check_not_empty(tokens)
        .and_then(|_| check_balanced_parentheses(tokens))
        .and_then(|_| check_adjacent_operators(tokens))
        .and_then(|_| check_operator_placement(tokens))
        .and_then(|_| check_unary_operators_in_parens(tokens));
    match checks {
        Ok(()) => ValidationResult::ok(),
        Err((error, index)) => {
            debug!(index, %error, "validation failed");
            ValidationResult::fail(error, index)
        }
    }
}

fn is_real(token: &Token<TokenKind>) -> bool {
    !matches!(token.kind, TokenKind::Eof | TokenKind::Whitespace)
}

/// Indices of every token that is neither whitespace nor end of input.
fn real_tokens(tokens: &[Token<TokenKind>]) -> impl Iterator<Item = (usize, &Token<TokenKind>)> {
    tokens.iter().enumerate().filter(|(_, t)| is_real(t))
}

fn check_not_empty(tokens: &[Token<TokenKind>]) -> Check {
    match real_tokens(tokens).next() {
        Some(_) => Ok(()),
        None => Err((ValidationError::Empty, 0)),
    }
}

fn check_balanced_parentheses(tokens: &[Token<TokenKind>]) -> Check {
    let mut balance = 0_i32;
    let mut first_open = None;
    for (idx, token) in real_tokens(tokens) {
        match token.kind {
            TokenKind::LParen => {
                balance += 1;
                first_open.get_or_insert(idx);
            }
            TokenKind::RParen => {
                balance -= 1;
                if balance < 0 {
                    return Err((ValidationError::UnmatchedClose, idx));
                }
            }
            _ => {}
        }
    }
    match first_open {
        Some(idx) if balance > 0 => Err((ValidationError::UnmatchedOpen, idx)),
        _ => Ok(()),
    }
}

fn check_adjacent_operators(tokens: &[Token<TokenKind>]) -> Check {
    let real: Vec<_> = real_tokens(tokens).collect();
    for pair in real.windows(2) {
        let (idx, current) = pair[0];
        let (_, next) = pair[1];
        if current.kind.is_binary_operator() && next.kind.is_binary_operator() {
            return Err((
                ValidationError::AdjacentOperators(current.lexeme.clone(), next.lexeme.clone()),
                idx,
            ));
        }
    }
    Ok(())
}

/// A leading `-` is left to the unary check.
fn check_operator_placement(tokens: &[Token<TokenKind>]) -> Check {
    let Some((first_idx, first)) = real_tokens(tokens).next() else {
        return Err((ValidationError::Empty, 0));
    };
    if matches!(first.kind, TokenKind::Plus | TokenKind::Star | TokenKind::Slash) {
        return Err((ValidationError::LeadingOperator(first.lexeme.clone()), first_idx));
    }
    if let Some((last_idx, last)) = real_tokens(tokens).last() {
        if last.kind.is_binary_operator() {
            return Err((ValidationError::TrailingOperator(last.lexeme.clone()), last_idx));
        }
    }
    Ok(())
}

/// A sign is unary when it comes first or right after an operator or `(`;
/// unary signs are only accepted inside parentheses.
fn check_unary_operators_in_parens(tokens: &[Token<TokenKind>]) -> Check {
    let mut depth = 0_i32;
    let mut prev: Option<TokenKind> = None;
    for (idx, token) in real_tokens(tokens) {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => depth -= 1,
            kind if kind.is_sign() => {
                let unary = match prev {
                    None => true,
                    Some(p) => p.is_binary_operator() || p == TokenKind::LParen,
                };
                if unary && depth == 0 {
                    return Err((ValidationError::UnaryOutsideParens(token.lexeme.clone()), idx));
                }
            }
            _ => {}
        }
        prev = Some(token.kind);
    }
    Ok(())
}
