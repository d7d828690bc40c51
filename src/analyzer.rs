use lazy_static::lazy_static;
use tracing::debug;

use crate::error::{LexError, SyntaxError};
use crate::parser::{Grammar, Parser};
use crate::tokenizer::{build_expr_nfa, get_expr_tokenizer, Token, TokenKind, DFA, NFA};
use crate::validator::{self, ValidationResult};

/// The automata and grammar, built once and shared read-only by every analysis.
#[derive(Debug, Clone)]
pub struct Analyzer {
    nfa: NFA<TokenKind>,
    dfa: DFA<TokenKind>,
    grammar: Grammar,
}

/// Outcome of running every layer over one input.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub tokens: Vec<Token<TokenKind>>,
    pub validation: ValidationResult,
    pub parse: Result<(), SyntaxError>,
}

impl Analysis {
    /// Both the structural checks and the parser accepted.
    pub fn accepted(&self) -> bool {
        self.validation.valid && self.parse.is_ok()
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        let nfa = build_expr_nfa();
        let dfa = get_expr_tokenizer(&nfa);
        let grammar = Grammar::expression();
        debug!(
            nfa_states = nfa.state_count(),
            dfa_states = dfa.state_count(),
            rules = grammar.rules().len(),
            "analyzer ready"
        );
        Analyzer { nfa, dfa, grammar }
    }

    pub fn nfa(&self) -> &NFA<TokenKind> {
        &self.nfa
    }

    pub fn dfa(&self) -> &DFA<TokenKind> {
        &self.dfa
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn tokenize(&self, text: &str) -> Result<Vec<Token<TokenKind>>, LexError> {
        self.dfa.tokenize(text)
    }

    pub fn validate(&self, tokens: &[Token<TokenKind>]) -> ValidationResult {
        validator::validate(tokens)
    }

    /// A fresh parser positioned before the first token, for stepping.
    pub fn parser(&self, tokens: &[Token<TokenKind>]) -> Parser<'_> {
        Parser::new(&self.grammar, tokens)
    }

    pub fn parse_all(&self, tokens: &[Token<TokenKind>]) -> Result<(), SyntaxError> {
        self.parser(tokens).parse_all()
    }

    /// Tokenize, then validate and parse independently. A lexical error stops
    /// everything; validation failures never prevent the parse.
    pub fn analyze(&self, text: &str) -> Result<Analysis, LexError> {
        let tokens = self.tokenize(text)?;
        let validation = self.validate(&tokens);
        let parse = self.parse_all(&tokens);
        Ok(Analysis { tokens, validation, parse })
    }
}

lazy_static! {
    static ref ANALYZER: Analyzer = Analyzer::new();
}

/// Process-wide analyzer, built on first use.
pub fn analyzer() -> &'static Analyzer {
    &ANALYZER
}
