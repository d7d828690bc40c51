//! Automata-based lexical and syntactic analysis of arithmetic expressions.
//!
//! Token patterns are composed into one NFA by Thompson's construction, turned
//! into a DFA by subset construction, and scanned with maximal munch. The token
//! stream is then checked by a table-driven LL(1) pushdown automaton and,
//! independently, by a set of structural heuristics.

pub mod analyzer;
pub mod error;
pub mod parser;
pub mod tokenizer;
pub mod validator;

pub use crate::analyzer::{analyzer, Analysis, Analyzer};
pub use crate::error::{LexError, SyntaxError, ValidationError};
pub use crate::validator::{validate, ValidationResult};
