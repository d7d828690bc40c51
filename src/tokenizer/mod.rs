mod nfa;
pub mod dfa;
pub mod token;
pub mod tokenizer;

pub use crate::tokenizer::dfa::{Alphabet, DFAState, DFA};
pub use crate::tokenizer::nfa::{Fragment, Label, NFAEdge, NFAState, NFA};
pub use crate::tokenizer::token::{Token, TokenKind, TokenType};
pub use crate::tokenizer::tokenizer::{build_expr_nfa, get_expr_tokenizer};
