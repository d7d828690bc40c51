pub mod grammar;
pub mod parser;

pub use crate::parser::grammar::{Grammar, NonTerminal, Rule, Symbol, Terminal};
pub use crate::parser::parser::{ParseStatus, ParseTrace, Parser, ParserSnapshot, Step, TraceEntry};
