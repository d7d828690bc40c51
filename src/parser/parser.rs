use serde::Serialize;
use tracing::trace;

use super::grammar::{Grammar, Symbol, Terminal};
use crate::error::SyntaxError;
use crate::tokenizer::{Token, TokenKind};

/// What one transition of the pushdown automaton did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Step {
    /// The stack top terminal equalled the lookahead; both were consumed.
    Matched(Terminal),
    /// The stack top nonterminal was replaced by the right side of this production.
    Expanded(usize),
    /// `$` on top of the stack and `$` as lookahead.
    Accepted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseStatus {
    Running,
    Accepted,
    Rejected(SyntaxError),
}

impl ParseStatus {
    pub fn name(&self) -> &'static str {
        match self {
            ParseStatus::Running => "running",
            ParseStatus::Accepted => "accepted",
            ParseStatus::Rejected(_) => "rejected",
        }
    }
}

/// State of the parser as seen from outside, bottom of the stack first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParserSnapshot {
    pub stack: Vec<String>,
    pub position: usize,
    pub lookahead: Terminal,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    /// Stack before the step, bottom first.
    pub stack: Vec<Symbol>,
    pub position: usize,
    pub lookahead: Terminal,
    /// `None` for the step that rejected the input.
    pub step: Option<Step>,
}

#[derive(Debug, Clone)]
pub struct ParseTrace {
    pub entries: Vec<TraceEntry>,
    pub outcome: Result<(), SyntaxError>,
}

/// Table-driven LL(1) parser over an explicit stack.
///
/// [`Parser::step`] applies exactly one transition and [`Parser::parse_all`]
/// repeats it, so interactive stepping and batch runs cannot diverge.
#[derive(Debug, Clone)]
pub struct Parser<'g> {
    grammar: &'g Grammar,
    input: Vec<Terminal>,
    stack: Vec<Symbol>,
    ip: usize,
    status: ParseStatus,
}

impl<'g> Parser<'g> {
    /// Tokens of skipped kinds are not part of the parser's input.
    pub fn new(grammar: &'g Grammar, tokens: &[Token<TokenKind>]) -> Self {
        let input = tokens.iter().filter_map(|t| Terminal::of(t.kind)).collect();
        let mut parser = Parser {
            grammar,
            input,
            stack: Vec::new(),
            ip: 0,
            status: ParseStatus::Running,
        };
        parser.reset();
        parser
    }

    /// Back to `["$", start]` at the first token.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.stack.push(Symbol::Term(Terminal::End));
        self.stack.push(Symbol::NonTerm(self.grammar.start_sym));
        self.ip = 0;
        self.status = ParseStatus::Running;
    }

    /// Terminal category of the token under the input pointer; `$` past the end.
    pub fn lookahead(&self) -> Terminal {
        self.input.get(self.ip).copied().unwrap_or(Terminal::End)
    }

    /// Applies one transition. Once the parser has accepted or rejected, the
    /// recorded outcome is returned again without touching the state.
    pub fn step(&mut self) -> Result<Step, SyntaxError> {
        match &self.status {
            ParseStatus::Accepted => return Ok(Step::Accepted),
            ParseStatus::Rejected(err) => return Err(err.clone()),
            ParseStatus::Running => {}
        }

        let look = self.lookahead();
        let top = self
            .stack
            .last()
            .copied()
            .unwrap_or(Symbol::Term(Terminal::End));

        match top {
            Symbol::Term(Terminal::End) if look == Terminal::End => {
                trace!(position = self.ip, "accept");
                self.status = ParseStatus::Accepted;
                Ok(Step::Accepted)
            }
            Symbol::Term(expected) => {
                if expected != look {
                    return self.fail(SyntaxError::Mismatch {
                        expected,
                        found: look,
                        position: self.ip,
                    });
                }
                trace!(position = self.ip, terminal = %expected, "match");
                self.stack.pop();
                self.ip += 1;
                Ok(Step::Matched(expected))
            }
            Symbol::NonTerm(nonterminal) => {
                let Some(rule_idx) = self.grammar.lookup(nonterminal, look) else {
                    return self.fail(SyntaxError::NoRule {
                        nonterminal,
                        lookahead: look,
                        position: self.ip,
                    });
                };
                let grammar = self.grammar;
                let rule = &grammar[rule_idx];
                trace!(position = self.ip, lookahead = %look, rule = %rule, "expand");
                self.stack.pop();
                self.stack.extend(
                    rule.right
                        .iter()
                        .rev()
                        .filter(|sym| !matches!(sym, Symbol::Epsilon)),
                );
                Ok(Step::Expanded(rule_idx))
            }
            Symbol::Epsilon => {
                self.stack.pop();
                self.step()
            }
        }
    }

    fn fail(&mut self, err: SyntaxError) -> Result<Step, SyntaxError> {
        trace!(error = %err, "reject");
        self.status = ParseStatus::Rejected(err.clone());
        Err(err)
    }

    /// Runs from a fresh state until accept or reject.
    pub fn parse_all(&mut self) -> Result<(), SyntaxError> {
        self.reset();
        loop {
            if let Step::Accepted = self.step()? {
                return Ok(());
            }
        }
    }

    /// Like [`Parser::parse_all`], recording the configuration before every step.
    pub fn run_traced(&mut self) -> ParseTrace {
        self.reset();
        let mut entries = Vec::new();
        loop {
            let stack = self.stack.clone();
            let position = self.ip;
            let lookahead = self.lookahead();
            let result = self.step();
            entries.push(TraceEntry {
                stack,
                position,
                lookahead,
                step: result.as_ref().ok().copied(),
            });
            match result {
                Ok(Step::Accepted) => return ParseTrace { entries, outcome: Ok(()) },
                Ok(_) => {}
                Err(err) => return ParseTrace { entries, outcome: Err(err) },
            }
        }
    }

    pub fn stack(&self) -> &[Symbol] {
        &self.stack
    }

    pub fn position(&self) -> usize {
        self.ip
    }

    pub fn status(&self) -> &ParseStatus {
        &self.status
    }

    pub fn is_done(&self) -> bool {
        !matches!(self.status, ParseStatus::Running)
    }

    pub fn snapshot(&self) -> ParserSnapshot {
        ParserSnapshot {
            stack: self.stack.iter().map(|s| s.name().to_string()).collect(),
            position: self.ip,
            lookahead: self.lookahead(),
            status: self.status.name(),
        }
    }
}
