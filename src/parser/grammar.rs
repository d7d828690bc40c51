use std::{collections::HashMap, fmt, ops::Index};

use serde::Serialize;

use crate::tokenizer::TokenKind;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Terminal {
    Id,
    Number,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    /// `$`, end of input and stack bottom.
    End,
}

impl Terminal {
    pub const ALL: [Terminal; 9] = [
        Terminal::Id,
        Terminal::Number,
        Terminal::Plus,
        Terminal::Minus,
        Terminal::Star,
        Terminal::Slash,
        Terminal::LParen,
        Terminal::RParen,
        Terminal::End,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Terminal::Id => "ID",
            Terminal::Number => "NUMBER",
            Terminal::Plus => "+",
            Terminal::Minus => "-",
            Terminal::Star => "*",
            Terminal::Slash => "/",
            Terminal::LParen => "(",
            Terminal::RParen => ")",
            Terminal::End => "$",
        }
    }

    /// Grammar category of a token kind; skipped kinds have none.
    pub fn of(kind: TokenKind) -> Option<Terminal> {
        match kind {
            TokenKind::Eof => Some(Terminal::End),
            TokenKind::Id => Some(Terminal::Id),
            TokenKind::Number => Some(Terminal::Number),
            TokenKind::Plus => Some(Terminal::Plus),
            TokenKind::Minus => Some(Terminal::Minus),
            TokenKind::Star => Some(Terminal::Star),
            TokenKind::Slash => Some(Terminal::Slash),
            TokenKind::LParen => Some(Terminal::LParen),
            TokenKind::RParen => Some(Terminal::RParen),
            TokenKind::Whitespace => None,
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum NonTerminal {
    E,
    EPrime,
    T,
    TPrime,
    F,
}

impl NonTerminal {
    pub const ALL: [NonTerminal; 5] = [
        NonTerminal::E,
        NonTerminal::EPrime,
        NonTerminal::T,
        NonTerminal::TPrime,
        NonTerminal::F,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NonTerminal::E => "E",
            NonTerminal::EPrime => "E'",
            NonTerminal::T => "T",
            NonTerminal::TPrime => "T'",
            NonTerminal::F => "F",
        }
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize)]
pub enum Symbol {
    Term(Terminal),
    NonTerm(NonTerminal),
    Epsilon,
}

impl Symbol {
    pub fn name(&self) -> &'static str {
        match self {
            Symbol::Term(t) => t.name(),
            Symbol::NonTerm(nt) => nt.name(),
            Symbol::Epsilon => "ε",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Term(_))
    }
}

impl From<Terminal> for Symbol {
    fn from(value: Terminal) -> Self {
        Self::Term(value)
    }
}

impl From<NonTerminal> for Symbol {
    fn from(value: NonTerminal) -> Self {
        Self::NonTerm(value)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// A production. The epsilon production is written as `[Symbol::Epsilon]`.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub left: NonTerminal,
    pub right: Vec<Symbol>,
}

impl Rule {
    fn new(left: NonTerminal, right: Vec<Symbol>) -> Self {
        Self { left, right }
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self.right.as_slice(), [Symbol::Epsilon])
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.left)?;
        for sym in &self.right {
            write!(f, " {}", sym)?;
        }
        Ok(())
    }
}

/// The fixed expression grammar and its hand-built LL(1) table.
///
/// ```text
///  0  E  -> T E'
///  1  E' -> + T E'
///  2  E' -> - T E'
///  3  E' -> ε
///  4  T  -> F T'
///  5  T' -> * F T'
///  6  T' -> / F T'
///  7  T' -> ε
///  8  F  -> + F
///  9  F  -> - F
/// 10  F  -> ( E )
/// 11  F  -> ID
/// 12  F  -> NUMBER
/// ```
///
/// Built once and only read afterwards.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub start_sym: NonTerminal,
    rules: Vec<Rule>,
    table: HashMap<(NonTerminal, Terminal), usize>,
}

impl Grammar {
    pub fn expression() -> Self {
        use NonTerminal::*;
        use Terminal::*;

        let t = |t: Terminal| Symbol::Term(t);
        let n = |n: NonTerminal| Symbol::NonTerm(n);

        let rules = vec![
            Rule::new(E, vec![n(T), n(EPrime)]),
            Rule::new(EPrime, vec![t(Plus), n(T), n(EPrime)]),
            Rule::new(EPrime, vec![t(Minus), n(T), n(EPrime)]),
            Rule::new(EPrime, vec![Symbol::Epsilon]),
            Rule::new(T, vec![n(F), n(TPrime)]),
            Rule::new(TPrime, vec![t(Star), n(F), n(TPrime)]),
            Rule::new(TPrime, vec![t(Slash), n(F), n(TPrime)]),
            Rule::new(TPrime, vec![Symbol::Epsilon]),
            Rule::new(F, vec![t(Plus), n(F)]),
            Rule::new(F, vec![t(Minus), n(F)]),
            Rule::new(F, vec![t(LParen), n(E), t(RParen)]),
            Rule::new(F, vec![t(Id)]),
            Rule::new(F, vec![t(Number)]),
        ];

        // FIRST(F) = FIRST(T) = FIRST(E)
        let first_f = [Plus, Minus, LParen, Id, Number];
        let mut table = HashMap::new();
        for look in first_f {
            table.insert((E, look), 0);
            table.insert((T, look), 4);
        }
        table.insert((EPrime, Plus), 1);
        table.insert((EPrime, Minus), 2);
        for look in [RParen, End] {
            table.insert((EPrime, look), 3);
        }
        table.insert((TPrime, Star), 5);
        table.insert((TPrime, Slash), 6);
        for look in [Plus, Minus, RParen, End] {
            table.insert((TPrime, look), 7);
        }
        table.insert((F, Plus), 8);
        table.insert((F, Minus), 9);
        table.insert((F, LParen), 10);
        table.insert((F, Id), 11);
        table.insert((F, Number), 12);

        Grammar { start_sym: E, rules, table }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Production index for `(nonterminal, lookahead)`, if the table has one.
    pub fn lookup(&self, nonterminal: NonTerminal, lookahead: Terminal) -> Option<usize> {
        self.table.get(&(nonterminal, lookahead)).copied()
    }

    /// Table entries ordered by nonterminal then terminal.
    pub fn table_entries(&self) -> Vec<(NonTerminal, Terminal, usize)> {
        let mut entries: Vec<_> = self.table.iter().map(|(&(n, t), &r)| (n, t, r)).collect();
        entries.sort();
        entries
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::expression()
    }
}

impl Index<usize> for Grammar {
    type Output = Rule;

    fn index(&self, index: usize) -> &Self::Output {
        &self.rules[index]
    }
}
