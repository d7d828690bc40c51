use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::ops::RangeInclusive;

use serde::Serialize;
use tracing::{debug, trace, warn};

use super::nfa::NFA;
use super::token::{Token, TokenType};
use crate::error::LexError;

/// The bounded symbol range subset construction enumerates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet(RangeInclusive<char>);

impl Alphabet {
    pub fn new(range: RangeInclusive<char>) -> Self {
        Alphabet(range)
    }

    /// The 128 ASCII code points.
    pub fn ascii() -> Self {
        Alphabet('\0'..='\x7f')
    }

    pub fn symbols(&self) -> impl Iterator<Item = char> {
        self.0.clone()
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.0.contains(&symbol)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet::ascii()
    }
}

/// Canonical identity of a set of NFA states: the ids in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct VertexSet(Vec<usize>);

impl From<&BTreeSet<usize>> for VertexSet {
    fn from(inner: &BTreeSet<usize>) -> Self {
        Self(inner.iter().copied().collect())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DFAState<AcceptEnum> {
    pub id: usize,
    pub transitions: BTreeMap<char, usize>,
    pub accept: bool,
    /// Kinds of every accept-mapped NFA state in the subset; empty unless `accept`.
    pub tokens: Vec<AcceptEnum>,
    /// The NFA states this DFA state closes over.
    pub nfa_states: Vec<usize>,
}

impl<Ac> DFAState<Ac> {
    pub fn next(&self, symbol: char) -> Option<usize> {
        self.transitions.get(&symbol).copied()
    }
}

impl<Ac: Copy + Ord> DFAState<Ac> {
    /// The candidate with the smallest ordinal.
    pub fn resolve(&self) -> Option<Ac> {
        self.tokens.iter().min().copied()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DFA<AcceptEnum> {
    states: Vec<DFAState<AcceptEnum>>,
    start_accepting: bool,
}

impl<Ac: Copy> DFA<Ac> {
    /// Powerset construction over `alphabet`. State 0 is the closure of the NFA start.
    pub fn subset_construct(nfa: &NFA<Ac>, alphabet: &Alphabet) -> Self {
        let mut states: Vec<DFAState<Ac>> = Vec::new();
        let mut table: HashMap<VertexSet, usize> = HashMap::new();
        let mut worklist = VecDeque::new();

        let init = nfa.e_closure_with_vertex(nfa.start());
        let start_tokens = nfa.accept_kinds(&init);
        let start_accepting = !start_tokens.is_empty();
        if start_accepting {
            warn!(
                nfa_states = ?init,
                "DFA start state is accepting; some token pattern matches the empty string"
            );
        }
        table.insert(VertexSet::from(&init), 0);
        states.push(DFAState {
            id: 0,
            transitions: BTreeMap::new(),
            accept: start_accepting,
            tokens: start_tokens,
            nfa_states: init.iter().copied().collect(),
        });
        worklist.push_back((init, 0_usize));

        while let Some((subset, id)) = worklist.pop_front() {
            for symbol in alphabet.symbols() {
                let move_set = nfa.move_set(&subset, symbol);
                if move_set.is_empty() {
                    continue;
                }
                let closure = nfa.e_closure(&move_set);
                let key = VertexSet::from(&closure);
                let target = match table.get(&key) {
                    Some(&target) => target,
                    None => {
                        let target = states.len();
                        let tokens = nfa.accept_kinds(&closure);
                        trace!(
                            dfa_state = target,
                            from = id,
                            ?symbol,
                            nfa_states = ?key.0,
                            accepting = !tokens.is_empty(),
                            "new DFA state"
                        );
                        states.push(DFAState {
                            id: target,
                            transitions: BTreeMap::new(),
                            accept: !tokens.is_empty(),
                            tokens,
                            nfa_states: key.0.clone(),
                        });
                        table.insert(key, target);
                        worklist.push_back((closure, target));
                        target
                    }
                };
                states[id].transitions.insert(symbol, target);
            }
        }

        debug!(
            nfa_states = nfa.state_count(),
            dfa_states = states.len(),
            accepting = states.iter().filter(|s| s.accept).count(),
            "subset construction complete"
        );
        DFA { states, start_accepting }
    }
}

impl<Ac> DFA<Ac> {
    pub fn states(&self) -> &[DFAState<Ac>] {
        &self.states
    }

    pub fn state(&self, id: usize) -> Option<&DFAState<Ac>> {
        self.states.get(id)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn accept_states(&self) -> impl Iterator<Item = &DFAState<Ac>> {
        self.states.iter().filter(|s| s.accept)
    }

    /// Set when the start closure already holds an accept state, which no
    /// registered pattern should allow.
    pub fn has_accepting_start(&self) -> bool {
        self.start_accepting
    }

    /// States visited from state 0 while `word` keeps having transitions, state 0 included.
    pub fn walk(&self, word: &str) -> Vec<usize> {
        let mut path = vec![0];
        let mut current_vertex = 0;
        for symbol in word.chars() {
            match self.states[current_vertex].next(symbol) {
                Some(next) => {
                    current_vertex = next;
                    path.push(next);
                }
                None => break,
            }
        }
        path
    }
}

impl<Ac: TokenType> DFA<Ac> {
    /// The kind `word` is accepted as when consumed entirely, if any.
    pub fn match_one(&self, word: &str) -> Option<Ac> {
        let mut current_vertex = 0;
        for symbol in word.chars() {
            current_vertex = self.states[current_vertex].next(symbol)?;
        }
        self.states[current_vertex].resolve()
    }

    /// Longest accepted prefix of `origin[from..]` as `(end offset, resolved kind)`.
    ///
    /// Only states reached after consuming at least one symbol count, so an
    /// accepting start never yields an empty match.
    pub fn longest_match(&self, origin: &str, from: usize) -> Option<(usize, Ac)> {
        let mut current_vertex = 0;
        let mut last = None;
        for (idx, symbol) in origin[from..].char_indices() {
            match self.states[current_vertex].next(symbol) {
                Some(next) => current_vertex = next,
                None => break,
            }
            let state = &self.states[current_vertex];
            if state.accept {
                if let Some(kind) = state.resolve() {
                    last = Some((from + idx + symbol.len_utf8(), kind));
                }
            }
        }
        last
    }

    /// Maximal-munch scan of the whole input.
    ///
    /// Skipped kinds are dropped, and a synthetic end-of-input token (`"$"` at
    /// `origin.len()`) closes the sequence. Any position where no pattern
    /// matches fails the whole input.
    pub fn tokenize(&self, origin: &str) -> Result<Vec<Token<Ac>>, LexError> {
        let mut result = Vec::new();
        let mut current_pos = 0;
        while current_pos < origin.len() {
            let Some((end, kind)) = self.longest_match(origin, current_pos) else {
                let found = origin[current_pos..].chars().next().unwrap_or_default();
                debug!(offset = current_pos, ?found, "lexical error");
                return Err(LexError { offset: current_pos, found });
            };
            if !kind.is_skipped() {
                result.push(Token::new(kind, &origin[current_pos..end], current_pos));
            }
            current_pos = end;
        }
        result.push(Token::new(Ac::end_of_input(), "$", origin.len()));
        trace!(count = result.len(), "tokenized");
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tokenizer::nfa::Label;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
    enum Kind {
        End,
        Keyword,
        Word,
        Num,
        Blank,
    }

    impl TokenType for Kind {
        fn is_skipped(&self) -> bool {
            matches!(self, Kind::Blank)
        }

        fn end_of_input() -> Self {
            Kind::End
        }
    }

    fn small_nfa() -> NFA<Kind> {
        let mut nfa = NFA::new();
        // "if" registered after the word pattern; ordinal still decides
        let letter = nfa.atomic(Label::Letter);
        let word = nfa.plus(letter);
        nfa.insert(word, Kind::Word);
        let i = nfa.literal('i');
        let f = nfa.literal('f');
        let kw = nfa.concat(i, f);
        nfa.insert(kw, Kind::Keyword);
        let digit = nfa.atomic(Label::Digit);
        let num = nfa.plus(digit);
        nfa.insert(num, Kind::Num);
        let space = nfa.literal(' ');
        nfa.insert(space, Kind::Blank);
        nfa
    }

    #[test]
    fn tie_break_picks_lowest_ordinal() {
        let dfa = DFA::subset_construct(&small_nfa(), &Alphabet::ascii());
        assert_eq!(dfa.match_one("if"), Some(Kind::Keyword));
        assert_eq!(dfa.match_one("iff"), Some(Kind::Word));
        assert_eq!(dfa.match_one("i"), Some(Kind::Word));
        assert_eq!(dfa.match_one("1a"), None);

        let path = dfa.walk("if");
        let state = dfa.state(*path.last().unwrap()).unwrap();
        let mut tokens = state.tokens.clone();
        tokens.sort();
        assert_eq!(tokens, vec![Kind::Keyword, Kind::Word]);
    }

    #[test]
    fn start_state_is_not_accepting() {
        let dfa = DFA::subset_construct(&small_nfa(), &Alphabet::ascii());
        assert!(!dfa.has_accepting_start());
        assert!(!dfa.states()[0].accept);
        assert!(dfa.states()[0].tokens.is_empty());
    }

    #[test]
    fn empty_pattern_is_flagged() {
        let mut nfa = NFA::new();
        let a = nfa.literal('a');
        let star = nfa.star(a);
        nfa.insert(star, Kind::Word);
        let dfa = DFA::subset_construct(&nfa, &Alphabet::ascii());
        assert!(dfa.has_accepting_start());
        // empty matches are never emitted
        assert!(dfa.tokenize("b").is_err());
        assert_eq!(dfa.tokenize("aa").unwrap()[0].lexeme, "aa");
    }

    #[test]
    fn equivalent_subsets_collapse() {
        let mut nfa = NFA::new();
        let a1 = nfa.literal('a');
        nfa.insert(a1, Kind::Word);
        let a2 = nfa.literal('a');
        nfa.insert(a2, Kind::Keyword);
        let dfa = DFA::subset_construct(&nfa, &Alphabet::ascii());
        assert_eq!(dfa.state_count(), 2);
        assert_eq!(dfa.states()[1].tokens.len(), 2);
        assert_eq!(dfa.states()[1].resolve(), Some(Kind::Keyword));
    }

    #[test]
    fn construction_is_deterministic() {
        let nfa = small_nfa();
        let a = DFA::subset_construct(&nfa, &Alphabet::ascii());
        let b = DFA::subset_construct(&nfa, &Alphabet::ascii());
        assert_eq!(a.state_count(), b.state_count());
        for (x, y) in a.states().iter().zip(b.states()) {
            assert_eq!(x.tokens, y.tokens);
            assert_eq!(x.transitions, y.transitions);
            assert_eq!(x.nfa_states, y.nfa_states);
        }
    }

    #[test]
    fn alphabet_bounds_transitions() {
        let mut nfa = NFA::new();
        let letter = nfa.atomic(Label::Letter);
        nfa.insert(letter, Kind::Word);
        let dfa = DFA::subset_construct(&nfa, &Alphabet::new('a'..='c'));
        assert_eq!(dfa.states()[0].transitions.len(), 3);
        assert_eq!(dfa.match_one("d"), None);
    }

    #[test]
    fn tokenize_skips_blanks_and_appends_end() {
        let dfa = DFA::subset_construct(&small_nfa(), &Alphabet::ascii());
        let tokens = dfa.tokenize("if x 42").unwrap();
        let kinds: Vec<Kind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![Kind::Keyword, Kind::Word, Kind::Num, Kind::End]);
        assert_eq!(tokens[2].offset, 5);
        assert_eq!(tokens[3].offset, 7);
        assert_eq!(tokens[3].lexeme, "$");
    }

    #[test]
    fn tokenize_reports_offending_offset() {
        let dfa = DFA::subset_construct(&small_nfa(), &Alphabet::ascii());
        let err = dfa.tokenize("ab ?").unwrap_err();
        assert_eq!(err, LexError { offset: 3, found: '?' });
    }

    #[test]
    fn walk_stops_at_dead_end() {
        let dfa = DFA::subset_construct(&small_nfa(), &Alphabet::ascii());
        assert_eq!(dfa.walk("12x").len(), 3);
        assert_eq!(dfa.walk(""), vec![0]);
    }
}
