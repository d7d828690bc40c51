use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// What an NFA edge consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Label {
    Epsilon,
    Literal(char),
    Digit,
    Letter,
    AlnumOrUnderscore,
}

impl Label {
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }

    /// Epsilon edges never match a symbol.
    pub fn is_match(&self, symbol: char) -> bool {
        match self {
            Label::Epsilon => false,
            Label::Literal(c) => *c == symbol,
            Label::Digit => symbol.is_ascii_digit(),
            Label::Letter => symbol.is_ascii_alphabetic(),
            Label::AlnumOrUnderscore => symbol.is_ascii_alphanumeric() || symbol == '_',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NFAEdge {
    pub target: usize,
    pub label: Label,
}

#[derive(Debug, Clone, Serialize)]
pub struct NFAState {
    pub id: usize,
    pub edges: Vec<NFAEdge>,
}

/// A `(start, accept)` pair inside an [`NFA`]; its states already live in the NFA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub start: usize,
    pub accept: usize,
}

/// Thompson-construction NFA.
///
/// States are append-only and indexed by id. State 0 is the super-start every
/// registered token pattern hangs off; there is no single accept state, only a
/// map from accept state to the kind it recognises.
#[derive(Debug, Clone, Serialize)]
pub struct NFA<AcceptEnum> {
    states: Vec<NFAState>,
    start: usize,
    accept_states: BTreeMap<usize, AcceptEnum>,
}

impl<Ac> Default for NFA<Ac> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ac> NFA<Ac> {
    pub fn new() -> NFA<Ac> {
        let mut nfa = NFA { states: Vec::new(), start: 0, accept_states: BTreeMap::new() };
        nfa.start = nfa.new_state();
        nfa
    }

    fn new_state(&mut self) -> usize {
        let id = self.states.len();
        self.states.push(NFAState { id, edges: Vec::new() });
        id
    }

    fn add_edge(&mut self, from: usize, target: usize, label: Label) {
        self.states[from].edges.push(NFAEdge { target, label });
    }

    fn epsilon(&mut self, from: usize, target: usize) {
        self.add_edge(from, target, Label::Epsilon);
    }

    /// Two fresh states joined by one `label` edge.
    pub fn atomic(&mut self, label: Label) -> Fragment {
        let start = self.new_state();
        let accept = self.new_state();
        self.add_edge(start, accept, label);
        Fragment { start, accept }
    }

    pub fn literal(&mut self, symbol: char) -> Fragment {
        self.atomic(Label::Literal(symbol))
    }

    pub fn concat(&mut self, a: Fragment, b: Fragment) -> Fragment {
        self.epsilon(a.accept, b.start);
        Fragment { start: a.start, accept: b.accept }
    }

    pub fn union(&mut self, a: Fragment, b: Fragment) -> Fragment {
        let start = self.new_state();
        let accept = self.new_state();
        self.epsilon(start, a.start);
        self.epsilon(start, b.start);
        self.epsilon(a.accept, accept);
        self.epsilon(b.accept, accept);
        Fragment { start, accept }
    }

    /// Zero or more.
    pub fn star(&mut self, f: Fragment) -> Fragment {
        let start = self.new_state();
        let accept = self.new_state();
        self.epsilon(start, f.start);
        self.epsilon(start, accept);
        self.epsilon(f.accept, f.start);
        self.epsilon(f.accept, accept);
        Fragment { start, accept }
    }

    /// Zero or one, no loop back.
    pub fn optional(&mut self, f: Fragment) -> Fragment {
        let start = self.new_state();
        let accept = self.new_state();
        self.epsilon(start, f.start);
        self.epsilon(start, accept);
        self.epsilon(f.accept, accept);
        Fragment { start, accept }
    }

    /// One or more: `f` followed by `f*`.
    pub fn plus(&mut self, f: Fragment) -> Fragment {
        let rest = self.star(f);
        self.concat(f, rest)
    }

    /// Hangs `fragment` off the super-start and records what its accept state recognises.
    pub fn insert(&mut self, fragment: Fragment, kind: Ac) {
        let start = self.start;
        self.epsilon(start, fragment.start);
        self.accept_states.insert(fragment.accept, kind);
    }

    pub fn e_closure_with_vertex(&self, vertex: usize) -> BTreeSet<usize> {
        self.e_closure(&BTreeSet::from([vertex]))
    }

    /// Every state reachable from `vertexs` through epsilon edges only, `vertexs` included.
    pub fn e_closure(&self, vertexs: &BTreeSet<usize>) -> BTreeSet<usize> {
        let mut result = vertexs.clone();
        let mut stack: Vec<usize> = vertexs.iter().copied().collect();
        while let Some(current_vertex) = stack.pop() {
            for edge in &self.states[current_vertex].edges {
                if edge.label.is_epsilon() && result.insert(edge.target) {
                    stack.push(edge.target);
                }
            }
        }
        result
    }

    /// Targets of the edges leaving `vertexs` that match `symbol`, without closing over epsilon.
    pub fn move_set(&self, vertexs: &BTreeSet<usize>, symbol: char) -> BTreeSet<usize> {
        vertexs
            .iter()
            .flat_map(|&vertex| self.states[vertex].edges.iter())
            .filter(|edge| edge.label.is_match(symbol))
            .map(|edge| edge.target)
            .collect()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn states(&self) -> &[NFAState] {
        &self.states
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn accept_states(&self) -> &BTreeMap<usize, Ac> {
        &self.accept_states
    }
}

impl<Ac: Copy> NFA<Ac> {
    pub fn accept_kind(&self, vertex: usize) -> Option<Ac> {
        self.accept_states.get(&vertex).copied()
    }

    /// Kinds accepted by any state of `vertexs`, in state-id order, duplicates kept.
    pub fn accept_kinds(&self, vertexs: &BTreeSet<usize>) -> Vec<Ac> {
        vertexs.iter().filter_map(|v| self.accept_kind(*v)).collect()
    }
}
