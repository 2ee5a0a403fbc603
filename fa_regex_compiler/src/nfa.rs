use crate::simulate::Automaton;
use crate::state::{StateId, StateSet};
use derive_getters::Getters;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Debug, Display, Formatter};

/// Transition label. Epsilon transitions are taken without consuming input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Epsilon,
    Char(char),
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Epsilon => write!(f, "{}", crate::syntax::DEFAULT_EPSILON),
            Symbol::Char(c) => write!(f, "{c}"),
        }
    }
}

#[derive(Default, Clone, PartialEq, Eq, Getters)]
pub struct NfaState {
    #[getter(skip)]
    accepting: bool,
    transitions: BTreeMap<Symbol, StateSet>,
}

impl NfaState {
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn targets(&self, symbol: Symbol) -> impl Iterator<Item = StateId> + '_ {
        self.transitions
            .get(&symbol)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    fn add_transition(&mut self, symbol: Symbol, to: StateId) {
        self.transitions.entry(symbol).or_default().insert(to);
    }
}

impl Debug for NfaState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (symbol, targets) in &self.transitions {
            for t in targets {
                writeln!(f, "    {symbol} -> {t}")?;
            }
        }

        Ok(())
    }
}

/// Nondeterministic automaton with epsilon transitions, stored as an arena of states.
///
/// Only the Thompson construction grows an NFA; once built it is read-only.
#[derive(Clone, PartialEq, Eq, Getters)]
pub struct Nfa {
    states: Vec<NfaState>,
    #[getter(skip)]
    start: StateId,
    accepting: StateSet,
    alphabet: BTreeSet<char>,
}

impl Nfa {
    pub(crate) fn new() -> Self {
        Nfa {
            states: Vec::new(),
            start: StateId::new(0),
            accepting: StateSet::new(),
            alphabet: BTreeSet::new(),
        }
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// `None` for an identifier this automaton did not allocate.
    pub fn state(&self, id: StateId) -> Option<&NfaState> {
        self.states.get(id.index())
    }

    fn targets(&self, id: StateId, symbol: Symbol) -> impl Iterator<Item = StateId> + '_ {
        self.states[id.index()].targets(symbol)
    }

    pub fn state_ids(&self) -> impl Iterator<Item = StateId> {
        (0..self.states.len()).map(StateId::new)
    }

    pub fn is_accepting(&self, id: StateId) -> bool {
        self.accepting.contains(&id)
    }

    pub(crate) fn add_state(&mut self) -> StateId {
        let id = StateId::new(self.states.len());
        self.states.push(NfaState::default());
        id
    }

    pub(crate) fn add_transition(&mut self, from: StateId, symbol: Symbol, to: StateId) {
        self.states[from.index()].add_transition(symbol, to);
    }

    pub(crate) fn set_accepting_flag(&mut self, id: StateId, accepting: bool) {
        self.states[id.index()].accepting = accepting;
    }

    /// Fixes the start and the single accepting state once construction is complete.
    pub(crate) fn finish(&mut self, start: StateId, accept: StateId, alphabet: BTreeSet<char>) {
        debug_assert!(self.states[accept.index()].accepting);
        self.start = start;
        self.accepting = StateSet::from([accept]);
        self.alphabet = alphabet;
    }

    /// Smallest superset of `states` closed under epsilon transitions.
    pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
        let mut closure = states.clone();
        let mut stack: Vec<StateId> = states.iter().copied().collect();

        while let Some(current) = stack.pop() {
            for next in self.targets(current, Symbol::Epsilon) {
                if closure.insert(next) {
                    stack.push(next);
                }
            }
        }

        closure
    }

    /// States directly reachable from `states` on `symbol`.
    pub fn move_set(&self, states: &StateSet, symbol: char) -> StateSet {
        states
            .iter()
            .flat_map(|s| self.targets(*s, Symbol::Char(symbol)))
            .collect()
    }
}

impl Automaton for Nfa {
    type Position = StateSet;

    fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    fn initial(&self) -> StateSet {
        self.epsilon_closure(&StateSet::from([self.start]))
    }

    fn advance(&self, position: &StateSet, symbol: char) -> Option<StateSet> {
        let next = self.epsilon_closure(&self.move_set(position, symbol));
        if next.is_empty() {
            None
        } else {
            Some(next)
        }
    }

    fn accepts_at(&self, position: &StateSet) -> bool {
        !position.is_disjoint(&self.accepting)
    }
}

impl Debug for Nfa {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "start: {}", self.start)?;
        for (i, s) in self.states.iter().enumerate() {
            let marker = if s.accepting { " (accepting)" } else { "" };
            writeln!(f, "{}{marker}:", StateId::new(i))?;
            write!(f, "{s:?}")?;
        }

        Ok(())
    }
}
