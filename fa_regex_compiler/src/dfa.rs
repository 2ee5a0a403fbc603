use crate::simulate::Automaton;
use crate::state::{StateId, StateSet};
use derive_getters::Getters;
use log::trace;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt::{Debug, Formatter};

/// Deterministic automaton. Transitions are partial: a missing entry rejects.
#[derive(Clone, PartialEq, Eq, Getters)]
pub struct Dfa {
    #[getter(skip)]
    start: StateId,
    states: StateSet,
    accepting: StateSet,
    alphabet: BTreeSet<char>,
    transitions: BTreeMap<StateId, BTreeMap<char, StateId>>,
    #[getter(skip)]
    next_id: usize,
}

impl Dfa {
    /// An automaton with no states over `alphabet`. The first state added becomes the start.
    /// Only the subset construction and minimization build DFAs.
    pub(crate) fn new(alphabet: BTreeSet<char>) -> Self {
        Dfa {
            start: StateId::new(0),
            states: StateSet::new(),
            accepting: StateSet::new(),
            alphabet,
            transitions: BTreeMap::new(),
            next_id: 0,
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

    pub fn is_accepting(&self, id: StateId) -> bool {
        self.accepting.contains(&id)
    }

    pub(crate) fn add_state(&mut self, accepting: bool) -> StateId {
        let id = StateId::new(self.next_id);
        self.next_id += 1;
        self.states.insert(id);
        if accepting {
            self.accepting.insert(id);
        }
        id
    }

    pub(crate) fn set_start(&mut self, id: StateId) {
        debug_assert!(self.states.contains(&id));
        self.start = id;
    }

    /// Adds `from -symbol-> to`, replacing any previous target for that pair.
    pub(crate) fn add_transition(&mut self, from: StateId, symbol: char, to: StateId) {
        debug_assert!(self.alphabet.contains(&symbol));
        let previous = self.transitions.entry(from).or_default().insert(symbol, to);
        debug_assert!(previous.is_none() || previous == Some(to));
    }

    pub fn transition(&self, from: StateId, symbol: char) -> Option<StateId> {
        self.transitions.get(&from)?.get(&symbol).copied()
    }

    /// Outgoing transitions of `from` in symbol order.
    pub fn transitions_from(&self, from: StateId) -> impl Iterator<Item = (char, StateId)> + '_ {
        self.transitions
            .get(&from)
            .into_iter()
            .flat_map(|t| t.iter().map(|(c, s)| (*c, *s)))
    }

    /// States reachable from the start, in breadth-first order.
    pub fn reachable_states(&self) -> Vec<StateId> {
        if !self.states.contains(&self.start) {
            return Vec::new();
        }

        let mut visited = StateSet::from([self.start]);
        let mut order = Vec::new();
        let mut queue = VecDeque::from([self.start]);

        while let Some(current) = queue.pop_front() {
            order.push(current);
            for (_, next) in self.transitions_from(current) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        order
    }

    pub fn unreachable_states(&self) -> StateSet {
        let reachable: StateSet = self.reachable_states().into_iter().collect();
        self.states.difference(&reachable).copied().collect()
    }

    /// Removes the given states together with every transition touching them.
    pub fn remove_states(&mut self, doomed: &StateSet) {
        for id in doomed {
            self.states.remove(id);
            self.accepting.remove(id);
            self.transitions.remove(id);
        }
        for targets in self.transitions.values_mut() {
            targets.retain(|_, to| !doomed.contains(to));
        }
        self.transitions.retain(|_, targets| !targets.is_empty());
    }

    pub fn prune_unreachable(&mut self) {
        let unreachable = self.unreachable_states();
        if !unreachable.is_empty() {
            trace!("Pruning unreachable states {:?}", unreachable);
            self.remove_states(&unreachable);
        }
    }
}

impl Automaton for Dfa {
    type Position = StateId;

    fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    fn initial(&self) -> StateId {
        self.start
    }

    fn advance(&self, position: &StateId, symbol: char) -> Option<StateId> {
        self.transition(*position, symbol)
    }

    fn accepts_at(&self, position: &StateId) -> bool {
        self.is_accepting(*position)
    }
}

impl Debug for Dfa {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "start: {}", self.start)?;
        for s in &self.states {
            let marker = if self.is_accepting(*s) { " (accepting)" } else { "" };
            writeln!(f, "{s}{marker}:")?;
            for (c, t) in self.transitions_from(*s) {
                writeln!(f, "    {c} -> {t}")?;
            }
        }

        Ok(())
    }
}
