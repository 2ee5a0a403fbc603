use crate::dfa::Dfa;
use crate::nfa::Nfa;
use crate::state::{StateId, StateSet};
use log::{debug, trace};
use std::collections::{HashMap, VecDeque};

/// Subset construction: every reachable set of NFA states becomes one DFA state.
///
/// Sets are discovered breadth first and numbered in discovery order, so the start is state 0
/// and the numbering is the same on every run. Empty target sets get no state; the missing
/// transition rejects instead.
pub fn subset_construction(nfa: &Nfa) -> Dfa {
    let mut dfa = Dfa::new(nfa.alphabet().clone());

    let initial = nfa.epsilon_closure(&StateSet::from([nfa.start()]));
    let start = dfa.add_state(!initial.is_disjoint(nfa.accepting()));
    dfa.set_start(start);

    let mut known: HashMap<StateSet, StateId> = HashMap::new();
    known.insert(initial.clone(), start);
    let mut work_list = VecDeque::from([(initial, start)]);

    while let Some((nfa_states, state_id)) = work_list.pop_front() {
        for &symbol in nfa.alphabet() {
            let target = nfa.epsilon_closure(&nfa.move_set(&nfa_states, symbol));
            if target.is_empty() {
                continue;
            }

            let target_id = match known.get(&target) {
                Some(id) => *id,
                None => {
                    let id = dfa.add_state(!target.is_disjoint(nfa.accepting()));
                    trace!("Add state {}: {:?}", id, target);
                    known.insert(target.clone(), id);
                    work_list.push_back((target, id));
                    id
                }
            };

            dfa.add_transition(state_id, symbol, target_id);
        }
    }

    dfa.prune_unreachable();
    debug!(
        "Subset construction: {} NFA states -> {} DFA states",
        nfa.len(),
        dfa.len()
    );
    dfa
}

impl From<&Nfa> for Dfa {
    fn from(nfa: &Nfa) -> Self {
        subset_construction(nfa)
    }
}
