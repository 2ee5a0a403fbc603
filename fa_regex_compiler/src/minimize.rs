//! DFA minimization by partition refinement.
//!
//! States start out split into accepting and non-accepting blocks. A pass regroups every block
//! by the signature of its members (the block reached on each symbol) and the passes repeat until
//! none of them splits a block. Blocks are kept sorted: members ascending, the block holding the
//! start state first and the rest by their smallest member. The same DFA therefore always yields
//! the same partition and the same minimized automaton.

use crate::dfa::Dfa;
use crate::state::StateId;
use log::{debug, trace};
use std::collections::{BTreeMap, HashMap};

pub type Block = Vec<StateId>;
pub type Partition = Vec<Block>;

/// Block index reached on each symbol of the sorted alphabet, `None` where there is no
/// transition.
pub type Signature = Vec<Option<usize>>;

fn trace_partition(context: &str, partition: &[Block]) {
    trace!("Partition {}:", context);
    for (i, block) in partition.iter().enumerate() {
        trace!("Block {}: {:?}", i, block);
    }
}

fn block_index(partition: &[Block]) -> HashMap<StateId, usize> {
    partition
        .iter()
        .enumerate()
        .flat_map(|(i, block)| block.iter().map(move |s| (*s, i)))
        .collect()
}

fn normalize(partition: &mut Partition, start: StateId) {
    for block in partition.iter_mut() {
        block.sort();
    }
    partition.retain(|block| !block.is_empty());
    partition.sort_by_key(|block| (!block.contains(&start), block[0]));
}

/// Accepting and non-accepting states, leaving out an empty block.
pub fn initial_partition(dfa: &Dfa) -> Partition {
    let (accepting, rest): (Block, Block) = dfa
        .states()
        .iter()
        .partition(|s| dfa.is_accepting(**s));

    let mut partition = vec![accepting, rest];
    normalize(&mut partition, dfa.start());
    partition
}

pub fn signature(
    dfa: &Dfa,
    state: StateId,
    alphabet: &[char],
    blocks: &HashMap<StateId, usize>,
) -> Signature {
    alphabet
        .iter()
        .map(|c| dfa.transition(state, *c).and_then(|t| blocks.get(&t).copied()))
        .collect()
}

/// One refinement pass. Returns the new partition and whether any block was split.
pub fn refine(dfa: &Dfa, partition: &[Block], alphabet: &[char]) -> (Partition, bool) {
    let blocks = block_index(partition);
    let mut refined = Partition::new();
    let mut changed = false;

    for block in partition {
        if block.len() == 1 {
            refined.push(block.clone());
            continue;
        }

        let mut groups: BTreeMap<Signature, Block> = BTreeMap::new();
        for state in block {
            groups
                .entry(signature(dfa, *state, alphabet, &blocks))
                .or_default()
                .push(*state);
        }

        if groups.len() > 1 {
            trace!("Split block {:?} into {} blocks", block, groups.len());
            changed = true;
        }
        refined.extend(groups.into_values());
    }

    normalize(&mut refined, dfa.start());
    (refined, changed)
}

/// Refines `partition` until a pass changes nothing.
pub fn refine_to_fixpoint(dfa: &Dfa, mut partition: Partition) -> Partition {
    let alphabet: Vec<char> = dfa.alphabet().iter().copied().collect();
    trace_partition("initial", &partition);

    loop {
        let (next, changed) = refine(dfa, &partition, &alphabet);
        partition = next;
        if !changed {
            return partition;
        }
        trace_partition("refined", &partition);
    }
}

/// Builds a DFA with one state per block, numbered in block order. Each block copies the
/// transitions of its smallest member.
pub fn from_partition(dfa: &Dfa, partition: &[Block]) -> Dfa {
    let blocks = block_index(partition);
    let mut minimized = Dfa::new(dfa.alphabet().clone());

    let ids: Vec<StateId> = partition
        .iter()
        .map(|block| minimized.add_state(block.iter().any(|s| dfa.is_accepting(*s))))
        .collect();

    if let Some(start) = blocks.get(&dfa.start()) {
        minimized.set_start(ids[*start]);
    }

    for (block, from) in partition.iter().zip(&ids) {
        let representative = block[0];
        for (symbol, target) in dfa.transitions_from(representative) {
            if let Some(to) = blocks.get(&target) {
                minimized.add_transition(*from, symbol, ids[*to]);
            }
        }
    }

    minimized
}

/// Produces the smallest DFA accepting the same language. The input is left untouched.
pub fn minimize(dfa: &Dfa) -> Dfa {
    let mut source = dfa.clone();
    source.prune_unreachable();
    if source.is_empty() {
        return source;
    }

    let partition = refine_to_fixpoint(&source, initial_partition(&source));
    let minimized = from_partition(&source, &partition);
    debug!(
        "Minimization: {} DFA states -> {} states",
        dfa.len(),
        minimized.len()
    );
    minimized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulate::Automaton;
    use crate::state::StateSet;
    use std::collections::BTreeSet;

    fn q(i: usize) -> StateId {
        StateId::new(i)
    }

    /// Accepts a(a|b)* with redundant copies: q1 and q2 are equivalent, q3 is unreachable.
    fn redundant() -> Dfa {
        let mut dfa = Dfa::new(BTreeSet::from(['a', 'b']));
        for accepting in [false, true, true, true] {
            dfa.add_state(accepting);
        }
        dfa.add_transition(q(0), 'a', q(1));
        dfa.add_transition(q(1), 'a', q(2));
        dfa.add_transition(q(1), 'b', q(1));
        dfa.add_transition(q(2), 'a', q(1));
        dfa.add_transition(q(2), 'b', q(2));
        dfa.add_transition(q(3), 'a', q(0));
        dfa
    }

    #[test]
    fn initial_partition_puts_start_block_first() {
        let dfa = redundant();
        assert_eq!(
            initial_partition(&dfa),
            vec![vec![q(0)], vec![q(1), q(2), q(3)]]
        );
    }

    #[test]
    fn initial_partition_omits_empty_block() {
        let mut dfa = Dfa::new(BTreeSet::from(['a']));
        let s = dfa.add_state(true);
        dfa.add_transition(s, 'a', s);
        assert_eq!(initial_partition(&dfa), vec![vec![q(0)]]);
    }

    #[test]
    fn signatures_use_block_indices() {
        let dfa = redundant();
        let partition = vec![vec![q(0)], vec![q(1), q(2)]];
        let blocks = block_index(&partition);
        assert_eq!(signature(&dfa, q(0), &['a', 'b'], &blocks), vec![Some(1), None]);
        assert_eq!(signature(&dfa, q(1), &['a', 'b'], &blocks), vec![Some(1), Some(1)]);
    }

    #[test]
    fn merges_equivalent_states() {
        let dfa = redundant();
        let min = minimize(&dfa);
        assert_eq!(min.len(), 2);
        assert_eq!(min.start(), q(0));
        assert_eq!(min.accepting(), &StateSet::from([q(1)]));
        assert_eq!(min.transition(q(0), 'a'), Some(q(1)));
        assert_eq!(min.transition(q(1), 'a'), Some(q(1)));
        assert_eq!(min.transition(q(1), 'b'), Some(q(1)));
        assert_eq!(min.transition(q(0), 'b'), None);
        for input in ["", "a", "ab", "abba", "b", "ba"] {
            assert_eq!(min.simulate(input), dfa.simulate(input), "{input:?}");
        }
    }

    #[test]
    fn input_is_not_mutated() {
        let dfa = redundant();
        let before = dfa.clone();
        let _ = minimize(&dfa);
        assert_eq!(dfa, before);
    }

    #[test]
    fn refinement_splits_on_missing_transitions() {
        // q0 -a-> q1 -a-> q2, only q2 accepts: q0 and q1 differ on where 'a' leads.
        let mut dfa = Dfa::new(BTreeSet::from(['a']));
        for accepting in [false, false, true] {
            dfa.add_state(accepting);
        }
        dfa.add_transition(q(0), 'a', q(1));
        dfa.add_transition(q(1), 'a', q(2));
        let partition = refine_to_fixpoint(&dfa, initial_partition(&dfa));
        assert_eq!(partition, vec![vec![q(0)], vec![q(1)], vec![q(2)]]);
        assert_eq!(minimize(&dfa).len(), 3);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let dfa = redundant();
        assert_eq!(minimize(&dfa), minimize(&dfa));
        assert_eq!(minimize(&minimize(&dfa)), minimize(&dfa));
    }

    #[test]
    fn empty_dfa_stays_empty() {
        let dfa = Dfa::new(BTreeSet::from(['a']));
        let min = minimize(&dfa);
        assert!(min.is_empty());
        assert!(!min.simulate(""));
    }
}
