use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Identifier of a state within the automaton that allocated it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(usize);

impl StateId {
    #[inline]
    pub const fn new(index: usize) -> Self {
        StateId(index)
    }

    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for StateId {
    fn from(index: usize) -> Self {
        StateId(index)
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// A set of NFA states. Ordered, so equal sets compare and hash identically.
pub type StateSet = BTreeSet<StateId>;

const LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Letter name for the `index`-th state: `A`..`Z`, then `A0`, `A1`, ...
pub fn letter_name(index: usize) -> String {
    match LETTERS.get(index) {
        Some(l) => char::from(*l).to_string(),
        None => format!("A{}", index - LETTERS.len()),
    }
}
