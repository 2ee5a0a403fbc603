use std::collections::BTreeSet;

/// Membership testing shared by every automaton in the pipeline.
///
/// An implementation describes where a run starts, how one symbol moves it and when it
/// accepts; [`Automaton::simulate`] does the rest. For an NFA the position is a set of states,
/// for a DFA it is a single state.
pub trait Automaton {
    type Position;

    fn alphabet(&self) -> &BTreeSet<char>;

    fn initial(&self) -> Self::Position;

    /// Consumes `symbol`. `None` means the run is stuck and the input is rejected.
    fn advance(&self, position: &Self::Position, symbol: char) -> Option<Self::Position>;

    fn accepts_at(&self, position: &Self::Position) -> bool;

    /// Runs the automaton over `input`. Symbols outside the alphabet reject immediately.
    fn simulate(&self, input: &str) -> bool {
        let mut position = self.initial();
        for symbol in input.chars() {
            if !self.alphabet().contains(&symbol) {
                return false;
            }
            position = match self.advance(&position, symbol) {
                Some(next) => next,
                None => return false,
            };
        }
        self.accepts_at(&position)
    }
}
