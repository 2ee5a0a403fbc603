use crate::dfa::Dfa;
use crate::nfa::{Nfa, Symbol};
use crate::state::{letter_name, StateId};
use crate::syntax::DEFAULT_EPSILON;
use derive_getters::Getters;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// One state's line of a [`TransitionTable`]. `cells` follows the table's column order.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct TableRow {
    state: StateId,
    start: bool,
    accepting: bool,
    cells: Vec<Vec<StateId>>,
}

/// Read-only snapshot of an automaton: ordered states, alphabet columns, start and accepting
/// markers and the transition targets of every (state, symbol) pair.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct TransitionTable {
    columns: Vec<Symbol>,
    rows: Vec<TableRow>,
    names: BTreeMap<StateId, String>,
    epsilon: char,
}

impl TransitionTable {
    fn new(columns: Vec<Symbol>, rows: Vec<TableRow>) -> Self {
        let names = rows
            .iter()
            .map(|r| (r.state, r.state.to_string()))
            .collect();
        TransitionTable {
            columns,
            rows,
            names,
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Columns for each alphabet symbol, then one for epsilon.
    pub fn from_nfa(nfa: &Nfa) -> Self {
        let columns: Vec<Symbol> = nfa
            .alphabet()
            .iter()
            .map(|c| Symbol::Char(*c))
            .chain([Symbol::Epsilon])
            .collect();

        let rows = nfa
            .state_ids()
            .map(|s| TableRow {
                state: s,
                start: s == nfa.start(),
                accepting: nfa.is_accepting(s),
                cells: columns
                    .iter()
                    .map(|symbol| {
                        nfa.state(s)
                            .into_iter()
                            .flat_map(|state| state.targets(*symbol))
                            .collect()
                    })
                    .collect(),
            })
            .collect();

        Self::new(columns, rows)
    }

    pub fn from_dfa(dfa: &Dfa) -> Self {
        let columns: Vec<Symbol> = dfa.alphabet().iter().map(|c| Symbol::Char(*c)).collect();

        let rows = dfa
            .states()
            .iter()
            .map(|s| TableRow {
                state: *s,
                start: *s == dfa.start(),
                accepting: dfa.is_accepting(*s),
                cells: dfa
                    .alphabet()
                    .iter()
                    .map(|c| dfa.transition(*s, *c).into_iter().collect())
                    .collect(),
            })
            .collect();

        Self::new(columns, rows)
    }

    /// Names states `A`, `B`, ... in row order instead of by identifier.
    pub fn lettered(mut self) -> Self {
        self.names = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| (r.state, letter_name(i)))
            .collect();
        self
    }

    /// Heads the epsilon column with `epsilon` instead of `ε`.
    pub fn with_epsilon(mut self, epsilon: char) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn name(&self, state: StateId) -> &str {
        self.names.get(&state).map_or("?", String::as_str)
    }

    fn cell_text(&self, targets: &[StateId]) -> String {
        if targets.is_empty() {
            "-".to_owned()
        } else {
            targets.iter().map(|t| self.name(*t)).join(",")
        }
    }
}

impl Display for TransitionTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let header: Vec<String> = std::iter::once("state".to_owned())
            .chain(self.columns.iter().map(|c| match c {
                Symbol::Epsilon => self.epsilon.to_string(),
                Symbol::Char(c) => c.to_string(),
            }))
            .collect();

        let lines: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                let marker = match (row.start, row.accepting) {
                    (true, true) => "->*",
                    (true, false) => "-> ",
                    (false, true) => "  *",
                    (false, false) => "   ",
                };
                std::iter::once(format!("{marker}{}", self.name(row.state)))
                    .chain(row.cells.iter().map(|c| self.cell_text(c)))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = (0..header.len())
            .map(|i| {
                std::iter::once(&header)
                    .chain(&lines)
                    .map(|l| l[i].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        for line in std::iter::once(&header).chain(&lines) {
            let text = line
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{cell:<width$}", width = *w))
                .join(" | ");
            writeln!(f, "{}", text.trim_end())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Syntax;

    #[test]
    fn dfa_table() {
        let compiled = crate::compile_with("ab*", &Syntax::default()).unwrap();
        let table = TransitionTable::from_dfa(compiled.minimized());
        assert_eq!(table.columns(), &vec![Symbol::Char('a'), Symbol::Char('b')]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(
            table.to_string(),
            "state | a  | b\n\
             -> q0 | q1 | -\n  \
             *q1 | -  | q1\n"
        );
        assert_eq!(
            table.lettered().to_string(),
            "state | a | b\n\
             -> A  | B | -\n  \
             *B  | - | B\n"
        );
    }

    #[test]
    fn nfa_table_has_epsilon_column() {
        let nfa = crate::to_nfa("a|b", &Syntax::default()).unwrap();
        let table = TransitionTable::from_nfa(&nfa);
        assert_eq!(table.columns().last(), Some(&Symbol::Epsilon));
        assert_eq!(table.rows().len(), nfa.len());
        let start = table.rows().iter().find(|r| *r.start()).unwrap();
        assert_eq!(start.cells()[2].len(), 2);
        assert_eq!(table.rows().iter().filter(|r| *r.accepting()).count(), 1);
    }

    #[test]
    fn epsilon_column_uses_configured_marker() {
        let syntax = Syntax::default().with_epsilon('e');
        let nfa = crate::to_nfa("a", &syntax).unwrap();
        let default = TransitionTable::from_nfa(&nfa).to_string();
        let custom = TransitionTable::from_nfa(&nfa).with_epsilon('e').to_string();
        assert!(default.starts_with("state | a  | ε\n"));
        assert!(custom.starts_with("state | a  | e\n"));
    }
}
