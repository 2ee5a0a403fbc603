use crate::error::Result;
use crate::postfix::Expr;
use crate::token::{Token, Tokenizer};
use derive_getters::Getters;
use itertools::Itertools;
use log::debug;
use std::collections::BTreeSet;

pub mod dfa;
pub mod error;
pub mod minimize;
pub mod nfa;
pub mod postfix;
pub mod simulate;
pub mod state;
pub mod subset;
pub mod syntax;
pub mod table;
pub mod thompson;
pub mod token;

pub use crate::dfa::Dfa;
pub use crate::error::{ErrorKind, RegexError};
pub use crate::minimize::minimize;
pub use crate::nfa::Nfa;
pub use crate::simulate::Automaton;
pub use crate::state::StateId;
pub use crate::syntax::Syntax;
pub use crate::table::TransitionTable;

/// Tokenizes and reorders `pattern`, returning the postfix sequence and the literal alphabet.
pub fn to_postfix(pattern: &str, syntax: &Syntax) -> Result<(Vec<Token>, BTreeSet<char>)> {
    let mut tokenizer = Tokenizer::new(pattern, syntax);
    let postfix = postfix::to_postfix(tokenizer.by_ref())?;
    Ok((postfix, tokenizer.into_alphabet()))
}

pub fn to_nfa(pattern: &str, syntax: &Syntax) -> Result<Nfa> {
    let (postfix, _) = to_postfix(pattern, syntax)?;
    thompson::build_nfa(&postfix)
}

pub fn to_dfa(nfa: &Nfa) -> Dfa {
    subset::subset_construction(nfa)
}

/// Every stage of the pipeline for one pattern.
#[derive(Debug, Clone, Getters)]
pub struct CompiledRegex {
    pattern: String,
    epsilon: char,
    postfix: Vec<Token>,
    alphabet: BTreeSet<char>,
    nfa: Nfa,
    dfa: Dfa,
    minimized: Dfa,
}

impl CompiledRegex {
    /// Membership through the minimized DFA.
    pub fn is_match(&self, input: &str) -> bool {
        self.minimized.simulate(input)
    }

    /// NFA, DFA and minimized DFA answers, in that order.
    pub fn stage_verdicts(&self, input: &str) -> [bool; 3] {
        [
            self.nfa.simulate(input),
            self.dfa.simulate(input),
            self.minimized.simulate(input),
        ]
    }

    pub fn tree(&self) -> Result<Expr> {
        Expr::from_postfix(&self.postfix)
    }

    /// Postfix tokens separated by spaces, written with the pattern's epsilon marker.
    pub fn postfix_text(&self) -> String {
        self.postfix.iter().map(|t| t.render(self.epsilon)).join(" ")
    }

    pub fn tree_text(&self) -> Result<String> {
        Ok(self.tree()?.display_with(self.epsilon).to_string())
    }

    pub fn nfa_table(&self) -> TransitionTable {
        TransitionTable::from_nfa(&self.nfa).with_epsilon(self.epsilon)
    }
}

pub fn compile_with(pattern: &str, syntax: &Syntax) -> Result<CompiledRegex> {
    let (postfix, alphabet) = to_postfix(pattern, syntax)?;
    let nfa = thompson::build_nfa(&postfix)?;
    let dfa = to_dfa(&nfa);
    let minimized = minimize(&dfa);

    debug!(
        "Compiled {:?}: NFA {} / DFA {} / minimal DFA {} states",
        pattern,
        nfa.len(),
        dfa.len(),
        minimized.len()
    );

    Ok(CompiledRegex {
        pattern: pattern.to_owned(),
        epsilon: *syntax.epsilon(),
        postfix,
        alphabet,
        nfa,
        dfa,
        minimized,
    })
}

/// Compiles `pattern` with the default [`Syntax`].
pub fn compile(pattern: &str) -> Result<CompiledRegex> {
    compile_with(pattern, &Syntax::default())
}
