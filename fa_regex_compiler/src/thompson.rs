use crate::error::Result;
use crate::nfa::{Nfa, Symbol};
use crate::postfix::{fold_postfix, PostfixBuilder};
use crate::state::StateId;
use crate::token::Token;
use log::debug;
use std::collections::BTreeSet;

/// A piece of NFA with one entry and one exit.
///
/// Nothing enters `start` and nothing leaves `accept` until an enclosing composition wires
/// them up; `accept` is the only state of the fragment flagged accepting.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub start: StateId,
    pub accept: StateId,
}

/// Builds an NFA by structural induction over a postfix expression.
pub struct Thompson {
    nfa: Nfa,
    alphabet: BTreeSet<char>,
}

impl Default for Thompson {
    fn default() -> Self {
        Thompson::new()
    }
}

impl Thompson {
    pub fn new() -> Self {
        Thompson {
            nfa: Nfa::new(),
            alphabet: BTreeSet::new(),
        }
    }

    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    fn state(&mut self) -> StateId {
        self.nfa.add_state()
    }

    fn accept_state(&mut self) -> StateId {
        let s = self.nfa.add_state();
        self.nfa.set_accepting_flag(s, true);
        s
    }

    fn epsilon(&mut self, from: StateId, to: StateId) {
        self.nfa.add_transition(from, Symbol::Epsilon, to);
    }

    /// `S -a-> A`
    pub fn literal(&mut self, c: char) -> Fragment {
        let start = self.state();
        let accept = self.accept_state();
        self.nfa.add_transition(start, Symbol::Char(c), accept);
        self.alphabet.insert(c);
        Fragment { start, accept }
    }

    /// `S -ε-> A`
    pub fn empty(&mut self) -> Fragment {
        let start = self.state();
        let accept = self.accept_state();
        self.epsilon(start, accept);
        Fragment { start, accept }
    }

    pub fn concat(&mut self, x: Fragment, y: Fragment) -> Fragment {
        self.epsilon(x.accept, y.start);
        self.nfa.set_accepting_flag(x.accept, false);
        Fragment {
            start: x.start,
            accept: y.accept,
        }
    }

    pub fn union(&mut self, x: Fragment, y: Fragment) -> Fragment {
        let start = self.state();
        let accept = self.accept_state();
        self.epsilon(start, x.start);
        self.epsilon(start, y.start);
        self.epsilon(x.accept, accept);
        self.epsilon(y.accept, accept);
        self.nfa.set_accepting_flag(x.accept, false);
        self.nfa.set_accepting_flag(y.accept, false);
        Fragment { start, accept }
    }

    /// Shared shape of `*`, `+` and `?`: a new start and accept around `x`, with an optional
    /// bypass (zero passes) and an optional loop back (repetition).
    fn repeat(&mut self, x: Fragment, bypass: bool, loop_back: bool) -> Fragment {
        let start = self.state();
        let accept = self.accept_state();
        self.epsilon(start, x.start);
        if bypass {
            self.epsilon(start, accept);
        }
        if loop_back {
            self.epsilon(x.accept, x.start);
        }
        self.epsilon(x.accept, accept);
        self.nfa.set_accepting_flag(x.accept, false);
        Fragment { start, accept }
    }

    pub fn star(&mut self, x: Fragment) -> Fragment {
        self.repeat(x, true, true)
    }

    pub fn plus(&mut self, x: Fragment) -> Fragment {
        self.repeat(x, false, true)
    }

    pub fn question(&mut self, x: Fragment) -> Fragment {
        self.repeat(x, true, false)
    }

    /// Turns the last remaining fragment into the finished NFA.
    pub fn finish(mut self, fragment: Fragment) -> Nfa {
        self.nfa.finish(fragment.start, fragment.accept, self.alphabet);
        debug!(
            "Thompson NFA: {} states, alphabet {:?}",
            self.nfa.len(),
            self.nfa.alphabet()
        );
        self.nfa
    }
}

impl PostfixBuilder for Thompson {
    type Output = Fragment;

    fn operand(&mut self, token: Token) -> Fragment {
        match token {
            Token::Literal(c) => self.literal(c),
            _ => self.empty(),
        }
    }

    fn unary(&mut self, op: Token, operand: Fragment) -> Fragment {
        match op {
            Token::Star => self.star(operand),
            Token::Plus => self.plus(operand),
            _ => self.question(operand),
        }
    }

    fn binary(&mut self, op: Token, left: Fragment, right: Fragment) -> Fragment {
        match op {
            Token::Union => self.union(left, right),
            _ => self.concat(left, right),
        }
    }
}

/// Builds the NFA for a postfix expression.
pub fn build_nfa(postfix: &[Token]) -> Result<Nfa> {
    let mut thompson = Thompson::new();
    let fragment = fold_postfix(postfix, &mut thompson)?;
    Ok(thompson.finish(fragment))
}
