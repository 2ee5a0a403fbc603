use fa_regex_compiler::Dfa;
use proc_macro2::TokenStream;
use quote::{quote, ToTokens};

/// The generated matcher: a unit struct whose tables hold one row per minimized DFA state.
pub struct Matcher {
    start: usize,
    rows: Vec<StateRow>,
}

impl Matcher {
    /// Minimized states are numbered densely from 0, so identifiers double as row indices.
    pub fn new(dfa: &Dfa) -> Self {
        let rows = dfa
            .states()
            .iter()
            .map(|s| StateRow {
                accepting: dfa.is_accepting(*s),
                transitions: dfa
                    .transitions_from(*s)
                    .map(|(c, t)| (u32::from(c), t.index()))
                    .collect(),
            })
            .collect();

        Matcher { start: dfa.start().index(), rows }
    }
}

impl ToTokens for Matcher {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let start = self.start;
        let count = self.rows.len();
        let accepting = self.rows.iter().map(|r| r.accepting);
        let rows = &self.rows;

        tokens.extend(quote! {
            {
                struct Regex;
                impl Regex {
                    const START: usize = #start;
                    const ACCEPTING: [bool; #count] = [#(#accepting),*];
                    const TRANSITIONS: [&'static [(u32, usize)]; #count] = [#(#rows),*];

                    pub const fn test(&self, s: &str) -> bool {
                        let mut state = Self::START;
                        let mut remaining = fa_regex_util::CharSlice::new(s);
                        while !remaining.is_empty() {
                            let (c, rest) = remaining.get_advance();
                            let row = Self::TRANSITIONS[state];
                            let mut i = 0;
                            while i < row.len() && row[i].0 != c {
                                i += 1;
                            }
                            if i == row.len() { return false; }
                            state = row[i].1;
                            remaining = rest;
                        }
                        Self::ACCEPTING[state]
                    }
                }
                Regex {}
            }
        });
    }
}

struct StateRow {
    accepting: bool,
    transitions: Vec<(u32, usize)>,
}

impl ToTokens for StateRow {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let pairs = self.transitions.iter().map(|(c, t)| quote! { (#c, #t) });
        tokens.extend(quote! { &[#(#pairs),*] });
    }
}
