use derive_getters::Getters;
use std::collections::BTreeSet;

/// Characters with an operator meaning outside of a character class.
pub const RESERVED: [char; 9] = ['(', ')', '[', ']', '|', '*', '+', '?', '\\'];

pub const DEFAULT_EPSILON: char = 'ε';

/// Lexical configuration handed to the tokenizer.
///
/// Decides which characters may appear as bare literals, which character stands for the empty
/// string and whether whitespace between atoms is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Syntax {
    literals: BTreeSet<char>,
    epsilon: char,
    skip_whitespace: bool,
}

impl Default for Syntax {
    fn default() -> Self {
        let literals = (0u8..=127)
            .map(char::from)
            .filter(|c| c.is_ascii_alphanumeric() || c.is_ascii_punctuation())
            .filter(|c| !RESERVED.contains(c))
            .collect();

        Syntax {
            literals,
            epsilon: DEFAULT_EPSILON,
            skip_whitespace: true,
        }
    }
}

impl Syntax {
    /// A syntax accepting exactly the given literal characters.
    /// Reserved operator characters are dropped from the set.
    pub fn with_literals<I: IntoIterator<Item = char>>(literals: I) -> Self {
        Syntax {
            literals: literals.into_iter().filter(|c| !RESERVED.contains(c)).collect(),
            ..Syntax::default()
        }
    }

    /// Adds more literal characters.
    pub fn allow<I: IntoIterator<Item = char>>(mut self, extra: I) -> Self {
        self.literals
            .extend(extra.into_iter().filter(|c| !RESERVED.contains(c)));
        self
    }

    pub fn with_epsilon(mut self, epsilon: char) -> Self {
        self.epsilon = epsilon;
        self.literals.remove(&epsilon);
        self
    }

    pub fn with_skip_whitespace(mut self, skip_whitespace: bool) -> Self {
        self.skip_whitespace = skip_whitespace;
        self
    }

    #[inline]
    pub fn is_literal(&self, c: char) -> bool {
        c != self.epsilon && self.literals.contains(&c)
    }
}
