use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegexError>;

/// Category of a [`RegexError`], without the location details.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidCharacter,
    MalformedCharacterClass,
    UnbalancedParentheses,
    DanglingOperator,
    EmptyExpression,
}

/// Everything that can go wrong while turning pattern text into an automaton.
///
/// Positions are byte offsets into the pattern for errors raised by the tokenizer, token
/// indices for errors raised while reordering to postfix, and indices into the postfix
/// sequence for errors raised by the Thompson construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegexError {
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("malformed character class at position {position}: {reason}")]
    MalformedCharacterClass { position: usize, reason: &'static str },

    #[error("unbalanced parentheses at position {position}")]
    UnbalancedParentheses { position: usize },

    #[error("operator {operator:?} is missing an operand at position {position}")]
    DanglingOperator { operator: char, position: usize },

    #[error("empty expression")]
    EmptyExpression,
}

impl RegexError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegexError::InvalidCharacter { .. } => ErrorKind::InvalidCharacter,
            RegexError::MalformedCharacterClass { .. } => ErrorKind::MalformedCharacterClass,
            RegexError::UnbalancedParentheses { .. } => ErrorKind::UnbalancedParentheses,
            RegexError::DanglingOperator { .. } => ErrorKind::DanglingOperator,
            RegexError::EmptyExpression => ErrorKind::EmptyExpression,
        }
    }
}
