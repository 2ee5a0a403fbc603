use crate::error::{RegexError, Result};
use crate::syntax::Syntax;
use either::{Either, Left, Right};
use itertools::Itertools;
use nom::character::complete::anychar;
use nom::character::complete::char as cchar;
use nom::error::Error;
use nom::IResult;
use std::collections::{BTreeSet, VecDeque};
use std::fmt::{Display, Formatter};
use std::iter::FusedIterator;

type NResult<'a, T> = IResult<&'a str, T>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    LParen,
    RParen,
    Literal(char),
    /// The explicit empty-string marker.
    Epsilon,
    Concat,
    Union,
    Star,
    Plus,
    Question,
}

impl Token {
    pub fn is_operand(&self) -> bool {
        matches!(self, Token::Literal(_) | Token::Epsilon)
    }

    pub fn is_quantifier(&self) -> bool {
        matches!(self, Token::Star | Token::Plus | Token::Question)
    }

    /// Binding strength used by the shunting-yard conversion. Operands have none.
    pub fn precedence(&self) -> Option<u8> {
        match self {
            Token::LParen | Token::RParen => Some(1),
            Token::Union => Some(2),
            Token::Concat => Some(3),
            Token::Star | Token::Plus | Token::Question => Some(4),
            Token::Literal(_) | Token::Epsilon => None,
        }
    }

    /// Pattern text for this token when `epsilon` marks the empty string. Literals that would
    /// read back as an operator or as the marker are escaped.
    pub fn render(&self, epsilon: char) -> String {
        match self {
            Token::Epsilon => epsilon.to_string(),
            Token::Literal(c) if crate::syntax::RESERVED.contains(c) || *c == '.' || *c == epsilon => {
                format!("\\{c}")
            }
            t => t.symbol().to_string(),
        }
    }

    /// Character used for this token in error messages.
    pub fn symbol(&self) -> char {
        match self {
            Token::LParen => '(',
            Token::RParen => ')',
            Token::Literal(c) => *c,
            Token::Epsilon => crate::syntax::DEFAULT_EPSILON,
            Token::Concat => '.',
            Token::Union => '|',
            Token::Star => '*',
            Token::Plus => '+',
            Token::Question => '?',
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(crate::syntax::DEFAULT_EPSILON))
    }
}

const UNTERMINATED: &str = "missing closing ']'";

/// Parses the body of a character class, the opening `[` already consumed.
/// Returns the remaining input and the distinct members in order of first appearance.
fn parse_class(input: &str) -> std::result::Result<(&str, Vec<char>), &'static str> {
    let mut items: Vec<Either<char, (char, char)>> = Vec::new();
    let mut range_start = false;

    let mut rm = input;
    loop {
        let (r, c) = anychar::<_, Error<_>>(rm).map_err(|_| UNTERMINATED)?;
        rm = r;

        match c {
            ']' => break,
            '\\' => {
                let (r, escaped) = anychar::<_, Error<_>>(rm).map_err(|_| UNTERMINATED)?;
                rm = r;
                if escaped == 'n' {
                    items.push(Left('\\'));
                }
                items.push(Left(escaped));
                range_start = true;
            }
            '-' if range_start => {
                if cchar::<_, Error<_>>(']')(rm).is_ok() || rm.is_empty() {
                    items.push(Left('-'));
                    continue;
                }
                let (r, end) = class_range_end(rm).map_err(|_| UNTERMINATED)?;
                rm = r;
                if let Some(Left(start)) = items.pop() {
                    items.push(Right((start, end)));
                }
                range_start = false;
            }
            c => {
                items.push(Left(c));
                range_start = true;
            }
        }
    }

    if items.is_empty() {
        return Err("empty character class");
    }

    let members = items
        .into_iter()
        .flat_map(|item| match item {
            Left(c) => c..=c,
            Right((a, b)) if a <= b => a..=b,
            Right((a, b)) => b..=a,
        })
        .unique()
        .collect();

    Ok((rm, members))
}

/// The right end of a range, which may be escaped.
fn class_range_end(input: &str) -> NResult<'_, char> {
    let (r, c) = anychar::<_, Error<_>>(input)?;
    if c == '\\' {
        anychar(r)
    } else {
        Ok((r, c))
    }
}

/// Lazily turns pattern text into tokens, making concatenation explicit.
///
/// The sequence is single pass: once an error has been yielded the tokenizer ends. Every
/// literal symbol produced is recorded in an alphabet available through
/// [`Tokenizer::alphabet`].
pub struct Tokenizer<'a> {
    syntax: &'a Syntax,
    pattern: &'a str,
    rest: &'a str,
    pending: VecDeque<Token>,
    alphabet: BTreeSet<char>,
    ends_operand: bool,
    done: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(pattern: &'a str, syntax: &'a Syntax) -> Self {
        Tokenizer {
            syntax,
            pattern,
            rest: pattern,
            pending: VecDeque::new(),
            alphabet: BTreeSet::new(),
            ends_operand: false,
            done: false,
        }
    }

    /// Distinct literal symbols seen so far.
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    pub fn into_alphabet(self) -> BTreeSet<char> {
        self.alphabet
    }

    /// Byte offset of the next unread character.
    pub fn offset(&self) -> usize {
        self.pattern.len() - self.rest.len()
    }

    fn begin_operand(&mut self) {
        if self.ends_operand {
            self.pending.push_back(Token::Concat);
        }
        self.ends_operand = true;
    }

    fn literal(&mut self, c: char) {
        self.alphabet.insert(c);
        self.pending.push_back(Token::Literal(c));
    }

    /// Reads one lexeme and queues its tokens. Returns false once the input is exhausted.
    fn lex(&mut self) -> Result<bool> {
        let position = self.offset();
        let (rest, c) = match anychar::<_, Error<_>>(self.rest) {
            Ok(v) => v,
            Err(_) => return Ok(false),
        };

        match c {
            c if *self.syntax.skip_whitespace() && c.is_whitespace() => {}
            '(' => {
                if self.ends_operand {
                    self.pending.push_back(Token::Concat);
                }
                self.pending.push_back(Token::LParen);
                self.ends_operand = false;
            }
            ')' => {
                self.pending.push_back(Token::RParen);
                self.ends_operand = true;
            }
            '|' => {
                self.pending.push_back(Token::Union);
                self.ends_operand = false;
            }
            '*' | '+' | '?' => {
                self.pending.push_back(match c {
                    '*' => Token::Star,
                    '+' => Token::Plus,
                    _ => Token::Question,
                });
                self.ends_operand = true;
            }
            '[' => {
                let (r, members) = parse_class(rest)
                    .map_err(|reason| RegexError::MalformedCharacterClass { position, reason })?;
                self.rest = r;
                self.begin_operand();
                self.pending.push_back(Token::LParen);
                for (i, m) in members.into_iter().enumerate() {
                    if i > 0 {
                        self.pending.push_back(Token::Union);
                    }
                    self.literal(m);
                }
                self.pending.push_back(Token::RParen);
                return Ok(true);
            }
            '\\' => {
                let (r, escaped) = anychar::<_, Error<_>>(rest).map_err(|_| {
                    RegexError::InvalidCharacter { character: '\\', position }
                })?;
                self.rest = r;
                self.begin_operand();
                if escaped == 'n' {
                    self.pending.push_back(Token::LParen);
                    self.literal('\\');
                    self.pending.push_back(Token::Concat);
                    self.literal('n');
                    self.pending.push_back(Token::RParen);
                } else {
                    self.literal(escaped);
                }
                return Ok(true);
            }
            c if c == *self.syntax.epsilon() => {
                self.begin_operand();
                self.pending.push_back(Token::Epsilon);
            }
            c if self.syntax.is_literal(c) => {
                self.begin_operand();
                self.literal(c);
            }
            c => {
                return Err(RegexError::InvalidCharacter { character: c, position });
            }
        }

        self.rest = rest;
        Ok(true)
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(t) = self.pending.pop_front() {
                return Some(Ok(t));
            }
            if self.done {
                return None;
            }
            match self.lex() {
                Ok(true) => {}
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl FusedIterator for Tokenizer<'_> {}

/// Tokenizes the whole pattern eagerly.
pub fn tokenize(pattern: &str, syntax: &Syntax) -> Result<(Vec<Token>, BTreeSet<char>)> {
    let mut tokenizer = Tokenizer::new(pattern, syntax);
    let tokens = tokenizer.by_ref().collect::<Result<Vec<_>>>()?;
    Ok((tokens, tokenizer.into_alphabet()))
}
