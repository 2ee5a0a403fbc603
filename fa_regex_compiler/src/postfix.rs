use crate::error::{RegexError, Result};
use crate::token::Token;
use log::trace;
use std::fmt::{Display, Formatter};

/// Converts an infix token stream into postfix order (shunting-yard).
///
/// All operators are left associative. Besides parenthesis matching this checks that every
/// operator has its operands, so the output is always a well-formed postfix expression.
/// Error positions are indices into the token stream.
pub fn to_postfix<I>(tokens: I) -> Result<Vec<Token>>
where
    I: IntoIterator<Item = Result<Token>>,
{
    let mut output = Vec::new();
    let mut operators: Vec<(Token, usize)> = Vec::new();

    let mut previous: Option<Token> = None;
    let mut after_operand = false;

    for (position, token) in tokens.into_iter().enumerate() {
        let token = token?;

        match token {
            Token::Literal(_) | Token::Epsilon => {
                output.push(token);
                after_operand = true;
            }
            Token::LParen => {
                operators.push((token, position));
                after_operand = false;
            }
            Token::RParen => {
                if !operators.iter().any(|(t, _)| *t == Token::LParen) {
                    return Err(RegexError::UnbalancedParentheses { position });
                }
                if !after_operand {
                    return Err(match previous {
                        Some(Token::LParen) => RegexError::EmptyExpression,
                        other => RegexError::DanglingOperator {
                            operator: other.map_or(')', |t| t.symbol()),
                            position: position - 1,
                        },
                    });
                }
                while let Some((op, _)) = operators.pop() {
                    if op == Token::LParen {
                        break;
                    }
                    output.push(op);
                }
                after_operand = true;
            }
            op => {
                if !after_operand {
                    return Err(RegexError::DanglingOperator { operator: op.symbol(), position });
                }
                let precedence = op.precedence();
                while let Some((top, _)) = operators.last() {
                    if *top == Token::LParen || top.precedence() < precedence {
                        break;
                    }
                    output.push(*top);
                    operators.pop();
                }
                operators.push((op, position));
                after_operand = op.is_quantifier();
            }
        }

        previous = Some(token);
    }

    match previous {
        None => return Err(RegexError::EmptyExpression),
        Some(Token::LParen) => {
            let position = operators.last().map_or(0, |(_, p)| *p);
            return Err(RegexError::UnbalancedParentheses { position });
        }
        Some(t) if !after_operand => {
            let position = operators.last().map_or(0, |(_, p)| *p);
            return Err(RegexError::DanglingOperator { operator: t.symbol(), position });
        }
        _ => {}
    }

    while let Some((op, position)) = operators.pop() {
        if op == Token::LParen {
            return Err(RegexError::UnbalancedParentheses { position });
        }
        output.push(op);
    }

    trace!("Postfix: {:?}", output);
    Ok(output)
}

/// Something built bottom-up from a postfix sequence with a value stack.
pub trait PostfixBuilder {
    type Output;

    fn operand(&mut self, token: Token) -> Self::Output;

    fn unary(&mut self, op: Token, operand: Self::Output) -> Self::Output;

    fn binary(&mut self, op: Token, left: Self::Output, right: Self::Output) -> Self::Output;
}

/// Evaluates `postfix` with `builder`.
/// Fails if an operator lacks operands or if more than one value is left at the end.
pub fn fold_postfix<B: PostfixBuilder>(postfix: &[Token], builder: &mut B) -> Result<B::Output> {
    let mut stack: Vec<B::Output> = Vec::new();

    let missing = |op: &Token, position: usize| RegexError::DanglingOperator {
        operator: op.symbol(),
        position,
    };

    for (position, token) in postfix.iter().enumerate() {
        match token {
            Token::Literal(_) | Token::Epsilon => {
                let value = builder.operand(*token);
                stack.push(value);
            }
            Token::Star | Token::Plus | Token::Question => {
                let x = stack.pop().ok_or_else(|| missing(token, position))?;
                let value = builder.unary(*token, x);
                stack.push(value);
            }
            Token::Concat | Token::Union => {
                let y = stack.pop().ok_or_else(|| missing(token, position))?;
                let x = stack.pop().ok_or_else(|| missing(token, position))?;
                let value = builder.binary(*token, x, y);
                stack.push(value);
            }
            Token::LParen | Token::RParen => {
                return Err(RegexError::UnbalancedParentheses { position });
            }
        }
    }

    let result = stack.pop().ok_or(RegexError::EmptyExpression)?;
    if !stack.is_empty() {
        return Err(missing(&Token::Concat, postfix.len()));
    }
    Ok(result)
}

/// Expression tree, rebuilt from the postfix form for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(char),
    Epsilon,
    Concat(Box<Expr>, Box<Expr>),
    Union(Box<Expr>, Box<Expr>),
    Star(Box<Expr>),
    Plus(Box<Expr>),
    Question(Box<Expr>),
}

struct ExprBuilder;

impl PostfixBuilder for ExprBuilder {
    type Output = Expr;

    fn operand(&mut self, token: Token) -> Expr {
        match token {
            Token::Literal(c) => Expr::Literal(c),
            _ => Expr::Epsilon,
        }
    }

    fn unary(&mut self, op: Token, operand: Expr) -> Expr {
        let operand = Box::new(operand);
        match op {
            Token::Star => Expr::Star(operand),
            Token::Plus => Expr::Plus(operand),
            _ => Expr::Question(operand),
        }
    }

    fn binary(&mut self, op: Token, left: Expr, right: Expr) -> Expr {
        match op {
            Token::Union => Expr::Union(Box::new(left), Box::new(right)),
            _ => Expr::Concat(Box::new(left), Box::new(right)),
        }
    }
}

impl Expr {
    pub fn from_postfix(postfix: &[Token]) -> Result<Expr> {
        fold_postfix(postfix, &mut ExprBuilder)
    }

    /// Fully parenthesized text, printing the empty string as `epsilon`.
    pub fn display_with(&self, epsilon: char) -> ExprDisplay<'_> {
        ExprDisplay { expr: self, epsilon }
    }
}

pub struct ExprDisplay<'a> {
    expr: &'a Expr,
    epsilon: char,
}

impl Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let e = self.epsilon;
        match self.expr {
            Expr::Literal(c) => write!(f, "{}", Token::Literal(*c).render(e)),
            Expr::Epsilon => write!(f, "{}", Token::Epsilon.render(e)),
            Expr::Concat(x, y) => write!(f, "({}.{})", x.display_with(e), y.display_with(e)),
            Expr::Union(x, y) => write!(f, "({}|{})", x.display_with(e), y.display_with(e)),
            Expr::Star(x) => write!(f, "{}*", x.display_with(e)),
            Expr::Plus(x) => write!(f, "{}+", x.display_with(e)),
            Expr::Question(x) => write!(f, "{}?", x.display_with(e)),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_with(crate::syntax::DEFAULT_EPSILON))
    }
}
