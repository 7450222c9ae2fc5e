//! Restricted arithmetic for angle input.
//!
//! Grammar (whitespace ignored between tokens):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := number | 'pi' | 'π' | '(' expr ')'
//! ```
//!
//! Nothing outside this grammar is evaluated.

use std::f64::consts::PI;
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

const MAX_DEPTH: usize = 64;

/// Errors from [`evaluate_expression`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// A character outside the accepted set
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),
    /// A malformed number literal
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    /// Input ended where an operand was expected
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    /// A token in a position the grammar does not allow
    #[error("unexpected token `{0}`")]
    UnexpectedToken(String),
    /// Division with a zero divisor
    #[error("division by zero")]
    DivisionByZero,
    /// Result overflowed to infinity
    #[error("result is not a finite number")]
    NonFinite,
    /// Parentheses nested deeper than allowed
    #[error("expression nested too deeply")]
    TooDeep,
}

/// Value of an evaluated expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluated {
    /// Numeric result
    pub value: f64,
    /// Whether π appeared anywhere in the input
    pub uses_pi: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Pi,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Token {
    fn describe(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Pi => "π".to_string(),
            Self::Plus => "+".to_string(),
            Self::Minus => "-".to_string(),
            Self::Star => "*".to_string(),
            Self::Slash => "/".to_string(),
            Self::LParen => "(".to_string(),
            Self::RParen => ")".to_string(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => tokens.push(read_number(&mut chars)?),
            'p' | 'P' => {
                chars.next();
                match chars.next() {
                    Some('i' | 'I') => tokens.push(Token::Pi),
                    Some(other) => return Err(ExprError::UnexpectedChar(other)),
                    None => return Err(ExprError::UnexpectedChar(c)),
                }
            }
            'π' => {
                chars.next();
                tokens.push(Token::Pi);
            }
            '+' | '-' | '*' | '/' | '(' | ')' => {
                chars.next();
                tokens.push(match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '(' => Token::LParen,
                    _ => Token::RParen,
                });
            }
            other => return Err(ExprError::UnexpectedChar(other)),
        }
    }
    Ok(tokens)
}

fn read_number(chars: &mut Peekable<Chars<'_>>) -> Result<Token, ExprError> {
    let mut literal = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() || c == '.' {
            literal.push(c);
            chars.next();
        } else {
            break;
        }
    }
    literal
        .parse::<f64>()
        .map(Token::Number)
        .map_err(|_| ExprError::InvalidNumber(literal))
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    uses_pi: bool,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<f64, ExprError> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.advance();
            let rhs = self.term()?;
            value = if op == Token::Plus {
                value + rhs
            } else {
                value - rhs
            };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, ExprError> {
        let mut value = self.unary()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.advance();
            let rhs = self.unary()?;
            value = if op == Token::Star {
                value * rhs
            } else {
                if rhs == 0.0 {
                    return Err(ExprError::DivisionByZero);
                }
                value / rhs
            };
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, ExprError> {
        match self.peek() {
            Some(Token::Plus) => {
                self.advance();
                self.nested(Self::unary)
            }
            Some(Token::Minus) => {
                self.advance();
                Ok(-self.nested(Self::unary)?)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, ExprError> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::Pi) => {
                self.uses_pi = true;
                Ok(PI)
            }
            Some(Token::LParen) => {
                let value = self.nested(Self::expr)?;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    Some(other) => Err(ExprError::UnexpectedToken(other.describe())),
                    None => Err(ExprError::UnexpectedEnd),
                }
            }
            Some(other) => Err(ExprError::UnexpectedToken(other.describe())),
            None => Err(ExprError::UnexpectedEnd),
        }
    }

    fn nested(&mut self, rule: fn(&mut Self) -> Result<f64, ExprError>) -> Result<f64, ExprError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExprError::TooDeep);
        }
        let result = rule(self);
        self.depth -= 1;
        result
    }
}

/// Evaluate a restricted arithmetic expression.
///
/// # Errors
///
/// Returns an [`ExprError`] for characters or token sequences outside the
/// grammar, division by zero, or a non-finite result.
///
/// # Examples
///
/// ```
/// use axis_core::angle::evaluate_expression;
///
/// let evaluated = evaluate_expression("(1 + 2) / 3 * pi").expect("valid expression");
/// assert!(evaluated.uses_pi);
/// assert!((evaluated.value - std::f64::consts::PI).abs() < 1e-12);
/// ```
pub fn evaluate_expression(input: &str) -> Result<Evaluated, ExprError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        uses_pi: false,
    };

    let value = parser.expr()?;
    if let Some(extra) = parser.peek() {
        return Err(ExprError::UnexpectedToken(extra.describe()));
    }
    if !value.is_finite() {
        return Err(ExprError::NonFinite);
    }

    Ok(Evaluated {
        value,
        uses_pi: parser.uses_pi,
    })
}
