//! Recursive-descent evaluator for expression formulas.
//!
//! The grammar is deliberately small: integers, named variables, the
//! four arithmetic operators and parentheses. Evaluation uses checked
//! `i64` arithmetic; division truncates toward zero.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::error::CalculationError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unexpected token at offset {offset}")]
    UnexpectedToken { offset: usize },
    #[error("integer literal out of range at offset {offset}")]
    LiteralOutOfRange { offset: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(i64),
    Variable(String),
    Negate(Box<Expr>),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Names of every variable the expression reads.
    pub fn free_variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables(&self, names: &mut BTreeSet<String>) {
        match self {
            Self::Literal(_) => {}
            Self::Variable(name) => {
                names.insert(name.clone());
            }
            Self::Negate(inner) => inner.collect_variables(names),
            Self::Binary { lhs, rhs, .. } => {
                lhs.collect_variables(names);
                rhs.collect_variables(names);
            }
        }
    }

    pub fn eval(&self, scope: &BTreeMap<String, i64>) -> Result<i64, CalculationError> {
        match self {
            Self::Literal(value) => Ok(*value),
            Self::Variable(name) => scope
                .get(name)
                .copied()
                .ok_or_else(|| CalculationError::MissingVariable(name.clone())),
            Self::Negate(inner) => inner
                .eval(scope)?
                .checked_neg()
                .ok_or(CalculationError::ArithmeticOverflow { op: "negate" }),
            Self::Binary { op, lhs, rhs } => {
                let lhs = lhs.eval(scope)?;
                let rhs = rhs.eval(scope)?;
                match op {
                    BinOp::Add => lhs
                        .checked_add(rhs)
                        .ok_or(CalculationError::ArithmeticOverflow { op: "add" }),
                    BinOp::Sub => lhs
                        .checked_sub(rhs)
                        .ok_or(CalculationError::ArithmeticOverflow { op: "subtract" }),
                    BinOp::Mul => lhs
                        .checked_mul(rhs)
                        .ok_or(CalculationError::ArithmeticOverflow { op: "multiply" }),
                    BinOp::Div => {
                        if rhs == 0 {
                            return Err(CalculationError::DivisionByZero);
                        }
                        lhs.checked_div(rhs)
                            .ok_or(CalculationError::ArithmeticOverflow { op: "divide" })
                    }
                }
            }
        }
    }
}

pub fn parse(text: &str) -> Result<Expr, ExprError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr()?;
    if let Some(spanned) = parser.tokens.get(parser.pos) {
        return Err(ExprError::UnexpectedToken {
            offset: spanned.offset,
        });
    }
    Ok(expr)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Int(i64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq)]
struct Spanned {
    token: Token,
    offset: usize,
}

fn tokenize(text: &str) -> Result<Vec<Spanned>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some(&(offset, ch)) = chars.peek() {
        let token = match ch {
            c if c.is_ascii_whitespace() => {
                chars.next();
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            c if c.is_ascii_digit() => {
                let mut value: i64 = 0;
                while let Some(&(_, digit)) = chars.peek() {
                    match digit.to_digit(10) {
                        Some(digit) => {
                            value = value
                                .checked_mul(10)
                                .and_then(|v| v.checked_add(i64::from(digit)))
                                .ok_or(ExprError::LiteralOutOfRange { offset })?;
                            chars.next();
                        }
                        None => break,
                    }
                }
                tokens.push(Spanned {
                    token: Token::Int(value),
                    offset,
                });
                continue;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&(_, next)) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        ident.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Spanned {
                    token: Token::Ident(ident),
                    offset,
                });
                continue;
            }
            other => return Err(ExprError::UnexpectedChar { ch: other, offset }),
        };
        chars.next();
        tokens.push(Spanned { token, offset });
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|spanned| &spanned.token)
    }

    fn parse_expr(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_term()?;
            left = Expr::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ExprError> {
        if matches!(self.peek(), Some(Token::Minus)) {
            self.pos += 1;
            let operand = self.parse_unary()?;
            return Ok(Expr::Negate(Box::new(operand)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        let spanned = self.tokens.get(self.pos).ok_or(ExprError::UnexpectedEnd)?;
        let offset = spanned.offset;
        match &spanned.token {
            Token::Int(value) => {
                let value = *value;
                self.pos += 1;
                Ok(Expr::Literal(value))
            }
            Token::Ident(name) => {
                let name = name.clone();
                self.pos += 1;
                Ok(Expr::Variable(name))
            }
            Token::LParen => {
                self.pos += 1;
                let inner = self.parse_expr()?;
                match self.tokens.get(self.pos) {
                    Some(Spanned {
                        token: Token::RParen,
                        ..
                    }) => {
                        self.pos += 1;
                        Ok(inner)
                    }
                    Some(other) => Err(ExprError::UnexpectedToken {
                        offset: other.offset,
                    }),
                    None => Err(ExprError::UnexpectedEnd),
                }
            }
            _ => Err(ExprError::UnexpectedToken { offset }),
        }
    }
}
