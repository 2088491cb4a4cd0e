//! Formula parser - converts expression text into an AST.
//!
//! Supports numbers, cell references (A1), unary `+`/`-`, the four basic
//! arithmetic operators and parentheses. The leading `=` is stripped by the
//! caller before the text reaches this module. Nesting deeper than
//! [`MAX_FORMULA_DEPTH`] is rejected.

use thiserror::Error;

use super::config::MAX_FORMULA_DEPTH;
use super::position::Position;

/// Expression text that could not be parsed.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{message} at offset {offset}")]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, offset: usize) -> ParseError {
        ParseError {
            message: message.into(),
            offset,
        }
    }
}

/// Parsed formula. Parentheses are not kept; precedence is in the shape.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    /// A reference as written. Out-of-bounds labels hold [`Position::NONE`].
    Cell(Position),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }
}

impl UnaryOp {
    pub fn symbol(self) -> char {
        match self {
            UnaryOp::Plus => '+',
            UnaryOp::Minus => '-',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Cell(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

/// Parse expression text into an AST.
pub fn parse(expression: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(ParseError::new("Empty formula", 0));
    }
    let (expr, pos, _) = parse_add_sub(&tokens, 0, expression.len(), 0)?;
    if let Some((token, offset)) = tokens.get(pos) {
        return Err(ParseError::new(
            format!("Unexpected token {:?}", token),
            *offset,
        ));
    }
    Ok(expr)
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => { chars.next(); }
            '+' => { tokens.push((Token::Plus, offset)); chars.next(); }
            '-' => { tokens.push((Token::Minus, offset)); chars.next(); }
            '*' => { tokens.push((Token::Star, offset)); chars.next(); }
            '/' => { tokens.push((Token::Slash, offset)); chars.next(); }
            '(' => { tokens.push((Token::LParen, offset)); chars.next(); }
            ')' => { tokens.push((Token::RParen, offset)); chars.next(); }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if ch.is_ascii_digit() || ch == '.' {
                        literal.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                // Optional exponent: e, E followed by an optionally signed integer.
                if let Some(&(_, 'e' | 'E')) = chars.peek() {
                    literal.push('e');
                    chars.next();
                    if let Some(&(_, sign @ ('+' | '-'))) = chars.peek() {
                        literal.push(sign);
                        chars.next();
                    }
                    while let Some(&(_, ch)) = chars.peek() {
                        if ch.is_ascii_digit() {
                            literal.push(ch);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                }
                let n = literal
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| ParseError::new(format!("Invalid number: {}", literal), offset))?;
                tokens.push((Token::Number(n), offset));
            }
            'A'..='Z' => {
                let mut label = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if ch.is_ascii_uppercase() {
                        label.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let letters = label.len();
                while let Some(&(_, ch)) = chars.peek() {
                    if ch.is_ascii_digit() {
                        label.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if label.len() == letters {
                    return Err(ParseError::new(
                        format!("Expected row number after {}", label),
                        offset,
                    ));
                }
                tokens.push((Token::Cell(label), offset));
            }
            other => {
                return Err(ParseError::new(
                    format!("Unexpected character '{}'", other),
                    offset,
                ));
            }
        }
    }

    Ok(tokens)
}

/// A subtree, the index of the token after it, and its height.
type Parsed = Result<(Expr, usize, usize), ParseError>;

fn offset_at(tokens: &[(Token, usize)], pos: usize, end: usize) -> usize {
    tokens.get(pos).map_or(end, |(_, offset)| *offset)
}

fn too_deep(tokens: &[(Token, usize)], pos: usize, end: usize) -> ParseError {
    ParseError::new("Formula nested too deeply", offset_at(tokens, pos, end))
}

/// Height of a new node over a child of height `height`.
fn nest(
    height: usize,
    tokens: &[(Token, usize)],
    pos: usize,
    end: usize,
) -> Result<usize, ParseError> {
    if height >= MAX_FORMULA_DEPTH {
        return Err(too_deep(tokens, pos, end));
    }
    Ok(height + 1)
}

fn parse_add_sub(tokens: &[(Token, usize)], pos: usize, end: usize, depth: usize) -> Parsed {
    let (mut left, mut pos, mut height) = parse_mul_div(tokens, pos, end, depth)?;

    while let Some((token, _)) = tokens.get(pos) {
        let op = match token {
            Token::Plus => BinaryOp::Add,
            Token::Minus => BinaryOp::Sub,
            _ => break,
        };
        let (right, next, right_height) = parse_mul_div(tokens, pos + 1, end, depth)?;
        height = nest(height.max(right_height), tokens, pos, end)?;
        left = Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
        pos = next;
    }

    Ok((left, pos, height))
}

fn parse_mul_div(tokens: &[(Token, usize)], pos: usize, end: usize, depth: usize) -> Parsed {
    let (mut left, mut pos, mut height) = parse_unary(tokens, pos, end, depth)?;

    while let Some((token, _)) = tokens.get(pos) {
        let op = match token {
            Token::Star => BinaryOp::Mul,
            Token::Slash => BinaryOp::Div,
            _ => break,
        };
        let (right, next, right_height) = parse_unary(tokens, pos + 1, end, depth)?;
        height = nest(height.max(right_height), tokens, pos, end)?;
        left = Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
        pos = next;
    }

    Ok((left, pos, height))
}

fn parse_unary(tokens: &[(Token, usize)], pos: usize, end: usize, depth: usize) -> Parsed {
    if depth >= MAX_FORMULA_DEPTH {
        return Err(too_deep(tokens, pos, end));
    }
    let op = match tokens.get(pos) {
        Some((Token::Plus, _)) => UnaryOp::Plus,
        Some((Token::Minus, _)) => UnaryOp::Minus,
        _ => return parse_primary(tokens, pos, end, depth),
    };
    let (operand, next, height) = parse_unary(tokens, pos + 1, end, depth + 1)?;
    Ok((
        Expr::Unary {
            op,
            operand: Box::new(operand),
        },
        next,
        nest(height, tokens, pos, end)?,
    ))
}

fn parse_primary(tokens: &[(Token, usize)], pos: usize, end: usize, depth: usize) -> Parsed {
    match tokens.get(pos) {
        Some((Token::Number(n), _)) => Ok((Expr::Number(*n), pos + 1, 1)),
        Some((Token::Cell(label), _)) => {
            Ok((Expr::Cell(Position::from_str(label)), pos + 1, 1))
        }
        Some((Token::LParen, _)) => {
            let (inner, next, height) = parse_add_sub(tokens, pos + 1, end, depth + 1)?;
            match tokens.get(next) {
                Some((Token::RParen, _)) => Ok((inner, next + 1, height)),
                _ => Err(ParseError::new(
                    "Expected closing parenthesis",
                    offset_at(tokens, next, end),
                )),
            }
        }
        Some((token, offset)) => Err(ParseError::new(
            format!("Unexpected token {:?}", token),
            *offset,
        )),
        None => Err(ParseError::new("Unexpected end of formula", end)),
    }
}
