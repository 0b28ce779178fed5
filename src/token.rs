use std::fmt;

use crate::diag::Position;

/// Kind of the "words" produced by `Scanner`.
///
/// There is no kind for illegal input: the scanner returns it as an `Err` carrying the offending
/// character and its position, and carries on with the next token.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    Eof,

    Integer,
    Identifier,

    // Operators
    Assign,
    AndAnd,
    OrOr,
    Bang,
    Less,
    EqualEqual,
    Plus,
    Star,
    Minus,
    LeftParen,
    RightParen,

    // Keywords
    Let,
    And,
    In,
    If,
    Then,
    Else,
    Recur,
    Loop,
    End,
}

impl TokenKind {
    /// Return the keyword kind spelled `name`, if any.
    pub fn keyword(name: &str) -> Option<TokenKind> {
        let kind = match name {
            "let" => TokenKind::Let,
            "and" => TokenKind::And,
            "in" => TokenKind::In,
            "if" => TokenKind::If,
            "then" => TokenKind::Then,
            "else" => TokenKind::Else,
            "recur" => TokenKind::Recur,
            "loop" => TokenKind::Loop,
            "end" => TokenKind::End,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Eof => write!(f, "EOF"),
            TokenKind::Integer => write!(f, "integer"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Assign => write!(f, "="),
            TokenKind::AndAnd => write!(f, "&&"),
            TokenKind::OrOr => write!(f, "||"),
            TokenKind::Bang => write!(f, "!"),
            TokenKind::Less => write!(f, "<"),
            TokenKind::EqualEqual => write!(f, "=="),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::Let => write!(f, "let"),
            TokenKind::And => write!(f, "and"),
            TokenKind::In => write!(f, "in"),
            TokenKind::If => write!(f, "if"),
            TokenKind::Then => write!(f, "then"),
            TokenKind::Else => write!(f, "else"),
            TokenKind::Recur => write!(f, "recur"),
            TokenKind::Loop => write!(f, "loop"),
            TokenKind::End => write!(f, "end"),
        }
    }
}

/// A classified piece of source text and where it starts.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub pos: Position,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, pos: Position) -> Token {
        Token {
            kind,
            literal: literal.into(),
            pos,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Integer | TokenKind::Identifier => write!(f, "{}", self.literal),
            kind => write!(f, "{}", kind),
        }
    }
}
