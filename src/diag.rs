use std::error::Error;
use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub struct FullParseError {
    pub pos: Position,
    pub error: ParseError,
}

impl fmt::Display for FullParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "syntax error: {}: {}", self.pos, self.error)
    }
}

impl Error for FullParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

/// Location of a character in the source, both starting at one.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Position {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum ParseError {
    UnexpectedToken(String, String),
    BadChar(char),
    /// First char of a two-char operator and the char actually found after it.
    UnpairedOperator(char, Option<char>),
    BadIntegerLiteral(String),
    ExpectedExpression(String),
    ExpectedIdentifier(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedToken(unexpected, expected) => write!(
                f,
                "unexpected token '{}', expected '{}'",
                unexpected, expected
            ),
            ParseError::BadChar(ch) => {
                write!(f, "unexpected character: {}", ch)
            }
            ParseError::UnpairedOperator(op, Some(found)) => {
                write!(f, "expected '{}{}', got '{}' instead", op, op, found)
            }
            ParseError::UnpairedOperator(op, None) => {
                write!(f, "expected '{}{}', got end of input", op, op)
            }
            ParseError::BadIntegerLiteral(lit) => {
                write!(f, "integer literal out of range: {}", lit)
            }
            ParseError::ExpectedExpression(found) => {
                write!(f, "expected expression, got '{}'", found)
            }
            ParseError::ExpectedIdentifier(found) => {
                write!(f, "expected identifier, got '{}'", found)
            }
        }
    }
}
