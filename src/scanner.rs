//! Lexical analyzer

use std::iter::Peekable;
use std::str::Chars;

use crate::diag::{FullParseError, ParseError, Position};
use crate::token::{Token, TokenKind};

/// Turn source text into a sequence of tokens.
///
/// Illegal input is reported as an error and skipped, so scanning can go on after it.
#[derive(Debug)]
pub struct Scanner<'a> {
    input: Peekable<Chars<'a>>,
    line: u32,
    column: u32,

    // Buffer used when scanning longer tokens.  Allocated here to reuse memory.
    buf: String,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner operating on `input`.
    pub fn new(input: &'a str) -> Scanner<'a> {
        Scanner {
            input: input.chars().peekable(),
            line: 1,
            column: 0,
            buf: String::new(),
        }
    }

    /// Scan next token and return it.  Returns `Eof` forever once input is exhausted.
    pub fn get_token(&mut self) -> Result<Token, FullParseError> {
        loop {
            let ch = match self.bump() {
                None => return Ok(Token::new(TokenKind::Eof, "", self.next_pos())),
                Some(ch) => ch,
            };
            let pos = self.pos();
            let kind = match ch {
                ' ' | '\t' | '\n' | '\r' => continue,
                '#' => {
                    self.skip_comment();
                    continue;
                }
                '(' => TokenKind::LeftParen,
                ')' => TokenKind::RightParen,
                '!' => TokenKind::Bang,
                '<' => TokenKind::Less,
                '+' => TokenKind::Plus,
                '*' => TokenKind::Star,
                '-' => TokenKind::Minus,
                '=' => {
                    if let Some('=') = self.input.peek() {
                        self.bump();
                        return Ok(Token::new(TokenKind::EqualEqual, "==", pos));
                    }
                    TokenKind::Assign
                }
                '&' | '|' => {
                    let next = self.input.peek().copied();
                    if next != Some(ch) {
                        return Err(FullParseError {
                            pos,
                            error: ParseError::UnpairedOperator(ch, next),
                        });
                    }
                    self.bump();
                    let kind = if ch == '&' {
                        TokenKind::AndAnd
                    } else {
                        TokenKind::OrOr
                    };
                    return Ok(Token::new(kind, kind.to_string(), pos));
                }
                '0'..='9' => return Ok(self.scan_integer(ch, pos)),
                'a'..='z' | 'A'..='Z' | '_' => return Ok(self.scan_identifier(ch, pos)),
                _ => {
                    return Err(FullParseError {
                        pos,
                        error: ParseError::BadChar(ch),
                    })
                }
            };
            return Ok(Token::new(kind, ch.to_string(), pos));
        }
    }

    fn scan_integer(&mut self, first_digit: char, pos: Position) -> Token {
        self.buf.clear();
        self.buf.push(first_digit);
        while let Some(ch) = self.input.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            let ch = *ch;
            self.bump();
            self.buf.push(ch);
        }
        Token::new(TokenKind::Integer, self.buf.as_str(), pos)
    }

    fn scan_identifier(&mut self, first_char: char, pos: Position) -> Token {
        self.buf.clear();
        self.buf.push(first_char);
        while let Some(ch) = self.input.peek() {
            if !(ch.is_ascii_alphanumeric() || *ch == '_') {
                break;
            }
            let ch = *ch;
            self.bump();
            self.buf.push(ch);
        }

        let kind = TokenKind::keyword(&self.buf).unwrap_or(TokenKind::Identifier);
        Token::new(kind, self.buf.as_str(), pos)
    }

    fn skip_comment(&mut self) {
        while let Some(ch) = self.input.peek() {
            if *ch == '\n' {
                break;
            }
            self.bump();
        }
    }

    /// Consume one character and update the current position.
    fn bump(&mut self) -> Option<char> {
        let ch = self.input.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Position of the last consumed character.
    fn pos(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn next_pos(&self) -> Position {
        Position::new(self.line, self.column + 1)
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token, FullParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.get_token() {
            Ok(Token {
                kind: TokenKind::Eof,
                ..
            }) => None,
            r => Some(r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &str) -> Result<Vec<TokenKind>, FullParseError> {
        Scanner::new(input)
            .map(|r| r.map(|t| t.kind))
            .collect::<Result<Vec<TokenKind>, FullParseError>>()
    }

    fn scan_tokens(input: &str) -> Result<Vec<Token>, FullParseError> {
        Scanner::new(input).collect::<Result<Vec<Token>, FullParseError>>()
    }

    #[test]
    fn scan_single_token() -> Result<(), FullParseError> {
        assert_eq!(scan("+")?, vec![TokenKind::Plus]);
        Ok(())
    }

    #[test]
    fn fixed_tokens() -> Result<(), FullParseError> {
        assert_eq!(
            scan("()= && || ! < == + * -")?,
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::Assign,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Bang,
                TokenKind::Less,
                TokenKind::EqualEqual,
                TokenKind::Plus,
                TokenKind::Star,
                TokenKind::Minus,
            ]
        );
        Ok(())
    }

    #[test]
    fn keywords() -> Result<(), FullParseError> {
        assert_eq!(
            scan("let and in if then else recur loop end")?,
            vec![
                TokenKind::Let,
                TokenKind::And,
                TokenKind::In,
                TokenKind::If,
                TokenKind::Then,
                TokenKind::Else,
                TokenKind::Recur,
                TokenKind::Loop,
                TokenKind::End,
            ]
        );
        Ok(())
    }

    #[test]
    fn identifiers_keep_their_text() -> Result<(), FullParseError> {
        let tokens = scan_tokens("f foo _foo t42 loopy")?;
        let names = tokens
            .iter()
            .map(|t| (t.kind, t.literal.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                (TokenKind::Identifier, "f"),
                (TokenKind::Identifier, "foo"),
                (TokenKind::Identifier, "_foo"),
                (TokenKind::Identifier, "t42"),
                (TokenKind::Identifier, "loopy"),
            ]
        );
        Ok(())
    }

    #[test]
    fn integer_literal() -> Result<(), FullParseError> {
        let tokens = scan_tokens("42+007")?;
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[0].literal, "42");
        assert_eq!(tokens[1].kind, TokenKind::Plus);
        assert_eq!(tokens[2].literal, "007");
        Ok(())
    }

    #[test]
    fn minus_is_never_part_of_a_literal() -> Result<(), FullParseError> {
        assert_eq!(
            scan("a+-1")?,
            vec![
                TokenKind::Identifier,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Integer
            ]
        );
        Ok(())
    }

    #[test]
    fn blanks_and_comments_are_ignored() -> Result<(), FullParseError> {
        assert_eq!(
            scan(" \t\r\n# let in\n+ # trailing")?,
            vec![TokenKind::Plus]
        );
        Ok(())
    }

    #[test]
    fn scanner_keeps_track_of_lines_and_columns() -> Result<(), FullParseError> {
        let mut s = Scanner::new("let\n  x");
        assert_eq!(s.get_token()?.pos, Position::new(1, 1));
        let x = s.get_token()?;
        assert_eq!(x.literal, "x");
        assert_eq!(x.pos, Position::new(2, 3));
        Ok(())
    }

    #[test]
    fn eof_is_sticky() -> Result<(), FullParseError> {
        let mut s = Scanner::new("1");
        assert_eq!(s.get_token()?.kind, TokenKind::Integer);
        assert_eq!(s.get_token()?.kind, TokenKind::Eof);
        assert_eq!(s.get_token()?.kind, TokenKind::Eof);
        Ok(())
    }

    #[test]
    fn bad_char_does_not_stop_scanning() {
        let mut s = Scanner::new("1 $ 2");
        assert!(matches!(s.get_token(), Ok(Token { kind: TokenKind::Integer, .. })));
        match s.get_token() {
            Err(FullParseError { pos, error }) if pos == Position::new(1, 3) => {
                assert_eq!(error, ParseError::BadChar('$'))
            }
            r => panic!("unexpected output: {:?}", r),
        }
        assert!(matches!(s.get_token(), Ok(Token { kind: TokenKind::Integer, .. })));
    }

    #[test]
    fn lone_ampersand_is_an_error() {
        match scan("a & b") {
            Err(FullParseError { error, .. })
                if error == ParseError::UnpairedOperator('&', Some(' ')) =>
            {
                ()
            }
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn lone_pipe_at_end_of_input() {
        match scan("|") {
            Err(FullParseError { error, .. }) if error == ParseError::UnpairedOperator('|', None) => {
                ()
            }
            r => panic!("unexpected output: {:?}", r),
        }
    }
}
