use std::error::Error;
use std::fmt;
use std::mem;

use crate::ast::{BinaryOp, Binding, Expr, ExprKind, Function, Ident, Program, UnaryOp};
use crate::diag::{FullParseError, ParseError};
use crate::scanner::Scanner;
use crate::token::{Token, TokenKind};

/// All lexical and syntactic errors found in one parse, ordered by position.
#[derive(Debug, PartialEq)]
pub struct ParseErrors(pub Vec<FullParseError>);

impl ParseErrors {
    pub fn errors(&self) -> &[FullParseError] {
        &self.0
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Generated {} error(s):", self.0.len())?;
        for (i, e) in self.0.iter().enumerate() {
            write!(f, "\n{}: {}", i + 1, e)?;
        }
        Ok(())
    }
}

impl Error for ParseErrors {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

/// Recursive descent parser.
///
/// Errors do not stop the parse.  A production that fails is abandoned, the parser skips ahead to
/// the start of the next function and goes on, so that one run reports as many errors as
/// possible.
#[derive(Debug)]
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    current_token: Token,
    previous_kind: TokenKind,
    errors: Vec<FullParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Parser<'a> {
        Parser {
            scanner: Scanner::new(input),
            current_token: Token::new(TokenKind::Eof, "", Default::default()), // we haven't scanned anything yet
            previous_kind: TokenKind::Eof,
            errors: vec![],
        }
    }

    /// Parse a whole program: one or more functions.
    pub fn parse_program(&mut self) -> Result<Program, ParseErrors> {
        self.advance();
        let mut functions = vec![];
        loop {
            match self.function() {
                Ok(f) => functions.push(f),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
            if self.current_token.kind == TokenKind::Eof {
                break;
            }
        }
        self.finish(Program { functions })
    }

    /// Parse a single expression spanning the whole input.
    pub fn parse_expression(&mut self) -> Result<Expr, ParseErrors> {
        self.advance();
        match self
            .expression()
            .and_then(|e| self.consume(TokenKind::Eof).map(|_| e))
        {
            Ok(e) => self.finish(e),
            Err(e) => {
                self.errors.push(e);
                Err(self.take_errors())
            }
        }
    }

    fn finish<T>(&mut self, result: T) -> Result<T, ParseErrors> {
        if self.errors.is_empty() {
            Ok(result)
        } else {
            Err(self.take_errors())
        }
    }

    fn take_errors(&mut self) -> ParseErrors {
        let mut errors = mem::take(&mut self.errors);
        errors.sort_by_key(|e| e.pos);
        ParseErrors(errors)
    }

    /// Skip tokens up to the next `let` following an `end`, which is most likely the start of
    /// the next function.
    fn synchronize(&mut self) {
        loop {
            match self.current_token.kind {
                TokenKind::Eof => return,
                TokenKind::Let if self.previous_kind == TokenKind::End => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// function := "let" ident ident+ "=" expr "end"
    fn function(&mut self) -> Result<Function, FullParseError> {
        let token = self.consume(TokenKind::Let)?;
        let name = self.identifier()?;
        let mut params = vec![self.identifier()?];
        while self.current_token.kind == TokenKind::Identifier {
            params.push(self.identifier()?);
        }
        self.consume(TokenKind::Assign)?;
        let body = self.expression()?;
        self.consume(TokenKind::End)?;
        Ok(Function {
            token,
            name,
            params,
            body,
        })
    }

    fn identifier(&mut self) -> Result<Ident, FullParseError> {
        if self.current_token.kind == TokenKind::Identifier {
            let token = self.advance();
            Ok(Ident {
                name: token.literal.clone(),
                token,
            })
        } else {
            Err(self.error(ParseError::ExpectedIdentifier(
                self.current_token.to_string(),
            )))
        }
    }

    fn expression(&mut self) -> Result<Expr, FullParseError> {
        self.binary(0)
    }

    /// Precedence climbing: fold operators binding tighter than `min_precedence` into a left
    /// leaning tree.
    fn binary(&mut self, min_precedence: u8) -> Result<Expr, FullParseError> {
        let mut expr = self.primary()?;
        while let Some(op) = BinaryOp::from_token(self.current_token.kind) {
            if op.precedence() <= min_precedence {
                break;
            }
            let token = self.advance();
            let rhs = self.binary(op.precedence())?;
            expr = Expr::new(token, ExprKind::Binary(op, Box::new(expr), Box::new(rhs)));
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, FullParseError> {
        match self.current_token.kind {
            TokenKind::Integer => {
                let token = self.advance();
                let n = token.literal.parse::<i64>().map_err(|_| FullParseError {
                    pos: token.pos,
                    error: ParseError::BadIntegerLiteral(token.literal.clone()),
                })?;
                Ok(Expr::new(token, ExprKind::Integer(n)))
            }
            TokenKind::Identifier => {
                let token = self.advance();
                let name = token.literal.clone();
                if self.current_token.kind == TokenKind::LeftParen {
                    let args = self.arguments()?;
                    Ok(Expr::new(token, ExprKind::Call(name, args)))
                } else {
                    Ok(Expr::new(token, ExprKind::Ident(name)))
                }
            }
            TokenKind::Bang | TokenKind::Minus => {
                let token = self.advance();
                let op = if token.kind == TokenKind::Bang {
                    UnaryOp::Not
                } else {
                    UnaryOp::Neg
                };
                let operand = self.primary()?;
                Ok(Expr::new(token, ExprKind::Unary(op, Box::new(operand))))
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume(TokenKind::RightParen)?;
                Ok(expr)
            }
            TokenKind::If => {
                let token = self.advance();
                let cond = self.expression()?;
                self.consume(TokenKind::Then)?;
                let then_branch = self.expression()?;
                self.consume(TokenKind::Else)?;
                let else_branch = self.expression()?;
                self.consume(TokenKind::End)?;
                Ok(Expr::new(
                    token,
                    ExprKind::If(
                        Box::new(cond),
                        Box::new(then_branch),
                        Box::new(else_branch),
                    ),
                ))
            }
            TokenKind::Let | TokenKind::Loop => {
                let token = self.advance();
                let bindings = self.bindings()?;
                self.consume(TokenKind::In)?;
                let body = Box::new(self.expression()?);
                self.consume(TokenKind::End)?;
                let kind = if token.kind == TokenKind::Let {
                    ExprKind::Let(bindings, body)
                } else {
                    ExprKind::Loop(bindings, body)
                };
                Ok(Expr::new(token, kind))
            }
            TokenKind::Recur => {
                let token = self.advance();
                let args = self.arguments()?;
                Ok(Expr::new(token, ExprKind::Recur(args)))
            }
            _ => Err(self.error(ParseError::ExpectedExpression(
                self.current_token.to_string(),
            ))),
        }
    }

    /// args := ( "(" expr ")" )+
    fn arguments(&mut self) -> Result<Vec<Expr>, FullParseError> {
        let mut args = vec![];
        loop {
            self.consume(TokenKind::LeftParen)?;
            args.push(self.expression()?);
            self.consume(TokenKind::RightParen)?;
            if self.current_token.kind != TokenKind::LeftParen {
                break;
            }
        }
        Ok(args)
    }

    /// bindings := ident "=" expr ( "and" ident "=" expr )*
    fn bindings(&mut self) -> Result<Vec<Binding>, FullParseError> {
        let mut bindings = vec![];
        loop {
            let ident = self.identifier()?;
            self.consume(TokenKind::Assign)?;
            let expr = self.expression()?;
            bindings.push(Binding { ident, expr });
            if self.current_token.kind != TokenKind::And {
                break;
            }
            self.advance();
        }
        Ok(bindings)
    }

    /// Move to the next token and return the one just left.  Lexical errors met on the way are
    /// recorded and the offending input skipped.
    fn advance(&mut self) -> Token {
        loop {
            match self.scanner.get_token() {
                Ok(token) => {
                    self.previous_kind = self.current_token.kind;
                    return mem::replace(&mut self.current_token, token);
                }
                Err(e) => self.errors.push(e),
            }
        }
    }

    fn consume(&mut self, expected: TokenKind) -> Result<Token, FullParseError> {
        if self.current_token.kind == expected {
            Ok(self.advance())
        } else {
            Err(self.error(ParseError::UnexpectedToken(
                self.current_token.to_string(),
                expected.to_string(),
            )))
        }
    }

    fn error(&self, error: ParseError) -> FullParseError {
        FullParseError {
            pos: self.current_token.pos,
            error,
        }
    }
}
