//! Syntax tree produced by `Parser` and walked by `eval`.
//!
//! Every node keeps a copy of the token it starts with so that runtime errors can point at the
//! source.  `Display` renders nodes in a compact prefix form, e.g. `(+ 1 (* 2 3))`.

use std::fmt;

use crate::token::{Token, TokenKind};

#[derive(Debug, PartialEq, Clone)]
pub struct Program {
    pub functions: Vec<Function>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Function {
    pub token: Token,
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Expr,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Ident {
    pub token: Token,
    pub name: String,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Binding {
    pub ident: Ident,
    pub expr: Expr,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Expr {
    pub token: Token,
    pub kind: ExprKind,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ExprKind {
    Integer(i64),
    Ident(String),
    Call(String, Vec<Expr>),
    If(Box<Expr>, Box<Expr>, Box<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Let(Vec<Binding>, Box<Expr>),
    Loop(Vec<Binding>, Box<Expr>),
    Recur(Vec<Expr>),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOp {
    And,
    Or,
    Less,
    Equal,
    Add,
    Mul,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<BinaryOp> {
        match kind {
            TokenKind::AndAnd => Some(BinaryOp::And),
            TokenKind::OrOr => Some(BinaryOp::Or),
            TokenKind::Less => Some(BinaryOp::Less),
            TokenKind::EqualEqual => Some(BinaryOp::Equal),
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Star => Some(BinaryOp::Mul),
            _ => None,
        }
    }

    /// Binding strength, higher binds tighter.  Zero is reserved as the loosest threshold.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::And | BinaryOp::Or => 1,
            BinaryOp::Less | BinaryOp::Equal => 2,
            BinaryOp::Add => 3,
            BinaryOp::Mul => 4,
        }
    }
}

impl Expr {
    pub fn new(token: Token, kind: ExprKind) -> Expr {
        Expr { token, kind }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "!"),
            UnaryOp::Neg => write!(f, "-"),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOp::And => write!(f, "&&"),
            BinaryOp::Or => write!(f, "||"),
            BinaryOp::Less => write!(f, "<"),
            BinaryOp::Equal => write!(f, "=="),
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Mul => write!(f, "*"),
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {})", self.ident.name, self.expr)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Integer(n) => write!(f, "{}", n),
            ExprKind::Ident(name) => write!(f, "{}", name),
            ExprKind::Call(name, args) => {
                write!(f, "(call {} ", name)?;
                write_list(f, args)?;
                write!(f, ")")
            }
            ExprKind::If(cond, then_branch, else_branch) => {
                write!(f, "(if {} {} {})", cond, then_branch, else_branch)
            }
            ExprKind::Unary(op, operand) => write!(f, "({} {})", op, operand),
            ExprKind::Binary(op, lhs, rhs) => write!(f, "({} {} {})", op, lhs, rhs),
            ExprKind::Let(bindings, body) => {
                write!(f, "(let (")?;
                write_list(f, bindings)?;
                write!(f, ") {})", body)
            }
            ExprKind::Loop(bindings, body) => {
                write!(f, "(loop (")?;
                write_list(f, bindings)?;
                write!(f, ") {})", body)
            }
            ExprKind::Recur(args) => {
                write!(f, "(recur ")?;
                write_list(f, args)?;
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(fun {} (", self.name.name)?;
        write_list(f, &self.params)?;
        write!(f, ") {})", self.body)
    }
}
