use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use crate::ast::{BinaryOp, Binding, Expr, ExprKind, Function, Program, UnaryOp};
use crate::diag::Position;

/// Run `program`: call `main` with `args` and return its result.
pub fn evaluate(program: &Program, args: &[i64]) -> Result<i64, RuntimeError> {
    let evaluator = Evaluator::new(program)?;
    let main = evaluator
        .functions
        .get("main")
        .copied()
        .ok_or(RuntimeError::MissingMain)?;
    if args.len() != main.params.len() {
        return Err(RuntimeError::MainArity {
            expected: main.params.len(),
            got: args.len(),
        });
    }
    evaluator.apply(main, args.to_vec())
}

#[derive(Debug, PartialEq)]
pub enum RuntimeError {
    UnknownVar(String, Position),
    UnknownFunction(String, Position),
    RedefinedFunction(String, Position),
    MissingMain,
    MainArity {
        expected: usize,
        got: usize,
    },
    BadNumberOfArguments {
        name: String,
        expected: usize,
        got: usize,
        pos: Position,
    },
    RecurArity {
        expected: usize,
        got: usize,
        pos: Position,
    },
    RecurInArgument(Position),
    RecurInUnary(Position),
    RecurInBinary(Position),
    RecurInCondition(Position),
    RecurInBinding(Position),
    /// A `recur` reached the end of the named function without meeting a `loop`.
    RecurEscapedFunction(String, Position),
}

impl Error for RuntimeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::UnknownVar(v, pos) => write!(f, "{}: variable '{}' not defined", pos, v),
            RuntimeError::UnknownFunction(name, pos) => {
                write!(f, "{}: function '{}' not defined", pos, name)
            }
            RuntimeError::RedefinedFunction(name, pos) => {
                write!(f, "{}: function '{}' defined more than once", pos, name)
            }
            RuntimeError::MissingMain => write!(f, "no 'main' function defined"),
            RuntimeError::MainArity { expected, got } => write!(
                f,
                "main expects {} argument(s), got {}",
                expected, got
            ),
            RuntimeError::BadNumberOfArguments {
                name,
                expected,
                got,
                pos,
            } => write!(
                f,
                "{}: function '{}' expects {} argument(s), got {}",
                pos, name, expected, got
            ),
            RuntimeError::RecurArity { expected, got, pos } => write!(
                f,
                "{}: recur has wrong amount of arguments: loop binds {}, recur passes {}",
                pos, expected, got
            ),
            RuntimeError::RecurInArgument(pos) => {
                write!(f, "{}: recur may not appear inside an argument", pos)
            }
            RuntimeError::RecurInUnary(pos) => {
                write!(f, "{}: recur may not be used with a unary operator", pos)
            }
            RuntimeError::RecurInBinary(pos) => {
                write!(f, "{}: recur may not be used with a binary operator", pos)
            }
            RuntimeError::RecurInCondition(pos) => {
                write!(f, "{}: recur may not appear as a condition", pos)
            }
            RuntimeError::RecurInBinding(pos) => {
                write!(f, "{}: recur may not appear in a binding", pos)
            }
            RuntimeError::RecurEscapedFunction(name, pos) => write!(
                f,
                "{}: recur appeared after function ended (in '{}')",
                pos, name
            ),
        }
    }
}

/// Result of evaluating an expression.
#[derive(Debug, PartialEq)]
enum Flow {
    Value(i64),
    /// Evaluated arguments of a `recur` on their way to the innermost enclosing `loop`.  Only
    /// `if` branches and `let` bodies let it through.
    Recur(Vec<i64>, Position),
}

/// Live bindings, innermost last.
///
/// One flat stack serves function parameters, `let` and `loop`: entering a scope pushes,
/// leaving it pops the same count.
#[derive(Debug, Default)]
struct Env<'p> {
    bindings: Vec<(&'p str, i64)>,
}

impl<'p> Env<'p> {
    fn new() -> Env<'p> {
        Env::default()
    }

    fn len(&self) -> usize {
        self.bindings.len()
    }

    fn push(&mut self, name: &'p str, val: i64) {
        self.bindings.push((name, val));
    }

    fn pop(&mut self, count: usize) {
        let len = self.bindings.len() - count;
        self.bindings.truncate(len);
    }

    fn get(&self, name: &str) -> Option<i64> {
        self.bindings
            .iter()
            .rev()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    /// Replace the values of the bindings starting at index `base`.
    fn overwrite(&mut self, base: usize, vals: &[i64]) {
        for (slot, val) in self.bindings[base..].iter_mut().zip(vals) {
            slot.1 = *val;
        }
    }
}

#[derive(Debug)]
struct Evaluator<'p> {
    functions: HashMap<&'p str, &'p Function>,
}

impl<'p> Evaluator<'p> {
    fn new(program: &'p Program) -> Result<Evaluator<'p>, RuntimeError> {
        let mut functions = HashMap::new();
        for f in &program.functions {
            if let Entry::Vacant(entry) = functions.entry(f.name.name.as_str()) {
                entry.insert(f);
            } else {
                return Err(RuntimeError::RedefinedFunction(
                    f.name.name.clone(),
                    f.token.pos,
                ));
            }
        }
        Ok(Evaluator { functions })
    }

    fn apply(&self, function: &'p Function, args: Vec<i64>) -> Result<i64, RuntimeError> {
        let mut env = Env::new();
        for (param, arg) in function.params.iter().zip(args) {
            env.push(&param.name, arg);
        }
        match self.eval_expr(&function.body, &mut env)? {
            Flow::Value(v) => Ok(v),
            Flow::Recur(_, pos) => Err(RuntimeError::RecurEscapedFunction(
                function.name.name.clone(),
                pos,
            )),
        }
    }

    fn eval_expr(&self, expr: &'p Expr, env: &mut Env<'p>) -> Result<Flow, RuntimeError> {
        let val = match &expr.kind {
            ExprKind::Integer(n) => *n,
            ExprKind::Ident(name) => env
                .get(name)
                .ok_or_else(|| RuntimeError::UnknownVar(name.clone(), expr.token.pos))?,
            ExprKind::Call(name, args) => {
                let args = self.eval_args(args, env)?;
                let function = self
                    .functions
                    .get(name.as_str())
                    .copied()
                    .ok_or_else(|| RuntimeError::UnknownFunction(name.clone(), expr.token.pos))?;
                if args.len() != function.params.len() {
                    return Err(RuntimeError::BadNumberOfArguments {
                        name: name.clone(),
                        expected: function.params.len(),
                        got: args.len(),
                        pos: expr.token.pos,
                    });
                }
                self.apply(function, args)?
            }
            ExprKind::Unary(op, operand) => {
                let v = self.eval_value(operand, env, RuntimeError::RecurInUnary)?;
                match op {
                    UnaryOp::Not => (v == 0) as i64,
                    UnaryOp::Neg => v.wrapping_neg(),
                }
            }
            ExprKind::Binary(op, lhs, rhs) => {
                let l = self.eval_value(lhs, env, RuntimeError::RecurInBinary)?;
                let r = self.eval_value(rhs, env, RuntimeError::RecurInBinary)?;
                binary(*op, l, r)
            }
            ExprKind::If(cond, then_branch, else_branch) => {
                return if self.eval_value(cond, env, RuntimeError::RecurInCondition)? != 0 {
                    self.eval_expr(then_branch, env)
                } else {
                    self.eval_expr(else_branch, env)
                };
            }
            ExprKind::Let(bindings, body) => {
                self.bind(bindings, env)?;
                let flow = self.eval_expr(body, env);
                env.pop(bindings.len());
                return flow;
            }
            ExprKind::Loop(bindings, body) => {
                let base = env.len();
                self.bind(bindings, env)?;
                let v = loop {
                    match self.eval_expr(body, env)? {
                        Flow::Value(v) => break v,
                        Flow::Recur(args, pos) => {
                            if args.len() != bindings.len() {
                                return Err(RuntimeError::RecurArity {
                                    expected: bindings.len(),
                                    got: args.len(),
                                    pos,
                                });
                            }
                            env.overwrite(base, &args);
                        }
                    }
                };
                env.pop(bindings.len());
                v
            }
            ExprKind::Recur(args) => {
                let args = self.eval_args(args, env)?;
                return Ok(Flow::Recur(args, expr.token.pos));
            }
        };
        Ok(Flow::Value(val))
    }

    /// Evaluate an expression in a position where a pending `recur` is an error.
    fn eval_value(
        &self,
        expr: &'p Expr,
        env: &mut Env<'p>,
        misplaced_recur: fn(Position) -> RuntimeError,
    ) -> Result<i64, RuntimeError> {
        match self.eval_expr(expr, env)? {
            Flow::Value(v) => Ok(v),
            Flow::Recur(_, pos) => Err(misplaced_recur(pos)),
        }
    }

    fn eval_args(&self, args: &'p [Expr], env: &mut Env<'p>) -> Result<Vec<i64>, RuntimeError> {
        args.iter()
            .map(|a| self.eval_value(a, env, RuntimeError::RecurInArgument))
            .collect()
    }

    /// Evaluate bindings in order, each one seeing the previous ones, and push them.
    fn bind(&self, bindings: &'p [Binding], env: &mut Env<'p>) -> Result<(), RuntimeError> {
        for b in bindings {
            let v = self.eval_value(&b.expr, env, RuntimeError::RecurInBinding)?;
            env.push(&b.ident.name, v);
        }
        Ok(())
    }
}

fn binary(op: BinaryOp, l: i64, r: i64) -> i64 {
    match op {
        BinaryOp::And => (l != 0 && r != 0) as i64,
        BinaryOp::Or => (l != 0 || r != 0) as i64,
        BinaryOp::Less => (l < r) as i64,
        BinaryOp::Equal => (l == r) as i64,
        BinaryOp::Add => l.wrapping_add(r),
        BinaryOp::Mul => l.wrapping_mul(r),
    }
}
