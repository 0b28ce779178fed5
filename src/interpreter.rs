//! API to control the interpreter.

use std::error::Error;
use std::fmt;

use crate::eval::{self, RuntimeError};
use crate::parser::{ParseErrors, Parser};

/// Parse `source` and evaluate its `main` function with `args`.
///
/// # Example
///
/// ```
/// # use simplang::interpreter::{interpret, SimplangError};
///
/// let src = r#"
///     ## sum of 1..n
///     let main n =
///         loop acc = 0 and i = n in
///             if i == 0 then acc else recur(acc + i)(i + -1) end
///         end
///     end
/// "#;
///
/// assert_eq!(interpret(src, &[5])?, 15);
/// assert_eq!(interpret(src, &[100])?, 5050);
/// # Ok::<(), SimplangError>(())
/// ```
pub fn interpret(source: &str, args: &[i64]) -> Result<i64, SimplangError> {
    let prg = Parser::new(source).parse_program()?;
    Ok(eval::evaluate(&prg, args)?)
}

/// Errors the interpreter can raise.
#[derive(Debug, PartialEq)]
pub enum SimplangError {
    /// Errors found during lexical or syntactic analysis.  Nothing was evaluated.
    Parse(ParseErrors),

    /// Error occurring during evaluation.
    Runtime(RuntimeError),
}

impl fmt::Display for SimplangError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimplangError::Runtime(e) => write!(f, "runtime error: {}", e),
            SimplangError::Parse(e) => write!(f, "{}", e),
        }
    }
}

impl Error for SimplangError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SimplangError::Runtime(e) => Some(e),
            SimplangError::Parse(e) => Some(e),
        }
    }
}

impl From<RuntimeError> for SimplangError {
    fn from(e: RuntimeError) -> SimplangError {
        SimplangError::Runtime(e)
    }
}

impl From<ParseErrors> for SimplangError {
    fn from(e: ParseErrors) -> SimplangError {
        SimplangError::Parse(e)
    }
}
