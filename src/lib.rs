//! An interpreter for simplang, a tiny language where every value is a 64-bit integer.
//!
//! A program is a list of functions, one of which is `main`:
//!
//! ```text
//! let main n =
//!     loop acc = 0 and i = n in
//!         if i == 0 then acc else recur(acc + i)(i + -1) end
//!     end
//! end
//! ```
//!
//! `loop`/`recur` runs in constant stack space.  A `recur` must sit in tail position of its
//! `loop`: only `if` branches and `let` bodies may carry it there.
//!
//! # Examples
//!
//! See [`crate::interpreter::interpret`].
//!
//! # Limitations
//!
//! - Plain recursion through function calls still uses the native stack.
//! - There is no way to interrupt a `loop` that never ends.

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]

pub mod ast;
pub mod diag;
pub mod eval;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod token;
