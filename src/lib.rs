//! Tailspin: a small Scheme evaluation engine.
//!
//! The engine evaluates in continuation-passing style over a trampoline, so
//! language-level recursion depth never translates into host stack depth and
//! the current continuation can be captured as a first-class, multi-shot
//! value (`call/cc`).
//!
//! The crate splits into:
//! - [`engine`]: values, environments, the trampoline scheduler, the
//!   Operation abstraction, and the core dispatch
//! - [`forms`]: the special forms (`define`, `set!`, `lambda`, `if`,
//!   `quote`, `let`/`let*`/`letrec`, `do`, `and`/`or`, `begin`)
//! - [`builtins`]: host-defined procedures
//! - [`sexpr`]: the reader
//!
//! ```
//! use tailspin::engine::{eval_source, top_level_environment};
//!
//! let env = top_level_environment();
//! let value = eval_source(&env, "(+ 1 2)").unwrap();
//! assert_eq!(value.to_string(), "3");
//! ```

pub mod builtins;
pub mod engine;
pub mod forms;
pub mod repl;
pub mod sexpr;

pub use engine::{
    eval_source, eval_to_completion, top_level_environment, Environment, Result, SchemeError,
    Value,
};
