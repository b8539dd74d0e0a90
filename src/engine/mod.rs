//! The evaluation engine: values, environments, the trampoline scheduler,
//! the Operation abstraction, and the core dispatch.

pub mod callcc;
pub mod cons;
pub mod env;
pub mod error;
pub mod eval;
pub mod operation;
pub mod trampoline;
pub mod value;

pub use env::Environment;
pub use error::{Result, SchemeError};
pub use eval::{eval, eval_sequence};
pub use operation::{Args, Arity, Operation, OperationKind};
pub use trampoline::{
    reset_step_count, resume, run_to_completion, step, step_count, Cont, Step,
};
pub use value::Value;

use crate::sexpr::Reader;

/// A fresh top-level environment with every special form and builtin
/// installed.
pub fn top_level_environment() -> Environment {
    let env = Environment::new("top-level");
    crate::forms::install(&env);
    crate::builtins::install(&env);
    callcc::install(&env);
    env
}

/// Evaluates a single expression synchronously, driving the trampoline
/// until the value arrives or the first error halts it.
pub fn eval_to_completion(env: &Environment, expr: Value) -> Result<Value> {
    let env = env.clone();
    run_to_completion(move |cont| Ok(step(move || eval(expr, env, cont))))
}

/// Reads and evaluates every datum in `source`, returning the value of the
/// last one. An empty source yields the unspecified value.
pub fn eval_source(env: &Environment, source: &str) -> Result<Value> {
    let mut reader = Reader::new(source);
    let mut last = Value::Unspecified;
    while let Some(datum) = reader.next_datum()? {
        last = eval_to_completion(env, datum)?;
    }
    Ok(last)
}
