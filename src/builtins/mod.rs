//! Host-defined procedures available in the top-level environment. These
//! are ordinary procedures: their operands arrive already evaluated and
//! their results flow through the continuation protocol like everything
//! else.

mod list;
mod numeric;
mod predicate;

use itertools::Itertools;

use crate::engine::operation::{define_native_procedure, Args};
use crate::engine::trampoline::{Cont, Step};
use crate::engine::{Arity, Environment, Result, SchemeError, Value};

pub fn install(env: &Environment) {
    list::install(env);
    numeric::install(env);
    predicate::install(env);
    define_native_procedure(env, "error", Arity::AtLeast(1), error_builtin);
}

/// `(error message irritant...)` signals a user error that propagates to
/// the driver loop like any other; evaluation does not continue past it.
fn error_builtin(_env: &Environment, args: Args, _cont: Cont) -> Result<Step> {
    let message = match &args[0] {
        Value::Str(s) => s.get(),
        other => other.to_string(),
    };
    let rendered = if args.len() > 1 {
        format!(
            "{}: {}",
            message,
            args[1..].iter().map(|v| v.to_string()).join(" ")
        )
    } else {
        message
    };
    Err(SchemeError::User(rendered))
}
