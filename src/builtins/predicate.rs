//! Equivalence predicates, `not`, and the type predicates.

use crate::engine::operation::{define_native_procedure, Args, NativeFn};
use crate::engine::trampoline::{resume, Cont, Step};
use crate::engine::{Arity, Environment, Result, Value};

pub fn install(env: &Environment) {
    define_native_procedure(env, "not", Arity::Exact(1), not_builtin);
    define_native_procedure(env, "eq?", Arity::Exact(2), eq_builtin);
    define_native_procedure(env, "eqv?", Arity::Exact(2), eqv_builtin);
    define_native_procedure(env, "equal?", Arity::Exact(2), equal_builtin);

    let type_predicates: [(&str, NativeFn); 8] = [
        ("boolean?", is_boolean),
        ("symbol?", is_symbol),
        ("number?", is_number),
        ("string?", is_string),
        ("char?", is_char),
        ("vector?", is_vector),
        ("procedure?", is_procedure),
        ("continuation?", is_continuation),
    ];
    for (name, run) in type_predicates {
        define_native_procedure(env, name, Arity::Exact(1), run);
    }
}

fn not_builtin(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    resume(&cont, Value::Boolean(args[0].is_false()))
}

fn eq_builtin(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    resume(&cont, Value::Boolean(args[0].eq(&args[1])))
}

fn eqv_builtin(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    resume(&cont, Value::Boolean(args[0].eqv(&args[1])))
}

fn equal_builtin(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    resume(&cont, Value::Boolean(args[0].equal(&args[1])))
}

fn is_boolean(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    resume(&cont, Value::Boolean(matches!(args[0], Value::Boolean(_))))
}

fn is_symbol(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    resume(&cont, Value::Boolean(matches!(args[0], Value::Symbol(_))))
}

fn is_number(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    resume(
        &cont,
        Value::Boolean(matches!(args[0], Value::Integer(_) | Value::Real(_))),
    )
}

fn is_string(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    resume(&cont, Value::Boolean(matches!(args[0], Value::Str(_))))
}

fn is_char(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    resume(&cont, Value::Boolean(matches!(args[0], Value::Char(_))))
}

fn is_vector(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    resume(&cont, Value::Boolean(matches!(args[0], Value::Vector(_))))
}

/// Reified continuations answer true here: they are applicable like any
/// one-argument procedure.
fn is_procedure(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    resume(
        &cont,
        Value::Boolean(matches!(
            args[0],
            Value::Procedure(_) | Value::Continuation(_)
        )),
    )
}

fn is_continuation(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    resume(
        &cont,
        Value::Boolean(matches!(args[0], Value::Continuation(_))),
    )
}
