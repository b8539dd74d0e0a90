//! Pair and list primitives.

use crate::engine::cons::{cons, is_proper_list, list_from_vec, list_length};
use crate::engine::operation::{define_native_procedure, Args};
use crate::engine::trampoline::{resume, Cont, Step};
use crate::engine::cons::PairCell;
use crate::engine::{Arity, Environment, Result, SchemeError, Value};

use std::rc::Rc;

pub fn install(env: &Environment) {
    define_native_procedure(env, "cons", Arity::Exact(2), cons_builtin);
    define_native_procedure(env, "car", Arity::Range(1, 1), car_builtin);
    define_native_procedure(env, "cdr", Arity::Range(1, 1), cdr_builtin);
    define_native_procedure(env, "set-car!", Arity::Exact(2), set_car_builtin);
    define_native_procedure(env, "set-cdr!", Arity::Exact(2), set_cdr_builtin);
    define_native_procedure(env, "list", Arity::AtLeast(0), list_builtin);
    define_native_procedure(env, "length", Arity::Exact(1), length_builtin);
    define_native_procedure(env, "null?", Arity::Exact(1), is_null);
    define_native_procedure(env, "pair?", Arity::Exact(1), is_pair);
    define_native_procedure(env, "list?", Arity::Exact(1), is_list);
}

fn as_pair(value: &Value) -> Result<Rc<PairCell>> {
    match value {
        Value::Pair(p) => Ok(p.clone()),
        other => Err(SchemeError::Type {
            expected: "pair",
            found: other.to_string(),
        }),
    }
}

fn cons_builtin(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    resume(&cont, cons(args[0].clone(), args[1].clone()))
}

fn car_builtin(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let pair = as_pair(&args[0])?;
    resume(&cont, pair.car())
}

fn cdr_builtin(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let pair = as_pair(&args[0])?;
    resume(&cont, pair.cdr())
}

fn set_car_builtin(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let pair = as_pair(&args[0])?;
    pair.set_car(args[1].clone())?;
    resume(&cont, Value::Unspecified)
}

fn set_cdr_builtin(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let pair = as_pair(&args[0])?;
    pair.set_cdr(args[1].clone())?;
    resume(&cont, Value::Unspecified)
}

fn list_builtin(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    resume(&cont, list_from_vec(args.into_vec()))
}

fn length_builtin(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    match list_length(&args[0]) {
        Some(len) => resume(&cont, Value::Integer(len as i64)),
        None => Err(SchemeError::Type {
            expected: "proper list",
            found: args[0].to_string(),
        }),
    }
}

fn is_null(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    resume(&cont, Value::Boolean(matches!(args[0], Value::Nil)))
}

fn is_pair(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    resume(&cont, Value::Boolean(matches!(args[0], Value::Pair(_))))
}

fn is_list(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    resume(&cont, Value::Boolean(is_proper_list(&args[0])))
}
