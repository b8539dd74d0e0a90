//! Arithmetic and numeric comparison.
//!
//! Integers are exact machine integers; an operation on two integers stays
//! integral and fails on overflow rather than wrapping. Mixing an integer
//! with a real promotes the computation to real.

use crate::engine::operation::{define_native_procedure, Args};
use crate::engine::trampoline::{resume, Cont, Step};
use crate::engine::{Arity, Environment, Result, SchemeError, Value};

pub fn install(env: &Environment) {
    define_native_procedure(env, "+", Arity::AtLeast(0), add);
    define_native_procedure(env, "-", Arity::AtLeast(1), subtract);
    define_native_procedure(env, "*", Arity::AtLeast(0), multiply);
    define_native_procedure(env, "=", Arity::AtLeast(2), numeric_equal);
    define_native_procedure(env, "<", Arity::AtLeast(2), less_than);
    define_native_procedure(env, ">", Arity::AtLeast(2), greater_than);
}

#[derive(Clone, Copy)]
enum Number {
    Int(i64),
    Real(f64),
}

impl Number {
    fn of(value: &Value) -> Result<Number> {
        match value {
            Value::Integer(n) => Ok(Number::Int(*n)),
            Value::Real(r) => Ok(Number::Real(*r)),
            other => Err(SchemeError::Type {
                expected: "number",
                found: other.to_string(),
            }),
        }
    }

    fn as_real(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Real(r) => r,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Number::Int(n) => Value::Integer(n),
            Number::Real(r) => Value::Real(r),
        }
    }
}

fn combine(
    op: &'static str,
    a: Number,
    b: Number,
    int_op: fn(i64, i64) -> Option<i64>,
    real_op: fn(f64, f64) -> f64,
) -> Result<Number> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => match int_op(x, y) {
            Some(n) => Ok(Number::Int(n)),
            None => Err(SchemeError::Overflow(op)),
        },
        _ => Ok(Number::Real(real_op(a.as_real(), b.as_real()))),
    }
}

fn fold(
    op: &'static str,
    identity: Number,
    args: &Args,
    int_op: fn(i64, i64) -> Option<i64>,
    real_op: fn(f64, f64) -> f64,
) -> Result<Value> {
    let mut acc = identity;
    for arg in args {
        acc = combine(op, acc, Number::of(arg)?, int_op, real_op)?;
    }
    Ok(acc.into_value())
}

fn add(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let sum = fold("+", Number::Int(0), &args, i64::checked_add, |a, b| a + b)?;
    resume(&cont, sum)
}

fn subtract(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let first = Number::of(&args[0])?;
    let result = if args.len() == 1 {
        // Unary minus negates.
        combine("-", Number::Int(0), first, i64::checked_sub, |a, b| a - b)?.into_value()
    } else {
        let mut acc = first;
        for arg in &args[1..] {
            acc = combine("-", acc, Number::of(arg)?, i64::checked_sub, |a, b| a - b)?;
        }
        acc.into_value()
    };
    resume(&cont, result)
}

fn multiply(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let product = fold("*", Number::Int(1), &args, i64::checked_mul, |a, b| a * b)?;
    resume(&cont, product)
}

fn compare(args: &Args, holds: fn(&Number, &Number) -> bool) -> Result<Value> {
    let mut previous = Number::of(&args[0])?;
    for arg in &args[1..] {
        let current = Number::of(arg)?;
        if !holds(&previous, &current) {
            return Ok(Value::Boolean(false));
        }
        previous = current;
    }
    Ok(Value::Boolean(true))
}

fn numeric_equal(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let result = compare(&args, |a, b| match (a, b) {
        (Number::Int(x), Number::Int(y)) => x == y,
        _ => a.as_real() == b.as_real(),
    })?;
    resume(&cont, result)
}

fn less_than(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let result = compare(&args, |a, b| match (a, b) {
        (Number::Int(x), Number::Int(y)) => x < y,
        _ => a.as_real() < b.as_real(),
    })?;
    resume(&cont, result)
}

fn greater_than(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let result = compare(&args, |a, b| match (a, b) {
        (Number::Int(x), Number::Int(y)) => x > y,
        _ => a.as_real() > b.as_real(),
    })?;
    resume(&cont, result)
}
