//! `(%time <expression>)` evaluates the expression and yields a dotted pair
//! whose car is the elapsed wall-clock time in milliseconds and whose cdr is
//! the expression's result.

use std::rc::Rc;
use std::time::Instant;

use crate::engine::cons::cons;
use crate::engine::operation::{define_native_syntax, Args};
use crate::engine::trampoline::{resume, step, Cont, Step};
use crate::engine::{eval, Arity, Environment, Result, Value};

pub fn install(env: &Environment) {
    define_native_syntax(env, "%time", Arity::Exact(1), time_form);
}

fn time_form(env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let expression = args[0].clone();
    let env = env.clone();
    // The clock starts inside the step, right before the expression runs.
    Ok(step(move || {
        let started = Instant::now();
        let after: Cont = Rc::new(move |result| {
            let elapsed = started.elapsed().as_millis() as i64;
            resume(&cont, cons(Value::Integer(elapsed), result))
        });
        eval(expression, env, after)
    }))
}
