//! Short-circuit `and` and `or`.
//!
//! Both thread the most recent result through the walk and stop as soon as
//! it decides the answer: `and` on the first false value, `or` on the first
//! true one. `(and)` is `#t` and `(or)` is `#f`, the identities of the
//! respective chains. Unevaluated operands stay unevaluated.

use std::rc::Rc;

use crate::engine::operation::{define_native_syntax, Args};
use crate::engine::trampoline::{resume, step, Cont, Step};
use crate::engine::{eval, Arity, Environment, Result, Value};

pub fn install(env: &Environment) {
    define_native_syntax(env, "and", Arity::AtLeast(0), and_form);
    define_native_syntax(env, "or", Arity::AtLeast(0), or_form);
}

fn and_form(env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    // Stop as soon as the threaded result turns false.
    chain(
        env.clone(),
        Rc::from(args.into_vec()),
        0,
        Value::Boolean(true),
        cont,
        false,
    )
}

fn or_form(env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    chain(
        env.clone(),
        Rc::from(args.into_vec()),
        0,
        Value::Boolean(false),
        cont,
        true,
    )
}

/// Walks the operands one suspended step at a time, carrying the latest
/// result, until exhaustion or until its truth value equals `stop_on`.
fn chain(
    env: Environment,
    exprs: Rc<[Value]>,
    index: usize,
    previous: Value,
    cont: Cont,
    stop_on: bool,
) -> Result<Step> {
    if index == exprs.len() || previous.is_true() == stop_on {
        return resume(&cont, previous);
    }
    let next: Cont = {
        let env = env.clone();
        let exprs = exprs.clone();
        let cont = cont.clone();
        Rc::new(move |value| {
            let env = env.clone();
            let exprs = exprs.clone();
            let cont = cont.clone();
            Ok(step(move || chain(env, exprs, index + 1, value, cont, stop_on)))
        })
    };
    eval(exprs[index].clone(), env, next)
}
