//! `(if <test> <consequent> [<alternative>])`. Only the chosen branch is
//! evaluated, in tail position; a missing alternative on a false test yields
//! the unspecified value. Everything except `#f` counts as true.

use std::rc::Rc;

use crate::engine::operation::{define_native_syntax, Args};
use crate::engine::trampoline::{resume, step, Cont, Step};
use crate::engine::{eval, Arity, Environment, Result, Value};

pub fn install(env: &Environment) {
    define_native_syntax(env, "if", Arity::Range(2, 3), if_form);
}

fn if_form(env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let test = args[0].clone();
    let consequent = args[1].clone();
    let alternative = args.get(2).cloned();
    let branch_env = env.clone();
    let after_test: Cont = Rc::new(move |test_value| {
        let env = branch_env.clone();
        let cont = cont.clone();
        if test_value.is_true() {
            let consequent = consequent.clone();
            Ok(step(move || eval(consequent, env, cont)))
        } else {
            match alternative.clone() {
                Some(alternative) => Ok(step(move || eval(alternative, env, cont))),
                None => resume(&cont, Value::Unspecified),
            }
        }
    });
    eval(test, env.clone(), after_test)
}
