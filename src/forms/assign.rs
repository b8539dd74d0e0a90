//! `(set! <symbol> <expression>)` mutates the nearest existing binding.
//! Unlike `define` it never creates one; assigning an unbound symbol fails.

use std::rc::Rc;

use crate::engine::operation::{define_native_syntax, Args};
use crate::engine::trampoline::{resume, Cont, Step};
use crate::engine::{eval, Arity, Environment, Result, SchemeError, Value};

pub fn install(env: &Environment) {
    define_native_syntax(env, "set!", Arity::Exact(2), assign_form);
}

fn assign_form(env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let name = match &args[0] {
        Value::Symbol(name) => name.clone(),
        other => {
            return Err(SchemeError::Syntax {
                form: "set!",
                detail: format!("assignment target must be a symbol, received {}", other),
            })
        }
    };
    let target = env.clone();
    let after: Cont = Rc::new(move |value| {
        target.assign(&name, value)?;
        resume(&cont, Value::Nil)
    });
    eval(args[1].clone(), env.clone(), after)
}
