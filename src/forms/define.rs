//! `define` in both shapes: `(define <symbol> <expression>)` evaluates the
//! expression and binds it in the current frame, and
//! `(define (<name> . <formals>) <body>...)` builds a procedure closed over
//! the current environment, names it, and binds it. Either way the binding
//! lands in the current frame, shadowing without touching outer frames, and
//! the form yields the empty list.

use std::rc::Rc;

use crate::engine::operation::{define_native_syntax, Args};
use crate::engine::trampoline::{resume, Cont, Step};
use crate::engine::{eval, Arity, Environment, Operation, Result, SchemeError, Value};

pub fn install(env: &Environment) {
    define_native_syntax(env, "define", Arity::AtLeast(2), define_form);
}

fn define_form(env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    match args[0].clone() {
        Value::Symbol(name) => {
            if args.len() != 2 {
                return Err(SchemeError::Syntax {
                    form: "define",
                    detail: format!(
                        "a value definition takes one expression, received {}",
                        args.len() - 1
                    ),
                });
            }
            let target = env.clone();
            let after: Cont = Rc::new(move |value| {
                target.define(name.clone(), value);
                resume(&cont, Value::Nil)
            });
            eval(args[1].clone(), env.clone(), after)
        }
        Value::Pair(signature) => {
            let name = match signature.car() {
                Value::Symbol(name) => name,
                other => {
                    return Err(SchemeError::Syntax {
                        form: "define",
                        detail: format!("procedure name must be a symbol, received {}", other),
                    })
                }
            };
            let formals = signature.cdr();
            let body = args[1..].to_vec();
            let op = Operation::procedure(&formals, body, env)?;
            op.set_name(name.clone());
            env.define(name, Value::Procedure(op));
            resume(&cont, Value::Nil)
        }
        other => Err(SchemeError::Syntax {
            form: "define",
            detail: format!("cannot define {}", other),
        }),
    }
}
