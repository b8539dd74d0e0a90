//! `lambda` and `%syntax`: the two compound-operation constructors.
//!
//! `(lambda <formals> <body>...)` yields an anonymous procedure closed over
//! the current environment. `(%syntax (<name> . <formals>) <body>...)`
//! defines a named syntax whose operands arrive unevaluated; it exists so
//! derived forms can be written in the language itself.

use crate::engine::operation::{define_native_syntax, Args};
use crate::engine::trampoline::{resume, Cont, Step};
use crate::engine::{Arity, Environment, Operation, Result, SchemeError, Value};

pub fn install(env: &Environment) {
    define_native_syntax(env, "lambda", Arity::AtLeast(2), lambda_form);
    define_native_syntax(env, "%syntax", Arity::AtLeast(2), syntax_form);
}

fn lambda_form(env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let op = Operation::procedure(&args[0], args[1..].to_vec(), env)?;
    resume(&cont, Value::Procedure(op))
}

fn syntax_form(env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let signature = match &args[0] {
        Value::Pair(p) => p.clone(),
        other => {
            return Err(SchemeError::Syntax {
                form: "%syntax",
                detail: format!("signature must be a list, received {}", other),
            })
        }
    };
    let name = match signature.car() {
        Value::Symbol(name) => name,
        other => {
            return Err(SchemeError::Syntax {
                form: "%syntax",
                detail: format!("syntax name must be a symbol, received {}", other),
            })
        }
    };
    let op = Operation::syntax(&signature.cdr(), args[1..].to_vec(), env)?;
    op.set_name(name.clone());
    env.define(name, Value::Syntax(op));
    resume(&cont, Value::Nil)
}
