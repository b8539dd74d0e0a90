//! The three `let` variants. They differ only in where initializers are
//! evaluated and when names become visible:
//!
//! * `let` evaluates every initializer in the surrounding scope, then binds
//!   all names at once in a fresh frame.
//! * `let*` binds sequentially in one fresh frame, so each initializer sees
//!   the names before it.
//! * `letrec` pre-binds every name to the unspecified value, then evaluates
//!   the initializers left to right inside the new frame, so definitions may
//!   refer to each other (mutual recursion included).

use std::rc::Rc;

use crate::engine::cons::list_to_vec;
use crate::engine::eval::{eval_each, ArgsCont};
use crate::engine::operation::{define_native_syntax, Args};
use crate::engine::trampoline::{step, Cont, Step};
use crate::engine::{eval, eval_sequence, Arity, Environment, Result, SchemeError, Value};

pub fn install(env: &Environment) {
    define_native_syntax(env, "let", Arity::AtLeast(2), let_form);
    define_native_syntax(env, "let*", Arity::AtLeast(2), let_star_form);
    define_native_syntax(env, "letrec", Arity::AtLeast(2), letrec_form);
}

struct BindingSpec {
    name: Rc<str>,
    init: Value,
}

/// Validates the binding list shape: a proper list of `(name init)` pairs
/// with symbolic names. Anything else fails before any initializer runs.
fn parse_bindings(syntax: &'static str, form: &Value) -> Result<Vec<BindingSpec>> {
    let entries = list_to_vec(form).map_err(|_| SchemeError::BadBinding {
        syntax,
        binding: form.to_string(),
    })?;
    entries
        .iter()
        .map(|entry| {
            let parts = list_to_vec(entry).map_err(|_| SchemeError::BadBinding {
                syntax,
                binding: entry.to_string(),
            })?;
            if parts.len() != 2 {
                return Err(SchemeError::BadBinding {
                    syntax,
                    binding: entry.to_string(),
                });
            }
            match &parts[0] {
                Value::Symbol(name) => Ok(BindingSpec {
                    name: name.clone(),
                    init: parts[1].clone(),
                }),
                _ => Err(SchemeError::BadBinding {
                    syntax,
                    binding: entry.to_string(),
                }),
            }
        })
        .collect()
}

fn let_form(env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let bindings = parse_bindings("let", &args[0])?;
    let body = Rc::new(args[1..].to_vec());
    let names: Rc<Vec<Rc<str>>> = Rc::new(bindings.iter().map(|b| b.name.clone()).collect());
    let inits: Rc<[Value]> = bindings.iter().map(|b| b.init.clone()).collect();

    // Every initializer sees the surrounding scope; the names appear only
    // once all of them are evaluated.
    let outer = env.clone();
    let done: ArgsCont = Rc::new(move |values| {
        let frame = outer.extend("let");
        for (name, value) in names.iter().zip(values.iter()) {
            frame.define(name.clone(), value.clone());
        }
        eval_sequence(frame, body.clone(), cont.clone())
    });
    eval_each(env.clone(), inits, 0, Args::new(), done)
}

fn let_star_form(env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let bindings = Rc::new(parse_bindings("let*", &args[0])?);
    let body = Rc::new(args[1..].to_vec());
    let frame = env.extend("let*");
    bind_sequential(frame, bindings, 0, body, cont)
}

/// One suspended step per binding; each initializer runs in the frame that
/// already holds the bindings before it.
fn bind_sequential(
    frame: Environment,
    bindings: Rc<Vec<BindingSpec>>,
    index: usize,
    body: Rc<Vec<Value>>,
    cont: Cont,
) -> Result<Step> {
    if index == bindings.len() {
        return eval_sequence(frame, body, cont);
    }
    let init = bindings[index].init.clone();
    let after: Cont = {
        let frame = frame.clone();
        let bindings = bindings.clone();
        let cont = cont.clone();
        Rc::new(move |value| {
            frame.define(bindings[index].name.clone(), value);
            let frame = frame.clone();
            let bindings = bindings.clone();
            let body = body.clone();
            let cont = cont.clone();
            Ok(step(move || {
                bind_sequential(frame, bindings, index + 1, body, cont)
            }))
        })
    };
    eval(init, frame.clone(), after)
}

fn letrec_form(env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let bindings = Rc::new(parse_bindings("letrec", &args[0])?);
    let body = Rc::new(args[1..].to_vec());
    let frame = env.extend("letrec");
    // Names exist, unspecified, before any initializer runs; initializers
    // then evaluate left to right inside the frame.
    for binding in bindings.iter() {
        frame.define(binding.name.clone(), Value::Unspecified);
    }
    bind_sequential(frame, bindings, 0, body, cont)
}
