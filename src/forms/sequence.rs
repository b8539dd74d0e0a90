//! `(begin <expression>...)` evaluates left to right and yields the last
//! value; the last expression sits in tail position. An empty body yields
//! the unspecified value.

use std::rc::Rc;

use crate::engine::operation::{define_native_syntax, Args};
use crate::engine::trampoline::{Cont, Step};
use crate::engine::{eval_sequence, Arity, Environment, Result};

pub fn install(env: &Environment) {
    define_native_syntax(env, "begin", Arity::AtLeast(0), begin_form);
}

fn begin_form(env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    eval_sequence(env.clone(), Rc::new(args.into_vec()), cont)
}
