//! `(quote <datum>)` returns the datum unevaluated, marked constant all the
//! way down so later mutation attempts fail.

use crate::engine::operation::{define_native_syntax, Args};
use crate::engine::trampoline::{resume, Cont, Step};
use crate::engine::{Arity, Environment, Result};

pub fn install(env: &Environment) {
    define_native_syntax(env, "quote", Arity::Exact(1), quote_form);
}

fn quote_form(_env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let datum = args[0].clone();
    datum.set_constant();
    resume(&cont, datum)
}
