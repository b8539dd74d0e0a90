//! Reified escape continuations and `call-with-current-continuation`.
//!
//! An `Escape` wraps the continuation that was current when `call/cc` ran.
//! It is a first-class value invokable like any one-argument procedure.
//! Invoking it delivers the argument straight to the captured callback and
//! never returns to its own caller; the step chain that was active at
//! invocation time is simply abandoned, never resumed.
//!
//! The captured callback is a shared immutable closure, so an escape stays
//! valid for as long as the value is reachable (unbounded extent) and may
//! be invoked more than once, including after its originating dynamic
//! extent has returned.

use std::rc::Rc;

use smallvec::smallvec;

use super::env::Environment;
use super::error::{Result, SchemeError};
use super::operation::{define_native_procedure, Args, Arity, Operation};
use super::trampoline::{resume, Cont, Step};
use super::value::Value;

/// The rest of a computation, captured as a value.
pub struct Escape {
    cont: Cont,
}

impl Escape {
    pub fn new(cont: Cont) -> Self {
        Escape { cont }
    }

    /// Jumps: delivers `value` to the captured continuation, substituting
    /// its step chain for whatever is active right now.
    pub fn invoke(&self, value: Value) -> Result<Step> {
        resume(&self.cont, value)
    }
}

fn call_cc(env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let reified = Value::Continuation(Rc::new(Escape::new(cont.clone())));
    match &args[0] {
        Value::Procedure(op) => op.apply(env, smallvec![reified], cont),
        // A continuation is applicable, so it is a valid receiver too.
        Value::Continuation(escape) => escape.invoke(reified),
        other => Err(SchemeError::Type {
            expected: "procedure",
            found: other.to_string(),
        }),
    }
}

/// Registers `call-with-current-continuation` and its `call/cc` shorthand.
pub fn install(env: &Environment) {
    define_native_procedure(
        env,
        "call-with-current-continuation",
        Arity::Exact(1),
        call_cc,
    );
    let op = Operation::native_procedure("call/cc", Arity::Exact(1), call_cc);
    env.define(Rc::from("call/cc"), Value::Procedure(op));
}
