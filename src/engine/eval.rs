//! Core dispatch: one function over the closed value kind set.
//!
//! A symbol looks itself up, a pair is a combination (operator resolution
//! followed by syntax/procedure/continuation application), everything else
//! is self-evaluating. Every recursion and every continuation delivery is
//! deferred through a fresh step, which is what keeps host stack use bounded
//! through arbitrarily deep language-level recursion.

use std::rc::Rc;

use tracing::trace;

use super::cons::list_to_vec;
use super::env::Environment;
use super::error::{Result, SchemeError};
use super::operation::{Args, OperationKind};
use super::trampoline::{resume, step, Cont, Step};
use super::value::Value;

/// Evaluates one expression, delivering the result to `cont`.
pub fn eval(expr: Value, env: Environment, cont: Cont) -> Result<Step> {
    trace!(target: "tailspin::engine::eval", expr = %expr, frame = %env.label(), "eval");
    match expr {
        Value::Symbol(name) => {
            let value = env.lookup(&name)?;
            resume(&cont, value)
        }
        Value::Pair(ref p) => {
            let operator = p.car();
            let operands = list_to_vec(&p.cdr()).map_err(|_| SchemeError::Syntax {
                form: "application",
                detail: format!("operand list is not a proper list: {}", expr),
            })?;
            let after_operator: Cont = {
                let env = env.clone();
                let cont = cont.clone();
                Rc::new(move |op_value| {
                    apply_operator(op_value, env.clone(), operands.clone(), cont.clone())
                })
            };
            Ok(step(move || eval(operator, env, after_operator)))
        }
        self_evaluating => resume(&cont, self_evaluating),
    }
}

/// Applies a resolved operator to its raw operand expressions.
///
/// Syntax receives the operands unevaluated; a procedure gets them
/// evaluated left to right in the caller's environment first; invoking a
/// reified continuation evaluates its single operand and then jumps,
/// abandoning the current step chain.
pub fn apply_operator(
    operator: Value,
    env: Environment,
    operands: Vec<Value>,
    cont: Cont,
) -> Result<Step> {
    trace!(
        target: "tailspin::engine::eval",
        operator = %operator,
        operand_count = operands.len(),
        "apply"
    );
    match operator {
        Value::Syntax(op) => {
            if matches!(op.kind(), OperationKind::Syntax) {
                op.apply(&env, operands.into_iter().collect(), cont)
            } else {
                Err(SchemeError::Internal(
                    "syntax value holding a procedure operation".to_string(),
                ))
            }
        }
        Value::Procedure(op) => {
            let done: ArgsCont = {
                let env = env.clone();
                Rc::new(move |args| op.apply(&env, args, cont.clone()))
            };
            eval_each(env, Rc::from(operands), 0, Args::new(), done)
        }
        Value::Continuation(escape) => {
            if operands.len() != 1 {
                return Err(SchemeError::WrongArgumentCount {
                    expected: 1,
                    received: operands.len(),
                });
            }
            let after: Cont = Rc::new(move |value| escape.invoke(value));
            eval(operands.into_iter().next().expect("one operand"), env, after)
        }
        other => Err(SchemeError::NotApplicable(other.to_string())),
    }
}

/// Continuation over a collected argument vector.
pub(crate) type ArgsCont = Rc<dyn Fn(Args) -> Result<Step>>;

/// Evaluates `exprs[index..]` left to right, one suspended step each,
/// accumulating results. Accumulation is snapshot-based (clone + push), so
/// a continuation captured mid-walk can be re-entered without corrupting
/// earlier argument values.
pub(crate) fn eval_each(
    env: Environment,
    exprs: Rc<[Value]>,
    index: usize,
    collected: Args,
    done: ArgsCont,
) -> Result<Step> {
    if index == exprs.len() {
        return Ok(step(move || done(collected)));
    }
    let expr = exprs[index].clone();
    let next: Cont = {
        let env = env.clone();
        let exprs = exprs.clone();
        let done = done.clone();
        Rc::new(move |value| {
            let mut acc = collected.clone();
            acc.push(value);
            let env = env.clone();
            let exprs = exprs.clone();
            let done = done.clone();
            Ok(step(move || eval_each(env, exprs, index + 1, acc, done)))
        })
    };
    eval(expr, env, next)
}

/// Evaluates a body sequence for effect except the last expression, whose
/// step is returned directly so it sits in tail position: no suspended
/// frame is retained on top of it.
pub fn eval_sequence(env: Environment, body: Rc<Vec<Value>>, cont: Cont) -> Result<Step> {
    sequence_from(env, body, 0, cont)
}

fn sequence_from(env: Environment, body: Rc<Vec<Value>>, index: usize, cont: Cont) -> Result<Step> {
    if body.is_empty() {
        return resume(&cont, Value::Unspecified);
    }
    if index + 1 == body.len() {
        // Tail position.
        return eval(body[index].clone(), env, cont);
    }
    let expr = body[index].clone();
    let next: Cont = {
        let env = env.clone();
        let body = body.clone();
        let cont = cont.clone();
        Rc::new(move |_ignored| {
            let env = env.clone();
            let body = body.clone();
            let cont = cont.clone();
            Ok(step(move || sequence_from(env, body, index + 1, cont)))
        })
    };
    eval(expr, env, next)
}
