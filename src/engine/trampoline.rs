//! The trampoline scheduler: suspended steps and the driver loop.
//!
//! Evaluation never recurses on the host stack. Anything that would recurse
//! instead returns a [`Step`] describing the next action; the driver loop
//! pops and runs steps until the terminal marker. The loop is the only place
//! where host stack is consumed, and the amount is bounded regardless of how
//! deep the language-level recursion goes.
//!
//! Errors propagate through the step chain to the driver, which hands the
//! first one to the caller-supplied handler and halts. Nothing is retried or
//! swallowed.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use super::error::{Result, SchemeError};
use super::value::Value;

/// A suspended unit of computation: either more work or the terminal marker.
pub enum Step {
    /// Run this to obtain the next step.
    Next(Box<dyn FnOnce() -> Result<Step>>),
    /// No further work.
    Done,
}

/// The continuation callback: receives a value, may fail, and returns a
/// suspended step rather than a direct result. Shared (`Rc`) and
/// re-invocable, which is what makes reified continuations multi-shot.
pub type Cont = Rc<dyn Fn(Value) -> Result<Step>>;

/// Wraps deferred work into a step.
pub fn step(work: impl FnOnce() -> Result<Step> + 'static) -> Step {
    Step::Next(Box::new(work))
}

/// Defers delivery of `value` to `cont` into a fresh step, so continuation
/// chains never nest on the host stack.
pub fn resume(cont: &Cont, value: Value) -> Result<Step> {
    let cont = cont.clone();
    Ok(step(move || cont(value)))
}

/// Executed-step counter, for diagnostics and performance measurement.
static STEP_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn step_count() -> u64 {
    STEP_COUNT.load(Ordering::Relaxed)
}

pub fn reset_step_count() {
    STEP_COUNT.store(0, Ordering::Relaxed);
}

/// The driver loop. Runs steps until the terminal marker or the first
/// propagated error, which goes to `on_error`; evaluation never continues
/// past an error.
pub fn trampoline(first: Result<Step>, on_error: impl FnOnce(SchemeError)) {
    let mut current = match first {
        Ok(s) => s,
        Err(e) => {
            on_error(e);
            return;
        }
    };
    loop {
        match current {
            Step::Done => return,
            Step::Next(work) => {
                let executed = STEP_COUNT.fetch_add(1, Ordering::Relaxed);
                trace!(target: "tailspin::engine::trampoline", executed, "step");
                match work() {
                    Ok(next) => current = next,
                    Err(e) => {
                        trace!(target: "tailspin::engine::trampoline", error = %e, "halt");
                        on_error(e);
                        return;
                    }
                }
            }
        }
    }
}

/// Wraps a plain result consumer into the continuation protocol: delivers
/// the value into the slot and terminates the loop.
pub fn end_call(slot: Rc<RefCell<Option<Value>>>) -> Cont {
    Rc::new(move |value| {
        *slot.borrow_mut() = Some(value);
        Ok(Step::Done)
    })
}

/// Drives a self-contained evaluation to completion and collects its value
/// or its error synchronously, for callers not written in continuation
/// style. Yields exactly one of the two, never both, never neither.
pub fn run_to_completion(start: impl FnOnce(Cont) -> Result<Step>) -> Result<Value> {
    let slot: Rc<RefCell<Option<Value>>> = Rc::new(RefCell::new(None));
    let mut error: Option<SchemeError> = None;

    trampoline(start(end_call(slot.clone())), |e| error = Some(e));

    if let Some(e) = error {
        return Err(e);
    }
    let value = slot.borrow_mut().take().unwrap_or(Value::Unspecified);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_value_completes() {
        let result = run_to_completion(|c| resume(&c, Value::Integer(42))).unwrap();
        assert!(matches!(result, Value::Integer(42)));
    }

    #[test]
    fn long_step_chains_run_in_constant_host_stack() {
        fn countdown(n: u64, cont: Cont) -> Result<Step> {
            if n == 0 {
                return resume(&cont, Value::Integer(0));
            }
            Ok(step(move || countdown(n - 1, cont)))
        }

        let result = run_to_completion(|c| countdown(1_000_000, c)).unwrap();
        assert!(matches!(result, Value::Integer(0)));
    }

    #[test]
    fn first_error_aborts_the_loop() {
        let result = run_to_completion(|_c| {
            Ok(step(|| Err(SchemeError::Internal("boom".to_string()))))
        });
        assert!(matches!(result, Err(SchemeError::Internal(_))));
    }

    #[test]
    fn step_counter_advances_and_resets() {
        reset_step_count();
        let _ = run_to_completion(|c| resume(&c, Value::Nil));
        assert!(step_count() > 0);
        reset_step_count();
        assert_eq!(step_count(), 0);
    }
}
