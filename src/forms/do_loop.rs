//! `(do ((var init [step])...) (test result...) command...)`.
//!
//! Initializers run in the surrounding scope; the variables live in one
//! fresh frame for the whole loop. Each iteration evaluates the test, and
//! while it is false runs the commands for effect, evaluates every step
//! expression against the pre-iteration values, and only then rebinds. When
//! the test turns true the result expressions run in tail position; with no
//! result expressions the loop yields the unspecified value.

use std::rc::Rc;

use crate::engine::cons::list_to_vec;
use crate::engine::eval::{eval_each, ArgsCont};
use crate::engine::operation::{define_native_syntax, Args};
use crate::engine::trampoline::{step, Cont, Step};
use crate::engine::{eval, eval_sequence, Arity, Environment, Result, SchemeError, Value};

pub fn install(env: &Environment) {
    define_native_syntax(env, "do", Arity::AtLeast(2), do_form);
}

struct LoopVar {
    name: Rc<str>,
    init: Value,
    /// Absent means the variable keeps its value across iterations.
    step: Option<Value>,
}

fn parse_variables(form: &Value) -> Result<Vec<LoopVar>> {
    let entries = list_to_vec(form).map_err(|_| SchemeError::BadBinding {
        syntax: "do",
        binding: form.to_string(),
    })?;
    entries
        .iter()
        .map(|entry| {
            let parts = list_to_vec(entry).map_err(|_| SchemeError::BadBinding {
                syntax: "do",
                binding: entry.to_string(),
            })?;
            if parts.len() < 2 || parts.len() > 3 {
                return Err(SchemeError::BadBinding {
                    syntax: "do",
                    binding: entry.to_string(),
                });
            }
            match &parts[0] {
                Value::Symbol(name) => Ok(LoopVar {
                    name: name.clone(),
                    init: parts[1].clone(),
                    step: parts.get(2).cloned(),
                }),
                _ => Err(SchemeError::BadBinding {
                    syntax: "do",
                    binding: entry.to_string(),
                }),
            }
        })
        .collect()
}

fn do_form(env: &Environment, args: Args, cont: Cont) -> Result<Step> {
    let variables = Rc::new(parse_variables(&args[0])?);

    let exit_clause = list_to_vec(&args[1]).map_err(|_| SchemeError::Syntax {
        form: "do",
        detail: format!("exit clause must be a list, received {}", args[1]),
    })?;
    if exit_clause.is_empty() {
        return Err(SchemeError::Syntax {
            form: "do",
            detail: "exit clause needs a test expression".to_string(),
        });
    }
    let test = exit_clause[0].clone();
    let results = Rc::new(exit_clause[1..].to_vec());
    let commands = Rc::new(args[2..].to_vec());

    // Initializers see the surrounding scope only.
    let inits: Rc<[Value]> = variables.iter().map(|v| v.init.clone()).collect();
    let outer = env.clone();
    let start: ArgsCont = Rc::new(move |values| {
        let frame = outer.extend("do");
        for (var, value) in variables.iter().zip(values.iter()) {
            frame.define(var.name.clone(), value.clone());
        }
        let variables = variables.clone();
        let test = test.clone();
        let results = results.clone();
        let commands = commands.clone();
        let cont = cont.clone();
        Ok(step(move || {
            iterate(frame, variables, test, results, commands, cont)
        }))
    });
    eval_each(env.clone(), inits, 0, Args::new(), start)
}

/// One loop turn: test, then either the results (tail) or the commands, the
/// step expressions, the rebinding, and the next turn.
fn iterate(
    frame: Environment,
    variables: Rc<Vec<LoopVar>>,
    test: Value,
    results: Rc<Vec<Value>>,
    commands: Rc<Vec<Value>>,
    cont: Cont,
) -> Result<Step> {
    let after_test: Cont = {
        let frame = frame.clone();
        let test = test.clone();
        Rc::new(move |test_value| {
            let frame = frame.clone();
            let cont = cont.clone();
            if test_value.is_true() {
                return eval_sequence(frame, results.clone(), cont);
            }
            let command_frame = frame.clone();
            let command_body = commands.clone();
            let after_commands: Cont = {
                let variables = variables.clone();
                let test = test.clone();
                let results = results.clone();
                let commands = commands.clone();
                Rc::new(move |_ignored| {
                    advance(
                        frame.clone(),
                        variables.clone(),
                        test.clone(),
                        results.clone(),
                        commands.clone(),
                        cont.clone(),
                    )
                })
            };
            eval_sequence(command_frame, command_body, after_commands)
        })
    };
    eval(test, frame, after_test)
}

/// Evaluates every step expression before rebinding anything, so the steps
/// of one iteration all observe the same pre-iteration values.
fn advance(
    frame: Environment,
    variables: Rc<Vec<LoopVar>>,
    test: Value,
    results: Rc<Vec<Value>>,
    commands: Rc<Vec<Value>>,
    cont: Cont,
) -> Result<Step> {
    let stepped: Rc<Vec<Rc<str>>> = Rc::new(
        variables
            .iter()
            .filter(|v| v.step.is_some())
            .map(|v| v.name.clone())
            .collect(),
    );
    let step_exprs: Rc<[Value]> = variables
        .iter()
        .filter_map(|v| v.step.clone())
        .collect();

    let loop_frame = frame.clone();
    let rebind: ArgsCont = Rc::new(move |values| {
        for (name, value) in stepped.iter().zip(values.iter()) {
            loop_frame.define(name.clone(), value.clone());
        }
        let frame = loop_frame.clone();
        let variables = variables.clone();
        let test = test.clone();
        let results = results.clone();
        let commands = commands.clone();
        let cont = cont.clone();
        Ok(step(move || {
            iterate(frame, variables, test, results, commands, cont)
        }))
    });
    eval_each(frame, step_exprs, 0, Args::new(), rebind)
}
