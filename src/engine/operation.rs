//! The Operation abstraction: the common callable for procedures and syntax.
//!
//! A procedure gets its operands evaluated (left to right, in the caller's
//! environment) before binding; a syntax receives them raw and decides
//! per-operand whether, when, and where to evaluate. Both share the same
//! formal-argument compilation, arity checking, and suspended-step binding
//! walk, so user-defined and host-defined operations behave uniformly.
//!
//! Formal argument names are checked for duplicates once, when the
//! operation is defined, not per call.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use smallvec::SmallVec;

use super::cons::{self, list_from_vec};
use super::env::Environment;
use super::error::{Result, SchemeError};
use super::eval::eval_sequence;
use super::trampoline::{step, Cont, Step};
use super::value::Value;

/// Evaluated (or, for syntax, raw) call-site arguments. Small calls stay on
/// the stack.
pub type Args = SmallVec<[Value; 4]>;

/// Host-defined operation body.
pub type NativeFn = fn(&Environment, Args, Cont) -> Result<Step>;

/// Expected argument count for host-defined operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    Range(usize, usize),
}

impl Arity {
    pub fn check(&self, received: usize) -> Result<()> {
        match *self {
            Arity::Exact(expected) => {
                if received != expected {
                    return Err(SchemeError::WrongArgumentCount { expected, received });
                }
            }
            Arity::AtLeast(min) => {
                if received < min {
                    return Err(SchemeError::NotEnoughArguments { min, received });
                }
            }
            Arity::Range(min, max) => {
                if received < min {
                    return Err(SchemeError::NotEnoughArguments { min, received });
                }
                if received > max {
                    return Err(SchemeError::TooManyArguments { max, received });
                }
            }
        }
        Ok(())
    }
}

/// A compiled formal-argument specification: fixed names plus at most one
/// rest name capturing remaining arguments as a list.
#[derive(Debug)]
pub struct FormalSpec {
    fixed: Vec<Rc<str>>,
    rest: Option<Rc<str>>,
}

impl FormalSpec {
    /// Compiles a formal specification from source shape:
    /// `()` is zero-arity, a bare symbol is purely variadic, a (possibly
    /// dotted) list of symbols is fixed names with an optional rest name.
    /// Duplicate names anywhere in the spec fail here, at definition time.
    pub fn parse(spec: &Value) -> Result<FormalSpec> {
        match spec {
            Value::Nil => Ok(FormalSpec {
                fixed: Vec::new(),
                rest: None,
            }),
            Value::Symbol(rest) => Ok(FormalSpec {
                fixed: Vec::new(),
                rest: Some(rest.clone()),
            }),
            Value::Pair(_) => {
                if cons::is_circular(spec) {
                    return Err(SchemeError::InvalidFormals(
                        "circular formal argument list".to_string(),
                    ));
                }
                let mut seen: HashSet<Rc<str>> = HashSet::new();
                let mut fixed = Vec::new();
                let mut rest = None;
                let mut current = spec.clone();
                loop {
                    match current {
                        Value::Nil => break,
                        Value::Pair(p) => {
                            match p.car() {
                                Value::Symbol(name) => {
                                    if !seen.insert(name.clone()) {
                                        return Err(SchemeError::DuplicateFormal(
                                            name.to_string(),
                                        ));
                                    }
                                    fixed.push(name);
                                }
                                other => {
                                    return Err(SchemeError::InvalidFormals(other.to_string()))
                                }
                            }
                            current = p.cdr();
                        }
                        // A dotted tail symbol is the rest parameter; it
                        // terminates the fixed-arity part.
                        Value::Symbol(name) => {
                            if !seen.insert(name.clone()) {
                                return Err(SchemeError::DuplicateFormal(name.to_string()));
                            }
                            rest = Some(name);
                            break;
                        }
                        other => return Err(SchemeError::InvalidFormals(other.to_string())),
                    }
                }
                Ok(FormalSpec { fixed, rest })
            }
            other => Err(SchemeError::InvalidFormals(other.to_string())),
        }
    }

    pub fn fixed_count(&self) -> usize {
        self.fixed.len()
    }

    pub fn is_variadic(&self) -> bool {
        self.rest.is_some()
    }

    /// Call-time arity check: exact match unless a rest parameter exists,
    /// in which case at least the fixed count is required.
    pub fn check_arity(&self, received: usize) -> Result<()> {
        if self.rest.is_some() {
            if received < self.fixed.len() {
                return Err(SchemeError::NotEnoughArguments {
                    min: self.fixed.len(),
                    received,
                });
            }
            return Ok(());
        }
        if received != self.fixed.len() {
            return Err(SchemeError::WrongArgumentCount {
                expected: self.fixed.len(),
                received,
            });
        }
        Ok(())
    }
}

/// Whether operands are evaluated before an operation sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Operands evaluated left to right in the caller's environment.
    Procedure,
    /// Operands passed raw; the operation controls evaluation itself.
    Syntax,
}

enum Body {
    /// Language-defined: a formal spec and a body, closed over the defining
    /// environment.
    Compound {
        formals: Rc<FormalSpec>,
        body: Rc<Vec<Value>>,
        closure: Environment,
    },
    /// Host-defined.
    Native { arity: Arity, run: NativeFn },
}

/// A named callable entity, procedure or syntax.
pub struct Operation {
    name: RefCell<Rc<str>>,
    kind: OperationKind,
    body: Body,
}

impl Operation {
    /// A language-defined procedure. Fails at definition time on a bad
    /// formal spec.
    pub fn procedure(
        formals: &Value,
        body: Vec<Value>,
        closure: &Environment,
    ) -> Result<Rc<Operation>> {
        Ok(Rc::new(Operation {
            name: RefCell::new(Rc::from("anonymous")),
            kind: OperationKind::Procedure,
            body: Body::Compound {
                formals: Rc::new(FormalSpec::parse(formals)?),
                body: Rc::new(body),
                closure: closure.clone(),
            },
        }))
    }

    /// A language-defined syntax: same contract, operands arrive raw.
    pub fn syntax(
        formals: &Value,
        body: Vec<Value>,
        closure: &Environment,
    ) -> Result<Rc<Operation>> {
        Ok(Rc::new(Operation {
            name: RefCell::new(Rc::from("anonymous")),
            kind: OperationKind::Syntax,
            body: Body::Compound {
                formals: Rc::new(FormalSpec::parse(formals)?),
                body: Rc::new(body),
                closure: closure.clone(),
            },
        }))
    }

    pub fn native_procedure(name: &str, arity: Arity, run: NativeFn) -> Rc<Operation> {
        Rc::new(Operation {
            name: RefCell::new(Rc::from(name)),
            kind: OperationKind::Procedure,
            body: Body::Native { arity, run },
        })
    }

    pub fn native_syntax(name: &str, arity: Arity, run: NativeFn) -> Rc<Operation> {
        Rc::new(Operation {
            name: RefCell::new(Rc::from(name)),
            kind: OperationKind::Syntax,
            body: Body::Native { arity, run },
        })
    }

    pub fn name(&self) -> Rc<str> {
        self.name.borrow().clone()
    }

    pub fn set_name(&self, name: Rc<str>) {
        *self.name.borrow_mut() = name;
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Applies the operation to arguments that are ready for binding:
    /// evaluated values for a procedure, raw operands for a syntax.
    ///
    /// For compound bodies this checks arity, extends the closure
    /// environment by a fresh frame, binds arguments as suspended steps,
    /// and evaluates the body with the last expression in tail position.
    pub fn apply(self: &Rc<Self>, env: &Environment, args: Args, cont: Cont) -> Result<Step> {
        match &self.body {
            Body::Native { arity, run } => {
                arity.check(args.len())?;
                run(env, args, cont)
            }
            Body::Compound {
                formals,
                body,
                closure,
            } => {
                formals.check_arity(args.len())?;
                let frame = closure.extend(&self.name());
                let formals = formals.clone();
                let body = body.clone();
                Ok(step(move || {
                    bind_arguments(frame, formals, 0, args, body, cont)
                }))
            }
        }
    }
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#<{:?} {}>", self.kind, self.name())
    }
}

/// Walks formal names and actual values pairwise, one suspended step per
/// binding, then hands off to body evaluation. Count mismatches here are
/// internal-consistency failures: the arity check already ruled them out.
fn bind_arguments(
    env: Environment,
    formals: Rc<FormalSpec>,
    index: usize,
    args: Args,
    body: Rc<Vec<Value>>,
    cont: Cont,
) -> Result<Step> {
    if index < formals.fixed.len() {
        if index >= args.len() {
            return Err(SchemeError::Internal(
                "argument binding ran out of values after arity check".to_string(),
            ));
        }
        env.define(formals.fixed[index].clone(), args[index].clone());
        return Ok(step(move || {
            bind_arguments(env, formals, index + 1, args, body, cont)
        }));
    }

    match &formals.rest {
        Some(rest) => {
            env.define(rest.clone(), list_from_vec(args[index..].to_vec()));
        }
        None => {
            if index != args.len() {
                return Err(SchemeError::Internal(
                    "argument binding received extra values after arity check".to_string(),
                ));
            }
        }
    }

    eval_sequence(env, body, cont)
}

/// Registers a host-defined procedure under `name`.
pub fn define_native_procedure(env: &Environment, name: &str, arity: Arity, run: NativeFn) {
    env.define(
        Rc::from(name),
        Value::Procedure(Operation::native_procedure(name, arity, run)),
    );
}

/// Registers a host-defined syntax under `name`.
pub fn define_native_syntax(env: &Environment, name: &str, arity: Arity, run: NativeFn) {
    env.define(
        Rc::from(name),
        Value::Syntax(Operation::native_syntax(name, arity, run)),
    );
}
